//! # Infrastructure Layer
//!
//! Runtime pieces behind the named-client contracts of `nrc_domain`.
//!
//! ### Configuration & Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment loader for TOML files and `NRC_` environment variables |
//! | [`logging`] | Structured logging with tracing |
//! | [`constants`] | Infrastructure defaults |
//! | [`error_ext`] | Error context helpers |
//!
//! ### Named Clients
//! | Module | Description |
//! |--------|-------------|
//! | [`context`] | Bundles, scopes, registry and the named context factory |
//! | [`loadbalancer`] | Load-balanced clients and their per-service cache |
//! | [`client`] | Declarations, registrar and remote client proxy |
//! | [`transport`] | reqwest HTTP transport |
//! | [`bootstrap`] | Composition root |

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod constants;
pub mod context;
pub mod error_ext;
pub mod loadbalancer;
pub mod logging;
pub mod transport;

// Re-export commonly used types
pub use bootstrap::{ClientContext, ClientContextBuilder};
pub use error_ext::ErrorContext;
