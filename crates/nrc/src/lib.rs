//! # Named RPC Clients
//!
//! Declarative remote clients where every target service gets its own
//! configuration scope and a cached, load-balanced client.
//!
//! This crate is the public facade. It re-exports the domain contracts and
//! the infrastructure that wires them together, and hosts the `nrc` command
//! line tool.
//!
//! ## Example
//!
//! ```ignore
//! use nrc::infrastructure::config::ConfigLoader;
//! use nrc::ClientContextBuilder;
//!
//! let config = ConfigLoader::new().with_config_path("nrc.toml").load()?;
//! let context = ClientContextBuilder::new(config)
//!     .declare::<UserClient>()
//!     .build()?;
//! let users: UserClient = context.client()?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Error taxonomy, value objects and ports
//! - `infrastructure` - Config, logging, scopes, load-balanced clients, transport
//! - `cli` - The `nrc` command line tool

/// Domain layer - contracts and value objects
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use nrc_domain::*;
}

/// Infrastructure layer - config, scopes, clients and transport
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use nrc_infrastructure::*;
}

pub mod cli;

pub use domain::{Error, Result};
pub use infrastructure::client::{ClientDeclaration, RemoteClient, RemoteInterface};
pub use infrastructure::context::Bundle;
pub use infrastructure::{ClientContext, ClientContextBuilder};
