//! # Domain Layer
//!
//! Types and contracts for named, load-balanced RPC clients. Nothing in this
//! crate performs I/O; the infrastructure crate wires these contracts into
//! per-service scopes and cached clients.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`value_objects`] | Service names, endpoints, client config, HTTP values |
//! | [`ports`] | Load balancer, retry, transport and fallback traits |
//! | [`constants`] | Reserved names and URL defaults |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
