//! Named scopes
//!
//! | Type | Role |
//! |------|------|
//! | [`Bundle`] | Named list of capability definitions |
//! | [`Scope`] | Isolated capabilities with lazily built singletons |
//! | [`ConfigRegistry`] | Bundles declared per service name |
//! | [`NamedContextFactory`] | One cached scope per service name |

pub mod bundle;
pub mod factory;
pub mod registry;
pub mod scope;

pub use bundle::{Bundle, Definition, DefinitionKey};
pub use factory::NamedContextFactory;
pub use registry::{ConfigRegistry, Specification};
pub use scope::Scope;
