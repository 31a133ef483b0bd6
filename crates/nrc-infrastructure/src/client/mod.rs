//! Remote interfaces
//!
//! Declarations move through three states: declared
//! ([`ClientDeclaration`]), resolved ([`ClientBinding`], produced by
//! [`ClientsRegistrar`]) and bound ([`RemoteClient`]).

pub mod binding;
pub mod declaration;
pub mod interface;
pub mod placeholder;
pub mod proxy;
pub mod registrar;

pub use binding::{ClientBinding, MethodTable};
pub use declaration::ClientDeclaration;
pub use interface::RemoteInterface;
pub use placeholder::resolve_placeholders;
pub use proxy::RemoteClient;
pub use registrar::ClientsRegistrar;
