//! Remote interface contract

use super::declaration::ClientDeclaration;
use super::proxy::RemoteClient;
use nrc_domain::value_objects::MethodDescriptor;

/// A typed remote interface
///
/// Implemented by the caller-facing client type. The declaration and method
/// table are read once at startup; every call then goes through the
/// [`RemoteClient`] handed to [`RemoteInterface::from_client`].
///
/// # Example
///
/// ```ignore
/// struct UserClient(RemoteClient);
///
/// impl RemoteInterface for UserClient {
///     fn declaration() -> ClientDeclaration {
///         ClientDeclaration::for_type::<Self>().with_name("users")
///     }
///
///     fn methods() -> Vec<MethodDescriptor> {
///         vec![MethodDescriptor::get("get_user", "/users/{id}")]
///     }
///
///     fn from_client(client: RemoteClient) -> Self {
///         Self(client)
///     }
/// }
///
/// impl UserClient {
///     async fn get_user(&self, id: u64) -> Result<User> {
///         self.0.call_json("get_user", RequestArgs::new().path("id", id)).await
///     }
/// }
/// ```
pub trait RemoteInterface: Send + Sync + Sized + 'static {
    /// Declaration attributes
    fn declaration() -> ClientDeclaration;

    /// Dispatch table entries
    fn methods() -> Vec<MethodDescriptor>;

    /// Wrap the bound client
    fn from_client(client: RemoteClient) -> Self;
}
