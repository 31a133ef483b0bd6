//! Domain layer constants
//!
//! Names and defaults that are part of the client contract. Infrastructure
//! tuning values live in `nrc_infrastructure::constants`.

// ============================================================================
// CONTEXT CONSTANTS
// ============================================================================

/// Reserved name under which global capability bundles are registered
pub const DEFAULT_CONTEXT_NAME: &str = "default";

/// Property key exposing the service name inside a named scope
pub const CLIENT_NAME_PROPERTY: &str = "nrc.client.name";

/// Suffix appended to the context id to build the default client alias
pub const CLIENT_ALIAS_SUFFIX: &str = "Client";

// ============================================================================
// URL CONSTANTS
// ============================================================================

/// Scheme assumed when a declared URL has none
pub const DEFAULT_SCHEME: &str = "http";

/// Scheme used for servers reported as secure
pub const SECURE_SCHEME: &str = "https";

/// Separator between scheme and authority
pub const SCHEME_SEPARATOR: &str = "://";
