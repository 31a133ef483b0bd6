//! Configuration types module

pub mod app;
pub mod client;
pub mod logging;

// Re-export main types
pub use app::*;
pub use client::{ClientDefaults, ClientSettings, RetryConfig};
pub use logging::LoggingConfig;
