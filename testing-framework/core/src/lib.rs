pub mod lifecycle;
pub mod nodes;
pub mod session;

pub use chain_harness_config::adjust_timeout;

/// Boxed error used across collaborator seams.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
