// Command handlers module
pub mod monitor;

// Re-exports for cleaner imports
pub use monitor::{build_command, execute};
