// Platform-specific code module

pub mod notify;
pub mod signals;
pub mod system;

// Re-exports para imports limpios
pub use notify::{DesktopNotifier, NullNotifier};
pub use signals::NixSignaller;
pub use system::ProcfsSource;
