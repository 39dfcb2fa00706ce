// OS counter sources

pub mod linux;

pub use linux::ProcfsSource;
