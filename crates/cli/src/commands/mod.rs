//! Command handlers for the Nexus CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod info;
pub mod search;
pub mod stress;

// Re-export command types for convenience
pub use info::InfoCommand;
pub use search::SearchCommand;
pub use stress::StressCommand;
