//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analysis` - Analyze, trends, forecast, suggest and dashboard commands
//! - `config` - Show the resolved configuration
//! - `core` - Shared utilities (run context, reading loader, JSON output)

pub mod analysis;
pub mod config;
pub mod core;

// Re-export command functions for main.rs
pub use analysis::*;
pub use config::*;
pub use core::*;
