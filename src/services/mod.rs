//! Services module - HTTP handlers
//!
//! One sub-module per concern: diagnostics (liveness and connectivity) and
//! the generic resource endpoints.

pub mod diagnostics;
pub mod resources;

// Re-exports to keep the router terse
pub use diagnostics::{db_ping, health, root, sample_table};
pub use resources::{create_row, delete_row, get_row, list_rows, update_row};
