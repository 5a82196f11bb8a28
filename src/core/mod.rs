//! Core module - infrastructural components
//!
//! Configuration, error handling and shared application state.

pub mod config;
pub mod error;
pub mod state;

// Re-exports to keep imports short
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
