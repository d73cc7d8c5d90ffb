//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod aggregate;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use aggregate::{execute_aggregate, validate_args};
pub use models::AggregateArgs;
pub use utils::{display_schema, display_version, validate_site_document_file};
