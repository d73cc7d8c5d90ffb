//! Output writers for aggregated tables.
//!
//! This module handles writing results:
//! - CSV tables (pooled and per-site views)
//! - Text summaries for the terminal

pub mod csv;
pub mod summary;

// Re-export main functions
pub use self::csv::{read_table, render_csv, write_table, write_tables};
pub use summary::generate_text_summary;
