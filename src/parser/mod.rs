//! Site document parsing and statistic decoding.
//!
//! This module handles:
//! - Discovering and loading per-site JSON documents
//! - Normalizing field labels across sites
//! - Classifying fields into statistic families
//! - Decoding and encoding statistic strings

pub mod classifier;
pub mod document;
pub mod normalizer;
pub mod schema;
pub mod stat_string;

// Re-export main types
pub use classifier::{classify_field, FieldFamily};
pub use document::{find_site_documents, load_site_document, load_site_documents, parse_site_document};
pub use normalizer::{canonical_label, normalize_document, normalize_field_map};
pub use schema::{Cohort, FieldMap, SiteDocument};
pub use stat_string::{decode_cell, Decoded, StatValue};
