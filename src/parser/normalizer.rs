//! Field-name normalization across sites.
//!
//! Sites occasionally spell the same variable differently. Known variants
//! are rewritten to one canonical label before anything is aggregated;
//! unknown labels pass through unchanged.

use log::debug;
use std::collections::btree_map::Entry;

use super::schema::{FieldMap, SiteDocument};
use crate::utils::config::FIELD_ALIASES;

/// Canonical spelling of a label
pub fn canonical_label(label: &str) -> &str {
    FIELD_ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map_or(label, |(_, canonical)| *canonical)
}

/// Rewrite the labels of one cohort's field map
///
/// If a site reports both spellings, the canonically spelled cell wins.
pub fn normalize_field_map(fields: FieldMap) -> FieldMap {
    let mut normalized = FieldMap::new();

    for (label, value) in fields {
        let canonical = canonical_label(&label);

        if canonical == label {
            normalized.insert(label, value);
            continue;
        }

        match normalized.entry(canonical.to_string()) {
            Entry::Vacant(slot) => {
                debug!("Normalized field '{}' -> '{}'", label, canonical);
                slot.insert(value);
            }
            Entry::Occupied(_) => {
                debug!("Dropping '{}': '{}' already reported", label, canonical);
            }
        }
    }

    normalized
}

/// Normalize every cohort of a site document in place
pub fn normalize_document(document: &mut SiteDocument) {
    for fields in document.cohort_groups.values_mut() {
        *fields = normalize_field_map(std::mem::take(fields));
    }
}
