//! The set of variables shown in every output table.

use std::collections::BTreeSet;

use crate::parser::schema::SiteDocument;
use crate::utils::config::PRIORITY_FIELDS;

/// Union of field labels across all sites and all cohorts
///
/// Priority fields come first in their fixed order, then everything else
/// alphabetically. Cohorts outside the fixed set still contribute labels.
pub fn field_universe(documents: &[SiteDocument]) -> Vec<String> {
    let mut remaining: BTreeSet<&str> = documents
        .iter()
        .flat_map(|doc| doc.cohort_groups.values())
        .flat_map(|fields| fields.labels())
        .collect();

    let mut ordered = Vec::with_capacity(remaining.len());

    for field in PRIORITY_FIELDS {
        if remaining.remove(field) {
            ordered.push(field.to_string());
        }
    }

    ordered.extend(remaining.into_iter().map(str::to_string));
    ordered
}
