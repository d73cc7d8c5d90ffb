//! Field classification by label.
//!
//! Sites do not tag their cells with a type; the statistic family is
//! implied by the variable label. Rules are checked in a fixed order and
//! the first match wins.

use crate::utils::config::N_FIELD;

/// Label marker for mean ± SD fields
pub const MEAN_SD_MARKER: &str = "(mean ± SD)";

/// Label marker for median [IQR] fields
pub const MEDIAN_IQR_MARKER: &str = "(median [IQR])";

/// Statistic family of a Table 1 variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFamily {
    /// Plain count, e.g. `"N"` or `"Unique Patients"`
    Count,
    /// `mean ± sd`
    MeanSd,
    /// `median [q1, q3]`
    MedianIqr,
    /// `count (pct%)`, the fallback for categorical breakdowns and flags
    CountPct,
}

impl FieldFamily {
    /// Canonical text shape of this family
    pub fn format_hint(self) -> &'static str {
        match self {
            FieldFamily::Count => "<count>",
            FieldFamily::MeanSd => "<mean> ± <sd>",
            FieldFamily::MedianIqr => "<median> [<q1>, <q3>]",
            FieldFamily::CountPct => "<count> (<pct>%)",
        }
    }
}

/// Classify a field label into its statistic family
///
/// **Public** - the single dispatch point between labels and parsers
///
/// Order matters: `"N with ICU stay"` is a count even though it would
/// otherwise fall through to count/percentage.
pub fn classify_field(label: &str) -> FieldFamily {
    if is_count_label(label) {
        FieldFamily::Count
    } else if label.contains(MEAN_SD_MARKER) {
        FieldFamily::MeanSd
    } else if label.contains(MEDIAN_IQR_MARKER) {
        FieldFamily::MedianIqr
    } else {
        FieldFamily::CountPct
    }
}

fn is_count_label(label: &str) -> bool {
    label == N_FIELD
        || label.starts_with("N ")
        || label == "Unique Patients"
        || label.contains("Patients")
}
