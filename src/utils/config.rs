//! Configuration and constants for the aggregation run.

/// File name every site uploads its Table 1 statistics under
pub const SITE_DOCUMENT_FILE_NAME: &str = "table1_statistics_by_treatment.json";

/// Output file for the cohort-pooled view
pub const AGGREGATED_TABLE_FILE_NAME: &str = "aggregated_table1.csv";

/// Index column header used by every output table
pub const INDEX_COLUMN: &str = "Variable";

/// Sentinel written for a pooled or raw cell with no value
pub const NAN_SENTINEL: &str = "nan";

// Tokens the upstream pipeline (or pandas) uses for "no value"
pub const MISSING_TOKENS: &[&str] = &["nan", "<NA>", ""];

/// Small-cell suppression token emitted by sites for counts below 5
pub const SUPPRESSED_TOKEN: &str = "<5";

/// Label of the per-cohort denominator field
pub const N_FIELD: &str = "N";

// Fields that lead every table, in this order, when present
pub const PRIORITY_FIELDS: &[&str] = &[
    "N",
    "Unique Patients",
    "N with ICU stay",
    "Age (mean ± SD)",
    "Age (median [IQR])",
    "BMI (mean ± SD)",
    "BMI (median [IQR])",
];

// Exact-match label rewrites applied to every (site, cohort) field map.
// Only the sex-category casing variance is known; other variants pass through.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("Sex: male", "Sex: Male"),
    ("Sex: female", "Sex: Female"),
];
