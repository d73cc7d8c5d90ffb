//! Pooling of site statistics into cohort-level estimates.
//!
//! This module turns per-site decoded cells into:
//! - Summed counts
//! - Averaged mean ± SD summaries
//! - Median-of-medians IQR summaries
//! - Counts with freshly computed percentages

pub mod metrics;
pub mod pooling;

// Re-export main types and functions
pub use pooling::{
    pool_count_pct, pool_counts, pool_field, pool_mean_sd, pool_mean_sd_weighted,
    pool_median_iqr, AggregationConfig, CohortTotals, MeanPooling, PooledField,
};
