//! Cross-site pooling of decoded statistics.
//!
//! Each statistic family has its own pooling rule:
//! - counts are summed
//! - means and SDs are averaged independently across sites
//! - medians, Q1s and Q3s each take the median across sites
//! - count/percentage cells sum counts and recompute the percentage from
//!   the pooled cohort `N`; site percentages are never combined
//!
//! Absent and suppressed cells contribute nothing.

use log::debug;

use super::metrics::{mean, median, weighted_mean};
use crate::parser::classifier::FieldFamily;
use crate::parser::stat_string::{Decoded, StatValue};
use crate::utils::config::NAN_SENTINEL;

/// How site means and SDs are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MeanPooling {
    /// Simple average of site summaries (reference behavior)
    #[default]
    Unweighted,
    /// Average weighted by each site's cohort `N`
    SiteWeighted,
}

/// Aggregator configuration
#[derive(Debug, Clone, Default)]
pub struct AggregationConfig {
    pub mean_pooling: MeanPooling,
}

impl AggregationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mean_pooling(mut self, mean_pooling: MeanPooling) -> Self {
        self.mean_pooling = mean_pooling;
        self
    }
}

/// Per-cohort denominators, computed before any other field is pooled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortTotals {
    /// Pooled `N` for the cohort
    pub total_n: i64,
    /// Each site's own `N`, in document order
    pub site_n: Vec<Option<i64>>,
}

impl CohortTotals {
    pub fn from_site_n(site_n: Vec<Option<i64>>) -> Self {
        Self {
            total_n: pool_counts(&site_n),
            site_n,
        }
    }
}

/// Pooled result for one (cohort, field) pair
#[derive(Debug, Clone, PartialEq)]
pub struct PooledField {
    pub label: String,
    pub family: FieldFamily,
    /// `None` when no site had a usable value for a summary family
    pub value: Option<StatValue>,
    /// Sites whose cell decoded to a value
    pub contributing_sites: usize,
    /// Sites whose cell carried the suppression token
    pub suppressed_sites: usize,
}

impl PooledField {
    /// Canonical output text; `nan` when there is nothing to report
    pub fn display(&self) -> String {
        self.value
            .map(|v| v.to_string())
            .unwrap_or_else(|| NAN_SENTINEL.to_string())
    }
}

/// Sum of present counts; `0` when none are present
pub fn pool_counts(values: &[Option<i64>]) -> i64 {
    values.iter().flatten().sum()
}

/// Unweighted mean of site means and of site SDs
pub fn pool_mean_sd(values: &[Option<(f64, f64)>]) -> Option<(f64, f64)> {
    let present: Vec<(f64, f64)> = values.iter().flatten().copied().collect();
    let means: Vec<f64> = present.iter().map(|(m, _)| *m).collect();
    let sds: Vec<f64> = present.iter().map(|(_, s)| *s).collect();

    Some((mean(&means)?, mean(&sds)?))
}

/// Mean and SD averages weighted by site `N`
///
/// Sites without a positive `N` are left out. Falls back to
/// [`pool_mean_sd`] when no site can be weighted.
pub fn pool_mean_sd_weighted(
    values: &[Option<(f64, f64)>],
    weights: &[Option<i64>],
) -> Option<(f64, f64)> {
    let weighted: Vec<((f64, f64), f64)> = values
        .iter()
        .zip(weights)
        .filter_map(|(value, weight)| match (value, weight) {
            (Some(v), Some(w)) if *w > 0 => Some((*v, *w as f64)),
            _ => None,
        })
        .collect();

    let means: Vec<(f64, f64)> = weighted.iter().map(|((m, _), w)| (*m, *w)).collect();
    let sds: Vec<(f64, f64)> = weighted.iter().map(|((_, s), w)| (*s, *w)).collect();

    match (weighted_mean(&means), weighted_mean(&sds)) {
        (Some(m), Some(s)) => Some((m, s)),
        _ => {
            debug!("No site N available for weighting; using unweighted mean");
            pool_mean_sd(values)
        }
    }
}

/// Elementwise median of medians, Q1s and Q3s
pub fn pool_median_iqr(values: &[Option<(f64, f64, f64)>]) -> Option<(f64, f64, f64)> {
    let present: Vec<(f64, f64, f64)> = values.iter().flatten().copied().collect();
    let medians: Vec<f64> = present.iter().map(|v| v.0).collect();
    let q1s: Vec<f64> = present.iter().map(|v| v.1).collect();
    let q3s: Vec<f64> = present.iter().map(|v| v.2).collect();

    Some((median(&medians)?, median(&q1s)?, median(&q3s)?))
}

/// Summed count with percentage of the pooled cohort `N`
///
/// Returns `(0, 0.0)` when no site reports a count or `total_n` is zero.
pub fn pool_count_pct(values: &[Option<(i64, f64)>], total_n: i64) -> (i64, f64) {
    let counts: Vec<i64> = values.iter().flatten().map(|(count, _)| *count).collect();

    if counts.is_empty() || total_n == 0 {
        return (0, 0.0);
    }

    let total_count: i64 = counts.iter().sum();
    let pct = (total_count as f64 / total_n as f64) * 100.0;
    (total_count, pct)
}

/// Pool one field's decoded site cells
///
/// **Public** - dispatches to the family's pooling rule
///
/// # Arguments
/// * `label` - Field label
/// * `family` - Statistic family the cells were decoded as
/// * `cells` - One decoded cell per site, in document order
/// * `totals` - Denominators for the cohort being pooled
/// * `config` - Aggregation options
pub fn pool_field(
    label: &str,
    family: FieldFamily,
    cells: &[Decoded],
    totals: &CohortTotals,
    config: &AggregationConfig,
) -> PooledField {
    let value = match family {
        FieldFamily::Count => {
            let counts: Vec<Option<i64>> = cells.iter().map(as_count).collect();
            Some(StatValue::Count(pool_counts(&counts)))
        }
        FieldFamily::MeanSd => {
            let values: Vec<Option<(f64, f64)>> = cells.iter().map(as_mean_sd).collect();
            let pooled = match config.mean_pooling {
                MeanPooling::Unweighted => pool_mean_sd(&values),
                MeanPooling::SiteWeighted => pool_mean_sd_weighted(&values, &totals.site_n),
            };
            pooled.map(|(mean, sd)| StatValue::MeanSd { mean, sd })
        }
        FieldFamily::MedianIqr => {
            let values: Vec<Option<(f64, f64, f64)>> = cells.iter().map(as_median_iqr).collect();
            pool_median_iqr(&values).map(|(median, q1, q3)| StatValue::MedianIqr { median, q1, q3 })
        }
        FieldFamily::CountPct => {
            let values: Vec<Option<(i64, f64)>> = cells.iter().map(as_count_pct).collect();
            let (count, pct) = pool_count_pct(&values, totals.total_n);
            Some(StatValue::CountPct { count, pct })
        }
    };

    PooledField {
        label: label.to_string(),
        family,
        value,
        contributing_sites: cells.iter().filter(|c| c.value().is_some()).count(),
        suppressed_sites: cells.iter().filter(|c| c.is_suppressed()).count(),
    }
}

fn as_count(cell: &Decoded) -> Option<i64> {
    match cell {
        Decoded::Value(StatValue::Count(n)) => Some(*n),
        _ => None,
    }
}

fn as_mean_sd(cell: &Decoded) -> Option<(f64, f64)> {
    match cell {
        Decoded::Value(StatValue::MeanSd { mean, sd }) => Some((*mean, *sd)),
        _ => None,
    }
}

fn as_median_iqr(cell: &Decoded) -> Option<(f64, f64, f64)> {
    match cell {
        Decoded::Value(StatValue::MedianIqr { median, q1, q3 }) => Some((*median, *q1, *q3)),
        _ => None,
    }
}

fn as_count_pct(cell: &Decoded) -> Option<(i64, f64)> {
    match cell {
        Decoded::Value(StatValue::CountPct { count, pct }) => Some((*count, *pct)),
        _ => None,
    }
}
