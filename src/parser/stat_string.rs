//! Codec for the statistic strings sites exchange.
//!
//! Four encodings are in use:
//! - `12` (plain count)
//! - `12.3 ± 4.5` (mean ± SD)
//! - `5.0 [2.0, 9.0]` (median [Q1, Q3])
//! - `42 (17.0%)` (count with percentage)
//!
//! Decoding never fails loudly: sentinels and non-matching text become
//! "no value". The three pattern parsers only anchor at the start of the
//! string, so trailing text after a valid prefix is ignored.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::classifier::FieldFamily;
use crate::utils::config::{MISSING_TOKENS, SUPPRESSED_TOKEN};

static MEAN_SD_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([-\d.]+)\s*±\s*([-\d.]+)").ok());

static MEDIAN_IQR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([-\d.]+)\s*\[([-\d.]+),\s*([-\d.]+)\]").ok());

static COUNT_PCT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*\(([\d.]+)%?\)").ok());

/// A decoded statistic cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Count(i64),
    MeanSd { mean: f64, sd: f64 },
    MedianIqr { median: f64, q1: f64, q3: f64 },
    CountPct { count: i64, pct: f64 },
}

impl StatValue {
    pub fn family(&self) -> FieldFamily {
        match self {
            StatValue::Count(_) => FieldFamily::Count,
            StatValue::MeanSd { .. } => FieldFamily::MeanSd,
            StatValue::MedianIqr { .. } => FieldFamily::MedianIqr,
            StatValue::CountPct { .. } => FieldFamily::CountPct,
        }
    }
}

/// Encodes the canonical text form
impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StatValue::Count(n) => write!(f, "{}", n),
            StatValue::MeanSd { mean, sd } => f.write_str(&format_mean_sd(mean, sd)),
            StatValue::MedianIqr { median, q1, q3 } => {
                f.write_str(&format_median_iqr(median, q1, q3))
            }
            StatValue::CountPct { count, pct } => f.write_str(&format_count_pct(count, pct)),
        }
    }
}

/// Outcome of decoding one site's cell
///
/// `Suppressed` is kept apart from `Missing` so small-cell masking is
/// visible to callers. Pooling currently excludes both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded {
    Value(StatValue),
    Suppressed,
    Missing,
}

impl Decoded {
    pub fn value(&self) -> Option<&StatValue> {
        match self {
            Decoded::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Decoded::Suppressed)
    }
}

/// Decode a raw cell according to its field family
///
/// **Public** - main entry point used by the aggregator
pub fn decode_cell(family: FieldFamily, raw: Option<&str>) -> Decoded {
    let Some(raw) = raw else {
        return Decoded::Missing;
    };

    if is_suppressed(raw) {
        return Decoded::Suppressed;
    }

    let value = match family {
        FieldFamily::Count => parse_n(raw).map(StatValue::Count),
        FieldFamily::MeanSd => parse_mean_sd(raw).map(|(mean, sd)| StatValue::MeanSd { mean, sd }),
        FieldFamily::MedianIqr => {
            parse_median_iqr(raw).map(|(median, q1, q3)| StatValue::MedianIqr { median, q1, q3 })
        }
        FieldFamily::CountPct => {
            parse_count_pct(raw).map(|(count, pct)| StatValue::CountPct { count, pct })
        }
    };

    value.map_or(Decoded::Missing, Decoded::Value)
}

/// True when the cell carries the small-cell suppression token
pub fn is_suppressed(raw: &str) -> bool {
    raw.trim_start().starts_with(SUPPRESSED_TOKEN)
}

fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

/// Parse `mean ± sd`
pub fn parse_mean_sd(raw: &str) -> Option<(f64, f64)> {
    if is_missing_token(raw) {
        return None;
    }
    let caps = MEAN_SD_RE.as_ref()?.captures(raw)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Parse `median [q1, q3]`
pub fn parse_median_iqr(raw: &str) -> Option<(f64, f64, f64)> {
    if is_missing_token(raw) {
        return None;
    }
    let caps = MEDIAN_IQR_RE.as_ref()?.captures(raw)?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Parse `count (pct%)`; the `%` sign is optional
pub fn parse_count_pct(raw: &str) -> Option<(i64, f64)> {
    if is_missing_token(raw) {
        return None;
    }
    let caps = COUNT_PCT_RE.as_ref()?.captures(raw)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Parse a bare integer
///
/// Unlike the pattern parsers this is strict: anything beyond surrounding
/// whitespace and a sign makes the cell "no value".
pub fn parse_n(raw: &str) -> Option<i64> {
    if is_missing_token(raw) {
        return None;
    }
    raw.trim().parse().ok()
}

pub fn format_mean_sd(mean: f64, sd: f64) -> String {
    format!("{:.1} ± {:.1}", mean, sd)
}

pub fn format_median_iqr(median: f64, q1: f64, q3: f64) -> String {
    format!("{:.1} [{:.1}, {:.1}]", median, q1, q3)
}

pub fn format_count_pct(count: i64, pct: f64) -> String {
    format!("{} ({:.1}%)", count, pct)
}
