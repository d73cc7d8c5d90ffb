//! Input schema definitions for site documents.
//!
//! Each participating site uploads one JSON document holding its
//! Table 1 statistics, already formatted as text, for every cohort.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::config::NAN_SENTINEL;

/// Treatment strata reported by every site
///
/// The first three are mutually exclusive; `Total` covers all patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cohort {
    AntibioticsOnly,
    IntrapleuralLytics,
    VatsCohort,
    Total,
}

impl Cohort {
    /// Column order of the pooled table
    pub const ALL: [Cohort; 4] = [
        Cohort::AntibioticsOnly,
        Cohort::IntrapleuralLytics,
        Cohort::VatsCohort,
        Cohort::Total,
    ];

    /// Cohorts that also get a sites-as-columns table
    pub const SITE_TABLES: [Cohort; 3] = [
        Cohort::AntibioticsOnly,
        Cohort::IntrapleuralLytics,
        Cohort::VatsCohort,
    ];

    /// Key used for this cohort inside `cohort_groups`
    pub fn as_str(self) -> &'static str {
        match self {
            Cohort::AntibioticsOnly => "antibiotics_only",
            Cohort::IntrapleuralLytics => "intrapleural_lytics",
            Cohort::VatsCohort => "vats_cohort",
            Cohort::Total => "total",
        }
    }

    pub fn from_name(name: &str) -> Option<Cohort> {
        Cohort::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// File name of the sites-as-columns table for this cohort
    pub fn site_table_file_name(self) -> String {
        format!("table1_{}.csv", self.as_str())
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variable label -> statistic cell, for one cohort of one site
///
/// Cells are kept as raw JSON values: sites emit strings or `null`, and the
/// raw text is passed through untouched to the per-site tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, Value>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(label.into(), value)
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.0.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    /// Text of a cell, if present and a JSON string
    ///
    /// `null` and non-string cells have no statistic text to decode.
    pub fn text(&self, label: &str) -> Option<&str> {
        self.0.get(label).and_then(Value::as_str)
    }

    /// Raw cell as shown in the per-site tables
    ///
    /// Absent, `null` and `"nan"` cells all render as `nan`.
    pub fn display(&self, label: &str) -> String {
        match self.0.get(label) {
            None | Some(Value::Null) => NAN_SENTINEL.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn entry(&mut self, label: String) -> std::collections::btree_map::Entry<'_, String, Value> {
        self.0.entry(label)
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One site's uploaded statistics document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDocument {
    /// Site identifier, used as column header in the per-site tables
    pub site_name: String,

    /// Timestamp written by the site (informational only)
    #[serde(default)]
    pub date_generated: Option<String>,

    /// Cohort name -> field map; may contain cohorts outside `Cohort::ALL`
    pub cohort_groups: BTreeMap<String, FieldMap>,
}

impl SiteDocument {
    /// Field map for one of the fixed cohorts, if the site reported it
    pub fn cohort(&self, cohort: Cohort) -> Option<&FieldMap> {
        self.cohort_groups.get(cohort.as_str())
    }

    /// Parsed `date_generated`
    ///
    /// Accepts RFC 3339 as well as the offset-less ISO-8601 form written
    /// by Python's `datetime.isoformat()`. Returns `None` when absent or
    /// unparseable; the timestamp never affects aggregation.
    pub fn generated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.date_generated.as_deref()?.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}
