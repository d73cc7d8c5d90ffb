//! Builds the pooled and per-site views from loaded documents.

use log::{debug, warn};

use super::universe::field_universe;
use super::Table;
use crate::aggregator::pooling::{pool_field, AggregationConfig, CohortTotals, PooledField};
use crate::parser::classifier::classify_field;
use crate::parser::schema::{Cohort, SiteDocument};
use crate::parser::stat_string::{decode_cell, parse_n, Decoded};
use crate::utils::config::{NAN_SENTINEL, N_FIELD};

/// Orchestrates decoding, pooling and tabulation
///
/// Holds no state beyond its inputs; every table is computed on demand.
#[derive(Debug)]
pub struct TableAssembler<'a> {
    documents: &'a [SiteDocument],
    fields: Vec<String>,
    config: AggregationConfig,
}

impl<'a> TableAssembler<'a> {
    pub fn new(documents: &'a [SiteDocument], config: AggregationConfig) -> Self {
        let fields = field_universe(documents);
        debug!("Field universe: {} variables", fields.len());

        Self {
            documents,
            fields,
            config,
        }
    }

    /// Ordered field universe shared by every table
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn site_names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.site_name.clone()).collect()
    }

    /// First pass: pooled `N` and per-site `N` for one cohort
    ///
    /// A site reporting the cohort without an `N` counts as zero towards
    /// the pooled denominator.
    pub fn cohort_totals(&self, cohort: Cohort) -> CohortTotals {
        let site_n = self
            .documents
            .iter()
            .map(|doc| {
                let fields = doc.cohort(cohort)?;
                if !fields.contains(N_FIELD) {
                    warn!(
                        "{}: cohort '{}' has no '{}' field; percentages use a smaller denominator",
                        doc.site_name, cohort, N_FIELD
                    );
                }
                fields.text(N_FIELD).and_then(parse_n)
            })
            .collect();

        let totals = CohortTotals::from_site_n(site_n);
        debug!("Cohort {}: pooled N = {}", cohort, totals.total_n);
        totals
    }

    /// Second pass: pool every field of the universe for one cohort
    pub fn pool_cohort(&self, cohort: Cohort) -> Vec<PooledField> {
        let totals = self.cohort_totals(cohort);

        self.fields
            .iter()
            .map(|field| {
                let family = classify_field(field);
                let cells: Vec<Decoded> = self
                    .documents
                    .iter()
                    .map(|doc| {
                        let raw = doc.cohort(cohort).and_then(|f| f.text(field));
                        let cell = decode_cell(family, raw);
                        if cell.is_suppressed() {
                            warn!(
                                "{}: {} / '{}' is suppressed ({}); excluded from pooling",
                                doc.site_name,
                                cohort,
                                field,
                                raw.unwrap_or_default()
                            );
                        }
                        cell
                    })
                    .collect();

                pool_field(field, family, &cells, &totals, &self.config)
            })
            .collect()
    }

    /// View A: pooled statistics, cohorts as columns
    pub fn pooled_table(&self) -> PooledTable {
        let columns = Cohort::ALL
            .iter()
            .map(|&cohort| (cohort, self.pool_cohort(cohort)))
            .collect();

        PooledTable {
            fields: self.fields.clone(),
            columns,
        }
    }

    /// View B: raw site statistics for one cohort, sites as columns
    ///
    /// Values are passed through untouched; absent cells read `nan`.
    pub fn site_table(&self, cohort: Cohort) -> Table {
        let mut table = Table::new(self.site_names());

        for field in &self.fields {
            let cells = self
                .documents
                .iter()
                .map(|doc| {
                    doc.cohort(cohort)
                        .map_or_else(|| NAN_SENTINEL.to_string(), |f| f.display(field))
                })
                .collect();
            table.push_row(field.clone(), cells);
        }

        table
    }
}

/// Pooled statistics for every cohort
#[derive(Debug, Clone)]
pub struct PooledTable {
    pub fields: Vec<String>,
    /// One entry per cohort, each holding a pooled field per variable
    pub columns: Vec<(Cohort, Vec<PooledField>)>,
}

impl PooledTable {
    pub fn get(&self, cohort: Cohort, label: &str) -> Option<&PooledField> {
        self.columns
            .iter()
            .find(|(c, _)| *c == cohort)
            .and_then(|(_, fields)| fields.iter().find(|f| f.label == label))
    }

    /// Number of (cohort, field, site) cells that were suppressed
    pub fn suppressed_cells(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|(_, fields)| fields)
            .map(|f| f.suppressed_sites)
            .sum()
    }

    /// Render as text cells
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(
            self.columns
                .iter()
                .map(|(cohort, _)| cohort.as_str().to_string())
                .collect(),
        );

        for (row, field) in self.fields.iter().enumerate() {
            let cells = self
                .columns
                .iter()
                .map(|(_, pooled)| pooled[row].display())
                .collect();
            table.push_row(field.clone(), cells);
        }

        table
    }
}
