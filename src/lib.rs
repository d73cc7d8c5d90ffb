//! Empyema Table 1 Aggregator
//!
//! Pools descriptive ("Table 1") statistics produced independently by
//! each site of the pleural empyema cohort into one multi-site table.
//!
//! Sites upload `table1_statistics_by_treatment.json`; this crate decodes
//! their statistic strings, pools them per cohort and writes:
//! - `aggregated_table1.csv` (cohorts as columns)
//! - `table1_<cohort>.csv` (sites as columns, raw values)
//!
//! Most users should run the CLI:
//!
//! ```bash
//! table1-agg aggregate --input uploads/
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod table;
pub mod utils;
