//! Aggregate command implementation.
//!
//! The aggregate command:
//! 1. Discovers site documents
//! 2. Loads and normalizes them
//! 3. Pools statistics across sites per cohort
//! 4. Builds the per-site tables
//! 5. Writes all tables

use super::models::AggregateArgs;
use crate::aggregator::AggregationConfig;
use crate::output::{generate_text_summary, write_tables};
use crate::parser::{find_site_documents, load_site_documents, Cohort};
use crate::table::{Table, TableAssembler};
use crate::utils::config::{AGGREGATED_TABLE_FILE_NAME, SITE_DOCUMENT_FILE_NAME};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the aggregate command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Paths of the written tables; empty when no site documents were found
///
/// # Errors
/// * Unreadable input directory
/// * Malformed site document (the error names the file)
/// * File write errors
pub fn execute_aggregate(args: AggregateArgs) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();
    let output_dir = args.output_dir().clone();

    // Step 1: Discover documents
    println!("Searching for table1 files in: {}", args.input_dir.display());
    let files = find_site_documents(&args.input_dir)
        .context("Failed to scan input directory")?;

    println!("\nFound {} files:", files.len());
    for file in &files {
        let shown = file.strip_prefix(&args.input_dir).unwrap_or(file);
        println!("  - {}", shown.display());
    }

    if files.is_empty() {
        println!("No {} files found!", SITE_DOCUMENT_FILE_NAME);
        return Ok(Vec::new());
    }

    // Step 2: Load
    println!("\nLoading JSON files...");
    let documents = load_site_documents(&files).context("Failed to load site documents")?;

    let config = AggregationConfig::new().with_mean_pooling(args.mean_pooling);
    debug!("Aggregation config: {:?}", config);
    let assembler = TableAssembler::new(&documents, config);

    // Step 3: Pooled view
    println!("\n[1/4] Aggregating statistics across sites...");
    let pooled = assembler.pooled_table();
    let pooled_table = pooled.to_table();

    // Step 4: Per-site views
    let mut site_tables: Vec<(Cohort, Table)> = Vec::new();
    for (idx, cohort) in Cohort::SITE_TABLES.iter().enumerate() {
        println!("\n[{}/4] Creating site-based table for {}...", idx + 2, cohort);
        site_tables.push((*cohort, assembler.site_table(*cohort)));
    }

    // Step 5: Write everything at once
    let mut outputs: Vec<(PathBuf, &Table)> =
        vec![(output_dir.join(AGGREGATED_TABLE_FILE_NAME), &pooled_table)];
    for (cohort, table) in &site_tables {
        outputs.push((output_dir.join(cohort.site_table_file_name()), table));
    }

    let written = write_tables(&outputs).context("Failed to write output tables")?;

    let (rows, cols) = pooled_table.shape();
    println!("\n✓ Cohort-based table saved to: {}", written[0].display());
    println!("  Shape: {} variables × {} cohorts", rows, cols);

    for ((_, table), path) in site_tables.iter().zip(&written[1..]) {
        let (rows, cols) = table.shape();
        println!("✓ Site-based table saved to: {}", path.display());
        println!("  Shape: {} variables × {} sites", rows, cols);
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("{}", generate_text_summary(&pooled, documents.len()));
        println!("{}", "=".repeat(80));
    }

    let suppressed = pooled.suppressed_cells();
    if suppressed > 0 {
        info!(
            "{} suppressed site cells were excluded from pooling; pooled counts are lower bounds",
            suppressed
        );
    }

    let elapsed = start_time.elapsed();
    info!("Aggregation completed in {:.2}s", elapsed.as_secs_f64());

    Ok(written)
}

/// Validate aggregate arguments
///
/// **Public** - can be called before execute_aggregate for early validation
pub fn validate_args(args: &AggregateArgs) -> Result<()> {
    if args.input_dir.as_os_str().is_empty() {
        anyhow::bail!("Input directory cannot be empty");
    }

    if !args.input_dir.is_dir() {
        anyhow::bail!(
            "Input directory does not exist or is not a directory: {}",
            args.input_dir.display()
        );
    }

    let output_dir = args.output_dir();
    if output_dir.exists() && !output_dir.is_dir() {
        anyhow::bail!(
            "Output path exists and is not a directory: {}",
            output_dir.display()
        );
    }

    Ok(())
}
