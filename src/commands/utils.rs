use anyhow::Result;
use std::path::PathBuf;

use crate::parser::classifier::{classify_field, FieldFamily};
use crate::parser::stat_string::{decode_cell, Decoded};
use crate::parser::{load_site_document, Cohort};
use crate::utils::config::{SITE_DOCUMENT_FILE_NAME, SUPPRESSED_TOKEN};

/// Validate one site document and print what it contains
pub fn validate_site_document_file(file_path: PathBuf) -> Result<()> {
    println!("Validating site document: {}", file_path.display());

    let document = load_site_document(&file_path)?;

    println!("✓ Valid site document");
    println!("  Site: {}", document.site_name);
    match document.generated_at() {
        Some(ts) => println!("  Generated: {}", ts),
        None => println!(
            "  Generated: {} (unparsed)",
            document.date_generated.as_deref().unwrap_or("-")
        ),
    }

    for (name, fields) in &document.cohort_groups {
        let mut unparsed = 0;
        let mut suppressed = 0;
        for label in fields.labels() {
            match decode_cell(classify_field(label), fields.text(label)) {
                Decoded::Value(_) => {}
                Decoded::Suppressed => suppressed += 1,
                Decoded::Missing => unparsed += 1,
            }
        }

        let marker = if Cohort::from_name(name).is_some() { "" } else { " (not pooled)" };
        println!(
            "  Cohort {}{}: {} fields, {} suppressed, {} without value",
            name,
            marker,
            fields.len(),
            suppressed,
            unparsed
        );
    }

    for cohort in Cohort::ALL {
        if document.cohort(cohort).is_none() {
            println!("  Cohort {} missing; its cells count as no value", cohort);
        }
    }

    Ok(())
}

/// Display input schema information
pub fn display_schema(show_details: bool) {
    println!("Site Document Schema ({})", SITE_DOCUMENT_FILE_NAME);
    println!();

    if show_details {
        println!("Document Structure:");
        println!("  site_name: string        - Site identifier (per-site table column)");
        println!("  date_generated: string   - ISO 8601 timestamp (informational)");
        println!("  cohort_groups: object    - Cohort name -> field map");
        for cohort in Cohort::ALL {
            println!("    {}", cohort);
        }
        println!("      <label>: string|null - Statistic text");
        println!();
        println!("Statistic families (chosen by label):");
        for (family, rule) in [
            (FieldFamily::Count, "\"N\", \"N ...\", \"Unique Patients\", contains \"Patients\""),
            (FieldFamily::MeanSd, "contains \"(mean ± SD)\""),
            (FieldFamily::MedianIqr, "contains \"(median [IQR])\""),
            (FieldFamily::CountPct, "anything else"),
        ] {
            println!("  {:<24} {}", family.format_hint(), rule);
        }
        println!();
        println!(
            "Cells starting with \"{}\" are small-cell suppressed and left out of pooling.",
            SUPPRESSED_TOKEN
        );
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Empyema Table 1 Aggregator v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Pools per-site Table 1 statistics for the pleural empyema cohort.");
}
