//! End-to-end runs of the aggregate command against synthetic site uploads.

use empyema_table1::aggregator::MeanPooling;
use empyema_table1::commands::{execute_aggregate, validate_args, AggregateArgs};
use empyema_table1::output::read_table;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

const SITE_A: &str = r#"{
  "site_name": "Alpha",
  "date_generated": "2025-05-02T14:03:11.512230",
  "cohort_groups": {
    "antibiotics_only": {
      "N": "30",
      "Unique Patients": "29",
      "Age (mean ± SD)": "60.0 ± 10.0",
      "Age (median [IQR])": "61.0 [50.0, 70.0]",
      "Sex: male": "18 (60.0%)",
      "Sex: female": "12 (40.0%)",
      "IMV": "6 (20.0%)"
    },
    "total": {
      "N": "30",
      "Sex: male": "18 (60.0%)",
      "Inpatient Mortality": "<5 (6.7%)"
    }
  }
}"#;

const SITE_B: &str = r#"{
  "site_name": "Bravo",
  "date_generated": "2025-05-03T09:00:00",
  "cohort_groups": {
    "antibiotics_only": {
      "N": "10",
      "Age (mean ± SD)": "70.0 ± 20.0",
      "Age (median [IQR])": "65.0 [55.0, 80.0]",
      "Sex: Male": "4 (40.0%)",
      "Antibiotic: Vancomycin": "8 (80.0%)",
      "BMI (mean ± SD)": null
    },
    "total": {
      "N": "10",
      "Sex: Male": "4 (40.0%)",
      "Inpatient Mortality": "5 (50.0%)"
    }
  }
}"#;

fn write_upload(dir: &Path, site: &str, body: &str) {
    let site_dir = dir.join(site);
    fs::create_dir_all(&site_dir).unwrap();
    fs::write(site_dir.join("table1_statistics_by_treatment.json"), body).unwrap();
}

fn run(dir: &Path, pooling: MeanPooling) -> Vec<std::path::PathBuf> {
    let args = AggregateArgs {
        input_dir: dir.to_path_buf(),
        output_dir: Some(dir.join("out")),
        mean_pooling: pooling,
        print_summary: true,
    };
    validate_args(&args).unwrap();
    execute_aggregate(args).unwrap()
}

#[test]
fn test_aggregate_writes_four_tables() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_upload(temp_dir.path(), "alpha", SITE_A);
    write_upload(temp_dir.path(), "bravo", SITE_B);

    let written = run(temp_dir.path(), MeanPooling::Unweighted);

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "aggregated_table1.csv",
            "table1_antibiotics_only.csv",
            "table1_intrapleural_lytics.csv",
            "table1_vats_cohort.csv",
        ]
    );
    assert!(written.iter().all(|p| p.exists()));
}

#[test]
fn test_pooled_view_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_upload(temp_dir.path(), "alpha", SITE_A);
    write_upload(temp_dir.path(), "bravo", SITE_B);

    run(temp_dir.path(), MeanPooling::Unweighted);
    let pooled = read_table(temp_dir.path().join("out/aggregated_table1.csv")).unwrap();

    assert_eq!(
        pooled.columns,
        vec!["antibiotics_only", "intrapleural_lytics", "vats_cohort", "total"]
    );

    // Priority fields first, then alphabetical
    let labels: Vec<&str> = pooled.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "N",
            "Unique Patients",
            "Age (mean ± SD)",
            "Age (median [IQR])",
            "BMI (mean ± SD)",
            "Antibiotic: Vancomycin",
            "IMV",
            "Inpatient Mortality",
            "Sex: Female",
            "Sex: Male",
        ]
    );

    let cell = |label: &str, cohort: &str| pooled.cell(label, cohort).unwrap().to_string();

    assert_eq!(cell("N", "antibiotics_only"), "40");
    assert_eq!(cell("Unique Patients", "antibiotics_only"), "29");
    assert_eq!(cell("Age (mean ± SD)", "antibiotics_only"), "65.0 ± 15.0");
    assert_eq!(cell("Age (median [IQR])", "antibiotics_only"), "63.0 [52.5, 75.0]");
    assert_eq!(cell("BMI (mean ± SD)", "antibiotics_only"), "nan");

    // Normalized labels merge into one row across sites
    assert_eq!(cell("Sex: Male", "antibiotics_only"), "22 (55.0%)");
    assert_eq!(cell("Sex: Male", "total"), "22 (55.0%)");
    assert_eq!(cell("Sex: Female", "antibiotics_only"), "12 (30.0%)");

    // Fields one site lacks still pool from the other
    assert_eq!(cell("IMV", "antibiotics_only"), "6 (15.0%)");
    assert_eq!(cell("Antibiotic: Vancomycin", "antibiotics_only"), "8 (20.0%)");

    // Suppressed cells are left out
    assert_eq!(cell("Inpatient Mortality", "total"), "5 (12.5%)");

    // Cohorts no site reported
    assert_eq!(cell("N", "vats_cohort"), "0");
    assert_eq!(cell("IMV", "vats_cohort"), "0 (0.0%)");
    assert_eq!(cell("Age (mean ± SD)", "vats_cohort"), "nan");
}

#[test]
fn test_site_view_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_upload(temp_dir.path(), "alpha", SITE_A);
    write_upload(temp_dir.path(), "bravo", SITE_B);

    run(temp_dir.path(), MeanPooling::Unweighted);
    let sites = read_table(temp_dir.path().join("out/table1_antibiotics_only.csv")).unwrap();

    assert_eq!(sites.columns, vec!["Alpha", "Bravo"]);
    assert_eq!(sites.cell("Sex: Male", "Alpha"), Some("18 (60.0%)"));
    assert_eq!(sites.cell("Sex: Male", "Bravo"), Some("4 (40.0%)"));
    assert_eq!(sites.cell("IMV", "Bravo"), Some("nan"));
    assert_eq!(sites.cell("BMI (mean ± SD)", "Bravo"), Some("nan"));
    assert_eq!(sites.cell("Inpatient Mortality", "Alpha"), Some("nan"));

    let total_only = read_table(temp_dir.path().join("out/table1_vats_cohort.csv")).unwrap();
    assert!(total_only
        .rows
        .iter()
        .all(|row| row.cells.iter().all(|c| c == "nan")));
}

#[test]
fn test_site_weighted_pooling() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_upload(temp_dir.path(), "alpha", SITE_A);
    write_upload(temp_dir.path(), "bravo", SITE_B);

    run(temp_dir.path(), MeanPooling::SiteWeighted);
    let pooled = read_table(temp_dir.path().join("out/aggregated_table1.csv")).unwrap();

    // (60 * 30 + 70 * 10) / 40 and (10 * 30 + 20 * 10) / 40
    assert_eq!(
        pooled.cell("Age (mean ± SD)", "antibiotics_only"),
        Some("62.5 ± 12.5")
    );
    // medians are unaffected by the mean strategy
    assert_eq!(
        pooled.cell("Age (median [IQR])", "antibiotics_only"),
        Some("63.0 [52.5, 75.0]")
    );
}

#[test]
fn test_output_defaults_to_input_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_upload(temp_dir.path(), "alpha", SITE_A);

    let args = AggregateArgs {
        input_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    execute_aggregate(args).unwrap();

    assert!(temp_dir.path().join("aggregated_table1.csv").exists());
}

#[test]
fn test_malformed_upload_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_upload(temp_dir.path(), "alpha", SITE_A);
    write_upload(temp_dir.path(), "bravo", r#"{"site_name": "Bravo"}"#);

    let args = AggregateArgs {
        input_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    let err = execute_aggregate(args).unwrap_err();

    assert!(format!("{:#}", err).contains("bravo"));
    assert!(!temp_dir.path().join("aggregated_table1.csv").exists());
}
