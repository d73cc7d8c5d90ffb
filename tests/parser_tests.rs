use empyema_table1::parser::classifier::{classify_field, FieldFamily};
use empyema_table1::parser::stat_string::{
    format_count_pct, format_mean_sd, format_median_iqr, parse_count_pct, parse_mean_sd,
    parse_median_iqr, parse_n,
};
use empyema_table1::parser::{find_site_documents, load_site_document, load_site_documents, Cohort};
use empyema_table1::utils::LoadError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn write_document(dir: &Path, site: &str, body: &str) {
    let site_dir = dir.join(site).join("upload_to_box");
    fs::create_dir_all(&site_dir).unwrap();
    fs::write(site_dir.join("table1_statistics_by_treatment.json"), body).unwrap();
}

#[test]
fn test_codec_round_trips() {
    let (mean, sd) = parse_mean_sd("12.3 ± 4.5").unwrap();
    assert_eq!(format_mean_sd(mean, sd), "12.3 ± 4.5");

    let (median, q1, q3) = parse_median_iqr("5.0 [2.0, 9.0]").unwrap();
    assert_eq!(format_median_iqr(median, q1, q3), "5.0 [2.0, 9.0]");

    let (count, pct) = parse_count_pct("42 (17.0%)").unwrap();
    assert_eq!(format_count_pct(count, pct), "42 (17.0%)");
}

#[test]
fn test_count_pct_examples() {
    assert_eq!(parse_count_pct("42 (17.0%)"), Some((42, 17.0)));
    assert_eq!(parse_count_pct("42 (17%)"), Some((42, 17.0)));
}

#[test]
fn test_parse_n_sentinels() {
    assert_eq!(parse_n("nan"), None);
    assert_eq!(parse_n("<NA>"), None);
    assert_eq!(parse_n(""), None);
}

#[test]
fn test_classification_examples() {
    assert_eq!(classify_field("N with ICU stay"), FieldFamily::Count);
    assert_eq!(classify_field("Antibiotic: Vancomycin"), FieldFamily::CountPct);
    assert_eq!(classify_field("BMI (mean ± SD)"), FieldFamily::MeanSd);
}

#[test]
fn test_find_site_documents_sorted_and_recursive() {
    let temp_dir = tempfile::tempdir().unwrap();
    let body = r#"{"site_name": "x", "cohort_groups": {}}"#;
    write_document(temp_dir.path(), "site_b", body);
    write_document(temp_dir.path(), "site_a", body);
    fs::write(temp_dir.path().join("other.json"), body).unwrap();

    let files = find_site_documents(temp_dir.path()).unwrap();

    assert_eq!(files.len(), 2);
    assert!(files[0].starts_with(temp_dir.path().join("site_a")));
    assert!(files[1].starts_with(temp_dir.path().join("site_b")));
}

#[test]
fn test_find_site_documents_missing_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = find_site_documents(temp_dir.path().join("nope"));
    assert!(matches!(result, Err(LoadError::Discovery(_))));
}

#[test]
fn test_load_normalizes_sex_labels() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_document(
        temp_dir.path(),
        "site_a",
        r#"{
            "site_name": "site_a",
            "date_generated": "2025-06-01T10:00:00.000001",
            "cohort_groups": {
                "antibiotics_only": {"N": "10", "Sex: male": "6 (60.0%)", "Sex: female": "4 (40.0%)"}
            }
        }"#,
    );

    let files = find_site_documents(temp_dir.path()).unwrap();
    let doc = load_site_document(&files[0]).unwrap();
    let fields = doc.cohort(Cohort::AntibioticsOnly).unwrap();

    let labels: Vec<&str> = fields.labels().collect();
    assert_eq!(labels, vec!["N", "Sex: Female", "Sex: Male"]);
    assert!(doc.generated_at().is_some());
}

#[test]
fn test_malformed_document_fails_run_with_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_document(temp_dir.path(), "site_a", r#"{"site_name": "a", "cohort_groups": {}}"#);
    write_document(temp_dir.path(), "site_b", r#"{"site_name": "b", "cohort_groups": "#);

    let files = find_site_documents(temp_dir.path()).unwrap();
    let err = load_site_documents(&files).unwrap_err();

    assert!(err.to_string().contains("site_b"));
}
