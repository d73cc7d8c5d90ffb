use empyema_table1::aggregator::{
    pool_count_pct, pool_counts, pool_field, pool_mean_sd, pool_median_iqr, AggregationConfig,
    CohortTotals,
};
use empyema_table1::parser::stat_string::format_median_iqr;
use empyema_table1::parser::{decode_cell, FieldFamily, StatValue};

#[test]
fn test_count_pooling() {
    assert_eq!(StatValue::Count(pool_counts(&[Some(5), None, Some(3)])).to_string(), "8");
    assert_eq!(StatValue::Count(pool_counts(&[None, None])).to_string(), "0");
}

#[test]
fn test_count_pct_pooling() {
    let (count, pct) = pool_count_pct(&[Some((3, 30.0)), Some((7, 70.0))], 20);
    assert_eq!(StatValue::CountPct { count, pct }.to_string(), "10 (50.0%)");
}

#[test]
fn test_mean_sd_pooling_is_not_weighted() {
    let (mean, sd) = pool_mean_sd(&[Some((10.0, 2.0)), Some((20.0, 4.0))]).unwrap();
    assert_eq!(StatValue::MeanSd { mean, sd }.to_string(), "15.0 ± 3.0");
}

#[test]
fn test_median_iqr_pooling() {
    let (median, q1, q3) =
        pool_median_iqr(&[Some((5.0, 1.0, 9.0)), Some((7.0, 2.0, 11.0))]).unwrap();
    assert_eq!(format_median_iqr(median, q1, q3), "6.0 [1.5, 10.0]");
}

#[test]
fn test_pool_field_from_raw_strings() {
    let raw = [Some("61.2 ± 14.0"), None, Some("<5"), Some("58.8 ± 16.0")];
    let cells: Vec<_> = raw
        .iter()
        .map(|r| decode_cell(FieldFamily::MeanSd, *r))
        .collect();

    let pooled = pool_field(
        "Age (mean ± SD)",
        FieldFamily::MeanSd,
        &cells,
        &CohortTotals::default(),
        &AggregationConfig::new(),
    );

    assert_eq!(pooled.display(), "60.0 ± 15.0");
    assert_eq!(pooled.contributing_sites, 2);
    assert_eq!(pooled.suppressed_sites, 1);
}
