//! Claim verification against a synthetic station table.

use approx::assert_relative_eq;
use winter_trends::claims::{verify_all, CheckOutcome, ClaimSet, VerificationSummary};
use winter_trends::config::AnalysisConfig;
use winter_trends::core::ObservationTable;
use winter_trends::pipeline::Pipeline;

const CLAIMS: &str = r#"
[[claim]]
label = "period mean temperature"
kind = "period_mean"
variable = "avg_temp"
start = 1949
end = 1951
expected = 5.8
tolerance = 0.05

[[claim]]
label = "wrong period mean temperature"
kind = "period_mean"
variable = "avg_temp"
start = 1950
end = 1952
expected = 5.8
tolerance = 0.05

[[claim]]
label = "1950 absolute minimum"
kind = "point"
variable = "abs_min_temp"
year = 1950
expected = -26.4

[[claim]]
label = "year outside the record"
kind = "point"
variable = "avg_temp"
year = 1900
expected = 5.0
tolerance = 1

[[claim]]
label = "coldest winter"
kind = "extreme_year"
variable = "avg_temp"
extreme = "min"
expected = 1950

[[claim]]
label = "snow days lost"
kind = "difference"
variable = "snow_cover_days"
year = 1949
minus_year = 1952
expected = 75
tolerance = 1

[[claim]]
label = "winters"
kind = "record_count"
expected = 4
"#;

fn table() -> ObservationTable {
    ObservationTable::new(vec![1949, 1950, 1951, 1952])
        .unwrap()
        .with_column("povp. T [°C]", vec![Some(5.9), Some(5.6), Some(5.9), Some(6.2)])
        .unwrap()
        .with_column("abs. min T [°C]", vec![Some(-20.0), Some(-26.4), Some(-18.5), Some(-17.0)])
        .unwrap()
        .with_column("št. dni s snežno odejo", vec![Some(150.0), Some(120.0), Some(110.0), Some(75.0)])
        .unwrap()
}

#[test]
fn tolerance_scenarios() {
    let pass = CheckOutcome::compare("mean", 5.8, 5.8, 0.05);
    assert!(pass.passed);

    let fail = CheckOutcome::compare("mean", 5.9, 5.8, 0.05);
    assert!(!fail.passed);
    assert_eq!(fail.computed, 5.9);
    assert_eq!(fail.expected, 5.8);
}

#[test]
fn every_claim_is_reported() {
    let claims = ClaimSet::from_toml_str(CLAIMS).unwrap();
    let config = AnalysisConfig::default();
    let outcomes = verify_all(&table(), &config.column_map(), &claims);

    assert_eq!(outcomes.len(), claims.len());
    let passed: Vec<bool> = outcomes.iter().map(|o| o.passed).collect();
    assert_eq!(passed, vec![true, false, true, false, true, true, true]);

    assert_relative_eq!(outcomes[0].computed, 5.8, epsilon = 1e-12);
    assert_relative_eq!(outcomes[1].computed, 17.7 / 3.0, epsilon = 1e-12);
    assert!(outcomes[3].computed.is_nan());
    assert!(outcomes[3].note.is_some());
    assert_eq!(outcomes[4].located_value, Some(5.6));

    let summary = VerificationSummary::of(&outcomes);
    assert_eq!(summary.passed, 5);
    assert_eq!(summary.failed, 2);
}

#[test]
fn pipeline_verifies_complete_rows_only() {
    let table = table()
        .with_column("št. ledenih dni", vec![Some(30.0), None, Some(25.0), Some(20.0)])
        .unwrap();
    let claims = ClaimSet::from_toml_str(
        r#"
        [[claim]]
        label = "complete winters"
        kind = "record_count"
        expected = 3

        [[claim]]
        label = "1950 is dropped"
        kind = "point"
        variable = "avg_temp"
        year = 1950
        expected = 5.6
        "#,
    )
    .unwrap();

    let outcomes = Pipeline::new(AnalysisConfig::default(), table).verify(&claims);
    assert!(outcomes[0].passed);
    assert!(!outcomes[1].passed);
}

#[test]
fn shipped_claims_file_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/claims.toml");
    let claims = ClaimSet::load(path).unwrap();
    assert_eq!(claims.len(), 28);
    assert!(claims.claims.iter().all(|c| c.tolerance >= 0.0));
}

#[test]
fn shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/analysis.toml");
    let config = AnalysisConfig::load(path).unwrap();
    assert_eq!(config, AnalysisConfig::default());
}
