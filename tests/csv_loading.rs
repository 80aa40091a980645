//! Loading station exports from disk and writing the forecast tables.

use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use winter_trends::config::AnalysisConfig;
use winter_trends::io::{load_table, LoadOptions};
use winter_trends::pipeline::Pipeline;
use winter_trends::ClimateError;

/// A raw export: metadata columns, a units row and the `valid` year header.
fn raw_export(first_year: i32, years: usize) -> String {
    let mut text = String::from(
        "station id,station name,valid,povp. T [°C],povp. min T [°C],št. dni s snežno odejo,\
         št. dni s snegom >0.1 mm,max višina snega [cm],št. mrzlih dni,št. ledenih dni,abs. min T [°C]\n",
    );
    text.push_str(",,,[°C],[°C],[dni],[dni],[cm],[dni],[dni],[°C]\n");
    for i in 0..years {
        let year = first_year + i as i32;
        let noise = ((i * 7) % 5) as f64;
        text.push_str(&format!(
            "1895,RATEČE,{year},{:.1},{:.1},{:.0},{:.0},{:.0},{:.0},{:.0},{:.1}\n",
            5.0 + 0.02 * i as f64 + noise * 0.1,
            -1.0 + 0.025 * i as f64,
            140.0 - 0.6 * i as f64 + noise,
            60.0 - 0.2 * i as f64 + noise,
            (120.0 - 1.4 * i as f64).max(5.0),
            130.0 - 0.3 * i as f64,
            35.0 - 0.2 * i as f64 - noise,
            -22.0 + 0.05 * i as f64,
        ));
    }
    text
}

#[test]
fn loads_raw_export_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(raw_export(1940, 20).as_bytes()).unwrap();

    let table = load_table(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 20);
    assert_eq!(table.years()[0], 1940);
    assert!(!table.has_column("station id"));
    assert!(!table.has_column("station name"));
    assert!(table.has_column("abs. min T [°C]"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = load_table(dir.path().join("absent.csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ClimateError::Io(_)));
}

#[test]
fn forecast_tables_are_written() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("clean_ratece.csv");
    fs::write(&data, raw_export(1940, 87)).unwrap();

    let config = AnalysisConfig {
        data_path: data,
        ..AnalysisConfig::default()
    };
    let pipeline = Pipeline::load(config).unwrap();
    assert_eq!(pipeline.table().len(), 77);

    let run = pipeline.forecast_all();
    assert_eq!(run.failed(), 0);

    let summary = dir.path().join("analysis/forecast_model_summary.csv");
    let forecast = dir.path().join("analysis/forecast_2026_2035.csv");
    run.write(&summary, &forecast).unwrap();

    let summary_text = fs::read_to_string(&summary).unwrap();
    let mut lines = summary_text.lines();
    assert_eq!(
        lines.next(),
        Some("variable,model,test_start_year,test_end_year,mae,rmse,best_model")
    );
    assert_eq!(lines.count(), 7 * 3);
    assert!(summary_text.contains("avg_temp,naive,2011,2025,"));

    let forecast_text = fs::read_to_string(&forecast).unwrap();
    let mut lines = forecast_text.lines();
    assert_eq!(
        lines.next(),
        Some("variable,model,year,forecast,pi95_low_approx,pi95_high_approx")
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 7 * 10);
    assert!(rows.iter().any(|r| r.starts_with("max_snow_cm,") && r.contains(",2035,")));
}
