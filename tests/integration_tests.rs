use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;
use drag_analysis::report_system::export::export_derived_series;
use drag_analysis::{
    errors::AnalysisError, run_comparison, run_fit, AnalysisConfig, ComparisonConfig,
    DragCoefficients, FitConfig, FlightEventKind, WindowBound,
};

const FLIGHT_EXPORT: &str = "\
# Test rocket flight export
# Time (s),Vertical orientation (zenith) (°),Total velocity (m/s),Gravitational acceleration (m/s²),Vertical acceleration (m/s²)
# Event LAUNCH occurred at t=0 seconds
0,90,0,9.81,0
1,90,60,9.81,50.2
# Event BURNOUT occurred at t=2 seconds
2,90,120,9.81,-15.3
3,89.5,105,9.80,-14.1
4,89,91,9.80,-13.0
5,88,78,9.80,-12.2
# Event APOGEE occurred at t=6 seconds
6,60,0,9.80,-9.8
";

const SAMPLES: &str = "velocity,added_force\n0,0\n1,6\n2,18\n3,36\n";

// Helper creating an isolated scratch directory per test
fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "drag_analysis_it_{}_{}",
        test_name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch directory should be creatable");
    dir
}

fn workbook_with_flight_sheet(test_name: &str) -> PathBuf {
    let dir = scratch_dir(test_name);
    fs::write(dir.join("raw data.csv"), FLIGHT_EXPORT).unwrap();
    dir
}

#[test]
fn test_comparison_over_burnout_to_apogee() {
    let workbook = workbook_with_flight_sheet("burnout_apogee");
    let config = ComparisonConfig {
        input: Some(workbook),
        coefficients: DragCoefficients::new(0.0, 0.0, 0.0005),
        window_start: WindowBound::Event(FlightEventKind::Burnout),
        window_end: WindowBound::Event(FlightEventKind::Apogee),
        ..ComparisonConfig::default()
    };

    let comparison = run_comparison(&config).expect("comparison should succeed");
    assert_eq!(comparison.table_rows, 7);
    assert_eq!(comparison.series.times(), vec![2.0, 3.0, 4.0, 5.0, 6.0]);

    // At burnout: zenith 90° -> u_z = 1, v = 120
    let first = comparison.series.points()[0];
    assert_relative_eq!(first.predicted, -0.0005 * 120.0 * 120.0 - 9.81, epsilon = 1e-9);
    assert_relative_eq!(first.reference, -15.3, epsilon = 1e-9);

    let report = comparison.report();
    assert_eq!(report.window_rows, 5);
    assert_eq!(report.residuals.count, 5);
    println!("{}", report);
}

#[test]
fn test_comparison_numeric_window_on_single_file() {
    let dir = scratch_dir("numeric_window");
    let path = dir.join("flight.csv");
    fs::write(&path, FLIGHT_EXPORT).unwrap();

    let config = ComparisonConfig {
        input: Some(path),
        window_start: WindowBound::Time(1.0),
        window_end: WindowBound::Time(3.0),
        ..ComparisonConfig::default()
    };
    let comparison = run_comparison(&config).unwrap();
    assert_eq!(comparison.series.times(), vec![1.0, 2.0, 3.0]);

    // Zero coefficients reduce to the gravity term
    for (point, g) in comparison.series.points().iter().zip([9.81, 9.81, 9.80]) {
        assert_relative_eq!(point.predicted, -g, epsilon = 1e-12);
    }
}

#[test]
fn test_missing_sheet_is_not_found() {
    let workbook = workbook_with_flight_sheet("missing_sheet");
    let config = ComparisonConfig {
        input: Some(workbook),
        sheet: Some("processed".to_string()),
        ..ComparisonConfig::default()
    };
    assert!(matches!(
        run_comparison(&config),
        Err(AnalysisError::NotFound(_))
    ));
}

#[test]
fn test_missing_path_is_not_found() {
    let config = FitConfig {
        input: Some(PathBuf::from("/no/such/samples.csv")),
        ..FitConfig::default()
    };
    assert!(matches!(run_fit(&config), Err(AnalysisError::NotFound(_))));
}

#[test]
fn test_missing_event_is_not_found() {
    let workbook = workbook_with_flight_sheet("missing_event");
    let config = ComparisonConfig {
        input: Some(workbook),
        window_end: WindowBound::Event(FlightEventKind::GroundHit),
        ..ComparisonConfig::default()
    };
    assert!(matches!(
        run_comparison(&config),
        Err(AnalysisError::NotFound(_))
    ));
}

#[test]
fn test_corrupt_numeric_field_is_data_format_error() {
    let dir = scratch_dir("corrupt_field");
    let path = dir.join("flight.csv");
    fs::write(&path, FLIGHT_EXPORT.replace("-13.0", "oops")).unwrap();

    let config = ComparisonConfig {
        input: Some(path),
        ..ComparisonConfig::default()
    };
    match run_comparison(&config) {
        Err(AnalysisError::DataFormat(message)) => {
            assert!(message.contains("Vertical acceleration (m/s²)"));
        }
        other => panic!("expected DataFormat error, got {:?}", other),
    }
}

#[test]
fn test_blank_field_propagates_as_nan() {
    let dir = scratch_dir("blank_field");
    let path = dir.join("flight.csv");
    fs::write(&path, FLIGHT_EXPORT.replace("4,89,91,", "4,89,,")).unwrap();

    let config = ComparisonConfig {
        input: Some(path),
        coefficients: DragCoefficients::new(0.0, 0.1, 0.0),
        ..ComparisonConfig::default()
    };
    let comparison = run_comparison(&config).unwrap();
    let nan_points = comparison
        .series
        .points()
        .iter()
        .filter(|p| p.predicted.is_nan())
        .count();
    assert_eq!(nan_points, 1);
    assert_eq!(comparison.series.len(), 7);
    assert_eq!(comparison.report().residuals.count, 6);
}

#[test]
fn test_fit_end_to_end() {
    let dir = scratch_dir("fit");
    let path = dir.join("samples.csv");
    fs::write(&path, SAMPLES).unwrap();

    let config = FitConfig {
        input: Some(path),
        ..FitConfig::default()
    };
    let result = run_fit(&config).expect("fit should succeed");

    let c = result.fit.coefficients();
    assert_eq!(c.len(), 3);
    assert_relative_eq!(c[0], 0.0, epsilon = 1e-6);
    assert_relative_eq!(c[1], 3.0, epsilon = 1e-6);
    assert_relative_eq!(c[2], 3.0, epsilon = 1e-6);
    assert_relative_eq!(result.fit.r_squared(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(result.fit.determination.unwrap(), 1.0, epsilon = 1e-9);
    println!("{}", result.report());
}

#[test]
fn test_fit_with_too_few_distinct_velocities() {
    let dir = scratch_dir("fit_rank");
    let path = dir.join("samples.csv");
    fs::write(&path, "velocity,added_force\n5,1\n5,1.2\n10,4\n").unwrap();

    let config = FitConfig {
        input: Some(path),
        ..FitConfig::default()
    };
    assert!(matches!(
        run_fit(&config),
        Err(AnalysisError::RankDeficient {
            distinct: 2,
            degree: 2
        })
    ));
}

#[test]
fn test_config_file_drives_both_pipelines() {
    let dir = workbook_with_flight_sheet("config_file");
    fs::write(dir.join("samples.csv"), SAMPLES).unwrap();
    let config_path = dir.join("analysis.toml");
    fs::write(
        &config_path,
        format!(
            r#"
output_dir = "{out}"

[comparison]
input = "{workbook}"
coefficients = [0.0, 0.01, 0.0]
window_start = "burnout"
window_end = 5

[fit]
input = "{workbook}"
sheet = "samples"
"#,
            out = dir.join("out").display(),
            workbook = dir.display()
        ),
    )
    .unwrap();

    let config = AnalysisConfig::load(&config_path).unwrap();
    config.validate().unwrap();

    let comparison = run_comparison(&config.comparison).unwrap();
    assert_eq!(comparison.series.times(), vec![2.0, 3.0, 4.0, 5.0]);

    let fit = run_fit(&config.fit).unwrap();
    assert_eq!(fit.samples.len(), 4);

    let export_path = config.output_dir.join("series.csv");
    export_derived_series(&comparison.series, &export_path).unwrap();
    let exported = fs::read_to_string(&export_path).unwrap();
    assert_eq!(exported.lines().count(), 5);
}
