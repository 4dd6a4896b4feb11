use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::info;

use crate::constants::{DEFAULT_FIT_DEGREE, DEFAULT_OUTPUT_DIR};
use crate::data_system::flight_events::FlightEventKind;
use crate::data_system::flight_table::{FlightColumns, FlightTable};
use crate::data_system::sample_table::SampleColumns;
use crate::data_system::table_loader::TableSource;
use crate::errors::AnalysisError;
use crate::trajectory_system::drag_model::DragCoefficients;
use crate::trajectory_system::windowed_series::TimeWindow;

/// One end of the comparison window: a time in seconds or a flight event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawWindowBound")]
pub enum WindowBound {
    Time(f64),
    Event(FlightEventKind),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWindowBound {
    Time(f64),
    Event(String),
}

impl TryFrom<RawWindowBound> for WindowBound {
    type Error = AnalysisError;

    fn try_from(raw: RawWindowBound) -> Result<Self, Self::Error> {
        match raw {
            RawWindowBound::Time(t) => Ok(WindowBound::Time(t)),
            RawWindowBound::Event(name) => name.parse(),
        }
    }
}

impl FromStr for WindowBound {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<f64>() {
            Ok(t) => Ok(WindowBound::Time(t)),
            Err(_) => Ok(WindowBound::Event(s.parse()?)),
        }
    }
}

impl fmt::Display for WindowBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowBound::Time(t) => write!(f, "{} s", t),
            WindowBound::Event(kind) => write!(f, "{}", kind),
        }
    }
}

impl WindowBound {
    pub fn resolve(&self, table: &FlightTable) -> Result<f64, AnalysisError> {
        match self {
            WindowBound::Time(t) => Ok(*t),
            WindowBound::Event(kind) => table.event_time(kind).ok_or_else(|| {
                AnalysisError::NotFound(format!(
                    "flight event '{}' in {}",
                    kind,
                    table.source.display()
                ))
            }),
        }
    }
}

/// The operator-adjustable inputs of one comparison pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonParams {
    pub coefficients: DragCoefficients,
    pub window_start: WindowBound,
    pub window_end: WindowBound,
}

impl Default for ComparisonParams {
    fn default() -> Self {
        ComparisonParams {
            coefficients: DragCoefficients::default(),
            window_start: WindowBound::Time(f64::NEG_INFINITY),
            window_end: WindowBound::Time(f64::INFINITY),
        }
    }
}

impl ComparisonParams {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.coefficients.validate()?;
        if let (WindowBound::Time(start), WindowBound::Time(end)) =
            (&self.window_start, &self.window_end)
        {
            TimeWindow::new(*start, *end)?;
        }
        Ok(())
    }

    pub fn resolve_window(&self, table: &FlightTable) -> Result<TimeWindow, AnalysisError> {
        TimeWindow::new(
            self.window_start.resolve(table)?,
            self.window_end.resolve(table)?,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub input: Option<PathBuf>,
    pub sheet: Option<String>,
    pub columns: FlightColumns,
    pub coefficients: DragCoefficients,
    pub window_start: WindowBound,
    pub window_end: WindowBound,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        let params = ComparisonParams::default();
        ComparisonConfig {
            input: None,
            sheet: None,
            columns: FlightColumns::default(),
            coefficients: params.coefficients,
            window_start: params.window_start,
            window_end: params.window_end,
        }
    }
}

impl ComparisonConfig {
    pub fn params(&self) -> ComparisonParams {
        ComparisonParams {
            coefficients: self.coefficients,
            window_start: self.window_start.clone(),
            window_end: self.window_end.clone(),
        }
    }

    pub fn source(&self) -> Result<TableSource, AnalysisError> {
        table_source(&self.input, &self.sheet, "flight data")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub input: Option<PathBuf>,
    pub sheet: Option<String>,
    pub columns: SampleColumns,
    pub degree: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            input: None,
            sheet: None,
            columns: SampleColumns::default(),
            degree: DEFAULT_FIT_DEGREE,
        }
    }
}

impl FitConfig {
    pub fn source(&self) -> Result<TableSource, AnalysisError> {
        table_source(&self.input, &self.sheet, "sample data")
    }
}

fn table_source(
    input: &Option<PathBuf>,
    sheet: &Option<String>,
    what: &str,
) -> Result<TableSource, AnalysisError> {
    input
        .as_ref()
        .map(|path| TableSource::new(path.clone(), sheet.clone()))
        .ok_or_else(|| AnalysisError::Config(format!("no {} input path given", what)))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub output_dir: PathBuf,
    pub comparison: ComparisonConfig,
    pub fit: FitConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            comparison: ComparisonConfig::default(),
            fit: FitConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                AnalysisError::NotFound(format!("config file {}", path.display()))
            }
            _ => AnalysisError::Io(e),
        })?;
        let config = Self::from_toml(&content)
            .map_err(|e| AnalysisError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, AnalysisError> {
        toml::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.comparison.params().validate()
    }
}
