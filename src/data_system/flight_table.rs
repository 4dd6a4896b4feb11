use std::path::PathBuf;

use serde::Deserialize;
use tracing::{info, warn};

use super::flight_events::{parse_events, FlightEvent, FlightEventKind};
use super::table_loader::{RawSheet, TableSource};
use crate::constants::{
    COLUMN_GRAVITY, COLUMN_TIME, COLUMN_TOTAL_VELOCITY, COLUMN_VERTICAL_ACCELERATION,
    COLUMN_ZENITH, DEFAULT_FLIGHT_SHEET,
};
use crate::errors::AnalysisError;

/// Exact header strings of the flight export, units included.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlightColumns {
    pub time: String,
    pub zenith: String,
    pub total_velocity: String,
    pub gravity: String,
    pub vertical_acceleration: String,
}

impl Default for FlightColumns {
    fn default() -> Self {
        FlightColumns {
            time: COLUMN_TIME.to_string(),
            zenith: COLUMN_ZENITH.to_string(),
            total_velocity: COLUMN_TOTAL_VELOCITY.to_string(),
            gravity: COLUMN_GRAVITY.to_string(),
            vertical_acceleration: COLUMN_VERTICAL_ACCELERATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightRow {
    pub time: f64,                  // s
    pub zenith_deg: f64,            // degrees from vertical
    pub total_velocity: f64,        // m/s
    pub gravity: f64,               // m/s²
    pub vertical_acceleration: f64, // m/s², reference only
}

/// Flight-simulation time series, in file (chronological) order.
#[derive(Debug, Clone, Default)]
pub struct FlightTable {
    pub source: PathBuf,
    pub rows: Vec<FlightRow>,
    pub events: Vec<FlightEvent>,
}

impl FlightTable {
    pub fn load(source: &TableSource, columns: &FlightColumns) -> Result<Self, AnalysisError> {
        let path = source.resolve(DEFAULT_FLIGHT_SHEET)?;
        let sheet = RawSheet::read(&path, &columns.time)?;
        Self::from_sheet(&sheet, columns)
    }

    pub fn from_sheet(sheet: &RawSheet, columns: &FlightColumns) -> Result<Self, AnalysisError> {
        let time = sheet.numeric_column(&columns.time)?;
        let zenith = sheet.numeric_column(&columns.zenith)?;
        let total_velocity = sheet.numeric_column(&columns.total_velocity)?;
        let gravity = sheet.numeric_column(&columns.gravity)?;
        let vertical_acceleration = sheet.numeric_column(&columns.vertical_acceleration)?;

        let rows: Vec<FlightRow> = (0..time.len())
            .map(|i| FlightRow {
                time: time[i],
                zenith_deg: zenith[i],
                total_velocity: total_velocity[i],
                gravity: gravity[i],
                vertical_acceleration: vertical_acceleration[i],
            })
            .collect();

        let incomplete = rows
            .iter()
            .filter(|r| {
                r.time.is_nan()
                    || r.zenith_deg.is_nan()
                    || r.total_velocity.is_nan()
                    || r.gravity.is_nan()
            })
            .count();
        if incomplete > 0 {
            warn!(
                "{} of {} row(s) in {} have missing model inputs; they will show as gaps",
                incomplete,
                rows.len(),
                sheet.path.display()
            );
        }

        let events = parse_events(&sheet.comments);
        info!(
            "Loaded flight table {} ({} rows, {} events)",
            sheet.path.display(),
            rows.len(),
            events.len()
        );

        Ok(FlightTable {
            source: sheet.path.clone(),
            rows,
            events,
        })
    }

    pub fn from_rows(rows: Vec<FlightRow>) -> Self {
        FlightTable {
            source: PathBuf::new(),
            rows,
            events: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<FlightEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Time of the first occurrence of `kind`.
    pub fn event_time(&self, kind: &FlightEventKind) -> Option<f64> {
        self.events
            .iter()
            .find(|event| &event.kind == kind)
            .map(|event| event.time)
    }

    pub fn time_span(&self) -> Option<(f64, f64)> {
        let times = self.rows.iter().map(|r| r.time).filter(|t| t.is_finite());
        times.fold(None, |span, t| match span {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }
}
