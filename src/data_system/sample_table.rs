use std::path::PathBuf;

use serde::Deserialize;
use tracing::info;

use super::table_loader::{RawSheet, TableSource};
use crate::constants::{COLUMN_ADDED_FORCE, COLUMN_VELOCITY, DEFAULT_SAMPLE_SHEET};
use crate::errors::AnalysisError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SampleColumns {
    pub velocity: String,
    pub force: String,
}

impl Default for SampleColumns {
    fn default() -> Self {
        SampleColumns {
            velocity: COLUMN_VELOCITY.to_string(),
            force: COLUMN_ADDED_FORCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub velocity: f64,
    pub force: f64,
}

/// CFD velocity/force samples used as fit input.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    pub source: PathBuf,
    pub points: Vec<SamplePoint>,
}

impl SampleTable {
    pub fn load(source: &TableSource, columns: &SampleColumns) -> Result<Self, AnalysisError> {
        let path = source.resolve(DEFAULT_SAMPLE_SHEET)?;
        let sheet = RawSheet::read(&path, &columns.velocity)?;
        Self::from_sheet(&sheet, columns)
    }

    pub fn from_sheet(sheet: &RawSheet, columns: &SampleColumns) -> Result<Self, AnalysisError> {
        let velocity = sheet.numeric_column(&columns.velocity)?;
        let force = sheet.numeric_column(&columns.force)?;

        let points: Vec<SamplePoint> = velocity
            .into_iter()
            .zip(force)
            .map(|(velocity, force)| SamplePoint { velocity, force })
            .collect();

        info!(
            "Loaded {} sample(s) from {}",
            points.len(),
            sheet.path.display()
        );

        Ok(SampleTable {
            source: sheet.path.clone(),
            points,
        })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        SampleTable {
            source: PathBuf::new(),
            points: pairs
                .iter()
                .map(|&(velocity, force)| SamplePoint { velocity, force })
                .collect(),
        }
    }

    pub fn velocities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.velocity).collect()
    }

    pub fn forces(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.force).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
