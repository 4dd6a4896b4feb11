use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::constants::{COMMENT_PREFIX, SHEET_EXTENSION};
use crate::errors::AnalysisError;

/// Where a table lives: a workbook path plus an optional sheet identifier.
///
/// A workbook is either a directory holding one `<sheet>.csv` per sheet, or a
/// single CSV file whose stem is its only sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSource {
    pub path: PathBuf,
    pub sheet: Option<String>,
}

impl TableSource {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>) -> Self {
        TableSource {
            path: path.into(),
            sheet,
        }
    }

    /// Resolves the sheet to a concrete CSV file.
    ///
    /// `default_sheet` is used only for directory workbooks when no sheet was
    /// requested.
    pub fn resolve(&self, default_sheet: &str) -> Result<PathBuf, AnalysisError> {
        if self.path.is_dir() {
            let sheet = self.sheet.as_deref().unwrap_or(default_sheet);
            let sheet_path = self.path.join(format!("{}.{}", sheet, SHEET_EXTENSION));
            if sheet_path.is_file() {
                Ok(sheet_path)
            } else {
                Err(AnalysisError::NotFound(format!(
                    "sheet '{}' in workbook {}",
                    sheet,
                    self.path.display()
                )))
            }
        } else if self.path.is_file() {
            match self.sheet.as_deref() {
                None => Ok(self.path.clone()),
                Some(sheet) if file_stem(&self.path) == sheet => Ok(self.path.clone()),
                Some(sheet) => Err(AnalysisError::NotFound(format!(
                    "sheet '{}' in {} (the file only holds sheet '{}')",
                    sheet,
                    self.path.display(),
                    file_stem(&self.path)
                ))),
            }
        } else {
            Err(AnalysisError::NotFound(format!(
                "input path {}",
                self.path.display()
            )))
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A sheet read as untyped text: header names, data records and any `#`
/// comment lines found around them.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
    pub comments: Vec<String>,
}

impl RawSheet {
    /// Reads a CSV sheet. `header_key` identifies the header line when the
    /// export writes it as a `#` comment.
    pub fn read(path: &Path, header_key: &str) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                AnalysisError::NotFound(format!("input path {}", path.display()))
            }
            _ => AnalysisError::Io(e),
        })?;
        Self::parse(path, &content, header_key)
    }

    pub fn parse(path: &Path, content: &str, header_key: &str) -> Result<Self, AnalysisError> {
        let mut comments = Vec::new();
        let mut csv_lines: Vec<&str> = Vec::new();
        let mut found_header = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(comment) = trimmed.strip_prefix(COMMENT_PREFIX) {
                let comment = comment.trim();
                if !found_header && names_column(comment, header_key) {
                    found_header = true;
                    csv_lines.push(comment);
                } else {
                    comments.push(comment.to_string());
                }
                continue;
            }

            found_header = true;
            csv_lines.push(trimmed);
        }

        if csv_lines.is_empty() {
            return Err(AnalysisError::DataFormat(format!(
                "{} contains no header line",
                path.display()
            )));
        }

        let csv_content = csv_lines.join("\n");
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(false)
            .from_reader(csv_content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| csv_error(path, e))?;

        debug!("Headers found in {}: {:?}", path.display(), headers);
        info!(
            "Read {} row(s) and {} comment line(s) from {}",
            records.len(),
            comments.len(),
            path.display()
        );

        Ok(RawSheet {
            path: path.to_path_buf(),
            headers,
            records,
            comments,
        })
    }

    pub fn column_index(&self, name: &str) -> Result<usize, AnalysisError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                AnalysisError::DataFormat(format!(
                    "column '{}' not found in {} (available: {})",
                    name,
                    self.path.display(),
                    self.headers.join(", ")
                ))
            })
    }

    /// Parses one column as `f64`. Empty fields load as NaN.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, AnalysisError> {
        let index = self.column_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let field = record.get(index).unwrap_or("");
                parse_numeric(field).ok_or_else(|| {
                    AnalysisError::DataFormat(format!(
                        "{}: row {}, column '{}': '{}' is not a number",
                        self.path.display(),
                        row + 1,
                        name,
                        field
                    ))
                })
            })
            .collect()
    }
}

/// True when one comma-separated field of `line` is exactly `header_key`.
fn names_column(line: &str, header_key: &str) -> bool {
    line.split(',').any(|field| field.trim() == header_key)
}

fn parse_numeric(field: &str) -> Option<f64> {
    if field.is_empty() {
        Some(f64::NAN)
    } else {
        field.parse::<f64>().ok()
    }
}

fn csv_error(path: &Path, error: csv::Error) -> AnalysisError {
    AnalysisError::DataFormat(format!("{}: {}", path.display(), error))
}
