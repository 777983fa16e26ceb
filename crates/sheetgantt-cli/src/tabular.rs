//! Tabular source: turns a file into the cell grid the builder consumes.
//!
//! Two formats are read:
//! - CSV, with the delimiter detected from the header line (`,` `;` or tab)
//! - JSON, an array of row arrays whose items are strings, numbers,
//!   booleans or null

use std::path::Path;

use serde_json::Value;
use sheetgantt_core::Cell;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON document must be an array of row arrays ({0})")]
    Shape(String),
}

/// Input format, chosen from the file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Format::Json,
            _ => Format::Csv,
        }
    }
}

/// Read a file into a cell grid (row 0 = headers)
pub fn read_grid(path: &Path) -> Result<Vec<Vec<Cell>>, TabularError> {
    let bytes = std::fs::read(path).map_err(|source| TabularError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_bytes(&bytes, Format::from_path(path))
}

pub fn parse_bytes(bytes: &[u8], format: Format) -> Result<Vec<Vec<Cell>>, TabularError> {
    let content = String::from_utf8_lossy(bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let grid = match format {
        Format::Csv => parse_csv(content)?,
        Format::Json => parse_json_grid(content)?,
    };
    debug!(rows = grid.len(), ?format, "read tabular source");
    Ok(grid)
}

/// Detect delimiter by counting separators in the header line
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if tabs > commas && tabs >= semicolons {
        b'\t'
    } else if semicolons > commas {
        b';'
    } else {
        b','
    }
}

pub fn parse_csv(content: &str) -> Result<Vec<Vec<Cell>>, TabularError> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for (i, record) in reader.records().enumerate() {
        match record {
            Ok(record) => grid.push(record.iter().map(Cell::from).collect()),
            // A broken header is fatal, later rows are skipped
            Err(e) if i == 0 => return Err(e.into()),
            Err(e) => warn!(line = i + 1, "skipping unreadable CSV row: {}", e),
        }
    }
    Ok(grid)
}

pub fn parse_json_grid(content: &str) -> Result<Vec<Vec<Cell>>, TabularError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(rows) = value else {
        return Err(TabularError::Shape("top level is not an array".into()));
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Array(items) => Ok(items.into_iter().map(json_cell).collect()),
            other => Err(TabularError::Shape(format!(
                "row {} is {}",
                i,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or_default(),
        Value::String(s) => Cell::from(s.as_str()),
        nested @ (Value::Array(_) | Value::Object(_)) => Cell::Text(nested.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
