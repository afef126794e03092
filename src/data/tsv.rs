//! Bulk-download TSV files (one row per category, one column per period).
//!
//! ```text
//! freq,s_adj,age,unit,sex,geo\TIME_PERIOD	2023M01 	2023M02 	2023M03
//! M,SA,TOTAL,PC_ACT,T,ES	12.9 	12.8 p	:
//! ```
//!
//! Missing cells are `:`; trailing flag letters (`p`, `e`, `b`, ...) are stripped.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::warn;

use crate::data::{FetchRequest, ObservationSource, RawObservations};
use crate::error::LoadError;

const SOURCE_NAME: &str = "tsv";

/// Reads `<dataset>.tsv` files from a directory.
#[derive(Debug, Clone)]
pub struct TsvDirSource {
    dir: PathBuf,
}

impl TsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, dataset: &str) -> PathBuf {
        self.dir.join(format!("{dataset}.tsv"))
    }
}

impl ObservationSource for TsvDirSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn fetch(&self, request: &FetchRequest) -> Result<RawObservations, LoadError> {
        let path = self.path_for(request.indicator.dataset());
        let file = File::open(&path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut raw = parse_tsv(file, &request.selector())?;
        if let Some(year) = request.since {
            raw.retain_since(year);
        }
        Ok(raw)
    }
}

/// Parse a bulk TSV, keeping rows whose dimension codes match `selector`.
///
/// Selector dimensions absent from the file are ignored. Only the first
/// matching row is read; further matches are counted and logged. Observation
/// keys are `"<row>:<period column>"`.
pub fn parse_tsv<R: Read>(reader: R, selector: &[(&str, &str)]) -> Result<RawObservations, LoadError> {
    let payload_err = |message: String| LoadError::Payload {
        source_name: SOURCE_NAME,
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| payload_err(format!("failed to read header: {e}")))?
        .clone();

    let mut header_cells = headers.iter();
    let dims_cell = header_cells
        .next()
        .filter(|cell| cell.contains('\\'))
        .ok_or_else(|| payload_err("header must start with 'dims\\TIME_PERIOD'".to_string()))?;
    let dims: Vec<&str> = dims_cell
        .split('\\')
        .next()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .collect();

    let time_codes = header_cells
        .enumerate()
        .map(|(idx, code)| (idx, code.to_string()))
        .collect();

    // (column position in the row key, expected code)
    let wanted: Vec<(usize, &str)> = selector
        .iter()
        .filter_map(|(dim, code)| dims.iter().position(|d| d == dim).map(|pos| (pos, *code)))
        .collect();

    let mut values = Vec::new();
    let mut selected: Option<String> = None;
    let mut extra_matches = 0usize;
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| payload_err(format!("row {}: {e}", row + 2)))?;
        let mut cells = record.iter();
        let Some(key_cell) = cells.next() else {
            continue;
        };
        let codes: Vec<&str> = key_cell.split(',').map(str::trim).collect();
        let matches = wanted
            .iter()
            .all(|(pos, code)| codes.get(*pos).is_some_and(|c| c == code));
        if !matches {
            continue;
        }
        if selected.is_some() {
            extra_matches += 1;
            continue;
        }
        selected = Some(key_cell.to_string());

        for (col, cell) in cells.enumerate() {
            if let Some(v) = parse_cell(cell) {
                values.push((format!("{row}:{col}"), v));
            }
        }
    }

    if let Some(row) = selected.filter(|_| extra_matches > 0) {
        warn!(row = %row, ignored = extra_matches, "several TSV rows match the selector; keeping the first");
    }

    Ok(RawObservations { time_codes, values })
}

/// `"12.8 p"` → `12.8`; `":"`, `": c"`, and non-numeric cells → `None`.
fn parse_cell(cell: &str) -> Option<f64> {
    let token = cell.split_whitespace().next()?;
    if token.starts_with(':') {
        return None;
    }
    let v = token.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}
