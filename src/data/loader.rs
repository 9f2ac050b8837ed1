use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Record};
use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, archive (`pl_name`, …) or canonical names
/// * `.json`    – `[{ "pl_name": "...", "pl_eqt": 255.0, ... }, ...]`
/// * `.parquet` – one column per field
///
/// Only the planet name column is required. Any other missing column reads
/// as null for every row.
pub fn load_file(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            read_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(CatalogError::UnsupportedFormat(other.to_string()).into()),
    }?;

    log::debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV from any reader (a file or an HTTP body).
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<Option<Column>> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(Column::from_header)
        .collect();

    if !headers.contains(&Some(Column::PlanetName)) {
        return Err(CatalogError::MissingIdentityColumn.into());
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut cells = BTreeMap::new();
        for (value, column) in row.iter().zip(&headers) {
            if let Some(column) = column {
                cells.insert(*column, parse_cell(*column, value));
            }
        }

        records.push(Record::from_cells(|c| cells.get(&c)));
    }

    Ok(records)
}

/// Text columns keep the raw string (`2.50` stays `2.50`); the rest are
/// type-guessed.
fn parse_cell(column: Column, s: &str) -> CellValue {
    if column.is_text() {
        CellValue::Text(s.to_string())
    } else {
        guess_cell_type(s)
    }
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "pl_name": "TRAPPIST-1 e", "hostname": "TRAPPIST-1", "pl_eqt": 251.3 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Vec<Record>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if let Some(column) = Column::from_header(key) {
                seen.insert(column);
                cells.insert(column, json_to_cell(column, val));
            }
        }

        records.push(Record::from_cells(|c| cells.get(&c)));
    }

    if !records.is_empty() && !seen.contains(&Column::PlanetName) {
        return Err(CatalogError::MissingIdentityColumn.into());
    }

    Ok(records)
}

fn json_to_cell(column: Column, val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => parse_cell(column, s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog snapshot (e.g. written by `df.to_parquet()` or the
/// `generate_sample` binary).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let columns: Vec<(usize, Column)> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(i, f)| Column::from_header(f.name()).map(|c| (i, c)))
        .collect();
    if !columns.iter().any(|(_, c)| *c == Column::PlanetName) {
        return Err(CatalogError::MissingIdentityColumn.into());
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let cells: BTreeMap<Column, CellValue> = columns
                .iter()
                .map(|(idx, column)| (*column, extract_cell(batch.column(*idx), row)))
                .collect();
            records.push(Record::from_cells(|c| cells.get(&c)));
        }
    }

    Ok(records)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::Text(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::Text(s.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(i64::from(a.value(row)))),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(f64::from(a.value(row)))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        other => {
            log::debug!("Ignoring parquet column of type {other:?}");
            None
        }
    };
    cell.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCHIVE_CSV: &str = "\
pl_name,hostname,disc_year,pl_rade,pl_masse,pl_eqt,st_teff,st_mass,disc_facility
TRAPPIST-1 e,TRAPPIST-1,2017,0.92,0.69,251.3,2566,0.09,Spitzer Space Telescope
Kepler-442 b,Kepler-442,2015,1.34,,233,4402,0.61,Kepler
HD 209458 b,HD 209458,1999,15.6,219,1459,6091,1.23,
";

    #[test]
    fn reads_archive_csv() {
        let records = read_csv(ARCHIVE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        let trappist = &records[0];
        assert_eq!(trappist.planet_name, "TRAPPIST-1 e");
        assert_eq!(trappist.host_name.as_deref(), Some("TRAPPIST-1"));
        assert_eq!(trappist.discovery_year, Some(2017));
        assert_eq!(trappist.planet_radius, Some(0.92));
        assert_eq!(trappist.star_temp, Some(2566.0));
        assert_eq!(
            trappist.discovery_facility.as_deref(),
            Some("Spitzer Space Telescope")
        );

        assert_eq!(records[1].planet_mass, None);
        assert_eq!(records[1].equilibrium_temp, Some(233.0));
        assert_eq!(records[2].discovery_facility, None);
    }

    #[test]
    fn reads_canonical_headers_with_missing_columns() {
        let csv = "planet_name,host_name,equilibrium_temp\nEarth,Sun,255\nMars,Sun,\n";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].equilibrium_temp, Some(255.0));
        assert_eq!(records[0].planet_radius, None);
        assert_eq!(records[0].star_temp, None);
        assert_eq!(records[1].equilibrium_temp, None);
    }

    #[test]
    fn missing_identity_column_is_fatal() {
        let csv = "hostname,pl_eqt\nSun,255\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::MissingIdentityColumn)
        ));
    }

    #[test]
    fn name_columns_are_not_type_guessed() {
        let csv = "pl_name,hostname,disc_facility,pl_eqt\n2.50,NaN,inf,NaN\n";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].planet_name, "2.50");
        assert_eq!(records[0].host_name.as_deref(), Some("NaN"));
        assert_eq!(records[0].discovery_facility.as_deref(), Some("inf"));
        assert_eq!(records[0].equilibrium_temp, None);

        let json = r#"[{"pl_name": "007", "hostname": "1e3", "pl_rade": "1.50"}]"#;
        let records = parse_json(json).unwrap();
        assert_eq!(records[0].planet_name, "007");
        assert_eq!(records[0].host_name.as_deref(), Some("1e3"));
        assert_eq!(records[0].planet_radius, Some(1.5));
    }

    #[test]
    fn parses_json_records() {
        let json = r#"[
            {"pl_name": "Proxima Cen b", "hostname": "Proxima Cen", "pl_eqt": 234.0, "st_teff": 2900},
            {"pl_name": "GJ 1061 d", "pl_eqt": null, "disc_year": "2019"}
        ]"#;
        let records = parse_json(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].star_temp, Some(2900.0));
        assert_eq!(records[1].equilibrium_temp, None);
        assert_eq!(records[1].discovery_year, Some(2019));
        assert_eq!(records[1].host_name, None);
    }

    #[test]
    fn json_without_names_is_rejected() {
        let err = parse_json(r#"[{"hostname": "Sun"}]"#).unwrap_err();
        assert!(err.downcast_ref::<CatalogError>().is_some());
        assert!(parse_json("[]").unwrap().is_empty());
    }

    #[test]
    fn loads_csv_file_and_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, ARCHIVE_CSV).unwrap();
        assert_eq!(load_file(&path).unwrap().len(), 3);

        let bad = dir.path().join("catalog.xlsx");
        std::fs::write(&bad, "").unwrap();
        let err = load_file(&bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
