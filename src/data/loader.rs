use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{LaunchDataset, LaunchRecord, Outcome};
use crate::error::DatasetLoadError;

pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";

type Result<T> = std::result::Result<T, DatasetLoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the four required columns
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – same column names as the CSV layout
///
/// Any other column is ignored.
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DatasetLoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = LaunchDataset::from_records(records).ok_or(DatasetLoadError::Empty)?;
    log::info!(
        "Loaded {} launches from {} ({} sites, payload {}..={} kg)",
        dataset.len(),
        path.display(),
        dataset.sites().len(),
        dataset.min_payload(),
        dataset.max_payload()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// This is the layout of the published `spacex_launch_dash.csv`.
fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |name: &'static str| headers.iter().position(|h| h == name);
    let require = |name: &'static str| position(name).ok_or(DatasetLoadError::MissingColumn(name));

    let site_idx = require(COL_SITE)?;
    let payload_idx = require(COL_PAYLOAD)?;
    let category_idx = require(COL_BOOSTER_CATEGORY)?;
    let class_idx = require(COL_CLASS)?;
    let flight_idx = position(COL_FLIGHT_NUMBER);
    let version_idx = position(COL_BOOSTER_VERSION);

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let payload = cell(payload_idx);
        let payload_mass_kg = payload
            .parse::<f64>()
            .ok()
            .and_then(valid_payload)
            .ok_or_else(|| invalid(row, COL_PAYLOAD, payload))?;

        let class = cell(class_idx);
        let outcome = class
            .parse::<f64>()
            .ok()
            .and_then(Outcome::from_class)
            .ok_or_else(|| invalid(row, COL_CLASS, class))?;

        let flight_number = match flight_idx.map(cell).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| invalid(row, COL_FLIGHT_NUMBER, raw))?,
            ),
            None => None,
        };

        records.push(LaunchRecord {
            site: required_text(row, COL_SITE, cell(site_idx))?,
            payload_mass_kg,
            booster_category: required_text(row, COL_BOOSTER_CATEGORY, cell(category_idx))?,
            outcome,
            flight_number,
            booster_version: version_idx
                .map(cell)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 2296.0,
///     "Booster Version Category": "v1.1",
///     "class": 1
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = match root.as_array() {
        Some(rows) => rows,
        None => return Err(invalid(0, "<root>", "expected a JSON array of records")),
    };

    let mut records = Vec::with_capacity(rows.len());

    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| invalid(row, "<row>", &value.to_string()))?;
        let field = |name: &'static str| obj.get(name).ok_or(DatasetLoadError::MissingColumn(name));

        let payload = field(COL_PAYLOAD)?;
        let payload_mass_kg = payload
            .as_f64()
            .and_then(valid_payload)
            .ok_or_else(|| invalid(row, COL_PAYLOAD, &payload.to_string()))?;

        let class = field(COL_CLASS)?;
        let outcome = class
            .as_f64()
            .and_then(Outcome::from_class)
            .ok_or_else(|| invalid(row, COL_CLASS, &class.to_string()))?;

        let flight_number = match obj.get(COL_FLIGHT_NUMBER).filter(|v| !v.is_null()) {
            Some(v) => Some(
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| invalid(row, COL_FLIGHT_NUMBER, &v.to_string()))?,
            ),
            None => None,
        };

        records.push(LaunchRecord {
            site: json_text(row, COL_SITE, field(COL_SITE)?)?,
            payload_mass_kg,
            booster_category: json_text(row, COL_BOOSTER_CATEGORY, field(COL_BOOSTER_CATEGORY)?)?,
            outcome,
            flight_number,
            booster_version: obj
                .get(COL_BOOSTER_VERSION)
                .and_then(|v| v.as_str())
                .map(str::to_string),
        });
    }

    Ok(records)
}

fn json_text(row: usize, column: &'static str, value: &JsonValue) -> Result<String> {
    match value.as_str() {
        Some(s) => required_text(row, column, s.trim()),
        None => Err(invalid(row, column, &value.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same column names as the CSV layout.
///
/// Payload may be stored as any float or integer type, `class` as an
/// integer or float flag. Works with files written by both Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    // Required columns are checked on the file schema, so a file without
    // row groups still reports the column it lacks.
    let file_schema = builder.schema();
    for name in [COL_SITE, COL_PAYLOAD, COL_BOOSTER_CATEGORY, COL_CLASS] {
        file_schema
            .index_of(name)
            .map_err(|_| DatasetLoadError::MissingColumn(name))?;
    }
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let column = |name: &'static str| {
            schema
                .index_of(name)
                .map(|i| batch.column(i).clone())
                .map_err(|_| DatasetLoadError::MissingColumn(name))
        };

        let site_col = column(COL_SITE)?;
        let payload_col = column(COL_PAYLOAD)?;
        let category_col = column(COL_BOOSTER_CATEGORY)?;
        let class_col = column(COL_CLASS)?;
        let flight_col = column(COL_FLIGHT_NUMBER).ok();
        let version_col = column(COL_BOOSTER_VERSION).ok();

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;

            let payload_mass_kg = number_at(&payload_col, i)
                .and_then(valid_payload)
                .ok_or_else(|| invalid(row, COL_PAYLOAD, &cell_debug(&payload_col, i)))?;
            let outcome = number_at(&class_col, i)
                .and_then(Outcome::from_class)
                .ok_or_else(|| invalid(row, COL_CLASS, &cell_debug(&class_col, i)))?;
            let site = text_at(&site_col, i)
                .ok_or_else(|| invalid(row, COL_SITE, &cell_debug(&site_col, i)))?;
            let booster_category = text_at(&category_col, i)
                .ok_or_else(|| invalid(row, COL_BOOSTER_CATEGORY, &cell_debug(&category_col, i)))?;
            let flight_number = match flight_col.as_ref().filter(|c| !c.is_null(i)) {
                Some(c) => Some(
                    number_at(c, i)
                        .and_then(flight_number_from)
                        .ok_or_else(|| invalid(row, COL_FLIGHT_NUMBER, &cell_debug(c, i)))?,
                ),
                None => None,
            };

            records.push(LaunchRecord {
                site: required_text(row, COL_SITE, site.trim())?,
                payload_mass_kg,
                booster_category: required_text(row, COL_BOOSTER_CATEGORY, booster_category.trim())?,
                outcome,
                flight_number,
                booster_version: version_col
                    .as_ref()
                    .and_then(|c| text_at(c, i))
                    .map(str::to_string),
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell as `f64`; `None` for nulls and non-numeric columns.
fn number_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => Some(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => Some(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => Some(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => Some(col.as_primitive::<Int32Type>().value(row) as f64),
        _ => None,
    }
}

/// Read a string cell; `None` for nulls and non-string columns.
fn text_at(col: &ArrayRef, row: usize) -> Option<&str> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row)),
        _ => None,
    }
}

/// A numeric flight number is only accepted when it is a whole `u32`.
fn flight_number_from(n: f64) -> Option<u32> {
    (n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

fn cell_debug(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return "<null>".to_string();
    }
    match number_at(col, row) {
        Some(n) => n.to_string(),
        None => format!("<{:?}>", col.data_type()),
    }
}

// ---------------------------------------------------------------------------
// Shared validation
// ---------------------------------------------------------------------------

fn valid_payload(kg: f64) -> Option<f64> {
    (kg.is_finite() && kg >= 0.0).then_some(kg)
}

fn required_text(row: usize, column: &'static str, value: &str) -> Result<String> {
    if value.is_empty() {
        Err(invalid(row, column, value))
    } else {
        Ok(value.to_string())
    }
}

fn invalid(row: usize, column: &'static str, value: &str) -> DatasetLoadError {
    DatasetLoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}
