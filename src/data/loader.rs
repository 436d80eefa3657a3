use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::boundary;
use super::model::{NeighborhoodRecord, NeighborhoodTable};
use crate::config::{StatisticCatalog, GEOMETRY_COLUMN, NAME_COLUMN};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a neighborhood table from a file.  Dispatch by extension.
///
/// Every format carries one row per neighborhood with a `Neighborhood Name`
/// column, a `the_geom` WKT column and one numeric column per catalog key.
/// Percentage statistics are scaled to their stored form on the way in.
///
/// Supported formats:
/// * `.csv`     – header row with column names
/// * `.json`    – `[{ "Neighborhood Name": ..., "the_geom": ..., ... }, ...]`
/// * `.parquet` – string name/geometry columns, numeric statistic columns
pub fn load_file(path: &Path, catalog: &StatisticCatalog) -> Result<NeighborhoodTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(path, catalog)?,
        "json" => read_json(path, catalog)?,
        "parquet" | "pq" => read_parquet(path, catalog)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.into_record(catalog).with_context(|| format!("Row {i}")))
        .collect::<Result<Vec<_>>>()?;

    let table = NeighborhoodTable::from_records(records)?;
    log::info!("Loaded {table} from {}", path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Row assembly shared by all formats
// ---------------------------------------------------------------------------

/// One input row before geometry parsing and scaling.
struct RawRow {
    name: String,
    wkt: Option<String>,
    /// Statistic key → raw value from the file.
    values: BTreeMap<String, f64>,
}

impl RawRow {
    fn into_record(self, catalog: &StatisticCatalog) -> Result<NeighborhoodRecord> {
        let geometry = match self.wkt.as_deref().map(str::trim) {
            None | Some("") => {
                log::warn!("'{}' has no geometry and will not be mapped", self.name);
                None
            }
            Some(text) => Some(
                boundary::parse(text)
                    .with_context(|| format!("parsing geometry of '{}'", self.name))?,
            ),
        };

        let mut statistics = BTreeMap::new();
        for d in catalog.descriptors() {
            let raw = self
                .values
                .get(&d.key)
                .with_context(|| format!("'{}' has no value for '{}'", self.name, d.key))?;
            statistics.insert(d.key.clone(), d.scale.apply(*raw));
        }

        Ok(NeighborhoodRecord {
            name: self.name,
            geometry,
            statistics,
        })
    }
}

fn parse_number(s: &str, row: usize, col: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, '{col}': '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, catalog: &StatisticCatalog) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let name_idx = column(NAME_COLUMN)?;
    let geom_idx = column(GEOMETRY_COLUMN)?;
    let stat_idx = catalog
        .descriptors()
        .iter()
        .map(|d| Ok((d.key.clone(), column(&d.key)?)))
        .collect::<Result<Vec<(String, usize)>>>()?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut values = BTreeMap::new();
        for (key, idx) in &stat_idx {
            let cell = record.get(*idx).unwrap_or("");
            values.insert(key.clone(), parse_number(cell, row_no, key)?);
        }

        rows.push(RawRow {
            name: record.get(name_idx).unwrap_or("").to_string(),
            wkt: record.get(geom_idx).map(str::to_string),
            values,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented layout, as written by `df.to_json(orient='records')`.
fn read_json(path: &Path, catalog: &StatisticCatalog) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;

            let name = obj
                .get(NAME_COLUMN)
                .and_then(JsonValue::as_str)
                .with_context(|| format!("Row {i}: missing or invalid '{NAME_COLUMN}'"))?;

            let mut values = BTreeMap::new();
            for d in catalog.descriptors() {
                let value = match obj.get(&d.key) {
                    Some(JsonValue::String(s)) => parse_number(s, i, &d.key)?,
                    Some(v) => v
                        .as_f64()
                        .with_context(|| format!("Row {i}, '{}': not a number", d.key))?,
                    None => bail!("Row {i}: missing '{}'", d.key),
                };
                values.insert(d.key.clone(), value);
            }

            Ok(RawRow {
                name: name.to_string(),
                wkt: obj
                    .get(GEOMETRY_COLUMN)
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
                values,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Expected schema:
/// - `Neighborhood Name`: Utf8 / LargeUtf8
/// - `the_geom`: Utf8 / LargeUtf8 holding WKT
/// - one Float64 / Float32 / Int64 / Int32 column per statistic key
fn read_parquet(path: &Path, catalog: &StatisticCatalog) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| {
            schema
                .index_of(name)
                .map(|i| batch.column(i))
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        let name_col = column(NAME_COLUMN)?;
        let geom_col = column(GEOMETRY_COLUMN)?;
        let stat_cols = catalog
            .descriptors()
            .iter()
            .map(|d| Ok((d.key.as_str(), column(&d.key)?)))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let name = extract_string(name_col, row)
                .with_context(|| format!("Row {row}: failed to read '{NAME_COLUMN}'"))?
                .with_context(|| format!("Row {row}: null '{NAME_COLUMN}'"))?;
            let wkt = extract_string(geom_col, row)
                .with_context(|| format!("Row {row}: failed to read '{GEOMETRY_COLUMN}'"))?;

            let mut values = BTreeMap::new();
            for (key, col) in &stat_cols {
                let value = extract_f64(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{key}'"))?;
                values.insert(key.to_string(), value);
            }

            rows.push(RawRow { name, wkt, values });
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Read a string cell; `None` for null.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .context("expected LargeStringArray")?
            .value(row),
        DataType::Utf8View => col.as_string_view().value(row),
        other => bail!("Expected string column, got {other:?}"),
    };
    Ok(Some(value.to_string()))
}

/// Read a numeric cell as `f64`. Nulls are rejected.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in statistic column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        other => bail!("Expected numeric column, got {other:?}"),
    };
    Ok(value)
}
