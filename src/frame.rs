//! Polars interop: loading files into [`Table`]s and handing tables back as
//! `DataFrame`s or CSV for downstream visualization and export.

use crate::column::Column;
use crate::error::{CrossError, Result};
use crate::table::Table;
use crate::value::Value;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Load a CSV (header row, dates parsed) or Parquet file by extension.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CrossError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Table file not found: {}", path.display()),
        )));
    }

    let df = if path.extension().and_then(|s| s.to_str()) == Some("parquet") {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())
            .map_err(|e| CrossError::Polars(format!("Failed to scan {}: {}", path.display(), e)))?
            .collect()?
    } else {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .with_infer_schema_length(Some(1000))
            .finish()
            .map_err(|e| CrossError::Polars(format!("Failed to scan CSV {}: {}", path.display(), e)))?
            .collect()?
    };

    debug!("Loaded {} ({} rows, {} columns)", path.display(), df.height(), df.width());
    from_dataframe(&df)
}

/// Convert a `DataFrame` into a [`Table`]. Integer and float columns keep
/// their numeric type; dates and other logical types are rendered as text.
pub fn from_dataframe(df: &DataFrame) -> Result<Table> {
    let mut columns = Vec::with_capacity(df.width());
    for series in df.get_columns() {
        columns.push(Column::new(series.name(), series_values(series)?));
    }
    Table::new(columns)
}

fn series_values(series: &Series) -> Result<Vec<Value>> {
    let dtype = series.dtype();

    let values = if dtype.is_integer() {
        let cast = series.cast(&DataType::Int64)?;
        cast.i64()?
            .into_iter()
            .map(|v| v.map(Value::Int).unwrap_or(Value::Null))
            .collect()
    } else if dtype.is_float() {
        let cast = series.cast(&DataType::Float64)?;
        cast.f64()?
            .into_iter()
            .map(|v| v.map(Value::Float).unwrap_or(Value::Null))
            .collect()
    } else if dtype == &DataType::Boolean {
        series
            .bool()?
            .into_iter()
            .map(|v| v.map(Value::Bool).unwrap_or(Value::Null))
            .collect()
    } else if dtype == &DataType::String {
        series
            .str()?
            .into_iter()
            .map(|v| v.map(|s| Value::Text(s.to_string())).unwrap_or(Value::Null))
            .collect()
    } else {
        let mut values = Vec::with_capacity(series.len());
        for idx in 0..series.len() {
            let any = series.get(idx)?;
            values.push(if any.is_null() {
                Value::Null
            } else {
                Value::Text(any.to_string())
            });
        }
        values
    };

    Ok(values)
}

/// Convert a [`Table`] into a `DataFrame`, choosing one dtype per column:
/// Int64 when every value is an integer, Float64 when all are numeric,
/// Boolean when all are booleans, String otherwise.
pub fn to_dataframe(table: &Table) -> Result<DataFrame> {
    let series: Vec<Series> = table.columns().iter().map(column_to_series).collect();
    Ok(DataFrame::new(series)?)
}

fn column_to_series(column: &Column) -> Series {
    let present = || column.values().iter().filter(|v| !v.is_missing());
    let name = column.name();

    if present().all(|v| matches!(v, Value::Int(_))) && present().next().is_some() {
        let values: Vec<Option<i64>> = column
            .values()
            .iter()
            .map(|v| match v {
                Value::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if present().all(Value::is_numeric) && present().next().is_some() {
        let values: Vec<Option<f64>> = column
            .values()
            .iter()
            .map(|v| match v {
                Value::Int(i) => Some(*i as f64),
                Value::Float(f) if !f.is_nan() => Some(*f),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if present().all(|v| matches!(v, Value::Bool(_))) && present().next().is_some() {
        let values: Vec<Option<bool>> = column
            .values()
            .iter()
            .map(|v| match v {
                Value::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else {
        let values: Vec<Option<String>> = column.values().iter().map(Value::render).collect();
        Series::new(name, values)
    }
}

/// Write a table as CSV with a header row.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let mut df = to_dataframe(table)?;
    let mut file = std::fs::File::create(path.as_ref())?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)?;
    Ok(())
}
