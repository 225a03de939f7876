use std::fmt::Display;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, Xlsx};
use polars::prelude::*;

use super::table::{RawColumn, Table};
use super::utils::header_names;
use crate::error::AnalysisError;

/// Load a sheet, trying delimited text first and a workbook second.
///
/// Any failure of the text attempt, including I/O, falls through to the
/// workbook attempt; only the second error is returned.
pub fn load_table(path: &Path) -> Result<Table, AnalysisError> {
    tracing::info!("Loading table from {}", path.display());
    let table = match read_delimited(path) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("Not delimited text ({}), trying workbook", e);
            read_workbook(path).map_err(|e| {
                tracing::error!("Failed to load {}: {}", path.display(), e);
                e
            })?
        }
    };
    tracing::info!(
        "Loaded {} rows x {} columns",
        table.height(),
        table.frame().width()
    );
    Ok(table)
}

/// Comma-separated text, every field read as text.
fn read_delimited(path: &Path) -> Result<Table, AnalysisError> {
    let bytes = fs::read(path)
        .map_err(|e| AnalysisError::load(format!("Failed to read {}: {}", path.display(), e)))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| AnalysisError::load(format!("File is not UTF-8 text: {}", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(AnalysisError::load("No columns to parse from file"));
    }

    // The header row is read as data so blank header cells survive as nulls.
    let df = CsvReader::new(Cursor::new(text.as_bytes().to_vec()))
        .has_header(false)
        .infer_schema(Some(0))
        .finish()?;

    let mut headers = Vec::with_capacity(df.width());
    let mut columns = Vec::with_capacity(df.width());
    for series in df.get_columns() {
        let series = series.cast(&DataType::String)?;
        let cells = series.str()?;
        headers.push(cells.get(0).map(str::to_string));
        columns.push(RawColumn::Text(
            cells.into_iter().skip(1).map(|cell| cell.map(str::to_string)).collect(),
        ));
    }

    build_table(&headers, columns, 0)
}

/// First worksheet of an XLSX workbook, or a legacy XLS one.
fn read_workbook(path: &Path) -> Result<Table, AnalysisError> {
    let bytes = fs::read(path)
        .map_err(|e| AnalysisError::load(format!("Failed to read {}: {}", path.display(), e)))?;

    let range = match first_sheet::<Xlsx<_>>(bytes.clone()) {
        Ok(range) => range,
        Err(xlsx_err) => first_sheet::<Xls<_>>(bytes).map_err(|xls_err| {
            AnalysisError::load(format!(
                "Failed to open Excel file: {}; {}",
                xlsx_err, xls_err
            ))
        })?,
    };

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| AnalysisError::load("No rows found in worksheet"))?;
    let data_rows: Vec<&[Data]> = rows.collect();

    let headers: Vec<Option<String>> = header_row.iter().map(header_text).collect();
    let columns = (0..header_row.len())
        .map(|idx| {
            let values: Vec<&Data> = data_rows
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            workbook_column(&values)
        })
        .collect();

    let offset = range.start().map_or(0, |(_, col)| col as usize);
    build_table(&headers, columns, offset)
}

fn first_sheet<R>(bytes: Vec<u8>) -> Result<Range<Data>, String>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: Display,
{
    let mut workbook: R =
        open_workbook_from_rs(Cursor::new(bytes)).map_err(|e: R::Error| e.to_string())?;
    match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| e.to_string()),
        None => Err("No sheets found in workbook".to_string()),
    }
}

/// Numeric when every non-empty cell is a number, text otherwise.
fn workbook_column(values: &[&Data]) -> RawColumn {
    let all_numeric = values
        .iter()
        .all(|v| matches!(v, Data::Float(_) | Data::Int(_) | Data::Empty));

    if all_numeric {
        RawColumn::Numeric(
            values
                .iter()
                .map(|v| match v {
                    Data::Float(f) => Some(*f),
                    Data::Int(i) => Some(*i as f64),
                    _ => None,
                })
                .collect(),
        )
    } else {
        RawColumn::Text(values.iter().map(|v| cell_text(v)).collect())
    }
}

/// Only a truly empty header cell counts as blank; whitespace is kept.
fn header_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn build_table(
    headers: &[Option<String>],
    columns: Vec<RawColumn>,
    offset: usize,
) -> Result<Table, AnalysisError> {
    let names = header_names(headers, offset);
    Table::from_columns(names.into_iter().zip(columns).collect())
}
