use polars::prelude::*;

use crate::error::AnalysisError;

/// Cells of one column as they came out of the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawColumn {
    Text(Vec<Option<String>>),
    Numeric(Vec<Option<f64>>),
}

/// A loaded sheet: normalized headers over a polars frame.
///
/// Text-sourced columns are `String` series, numeric spreadsheet columns
/// are `Float64`; missing cells are nulls.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

impl Table {
    pub fn from_columns(columns: Vec<(String, RawColumn)>) -> Result<Self, AnalysisError> {
        let series: Vec<Series> = columns
            .into_iter()
            .map(|(name, column)| match column {
                RawColumn::Text(cells) => Series::new(&name, cells),
                RawColumn::Numeric(cells) => Series::new(&name, cells),
            })
            .collect();

        Ok(Self { frame: DataFrame::new(series)? })
    }

    pub fn headers(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Numeric view of a column. Cells that do not parse as a number
    /// become `None` rather than an error.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>, AnalysisError> {
        let series = self.frame.column(name)?;
        match series.dtype() {
            DataType::String => Ok(series
                .str()?
                .into_iter()
                .map(|cell| cell.and_then(coerce_number))
                .collect()),
            _ => {
                let numeric = series.cast(&DataType::Float64)?;
                let values = numeric
                    .f64()?
                    .into_iter()
                    .map(|value| value.filter(|v| !v.is_nan()))
                    .collect();
                Ok(values)
            }
        }
    }

    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>, AnalysisError> {
        let series = self.frame.column(name)?.cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|cell| cell.map(str::to_string))
            .collect();
        Ok(values)
    }
}

/// Parse a text cell as a number, tolerating surrounding whitespace.
pub fn coerce_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
