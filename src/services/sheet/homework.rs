use std::path::Path;

use super::loader::load_table;
use super::resolver::{require, resolve, ANALYZER_MAX_MISMATCHES};
use super::table::Table;
use crate::error::AnalysisError;
use crate::models::AnalysisOutcome;

pub const TEACHER_COLUMN: &str = "фио преподавателя";
/// Checked-count columns carry no header of their own in the exported
/// journal, so they are found by their placeholder names.
pub const CHECKED_COLUMNS: [&str; 3] = ["unnamed: 5", "unnamed: 10", "unnamed: 15"];
const LOW_CHECK_PERCENTAGE: f64 = 75.0;

pub const NO_NUMERIC_DATA: &str = "no numeric data to check";
pub const NO_LOW_CHECKING: &str = "no teachers with low checking percentage";

/// Flag teachers whose checked share falls under 75% of the best one.
pub fn analyze_homework(path: &Path) -> AnalysisOutcome {
    AnalysisOutcome::from_result(load_table(path).and_then(|table| homework_report(&table)))
}

pub fn homework_report(table: &Table) -> Result<AnalysisOutcome, AnalysisError> {
    let headers = table.headers();
    let teacher_column = require(&headers, TEACHER_COLUMN, ANALYZER_MAX_MISMATCHES)?;

    let mut checked_columns: Vec<String> = Vec::new();
    for target in CHECKED_COLUMNS {
        // Placeholders sit close together, so two may land on one header.
        match resolve(&headers, target, false, ANALYZER_MAX_MISMATCHES)? {
            Some(column) if !checked_columns.contains(&column) => checked_columns.push(column),
            _ => {}
        }
    }
    if checked_columns.is_empty() {
        return Err(AnalysisError::NoCheckedColumns {
            sought: CHECKED_COLUMNS.join(", "),
            available: headers,
        });
    }

    let checked = checked_columns
        .iter()
        .map(|column| table.numeric_column(column))
        .collect::<Result<Vec<_>, _>>()?;
    let teachers = table.text_column(&teacher_column)?;

    // A row counts only when every checked column holds a number.
    let totals: Vec<(usize, f64)> = (0..table.height())
        .filter_map(|row| {
            checked
                .iter()
                .map(|column| column[row])
                .sum::<Option<f64>>()
                .map(|total| (row, total))
        })
        .collect();
    if totals.is_empty() {
        return Err(AnalysisError::EmptyAfterFilter(NO_NUMERIC_DATA));
    }

    let max_checked = totals
        .iter()
        .map(|(_, total)| *total)
        .fold(f64::NEG_INFINITY, f64::max);
    if max_checked == 0.0 {
        return Err(AnalysisError::NoSignal);
    }

    let lines: Vec<String> = totals
        .into_iter()
        .filter_map(|(row, total)| {
            let percentage = total / max_checked * 100.0;
            let teacher = teachers[row].as_deref()?;
            (percentage < LOW_CHECK_PERCENTAGE).then(|| {
                format!(
                    "Teacher {}, checked percentage {:.2}%. Needs checking.",
                    teacher, percentage
                )
            })
        })
        .collect();

    tracing::info!(
        "Homework check: {} rows, {} flagged, columns {:?}",
        table.height(),
        lines.len(),
        checked_columns
    );

    if lines.is_empty() {
        Ok(AnalysisOutcome::Flagged(vec![NO_LOW_CHECKING.to_string()]))
    } else {
        Ok(AnalysisOutcome::Flagged(lines))
    }
}
