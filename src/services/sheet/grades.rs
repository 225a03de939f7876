use std::path::Path;

use super::loader::load_table;
use super::resolver::{require, resolve, ANALYZER_MAX_MISMATCHES};
use super::table::Table;
use crate::error::AnalysisError;
use crate::models::AnalysisOutcome;

pub const STUDENT_COLUMN: &str = "фио";
/// Homework, classroom and exam scores; any subset may be present.
pub const SCORE_COLUMNS: [&str; 3] = ["homework", "classroom", "average score"];
const LOW_GRADE: f64 = 4.0;

pub const NO_GRADE_DATA: &str = "no data to analyze or score columns not found";
pub const NO_LOW_GRADES: &str = "no students with low grades";

/// Flag students whose mean score is under 4.
pub fn analyze_grades(path: &Path) -> AnalysisOutcome {
    AnalysisOutcome::from_result(load_table(path).and_then(|table| grades_report(&table)))
}

pub fn grades_report(table: &Table) -> Result<AnalysisOutcome, AnalysisError> {
    let headers = table.headers();
    let student_column = require(&headers, STUDENT_COLUMN, ANALYZER_MAX_MISMATCHES)?;

    let mut score_columns: Vec<String> = Vec::new();
    for target in SCORE_COLUMNS {
        match resolve(&headers, target, false, ANALYZER_MAX_MISMATCHES)? {
            Some(column) if !score_columns.contains(&column) => score_columns.push(column),
            _ => {}
        }
    }
    if score_columns.is_empty() {
        tracing::warn!("No score columns among {:?}", headers);
        return Err(AnalysisError::EmptyAfterFilter(NO_GRADE_DATA));
    }

    let scores = score_columns
        .iter()
        .map(|column| table.numeric_column(column))
        .collect::<Result<Vec<_>, _>>()?;
    let students = table.text_column(&student_column)?;

    // Missing scores are left out of a row's mean, not counted as zero.
    let averages: Vec<(usize, f64)> = (0..table.height())
        .filter_map(|row| {
            let present: Vec<f64> = scores.iter().filter_map(|column| column[row]).collect();
            if present.is_empty() {
                None
            } else {
                Some((row, present.iter().sum::<f64>() / present.len() as f64))
            }
        })
        .collect();
    if averages.is_empty() {
        tracing::warn!("No numeric scores in columns {:?}", score_columns);
        return Err(AnalysisError::EmptyAfterFilter(NO_GRADE_DATA));
    }

    let lines: Vec<String> = averages
        .into_iter()
        .filter(|(_, average)| *average < LOW_GRADE)
        .map(|(row, average)| {
            format!(
                "Student {}, average grade {:.2}. Grade is low.",
                students[row].as_deref().unwrap_or("-"),
                average
            )
        })
        .collect();

    tracing::info!(
        "Grade check: {} rows, {} flagged, columns {:?}",
        table.height(),
        lines.len(),
        score_columns
    );

    if lines.is_empty() {
        Ok(AnalysisOutcome::Flagged(vec![NO_LOW_GRADES.to_string()]))
    } else {
        Ok(AnalysisOutcome::Flagged(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sheet::table::RawColumn;

    fn text(cells: &[&str]) -> RawColumn {
        RawColumn::Text(
            cells
                .iter()
                .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                .collect(),
        )
    }

    fn table(columns: Vec<(&str, RawColumn)>) -> Table {
        Table::from_columns(
            columns
                .into_iter()
                .map(|(name, column)| (name.to_string(), column))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn mean_skips_missing_scores() {
        let table = table(vec![
            ("фио", text(&["Иванов", "Петров"])),
            ("homework", text(&["5", "3"])),
            ("classroom", text(&["", "3"])),
            ("average score", text(&["3", "4"])),
        ]);

        // Иванов: (5 + 3) / 2 = 4.00, on the threshold and not flagged.
        assert_eq!(
            grades_report(&table).unwrap(),
            AnalysisOutcome::Flagged(vec![
                "Student Петров, average grade 3.33. Grade is low.".to_string()
            ])
        );
    }

    #[test]
    fn rows_without_any_score_never_appear() {
        let table = table(vec![
            ("фио", text(&["A", "B", "C"])),
            ("homework", text(&["", "2", "x"])),
            ("classroom", text(&["", "", ""])),
        ]);
        assert_eq!(
            grades_report(&table).unwrap(),
            AnalysisOutcome::Flagged(vec!["Student B, average grade 2.00. Grade is low.".to_string()])
        );
    }

    #[test]
    fn single_score_column_is_enough() {
        let table = table(vec![
            ("ФИО", text(&["A", "B"])),
            ("Average Score", RawColumn::Numeric(vec![Some(3.5), Some(4.5)])),
        ]);
        assert_eq!(
            grades_report(&table).unwrap(),
            AnalysisOutcome::Flagged(vec!["Student A, average grade 3.50. Grade is low.".to_string()])
        );
    }

    #[test]
    fn missing_student_name_renders_placeholder() {
        let table = table(vec![
            ("фио", text(&[""])),
            ("homework", text(&["1"])),
        ]);
        assert_eq!(
            grades_report(&table).unwrap(),
            AnalysisOutcome::Flagged(vec!["Student -, average grade 1.00. Grade is low.".to_string()])
        );
    }

    #[test]
    fn no_low_grades_is_still_a_list() {
        let table = table(vec![
            ("фио", text(&["A"])),
            ("homework", text(&["5"])),
        ]);
        assert_eq!(
            grades_report(&table).unwrap(),
            AnalysisOutcome::Flagged(vec![NO_LOW_GRADES.to_string()])
        );
    }

    #[test]
    fn no_score_columns_and_no_scores_share_a_message() {
        let without_columns = table(vec![
            ("фио", text(&["A"])),
            ("notes", text(&["x"])),
        ]);
        let without_scores = table(vec![
            ("фио", text(&["A"])),
            ("homework", text(&["absent"])),
        ]);

        let expected = AnalysisOutcome::Status(NO_GRADE_DATA.to_string());
        assert_eq!(AnalysisOutcome::from_result(grades_report(&without_columns)), expected);
        assert_eq!(AnalysisOutcome::from_result(grades_report(&without_scores)), expected);
    }

    #[test]
    fn missing_student_column_is_reported() {
        let table = table(vec![("homework", text(&["1"]))]);
        assert!(matches!(
            grades_report(&table),
            Err(AnalysisError::ColumnNotFound { .. })
        ));
    }
}
