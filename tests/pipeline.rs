use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use sheet_audit::models::AnalysisOutcome;
use sheet_audit::services::report::{save_report, ReportKind};
use sheet_audit::services::sheet::{analyze_grades, analyze_homework, load_table};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Journal export: teacher names in column A, the checked count in column F
/// under a blank header. The other headers are filled in; blank ones would
/// become "unnamed: N" and could capture the "unnamed: 10" lookup.
fn homework_workbook(path: &Path) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "ФИО преподавателя")?;
    for (col, header) in ["Группа", "Пары", "Выдано", "Сдано"].iter().enumerate() {
        sheet.write_string(0, col as u16 + 1, *header)?;
    }
    let rows = [("Иванов И.И.", 10.0), ("Петров П.П.", 0.0), ("Сидоров С.С.", 5.0)];
    for (idx, (name, checked)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *name)?;
        sheet.write_string(row, 1, "A-1")?;
        sheet.write_number(row, 5, *checked)?;
    }
    workbook.save(path)?;
    Ok(())
}

#[test]
fn homework_from_csv_flags_in_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "journal.csv",
        "ФИО преподавателя,a,b,c,d,,e\nИванов,,,,,10,\nПетров,,,,,0,\nСидоров,,,,,5,\n",
    );

    assert_eq!(
        analyze_homework(&path),
        AnalysisOutcome::Flagged(vec![
            "Teacher Петров, checked percentage 0.00%. Needs checking.".to_string(),
            "Teacher Сидоров, checked percentage 50.00%. Needs checking.".to_string(),
        ])
    );
}

#[test]
fn homework_from_xlsx_falls_back_to_workbook() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("journal.xlsx");
    homework_workbook(&path)?;

    let table = load_table(&path)?;
    assert_eq!(table.headers()[5], "unnamed: 5");

    assert_eq!(
        analyze_homework(&path),
        AnalysisOutcome::Flagged(vec![
            "Teacher Петров П.П., checked percentage 0.00%. Needs checking.".to_string(),
            "Teacher Сидоров С.С., checked percentage 50.00%. Needs checking.".to_string(),
        ])
    );
    Ok(())
}

#[test]
fn grades_from_xlsx_use_numeric_cells() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("grades.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["ФИО", "Homework", "Classroom", "Average score"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    sheet.write_string(1, 0, "Анна")?;
    sheet.write_number(1, 1, 5.0)?;
    sheet.write_number(1, 3, 3.0)?;
    sheet.write_string(2, 0, "Борис")?;
    sheet.write_number(2, 1, 2.0)?;
    sheet.write_number(2, 2, 3.0)?;
    sheet.write_string(3, 0, "Вера")?;
    workbook.save(&path)?;

    assert_eq!(
        analyze_grades(&path),
        AnalysisOutcome::Flagged(vec![
            "Student Борис, average grade 2.50. Grade is low.".to_string()
        ])
    );
    Ok(())
}

#[test]
fn nothing_checked_is_a_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "zero.csv",
        "фио преподавателя,unnamed: 5\nA,0\nB,0\n",
    );
    assert_eq!(
        analyze_homework(&path),
        AnalysisOutcome::Status("nothing has been checked yet".to_string())
    );
}

#[test]
fn unreadable_file_is_a_processing_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    fs::write(&path, [0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe, 0x00]).unwrap();

    match analyze_grades(&path) {
        AnalysisOutcome::Status(message) => assert!(message.starts_with("processing error: ")),
        other => panic!("expected a status, got {other:?}"),
    }
}

#[test]
fn missing_teacher_column_is_a_single_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "other.csv", "name,unnamed: 5\nA,1\n");
    assert_eq!(
        analyze_homework(&path),
        AnalysisOutcome::Status(
            r#"column 'фио преподавателя' not found. Available: ["name", "unnamed: 5"]"#
                .to_string()
        )
    );
}

#[test]
fn repeated_analysis_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "grades.csv",
        "ФИО,homework,classroom\nA,3,\nB,5,5\n",
    );
    assert_eq!(analyze_grades(&path), analyze_grades(&path));
    assert_eq!(analyze_homework(&path), analyze_homework(&path));
}

#[test]
fn saved_report_matches_returned_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "grades.csv",
        "ФИО,homework,classroom,average score\nA,3,,\nB,5,,3\nC,2,1,\n",
    );

    let lines = match analyze_grades(&path) {
        AnalysisOutcome::Flagged(lines) => lines,
        other => panic!("expected flagged rows, got {other:?}"),
    };
    assert_eq!(lines.len(), 2);

    let report = save_report(&lines, ReportKind::Grades, &dir.path().join("out")).unwrap();
    let saved = fs::read_to_string(report).unwrap();
    assert_eq!(saved.lines().collect::<Vec<_>>(), lines);
}
