use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Homework,
    Grades,
}

impl ReportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::Homework => "homework_check_analysis.txt",
            ReportKind::Grades => "student_grades_analysis.txt",
        }
    }
}

/// Write one line per entry into `dir`, replacing any earlier report of
/// the same kind.
pub fn save_report(lines: &[String], kind: ReportKind, dir: &Path) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(kind.file_name());

    let mut writer = BufWriter::new(File::create(&path)?);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::info!("Saved {} report lines to {}", lines.len(), path.display());
    Ok(path)
}
