//! CSV export of a student's attempts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizlearn_core::format::{format_date_ampm, format_duration};
use quizlearn_core::model::Attempt;
use quizlearn_core::statistics::{attempts_for, compute_mastery};

/// MIME type offered alongside the download.
pub const CSV_MIME: &str = "text/csv";

const HEADER: [&str; 9] = [
    "STUDENT",
    "TOPIC",
    "DIFFICULTY",
    "SCORE",
    "TOTAL",
    "PERCENTAGE",
    "DATE",
    "TIME_TAKEN",
    "MASTERY LEVEL",
];

/// Quote a field only when it contains a separator, quote or line break.
pub fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row: Vec<String> = fields
        .into_iter()
        .map(|f| escape_csv_field(f.as_ref()))
        .collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// `QuizLearn_Analytics_{student}.csv`
pub fn export_file_name(student: &str) -> String {
    format!("{}.csv", crate::export_stem(student))
}

/// Render one student's attempts as CSV, or `None` when they have none.
pub fn export_csv(history: &[Attempt], student: &str) -> Option<String> {
    let mut out = String::new();
    push_row(&mut out, HEADER);

    let mut rows = 0usize;
    for attempt in attempts_for(history, student) {
        push_row(
            &mut out,
            [
                attempt.student.clone(),
                attempt.topic.clone(),
                attempt.difficulty.to_string(),
                attempt.score.to_string(),
                attempt.total.to_string(),
                attempt.percentage.to_string(),
                format_date_ampm(&attempt.date),
                format_duration(attempt.time_taken),
                compute_mastery(attempt).to_string(),
            ],
        );
        rows += 1;
    }

    (rows > 0).then_some(out)
}

/// Write the student's CSV into `dir`. Returns `Ok(None)` when there is
/// nothing to export.
pub fn write_csv_export(history: &[Attempt], student: &str, dir: &Path) -> Result<Option<PathBuf>> {
    let Some(content) = export_csv(history, student) else {
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory: {}", dir.display()))?;
    let path = dir.join(export_file_name(student));
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write CSV export: {}", path.display()))?;

    tracing::info!(student, path = %path.display(), "exported CSV");
    Ok(Some(path))
}
