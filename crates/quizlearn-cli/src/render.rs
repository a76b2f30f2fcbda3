//! Console rendering helpers.

use std::collections::BTreeMap;

use comfy_table::{Cell, Table};

use quizlearn_core::bank::QuestionBank;
use quizlearn_core::model::{Attempt, Difficulty, Student};
use quizlearn_core::statistics::{attempts_for, LeaderboardEntry, Mastery, ProgressPoint};

/// `[######----]` for a fraction in `0.0..=1.0`.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn topics_table(bank: &QuestionBank) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Topic".to_string()];
    header.extend(Difficulty::ALL.iter().map(|d| d.to_string()));
    table.set_header(header);

    for topic in bank.topics() {
        let mut row = vec![Cell::new(topic)];
        row.extend(
            Difficulty::ALL
                .iter()
                .map(|d| Cell::new(bank.pool_size(topic, *d))),
        );
        table.add_row(row);
    }
    table
}

pub fn students_table(students: &[Student], history: &[Attempt]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Student", "Quizzes"]);
    for student in students {
        let name = student.display_name();
        let taken = attempts_for(history, &name).count();
        table.add_row(vec![
            Cell::new(student.id),
            Cell::new(&name),
            Cell::new(taken),
        ]);
    }
    table
}

pub fn leaderboard_table(entries: &[LeaderboardEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Student", "Average %", "Quizzes"]);
    for (rank, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.student),
            Cell::new(format!("{:.1}", entry.average_percentage)),
            Cell::new(entry.quizzes_taken),
        ]);
    }
    table
}

pub fn topic_mastery_table(topics: &BTreeMap<String, f64>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Topic", "Average %", "Mastery"]);
    for (topic, mean) in topics {
        let mastery = Mastery::from_percentage(mean.round().clamp(0.0, 100.0) as u8);
        table.add_row(vec![
            Cell::new(topic),
            Cell::new(format!("{mean:.1}")),
            Cell::new(mastery),
        ]);
    }
    table
}

pub fn progression_table(points: &[ProgressPoint]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Score %"]);
    for (i, point) in points.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&point.date),
            Cell::new(point.percentage),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 10), "[----------]");
        assert_eq!(progress_bar(0.6, 10), "[######----]");
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(2.0, 4), "[####]");
    }

    #[test]
    fn leaderboard_table_lists_ranks() {
        let entries = vec![
            LeaderboardEntry {
                student: "Alice".into(),
                average_percentage: 90.0,
                quizzes_taken: 2,
            },
            LeaderboardEntry {
                student: "Bob".into(),
                average_percentage: 66.7,
                quizzes_taken: 3,
            },
        ];
        let rendered = leaderboard_table(&entries).to_string();
        assert!(rendered.contains("Alice"));
        assert!(rendered.contains("90.0"));
        assert!(rendered.contains("66.7"));
    }
}
