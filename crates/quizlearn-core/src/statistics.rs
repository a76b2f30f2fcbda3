//! Mastery levels, per-student analytics, and the leaderboard.
//!
//! Everything here is a pure function of the attempt history. Empty results
//! are reported as `None` ("no data") rather than as empty collections, so
//! the front end can't render an empty table as if it were meaningful.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::format_date_ampm;
use crate::model::Attempt;

/// Categorical skill level derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mastery {
    Novice,
    Developing,
    Proficient,
    Master,
}

impl Mastery {
    /// `≥90` Master, `≥75` Proficient, `≥50` Developing, otherwise Novice.
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => Mastery::Master,
            75..=89 => Mastery::Proficient,
            50..=74 => Mastery::Developing,
            _ => Mastery::Novice,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mastery::Master => "Master",
            Mastery::Proficient => "Proficient",
            Mastery::Developing => "Developing",
            Mastery::Novice => "Novice",
        }
    }
}

impl fmt::Display for Mastery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mastery level of a single attempt.
pub fn compute_mastery(attempt: &Attempt) -> Mastery {
    Mastery::from_percentage(attempt.percentage)
}

/// One point on a student's score progression chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// Attempt date in 12-hour display form.
    pub date: String,
    pub percentage: u8,
}

/// Everything the analytics view shows for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAnalytics {
    pub student: String,
    /// The student's attempts in history order.
    pub attempts: Vec<Attempt>,
    /// Mean percentage per topic, topics sorted.
    pub topic_mastery: BTreeMap<String, f64>,
    /// Scores in history order.
    pub progression: Vec<ProgressPoint>,
    /// Mean percentage over all attempts.
    pub average_percentage: f64,
}

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub student: String,
    /// Mean percentage rounded to one decimal.
    pub average_percentage: f64,
    pub quizzes_taken: usize,
}

/// A student's attempts, in history order.
pub fn attempts_for<'a>(
    history: &'a [Attempt],
    student: &'a str,
) -> impl Iterator<Item = &'a Attempt> + 'a {
    history.iter().filter(move |a| a.student == student)
}

/// Distinct students in the history, in first-seen order.
pub fn students_with_history(history: &[Attempt]) -> Vec<String> {
    let mut students: Vec<String> = Vec::new();
    for attempt in history {
        if !students.contains(&attempt.student) {
            students.push(attempt.student.clone());
        }
    }
    students
}

/// Mean percentage per topic for one student.
pub fn topic_mastery(history: &[Attempt], student: &str) -> Option<BTreeMap<String, f64>> {
    let mut grouped: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
    for attempt in attempts_for(history, student) {
        grouped
            .entry(attempt.topic.as_str())
            .or_default()
            .push(attempt.percentage);
    }
    if grouped.is_empty() {
        return None;
    }

    Some(
        grouped
            .into_iter()
            .map(|(topic, scores)| (topic.to_string(), mean(&scores)))
            .collect(),
    )
}

/// A student's `(date, percentage)` series, in the order the attempts were made.
pub fn score_progression(history: &[Attempt], student: &str) -> Option<Vec<ProgressPoint>> {
    let points: Vec<ProgressPoint> = attempts_for(history, student)
        .map(|a| ProgressPoint {
            date: format_date_ampm(&a.date),
            percentage: a.percentage,
        })
        .collect();
    (!points.is_empty()).then_some(points)
}

/// Collect the full analytics view for one student.
pub fn student_analytics(history: &[Attempt], student: &str) -> Option<StudentAnalytics> {
    let attempts: Vec<Attempt> = attempts_for(history, student).cloned().collect();
    if attempts.is_empty() {
        return None;
    }
    let scores: Vec<u8> = attempts.iter().map(|a| a.percentage).collect();

    Some(StudentAnalytics {
        student: student.to_string(),
        topic_mastery: topic_mastery(history, student)?,
        progression: score_progression(history, student)?,
        average_percentage: mean(&scores),
        attempts,
    })
}

/// Per-student mean percentage and attempt count, best first.
///
/// Means are rounded to one decimal before ranking; equal means are ordered
/// by student name.
pub fn compute_leaderboard(history: &[Attempt]) -> Option<Vec<LeaderboardEntry>> {
    let mut grouped: HashMap<&str, Vec<u8>> = HashMap::new();
    for attempt in history {
        grouped
            .entry(attempt.student.as_str())
            .or_default()
            .push(attempt.percentage);
    }
    if grouped.is_empty() {
        return None;
    }

    let mut entries: Vec<LeaderboardEntry> = grouped
        .into_iter()
        .map(|(student, scores)| LeaderboardEntry {
            student: student.to_string(),
            average_percentage: round1(mean(&scores)),
            quizzes_taken: scores.len(),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.average_percentage
            .total_cmp(&a.average_percentage)
            .then_with(|| a.student.cmp(&b.student))
    });

    Some(entries)
}

fn mean(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}

/// One decimal, halves to even like [`crate::model::percentage`].
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn attempt(student: &str, topic: &str, percentage: u8, date: &str) -> Attempt {
        Attempt {
            student: student.into(),
            topic: topic.into(),
            difficulty: Difficulty::Medium,
            score: u32::from(percentage) / 10,
            total: 10,
            percentage,
            date: date.into(),
            time_taken: 30,
        }
    }

    #[test]
    fn mastery_boundaries_are_inclusive() {
        assert_eq!(Mastery::from_percentage(100), Mastery::Master);
        assert_eq!(Mastery::from_percentage(90), Mastery::Master);
        assert_eq!(Mastery::from_percentage(89), Mastery::Proficient);
        assert_eq!(Mastery::from_percentage(75), Mastery::Proficient);
        assert_eq!(Mastery::from_percentage(74), Mastery::Developing);
        assert_eq!(Mastery::from_percentage(50), Mastery::Developing);
        assert_eq!(Mastery::from_percentage(49), Mastery::Novice);
        assert_eq!(Mastery::from_percentage(0), Mastery::Novice);
    }

    #[test]
    fn mastery_is_total_over_percentages() {
        let labels = ["Master", "Proficient", "Developing", "Novice"];
        for p in 0..=100u8 {
            assert!(labels.contains(&Mastery::from_percentage(p).label()));
        }
    }

    #[test]
    fn leaderboard_averages_and_counts() {
        let history = vec![
            attempt("A", "Math", 80, "2024-05-01 10:00"),
            attempt("A", "Math", 100, "2024-05-01 11:00"),
            attempt("B", "Math", 50, "2024-05-01 12:00"),
        ];
        let board = compute_leaderboard(&history).unwrap();
        assert_eq!(
            board,
            vec![
                LeaderboardEntry {
                    student: "A".into(),
                    average_percentage: 90.0,
                    quizzes_taken: 2
                },
                LeaderboardEntry {
                    student: "B".into(),
                    average_percentage: 50.0,
                    quizzes_taken: 1
                },
            ]
        );
    }

    #[test]
    fn leaderboard_rounds_to_one_decimal() {
        let history = vec![
            attempt("Cy", "Math", 67, "d"),
            attempt("Cy", "Math", 67, "d"),
            attempt("Cy", "Math", 66, "d"),
        ];
        let board = compute_leaderboard(&history).unwrap();
        assert_eq!(board[0].average_percentage, 66.7);
    }

    #[test]
    fn leaderboard_ties_break_by_name() {
        let history = vec![
            attempt("Zoe", "Math", 70, "d"),
            attempt("Adam", "Math", 70, "d"),
            attempt("Mia", "Math", 90, "d"),
        ];
        let names: Vec<String> = compute_leaderboard(&history)
            .unwrap()
            .into_iter()
            .map(|e| e.student)
            .collect();
        assert_eq!(names, vec!["Mia", "Adam", "Zoe"]);
    }

    #[test]
    fn empty_history_is_no_data() {
        assert!(compute_leaderboard(&[]).is_none());
        assert!(topic_mastery(&[], "A").is_none());
        assert!(score_progression(&[], "A").is_none());
        assert!(student_analytics(&[], "A").is_none());
    }

    #[test]
    fn topic_mastery_means_per_topic() {
        let history = vec![
            attempt("A", "Math", 80, "d"),
            attempt("B", "Math", 10, "d"),
            attempt("A", "Science", 40, "d"),
            attempt("A", "Math", 60, "d"),
        ];
        let mastery = topic_mastery(&history, "A").unwrap();
        assert_eq!(mastery.len(), 2);
        assert!((mastery["Math"] - 70.0).abs() < f64::EPSILON);
        assert!((mastery["Science"] - 40.0).abs() < f64::EPSILON);

        // Unchanged history gives identical results
        assert_eq!(topic_mastery(&history, "A").unwrap(), mastery);
        assert!(topic_mastery(&history, "Nobody").is_none());
    }

    #[test]
    fn progression_keeps_history_order() {
        let history = vec![
            attempt("A", "Math", 40, "2024-05-02 09:00"),
            attempt("A", "Math", 90, "2024-05-01 15:45"),
            attempt("B", "Math", 10, "2024-05-01 16:00"),
        ];
        let points = score_progression(&history, "A").unwrap();
        assert_eq!(
            points,
            vec![
                ProgressPoint {
                    date: "2024-05-02 09:00 AM".into(),
                    percentage: 40
                },
                ProgressPoint {
                    date: "2024-05-01 03:45 PM".into(),
                    percentage: 90
                },
            ]
        );
    }

    #[test]
    fn students_listed_in_first_seen_order() {
        let history = vec![
            attempt("Zed", "Math", 40, "d"),
            attempt("Amy", "Math", 90, "d"),
            attempt("Zed", "Math", 10, "d"),
        ];
        assert_eq!(students_with_history(&history), vec!["Zed", "Amy"]);
    }

    #[test]
    fn student_analytics_bundles_views() {
        let history = vec![
            attempt("A", "Math", 80, "2024-05-01 10:00"),
            attempt("A", "History", 50, "2024-05-01 11:00"),
            attempt("B", "Math", 100, "2024-05-01 12:00"),
        ];
        let view = student_analytics(&history, "A").unwrap();
        assert_eq!(view.attempts.len(), 2);
        assert_eq!(view.progression.len(), 2);
        assert_eq!(view.topic_mastery.len(), 2);
        assert!((view.average_percentage - 65.0).abs() < f64::EPSILON);
        assert_eq!(compute_mastery(&view.attempts[0]), Mastery::Proficient);
    }

    #[test]
    fn leaderboard_mean_rounds_half_to_even() {
        let history = vec![
            attempt("A", "Math", 66, "d"),
            attempt("A", "Math", 66, "d"),
            attempt("A", "Math", 66, "d"),
            attempt("A", "Math", 67, "d"),
        ];
        let board = compute_leaderboard(&history).unwrap();
        assert!((board[0].average_percentage - 66.2).abs() < 1e-9);
    }
}
