//! Export formats for quizlearn attempt history.
//!
//! - [`csv`]: per-student CSV export
//! - [`html`]: self-contained per-student analytics page
//! - [`theme`]: colour palettes shared by the console and the HTML page

pub mod csv;
pub mod html;
pub mod theme;

/// Characters that can't appear in a file name on common platforms.
const RESERVED: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replace path separators, reserved and control characters with `_`, so
/// a student name always stays a single file name inside the export dir.
pub fn sanitize_file_component(name: &str) -> String {
    let mut safe: String = name
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if safe.starts_with('.') {
        safe.replace_range(..1, "_");
    }
    safe
}

/// Base file name (without extension) for a student's exports.
pub fn export_stem(student: &str) -> String {
    format!("QuizLearn_Analytics_{}", sanitize_file_component(student))
}
