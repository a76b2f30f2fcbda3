//! HTML analytics report.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined, coloured
//! from a [`Palette`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use quizlearn_core::format::{format_date_ampm, format_duration};
use quizlearn_core::model::Attempt;
use quizlearn_core::statistics::{
    compute_mastery, student_analytics, Mastery, ProgressPoint, StudentAnalytics,
};

use crate::theme::{difficulty_accent, Palette};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// `QuizLearn_Analytics_{student}.html`
pub fn report_file_name(student: &str) -> String {
    format!("{}.html", crate::export_stem(student))
}

fn mastery_color(mastery: Mastery) -> &'static str {
    match mastery {
        Mastery::Master => "#22c55e",
        Mastery::Proficient => "#0ea5e9",
        Mastery::Developing => "#eab308",
        Mastery::Novice => "#ef4444",
    }
}

fn mastery_of(mean: f64) -> Mastery {
    Mastery::from_percentage(mean.round().clamp(0.0, 100.0) as u8)
}

/// Generate the analytics page for one student.
pub fn generate_html(
    analytics: &StudentAnalytics,
    palette: &Palette,
    generated_at: NaiveDateTime,
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>QuizLearn analytics: {}</title>\n",
        html_escape(&analytics.student)
    ));
    html.push_str("<style>\n");
    html.push_str(&palette_vars(palette));
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>Performance profile: {}</h1>\n",
        html_escape(&analytics.student)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} quizzes | average {:.1}% ({}) | generated {}</p>\n",
        analytics.attempts.len(),
        analytics.average_percentage,
        mastery_of(analytics.average_percentage),
        generated_at.format("%Y-%m-%d %I:%M %p")
    ));
    html.push_str("</header>\n");

    // Topic mastery
    html.push_str("<section class=\"card\">\n");
    html.push_str("<h2>Topic mastery</h2>\n");
    html.push_str(&generate_mastery_gauges(&analytics.topic_mastery));
    html.push_str("</section>\n");

    // Progression
    html.push_str("<section class=\"card\">\n");
    html.push_str("<h2>Score progression</h2>\n");
    html.push_str(&generate_line_chart(&analytics.progression));
    html.push_str("</section>\n");

    // Attempts
    html.push_str("<section class=\"card\">\n");
    html.push_str("<h2>Attempts</h2>\n");
    html.push_str(&generate_attempts_table(&analytics.attempts));
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(analytics).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(
    analytics: &StudentAnalytics,
    palette: &Palette,
    generated_at: NaiveDateTime,
    path: &Path,
) -> Result<()> {
    let html = generate_html(analytics, palette, generated_at);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory: {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report: {}", path.display()))?;
    Ok(())
}

/// Write the student's analytics page into `dir`. Returns `Ok(None)` when
/// the student has no attempts.
pub fn write_html_export(
    history: &[Attempt],
    student: &str,
    palette: &Palette,
    generated_at: NaiveDateTime,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let Some(analytics) = student_analytics(history, student) else {
        return Ok(None);
    };
    let path = dir.join(report_file_name(student));
    write_html_report(&analytics, palette, generated_at, &path)?;
    tracing::info!(student, path = %path.display(), palette = %palette.name, "exported HTML report");
    Ok(Some(path))
}

fn palette_vars(palette: &Palette) -> String {
    format!(
        ":root {{ --bg: {}; --fg: {}; --card: {}; --accent: {}; }}\n",
        html_escape(&palette.background),
        html_escape(&palette.text),
        html_escape(&palette.card),
        html_escape(&palette.accent)
    )
}

fn generate_mastery_gauges(topics: &BTreeMap<String, f64>) -> String {
    let bar_height = 26;
    let max_width = 400;
    let padding = 12;
    let label_width = 180;

    let total_height = topics.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg class=\"gauges\" width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 140,
        total_height
    );

    for (i, (topic, mean)) in topics.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (mean.clamp(0.0, 100.0) / 100.0 * max_width as f64) as usize;
        let mastery = mastery_of(*mean);

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(topic)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"currentColor\" opacity=\"0.15\" rx=\"4\"/>\n",
            label_width, y, max_width, bar_height
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width,
            y,
            width,
            bar_height,
            mastery_color(mastery)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}% {}</text>\n",
            label_width + max_width + 8,
            y + bar_height / 2,
            mean,
            mastery
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn generate_line_chart(points: &[ProgressPoint]) -> String {
    let width = 640.0;
    let height = 260.0;
    let pad = 40.0;
    let plot_w = width - 2.0 * pad;
    let plot_h = height - 2.0 * pad;

    let x_at = |i: usize| -> f64 {
        if points.len() <= 1 {
            pad + plot_w / 2.0
        } else {
            pad + plot_w * i as f64 / (points.len() - 1) as f64
        }
    };
    let y_at = |p: u8| -> f64 { pad + plot_h * (1.0 - f64::from(p.min(100)) / 100.0) };

    let mut svg = format!(
        "<svg class=\"progression\" width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );

    // Gridlines at 0/50/100
    for level in [0u8, 50, 100] {
        let y = y_at(level);
        svg.push_str(&format!(
            "  <line x1=\"{pad}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"currentColor\" opacity=\"0.2\"/>\n",
            width - pad
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{level}%</text>\n",
            pad - 6.0
        ));
    }

    let coords: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(p.percentage)))
        .collect();
    if coords.len() > 1 {
        svg.push_str(&format!(
            "  <polyline points=\"{}\" fill=\"none\" stroke=\"var(--accent)\" stroke-width=\"2\"/>\n",
            coords.join(" ")
        ));
    }

    for (i, p) in points.iter().enumerate() {
        svg.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"var(--accent)\"><title>{}: {}%</title></circle>\n",
            x_at(i),
            y_at(p.percentage),
            html_escape(&p.date),
            p.percentage
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn generate_attempts_table(attempts: &[Attempt]) -> String {
    let mut html = String::new();
    html.push_str("<table id=\"attempts\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Date</th><th onclick=\"sortTable(1)\">Topic</th><th onclick=\"sortTable(2)\">Difficulty</th><th onclick=\"sortTable(3)\">Score</th><th onclick=\"sortTable(4)\">Percentage</th><th onclick=\"sortTable(5)\">Time</th><th onclick=\"sortTable(6)\">Mastery</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for a in attempts {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td><span class=\"badge\" style=\"background: {}\">{}</span></td><td>{}/{}</td><td>{}%</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&format_date_ampm(&a.date)),
            html_escape(&a.topic),
            difficulty_accent(a.difficulty),
            a.difficulty,
            a.score,
            a.total,
            a.percentage,
            format_duration(a.time_taken),
            compute_mastery(a)
        ));
    }

    html.push_str("</tbody></table>\n");
    html
}

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { border-bottom: 3px solid var(--accent); padding-bottom: 0.5rem; }
h2 { margin-top: 0; }
.meta { opacity: 0.7; }
.card { background: var(--card); border-radius: 12px; padding: 1.5rem; margin: 1.5rem 0; border: 1px solid rgba(128, 128, 128, 0.2); }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border-bottom: 1px solid rgba(128, 128, 128, 0.3); padding: 0.5rem 1rem; text-align: left; }
th { cursor: pointer; color: var(--accent); }
.badge { color: #000; border-radius: 6px; padding: 0.1rem 0.5rem; font-size: 0.85rem; font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--card); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; max-width: 100%; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('attempts');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
