//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use mockexam_core::report::SessionReport;
use mockexam_core::scoring::{AnswerOutcome, PracticeResults};
use mockexam_core::session::SubmitReason;

use crate::text::{format_elapsed, option_label};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a session report.
pub fn generate_html(report: &SessionReport) -> String {
    let r = &report.results;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>mockexam report: {}</title>\n",
        html_escape(&report.source.subject.to_string())
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Practice results</h1>\n");
    let year = report
        .source
        .year
        .as_deref()
        .map(|y| format!(" {}", html_escape(y)))
        .unwrap_or_default();
    html.push_str(&format!(
        "<p class=\"meta\">Subject: <strong>{}</strong>{} | {} questions | {} | {}</p>\n",
        html_escape(&report.source.subject.to_string()),
        year,
        r.total_questions,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        match report.submitted_by {
            SubmitReason::Confirmed => "submitted",
            SubmitReason::TimeExpired => "time expired",
        }
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Correct</th><th>Wrong</th><th>Unattempted</th><th>Accuracy</th><th>Time taken</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{} / {}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td><td>{}</td></tr></tbody>\n",
        r.score,
        report.config.scheme.max_score(r.total_questions),
        r.correct,
        r.wrong,
        r.unattempted,
        r.accuracy_percent(),
        format_elapsed(r.time_taken_secs),
    ));
    html.push_str("</table>\n");
    html.push_str(&generate_outcome_bar(r));
    html.push_str("</section>\n");

    // Per-question review
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Review</h2>\n");
    html.push_str("<p class=\"filters\">Show: ");
    for (label, filter) in [
        ("all", "all"),
        ("correct", "correct"),
        ("wrong", "wrong"),
        ("skipped", "unattempted"),
        ("marked", "marked"),
    ] {
        html.push_str(&format!(
            "<button onclick=\"filterRows('{filter}')\">{label}</button> "
        ));
    }
    html.push_str("</p>\n");
    html.push_str("<table class=\"results-table\" id=\"review\">\n");
    html.push_str("<thead><tr><th>#</th><th>Question</th><th>Your answer</th><th>Correct answer</th><th>Result</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for line in &report.breakdown {
        let question = report.questions.get(line.position);
        let prompt = question.map(|q| q.prompt.as_str()).unwrap_or("");
        let option_text = |index: usize| {
            let text = question
                .and_then(|q| q.options.get(index))
                .map(|o| html_escape(o))
                .unwrap_or_default();
            format!("{}. {}", option_label(index), text)
        };

        let (class, verdict) = match line.outcome {
            AnswerOutcome::Correct => ("correct", "correct"),
            AnswerOutcome::Wrong => ("wrong", "wrong"),
            AnswerOutcome::Unattempted => ("unattempted", "skipped"),
        };
        let selected = line
            .selected
            .map(option_text)
            .unwrap_or_else(|| "-".to_string());
        let marked = if line.marked { " marked" } else { "" };

        html.push_str(&format!(
            "<tr class=\"{class}{marked}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}{}</td></tr>\n",
            line.position + 1,
            html_escape(prompt),
            selected,
            option_text(line.correct_option),
            verdict,
            if line.marked { " (marked)" } else { "" },
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Stacked SVG bar of correct / wrong / unattempted counts.
fn generate_outcome_bar(results: &PracticeResults) -> String {
    let width = 600usize;
    let height = 28usize;
    let total = results.total_questions.max(1) as usize;

    let segments = [
        (results.correct as usize, "#22c55e", "correct"),
        (results.wrong as usize, "#ef4444", "wrong"),
        (results.unattempted as usize, "#9ca3af", "unattempted"),
    ];

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        width,
        height + 24
    );

    let mut x = 0usize;
    for (count, color, label) in segments {
        if count == 0 {
            continue;
        }
        let w = count * width / total;
        svg.push_str(&format!(
            "  <rect x=\"{x}\" y=\"0\" width=\"{w}\" height=\"{height}\" fill=\"{color}\"><title>{label}: {count}</title></rect>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\">{label} {count}</text>\n",
            x + 4,
            height + 16
        ));
        x += w;
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --skip: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --skip: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); }
.correct { background: var(--pass); }
.wrong { background: var(--fail); }
.unattempted { background: var(--skip); }
.marked td:first-child { border-left: 4px solid #a855f7; }
.filters button { margin-right: 0.25rem; cursor: pointer; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function filterRows(kind) {
  const rows = document.querySelectorAll('#review tbody tr');
  rows.forEach(r => {
    r.style.display = kind === 'all' || r.classList.contains(kind) ? '' : 'none';
  });
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&sample_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("chemistry"));
        assert!(html.contains("<td>3 / 12</td>"));
        assert!(html.contains("1m 15s"));
        assert!(html.contains("class=\"unattempted marked\""));
    }

    #[test]
    fn prompts_are_escaped() {
        let html = generate_html(&sample_report());
        assert!(html.contains("chemistry &lt;question&gt; 0"));
        assert!(!html.contains("<question>"));
    }

    #[test]
    fn outcome_bar_skips_empty_segments() {
        let svg = generate_outcome_bar(&sample_report().results);
        assert!(svg.contains("correct 1"));
        assert!(svg.contains("wrong 1"));

        let none_wrong = PracticeResults {
            wrong: 0,
            ..sample_report().results
        };
        assert!(!generate_outcome_bar(&none_wrong).contains("wrong"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&sample_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
