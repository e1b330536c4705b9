//! Plain-text rendering for terminals and logs.

use std::fmt::Write;

use mockexam_core::palette::{PaletteSummary, QuestionStatus};
use mockexam_core::report::SessionReport;
use mockexam_core::scoring::AnswerOutcome;
use mockexam_core::session::SubmitReason;

/// `MM:SS` countdown. Minutes are not capped at 59.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Elapsed time as `Xm Ys`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Option label: 0 -> A, 1 -> B, ...
pub fn option_label(index: usize) -> String {
    match u8::try_from(index).ok().filter(|i| *i < 26) {
        Some(i) => char::from(b'A' + i).to_string(),
        None => (index + 1).to_string(),
    }
}

/// One-line palette, e.g. `[1*][2?][3o][4.]`, with the current position in angle brackets.
pub fn render_palette(statuses: &[QuestionStatus], current: usize) -> String {
    let mut line = String::new();
    for (i, status) in statuses.iter().enumerate() {
        let (open, close) = if i == current { ('<', '>') } else { ('[', ']') };
        let _ = write!(line, "{open}{}{}{close}", i + 1, status.glyph());
    }
    line
}

pub fn render_palette_legend(summary: &PaletteSummary) -> String {
    format!(
        "* answered {}  ? marked {}  o not answered {}  . not visited {}",
        summary.answered, summary.marked, summary.visited_empty, summary.not_visited
    )
}

/// Full results summary followed by the per-question review.
pub fn render_text(report: &SessionReport) -> String {
    let r = &report.results;
    let mut out = String::new();

    let _ = writeln!(out, "Results: {}", report.source.subject);
    if report.submitted_by == SubmitReason::TimeExpired {
        let _ = writeln!(out, "Time is up, your answers were submitted automatically.");
    }
    let _ = writeln!(
        out,
        "Score: {} / {}",
        r.score,
        report.config.scheme.max_score(r.total_questions)
    );
    let _ = writeln!(
        out,
        "Correct: {}  Wrong: {}  Unattempted: {}  Accuracy: {}%",
        r.correct,
        r.wrong,
        r.unattempted,
        r.accuracy_percent()
    );
    let _ = writeln!(out, "Time taken: {}", format_elapsed(r.time_taken_secs));

    let _ = writeln!(out);
    let _ = writeln!(out, "Review:");
    for line in &report.breakdown {
        let verdict = match line.outcome {
            AnswerOutcome::Correct => "correct",
            AnswerOutcome::Wrong => "wrong",
            AnswerOutcome::Unattempted => "skipped",
        };
        let selected = line
            .selected
            .map(option_label)
            .unwrap_or_else(|| "-".to_string());
        let mark = if line.marked { " (marked)" } else { "" };
        let _ = writeln!(
            out,
            "  Q{:<3} {:<8} yours: {:<2} answer: {}{}",
            line.position + 1,
            verdict,
            selected,
            option_label(line.correct_option),
            mark
        );
    }

    out
}
