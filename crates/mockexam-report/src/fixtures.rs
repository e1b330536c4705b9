//! Shared report fixture for unit tests.

use mockexam_core::model::{Question, QuestionCategory, Subject};
use mockexam_core::report::{SessionReport, SourceSummary};
use mockexam_core::session::{Session, SessionConfig};
use mockexam_core::time::fixed_now;

pub fn sample_report() -> SessionReport {
    let questions: Vec<Question> = (0..3)
        .map(|i| Question {
            id: format!("c{i}"),
            prompt: format!("chemistry <question> {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: 2,
            year: None,
            category: QuestionCategory::Textual,
            tags: vec![],
        })
        .collect();
    let mut s = Session::start(
        questions,
        SessionConfig {
            duration_secs: 600,
            ..SessionConfig::default()
        },
    )
    .unwrap();
    s.select_option(0, 2).unwrap();
    s.select_option(1, 0).unwrap();
    s.toggle_mark(2).unwrap();
    for _ in 0..75 {
        s.tick();
    }
    s.request_submit().unwrap();
    s.confirm().unwrap();
    SessionReport::from_session(
        &s,
        SourceSummary {
            supply: "memory".into(),
            subject: Subject::Chemistry,
            year: None,
        },
        fixed_now(),
    )
    .unwrap()
}
