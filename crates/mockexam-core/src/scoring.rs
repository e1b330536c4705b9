//! Marking scheme and the scoring of a finished session.
//!
//! Scoring is a pure function of the frozen question list, the final answer
//! map, and the time left on the clock at submission. It never reads the
//! wall clock.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Marks awarded per correct answer and deducted per wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringScheme {
    /// Added for each correct answer.
    #[serde(default = "default_correct_marks")]
    pub correct_marks: i64,
    /// Subtracted for each wrong answer.
    #[serde(default = "default_wrong_penalty")]
    pub wrong_penalty: i64,
}

fn default_correct_marks() -> i64 {
    4
}

fn default_wrong_penalty() -> i64 {
    1
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            correct_marks: default_correct_marks(),
            wrong_penalty: default_wrong_penalty(),
        }
    }
}

impl ScoringScheme {
    /// `correct_marks × correct − wrong_penalty × wrong`.
    pub fn score(&self, correct: u32, wrong: u32) -> i64 {
        self.correct_marks * i64::from(correct) - self.wrong_penalty * i64::from(wrong)
    }

    /// Best achievable score for `total` questions.
    pub fn max_score(&self, total: u32) -> i64 {
        self.correct_marks * i64::from(total)
    }
}

/// How a single position was resolved at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    Unattempted,
}

/// Per-position line of the results breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub position: usize,
    pub question_id: String,
    pub selected: Option<usize>,
    pub correct_option: usize,
    pub outcome: AnswerOutcome,
    /// Whether the position was still marked for review at submission.
    pub marked: bool,
}

/// Summary of a submitted session.
///
/// Always satisfies `attempted == correct + wrong` and
/// `attempted + unattempted == total_questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeResults {
    pub total_questions: u32,
    pub attempted: u32,
    pub correct: u32,
    pub wrong: u32,
    pub unattempted: u32,
    pub score: i64,
    /// Seconds used out of the session duration.
    pub time_taken_secs: u64,
}

impl PracticeResults {
    /// Rounded percentage of attempted questions answered correctly, 0 if none attempted.
    pub fn accuracy_percent(&self) -> u32 {
        if self.attempted == 0 {
            return 0;
        }
        ((f64::from(self.correct) / f64::from(self.attempted)) * 100.0).round() as u32
    }
}

/// Score a session.
///
/// Positions missing from `answers` count as unattempted. Entries keyed past
/// the end of `questions` are ignored.
pub fn score(
    questions: &[Question],
    answers: &BTreeMap<usize, usize>,
    scheme: &ScoringScheme,
    duration_secs: u64,
    remaining_secs: u64,
) -> PracticeResults {
    let mut correct = 0u32;
    let mut wrong = 0u32;

    for (position, question) in questions.iter().enumerate() {
        match answers.get(&position) {
            Some(&selected) if question.is_correct(selected) => correct += 1,
            Some(_) => wrong += 1,
            None => {}
        }
    }

    let total = questions.len() as u32;
    let attempted = correct + wrong;

    PracticeResults {
        total_questions: total,
        attempted,
        correct,
        wrong,
        unattempted: total - attempted,
        score: scheme.score(correct, wrong),
        time_taken_secs: duration_secs.saturating_sub(remaining_secs),
    }
}

/// Per-position breakdown matching [`score`].
pub fn review(
    questions: &[Question],
    answers: &BTreeMap<usize, usize>,
    marked: &BTreeSet<usize>,
) -> Vec<QuestionReview> {
    questions
        .iter()
        .enumerate()
        .map(|(position, question)| {
            let selected = answers.get(&position).copied();
            let outcome = match selected {
                Some(option) if question.is_correct(option) => AnswerOutcome::Correct,
                Some(_) => AnswerOutcome::Wrong,
                None => AnswerOutcome::Unattempted,
            };
            QuestionReview {
                position,
                question_id: question.id.clone(),
                selected,
                correct_option: question.correct_option,
                outcome,
                marked: marked.contains(&position),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionCategory;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: format!("q{i}"),
                prompt: format!("question {i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_option: i % 4,
                year: None,
                category: QuestionCategory::Textual,
                tags: vec![],
            })
            .collect()
    }

    #[test]
    fn eighteen_right_two_wrong_ten_blank() {
        let qs = questions(30);
        let mut answers = BTreeMap::new();
        for pos in 0..18 {
            answers.insert(pos, pos % 4);
        }
        for pos in 18..20 {
            answers.insert(pos, (pos + 1) % 4);
        }

        let results = score(&qs, &answers, &ScoringScheme::default(), 1800, 600);
        assert_eq!(results.correct, 18);
        assert_eq!(results.wrong, 2);
        assert_eq!(results.unattempted, 10);
        assert_eq!(results.score, 70);
        assert_eq!(results.time_taken_secs, 1200);
    }

    #[test]
    fn nothing_answered_scores_zero() {
        let qs = questions(12);
        let results = score(&qs, &BTreeMap::new(), &ScoringScheme::default(), 1800, 0);
        assert_eq!(results.attempted, 0);
        assert_eq!(results.correct, 0);
        assert_eq!(results.wrong, 0);
        assert_eq!(results.unattempted, 12);
        assert_eq!(results.score, 0);
        assert_eq!(results.time_taken_secs, 1800);
        assert_eq!(results.accuracy_percent(), 0);
    }

    #[test]
    fn all_wrong_goes_negative() {
        let qs = questions(5);
        let answers: BTreeMap<usize, usize> = (0..5).map(|p| (p, (p + 2) % 4)).collect();
        let results = score(&qs, &answers, &ScoringScheme::default(), 60, 30);
        assert_eq!(results.score, -5);
        assert_eq!(results.attempted, results.correct + results.wrong);
    }

    #[test]
    fn counts_stay_consistent_for_every_mix() {
        let qs = questions(8);
        let scheme = ScoringScheme::default();
        for mask in 0u32..(1 << 8) {
            let answers: BTreeMap<usize, usize> = (0..8)
                .filter(|p| mask & (1 << p) != 0)
                .map(|p| (p, if p % 3 == 0 { p % 4 } else { (p + 1) % 4 }))
                .collect();
            let r = score(&qs, &answers, &scheme, 100, 40);
            assert_eq!(r.attempted, r.correct + r.wrong);
            assert_eq!(r.attempted + r.unattempted, r.total_questions);
            assert_eq!(r.score, 4 * i64::from(r.correct) - i64::from(r.wrong));
        }
    }

    #[test]
    fn custom_scheme_is_applied() {
        let scheme = ScoringScheme {
            correct_marks: 3,
            wrong_penalty: 0,
        };
        assert_eq!(scheme.score(10, 7), 30);
        assert_eq!(scheme.max_score(20), 60);
    }

    #[test]
    fn accuracy_rounds_to_nearest() {
        let r = PracticeResults {
            total_questions: 3,
            attempted: 3,
            correct: 2,
            wrong: 1,
            unattempted: 0,
            score: 7,
            time_taken_secs: 10,
        };
        assert_eq!(r.accuracy_percent(), 67);
    }

    #[test]
    fn review_marks_each_position() {
        let qs = questions(3);
        let answers = BTreeMap::from([(0, 0), (1, 3)]);
        let lines = review(&qs, &answers, &BTreeSet::from([1]));
        assert_eq!(lines[0].outcome, AnswerOutcome::Correct);
        assert_eq!(lines[1].outcome, AnswerOutcome::Wrong);
        assert_eq!(lines[1].selected, Some(3));
        assert!(lines[1].marked);
        assert!(!lines[0].marked);
        assert_eq!(lines[2].outcome, AnswerOutcome::Unattempted);
        assert_eq!(lines[2].correct_option, 2);
    }
}
