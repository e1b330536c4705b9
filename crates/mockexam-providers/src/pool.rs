//! Question selection over a set of loaded banks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use mockexam_core::model::{Question, QuestionBank, Subject};
use mockexam_core::traits::SupplyRequest;

use crate::error::StoreError;

/// Loaded banks, searchable by subject and year.
#[derive(Debug, Clone, Default)]
pub struct BankPool {
    banks: Vec<QuestionBank>,
}

impl BankPool {
    pub fn new(banks: Vec<QuestionBank>) -> Self {
        Self { banks }
    }

    pub fn banks(&self) -> &[QuestionBank] {
        &self.banks
    }

    /// Subjects with at least one question, in display order.
    pub fn subjects(&self) -> Vec<Subject> {
        Subject::ALL
            .into_iter()
            .filter(|s| {
                self.banks
                    .iter()
                    .any(|b| b.subject == *s && !b.questions.is_empty())
            })
            .collect()
    }

    /// Draw questions for `request`.
    ///
    /// With `shuffle` off, questions keep bank order and the first `count`
    /// are taken. A seed makes the shuffle reproducible.
    pub fn draw(&self, request: &SupplyRequest) -> Result<Vec<Question>, StoreError> {
        let mut pool: Vec<Question> = self
            .banks
            .iter()
            .filter(|b| b.subject == request.subject)
            .flat_map(|b| b.questions.iter())
            .filter(|q| match &request.year {
                Some(year) => q.year.as_deref() == Some(year.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        if pool.is_empty() {
            return Err(StoreError::NoQuestions {
                subject: request.subject,
                year: request.year.clone(),
            });
        }

        if request.shuffle {
            match request.seed {
                Some(seed) => pool.shuffle(&mut StdRng::seed_from_u64(seed)),
                None => pool.shuffle(&mut rand::rng()),
            }
        }

        if pool.len() < request.count {
            tracing::warn!(
                subject = %request.subject,
                requested = request.count,
                available = pool.len(),
                "fewer questions available than requested, using all of them"
            );
        }
        pool.truncate(request.count);
        Ok(pool)
    }
}
