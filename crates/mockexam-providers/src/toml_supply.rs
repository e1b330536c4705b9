//! Question supply backed by a directory of TOML banks.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use mockexam_core::model::{Question, Subject};
use mockexam_core::parser::{load_bank_directory, validate_bank};
use mockexam_core::traits::{QuestionSupply, SupplyRequest};

use crate::pool::BankPool;

/// Serves questions from every `.toml` bank under a directory.
///
/// Banks are loaded once at construction; malformed files are skipped.
pub struct TomlQuestionSupply {
    dir: PathBuf,
    pool: BankPool,
}

impl TomlQuestionSupply {
    pub fn load(dir: &Path) -> Result<Self> {
        let banks = load_bank_directory(dir)?;
        for bank in &banks {
            for warning in validate_bank(bank) {
                tracing::warn!(
                    bank = %bank.id,
                    question = warning.question_id.as_deref().unwrap_or("-"),
                    "{}",
                    warning.message
                );
            }
        }
        tracing::info!(
            dir = %dir.display(),
            banks = banks.len(),
            "loaded question banks"
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            pool: BankPool::new(banks),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pool(&self) -> &BankPool {
        &self.pool
    }
}

#[async_trait]
impl QuestionSupply for TomlQuestionSupply {
    fn name(&self) -> &str {
        "toml"
    }

    async fn fetch(&self, request: &SupplyRequest) -> Result<Vec<Question>> {
        Ok(self.pool.draw(request)?)
    }

    async fn subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.pool.subjects())
    }
}
