//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionBank, QuestionCategory, Subject, STANDARD_OPTION_COUNT};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    subject: String,
    #[serde(default)]
    description: String,
    /// Year applied to questions that do not set their own.
    #[serde(default)]
    year: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    prompt: String,
    options: Vec<String>,
    /// Zero-based index into `options`.
    answer: usize,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

fn parse_category(value: &str) -> Result<QuestionCategory> {
    match value.trim().to_lowercase().as_str() {
        "textual" | "text" => Ok(QuestionCategory::Textual),
        "numerical" | "numeric" => Ok(QuestionCategory::Numerical),
        "image" => Ok(QuestionCategory::Image),
        other => anyhow::bail!("unknown question category: {other}"),
    }
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank`.
///
/// Structural errors (bad subject, unknown category, an answer index outside
/// the options) fail the whole file; softer issues are reported by
/// [`validate_bank`].
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let subject: Subject = parsed
        .bank
        .subject
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}: {}", source_path.display(), e))?;

    let default_year = parsed.bank.year;
    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let category = q
                .category
                .as_deref()
                .map(parse_category)
                .transpose()?
                .unwrap_or_default();

            let question = Question {
                id: q.id,
                prompt: q.prompt.trim().to_string(),
                options: q.options,
                correct_option: q.answer,
                year: q.year.or_else(|| default_year.clone()),
                category,
                tags: q.tags,
            };
            question
                .validate()
                .with_context(|| format!("invalid question in {}", source_path.display()))?;
            Ok(question)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        subject,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question banks from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for issues that do not stop it from being used.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in &bank.questions {
        if q.options.len() != STANDARD_OPTION_COUNT {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!(
                    "expected {STANDARD_OPTION_COUNT} options, found {}",
                    q.options.len()
                ),
            });
        }
        if let Some(i) = q.options.iter().position(|o| o.trim().is_empty()) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("option {i} is empty"),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "botany-2023"
name = "Botany PYQ 2023"
subject = "botany"
description = "Previous year questions"
year = "2023"

[[questions]]
id = "bot-001"
prompt = "Which pigment is primarily responsible for photosynthesis?"
options = ["Carotene", "Chlorophyll a", "Xanthophyll", "Phycoerythrin"]
answer = 1
tags = ["photosynthesis"]

[[questions]]
id = "bot-002"
prompt = "Casparian strips are found in the"
options = ["Epidermis", "Cortex", "Endodermis", "Pericycle"]
answer = 2
year = "2021"
category = "textual"
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_bank_str(VALID_TOML, &PathBuf::from("botany.toml")).unwrap();
        assert_eq!(bank.id, "botany-2023");
        assert_eq!(bank.subject, Subject::Botany);
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].correct_option, 1);
        assert_eq!(bank.questions[0].year.as_deref(), Some("2023"));
        assert_eq!(bank.questions[1].year.as_deref(), Some("2021"));
        assert_eq!(bank.years(), vec!["2021", "2023"]);
        assert!(validate_bank(&bank).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[bank]
id = "minimal"
name = "Minimal"
subject = "Physics"

[[questions]]
id = "p1"
prompt = "SI unit of force?"
options = ["joule", "newton", "watt", "pascal"]
answer = 1
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("p.toml")).unwrap();
        assert_eq!(bank.subject, Subject::Physics);
        assert_eq!(bank.questions[0].category, QuestionCategory::Textual);
        assert!(bank.questions[0].year.is_none());
        assert!(bank.questions[0].tags.is_empty());
    }

    #[test]
    fn unknown_subject_is_an_error() {
        let toml = r#"
[bank]
id = "x"
name = "X"
subject = "astrology"
"#;
        let err = parse_bank_str(toml, &PathBuf::from("x.toml")).unwrap_err();
        assert!(err.to_string().contains("unknown subject"));
    }

    #[test]
    fn answer_out_of_range_is_an_error() {
        let toml = r#"
[bank]
id = "x"
name = "X"
subject = "zoology"

[[questions]]
id = "z1"
prompt = "Which is a mammal?"
options = ["shark", "whale", "trout", "eel"]
answer = 4
"#;
        assert!(parse_bank_str(toml, &PathBuf::from("x.toml")).is_err());
    }

    #[test]
    fn validate_duplicates_and_option_count() {
        let toml = r#"
[bank]
id = "dupes"
name = "Dupes"
subject = "chemistry"

[[questions]]
id = "same"
prompt = "First"
options = ["a", "b", "c"]
answer = 0

[[questions]]
id = "same"
prompt = "Second"
options = ["a", " ", "c", "d"]
answer = 0
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("d.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("expected 4 options")));
        assert!(warnings.iter().any(|w| w.message.contains("option 1 is empty")));
    }

    #[test]
    fn validate_empty_bank() {
        let toml = r#"
[bank]
id = "empty"
name = "Empty"
subject = "botany"
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("e.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].question_id.is_none());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("botany.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[bank]\nid = 1").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            nested.join("more.toml"),
            VALID_TOML.replace("botany-2023", "botany-extra"),
        )
        .unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        let ids: Vec<&str> = banks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["botany-2023", "botany-extra"]);
    }

    #[test]
    fn load_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_bank_directory(&dir.path().join("nope")).is_err());
    }
}
