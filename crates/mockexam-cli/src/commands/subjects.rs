//! The `mockexam subjects` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mockexam_providers::config::load_config_from;
use mockexam_providers::TomlQuestionSupply;

pub fn execute(bank_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let supply = match bank_dir {
        Some(dir) => TomlQuestionSupply::load(&dir)?,
        None => config.question_supply()?,
    };

    let pool = supply.pool();
    let subjects = pool.subjects();
    if subjects.is_empty() {
        println!("No questions found in {}", supply.dir().display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Banks", "Questions", "Years"]);

    for subject in subjects {
        let banks: Vec<_> = pool
            .banks()
            .iter()
            .filter(|b| b.subject == subject && !b.questions.is_empty())
            .collect();
        let questions: usize = banks.iter().map(|b| b.questions.len()).sum();
        let mut years: Vec<String> = banks.iter().flat_map(|b| b.years()).collect();
        years.sort();
        years.dedup();

        table.add_row(vec![
            Cell::new(subject),
            Cell::new(banks.len()),
            Cell::new(questions),
            Cell::new(if years.is_empty() {
                "-".to_string()
            } else {
                years.join(", ")
            }),
        ]);
    }

    println!("{table}");
    Ok(())
}
