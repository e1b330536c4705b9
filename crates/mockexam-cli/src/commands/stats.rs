//! The `mockexam stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mockexam_providers::config::load_config_from;

pub async fn execute(user: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let user = user.unwrap_or_else(|| config.user.clone());
    let stats = config.stats_store().load(&user).await?;

    if stats.sessions == 0 {
        println!("No sessions recorded for {user} yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["User", "Sessions", "Solved", "Attempts", "Accuracy", "Streak", "Last active"]);
    table.add_row(vec![
        Cell::new(&user),
        Cell::new(stats.sessions),
        Cell::new(stats.solved),
        Cell::new(stats.attempts),
        Cell::new(format!("{}%", stats.accuracy_percent())),
        Cell::new(format!("{} day(s)", stats.streak)),
        Cell::new(
            stats
                .last_active
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);

    println!("{table}");
    Ok(())
}
