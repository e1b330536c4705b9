//! The `mockexam init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("mockexam.toml").exists() {
        println!("mockexam.toml already exists, skipping.");
    } else {
        std::fs::write("mockexam.toml", SAMPLE_CONFIG)?;
        println!("Created mockexam.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own banks under question-banks/");
    println!("  2. Run: mockexam validate --bank question-banks");
    println!("  3. Run: mockexam run --subject physics --count 3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mockexam configuration

bank_dir = "./question-banks"
stats_path = "./mockexam-results/stats.json"
output_dir = "./mockexam-results"
user = "${USER}"

[session]
duration_secs = 1800
question_count = 30
correct_marks = 4
wrong_penalty = 1
shuffle = true
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example-physics"
name = "Example Physics"
subject = "physics"
description = "A few questions to get started"
year = "2023"

[[questions]]
id = "phy-001"
prompt = "The SI unit of force is"
options = ["Joule", "Newton", "Watt", "Pascal"]
answer = 1
tags = ["units"]

[[questions]]
id = "phy-002"
prompt = "A body moving with uniform velocity has acceleration"
options = ["Zero", "Constant and positive", "Increasing", "Negative"]
answer = 0
tags = ["kinematics"]

[[questions]]
id = "phy-003"
prompt = "A car covers 100 m in 5 s at constant speed. Its speed in m/s is"
options = ["10", "15", "20", "25"]
answer = 2
category = "numerical"
tags = ["kinematics"]
"#;
