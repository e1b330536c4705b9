//! The `mockexam run` command.
//!
//! Reads one command per line from stdin and drives the session through
//! [`SessionDriver`]. Rendering goes to stdout, diagnostics to stderr.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use mockexam_core::model::Subject;
use mockexam_core::palette::PaletteSummary;
use mockexam_core::report::{SessionReport, SourceSummary};
use mockexam_core::session::{Command, PendingAction, Session, LOW_TIME_THRESHOLD_SECS};
use mockexam_core::traits::{
    QuestionSupply, ResultsDisplay, SessionObserver, SessionView, SupplyRequest,
};
use mockexam_providers::config::load_config_from;
use mockexam_report::text::render_palette_legend;
use mockexam_report::{
    format_clock, format_elapsed, option_label, render_palette, render_text, ReportFormat,
    ReportWriter,
};
use mockexam_runner::{DriverOutcome, SessionDriver};

/// Buffered commands between the stdin reader and the driver.
const COMMAND_BUFFER: usize = 32;

/// Highest option letter accepted from the keyboard.
const MAX_OPTION_LETTER: char = 'f';

const HELP: &str = "\
Commands:
  a-f        select an option for the current question
  x          clear the current answer
  <enter>    save and go to the next question (submit on the last)
  p          previous question
  m          mark for review and go to the next question
  t N        toggle the review mark on question N
  g N        go to question N
  s          submit
  q          exit without submitting
  y / n      confirm or cancel a pending submit/exit
  ?          show this help";

pub struct RunArgs {
    pub subject: String,
    pub count: Option<usize>,
    pub year: Option<String>,
    pub duration: Option<u64>,
    pub seed: Option<u64>,
    pub no_shuffle: bool,
    pub bank_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub user: Option<String>,
    pub config: Option<PathBuf>,
}

/// A parsed line of keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Command(Command),
    Help,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or("");
    let arg = words.next();

    let command = match (head, arg) {
        ("" | ">" | "next", None) => Command::SaveAndNext,
        ("p" | "<" | "prev", None) => Command::Previous,
        ("x" | "clear", None) => Command::ClearCurrent,
        ("m" | "mark", None) => Command::MarkAndNext,
        ("s" | "submit", None) => Command::RequestSubmit,
        ("q" | "quit" | "exit", None) => Command::RequestExit,
        ("y" | "yes", None) => Command::Confirm,
        ("n" | "no" | "cancel", None) => Command::Cancel,
        ("?" | "help", None) => return Ok(Input::Help),
        ("g" | "goto", Some(n)) => Command::Goto {
            position: parse_question_number(n)?,
        },
        ("t" | "toggle", Some(n)) => Command::ToggleMark {
            position: parse_question_number(n)?,
        },
        (letter, None) if is_option_letter(letter) => Command::SelectCurrent {
            option: letter.as_bytes()[0].saturating_sub(b'a') as usize,
        },
        _ => return Err(format!("unrecognised input '{line}', type ? for help")),
    };
    Ok(Input::Command(command))
}

fn is_option_letter(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if ('a'..=MAX_OPTION_LETTER).contains(&c))
}

/// 1-based question number to a 0-based position.
fn parse_question_number(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(0) => Err("question numbers start at 1".to_string()),
        Ok(n) => Ok(n - 1),
        Err(_) => Err(format!("'{word}' is not a question number")),
    }
}

fn parse_formats(spec: &str) -> Result<Vec<ReportFormat>> {
    let mut formats = Vec::new();
    for name in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let named: &[ReportFormat] = match name {
            "json" => &[ReportFormat::Json],
            "html" => &[ReportFormat::Html],
            "all" => &[ReportFormat::Json, ReportFormat::Html],
            "none" => &[],
            other => anyhow::bail!("unknown report format: {other} (expected json, html, all, none)"),
        };
        for format in named {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
    }
    Ok(formats)
}

/// Prints the current question after every accepted command.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_update(&self, view: &SessionView<'_>) {
        println!();
        println!(
            "Q {}/{}  [{}]  {}",
            view.position + 1,
            view.total,
            format_clock(view.time_remaining),
            render_palette(&view.palette, view.position)
        );
        let mark = if view.marked { "  (marked for review)" } else { "" };
        println!("{}{mark}", view.question.prompt);
        for (i, option) in view.question.options.iter().enumerate() {
            let tick = if view.selected == Some(i) { "x" } else { " " };
            println!("  [{tick}] {}. {option}", option_label(i));
        }

        match view.pending {
            Some(PendingAction::Submit) => {
                let summary = PaletteSummary::from_statuses(&view.palette);
                let unanswered = summary.visited_empty + summary.not_visited;
                println!("{}", render_palette_legend(&summary));
                println!(
                    "Submit the test? {unanswered} not answered, {} marked for review. [y/n]",
                    summary.marked
                );
            }
            Some(PendingAction::Exit) => {
                println!("Exit without submitting? Your answers will be lost. [y/n]");
            }
            None => {}
        }
    }

    fn on_tick(&self, time_remaining: u64) {
        if time_remaining == LOW_TIME_THRESHOLD_SECS {
            println!("  ** {} left **", format_clock(time_remaining));
        } else if time_remaining > 0 && time_remaining % 300 == 0 {
            println!("  [{} left]", format_clock(time_remaining));
        }
    }

    fn on_rejected(&self, reason: &str) {
        eprintln!("  ! {reason}");
    }
}

/// Prints the results and saves the report files.
struct ConsoleDisplay {
    writer: ReportWriter,
}

#[async_trait]
impl ResultsDisplay for ConsoleDisplay {
    async fn show(&self, report: &SessionReport) -> Result<()> {
        println!();
        print!("{}", render_text(report));
        print_summary(report);

        for path in self.writer.write(report)? {
            eprintln!("Report saved to: {}", path.display());
        }
        Ok(())
    }
}

fn print_summary(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let r = &report.results;
    let mut table = Table::new();
    table.set_header(vec![
        "Score",
        "Correct",
        "Wrong",
        "Unattempted",
        "Accuracy",
        "Time taken",
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "{} / {}",
            r.score,
            report.config.scheme.max_score(r.total_questions)
        )),
        Cell::new(r.correct),
        Cell::new(r.wrong),
        Cell::new(r.unattempted),
        Cell::new(format!("{}%", r.accuracy_percent())),
        Cell::new(format_elapsed(r.time_taken_secs)),
    ]);

    println!("\n{table}");
}

/// Forward stdin lines to the driver from a plain thread.
///
/// A blocked stdin read must not hold the runtime open once the session ends.
fn spawn_input_reader(commands: mpsc::Sender<Command>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_input(&line) {
                Ok(Input::Command(command)) => {
                    if commands.blocking_send(command).is_err() {
                        break;
                    }
                }
                Ok(Input::Help) => println!("{HELP}"),
                Err(message) => eprintln!("  ! {message}"),
            }
        }
    });
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(dir) = args.bank_dir {
        config.bank_dir = dir;
    }
    if let Some(dir) = args.output {
        config.output_dir = dir;
    }
    if let Some(user) = args.user {
        config.user = user;
    }

    let subject: Subject = args.subject.parse().map_err(anyhow::Error::msg)?;
    let formats = parse_formats(&args.format)?;

    let mut session_config = config.session.session_config();
    if let Some(duration) = args.duration {
        session_config.duration_secs = duration;
    }

    let supply = config.question_supply()?;

    let mut request = SupplyRequest::new(subject);
    request.count = args.count.unwrap_or(config.session.question_count);
    request.year = args.year.clone();
    request.shuffle = config.session.shuffle && !args.no_shuffle;
    request.seed = args.seed;
    if request.count == 0 {
        anyhow::bail!("--count must be at least 1");
    }

    let questions = supply.fetch(&request).await?;
    tracing::debug!(
        supply = supply.name(),
        bank_dir = %config.bank_dir.display(),
        drawn = questions.len(),
        "questions drawn"
    );
    let session = Session::start(questions, session_config)?;

    println!(
        "mockexam: {subject} | {} questions | {} | +{}/-{} per question",
        session.total(),
        format_clock(session.time_remaining()),
        session_config.scheme.correct_marks,
        session_config.scheme.wrong_penalty,
    );
    println!("Type ? for help.");

    let source = SourceSummary {
        supply: supply.name().to_string(),
        subject,
        year: args.year,
    };
    let display = Arc::new(ConsoleDisplay {
        writer: ReportWriter::new(&config.output_dir, formats),
    });
    let driver = SessionDriver::new(session, source, config.stats_store(), display)
        .with_user(config.user.clone())
        .with_observer(Arc::new(ConsoleObserver));

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    spawn_input_reader(tx);

    match driver.run(rx).await? {
        DriverOutcome::Submitted { stats, .. } => match stats {
            Some(stats) => println!(
                "\nStats for {}: {} solved / {} attempted, streak {} day(s)",
                config.user, stats.solved, stats.attempts, stats.streak
            ),
            None => eprintln!("Warning: stats could not be updated for {}", config.user),
        },
        DriverOutcome::Exited => println!("\nSession exited. Nothing was recorded."),
        DriverOutcome::Abandoned => {
            println!("\nInput closed before the session finished. Nothing was recorded.")
        }
    }

    Ok(())
}
