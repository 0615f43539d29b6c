//! Quiz binary entry point.
//!
//! Lets a learner take the generated quiz in an interactive REPL, either for
//! a fresh topic or from a JSON file written by `generate --format json`.
//!
//! # Examples
//!
//! Generate and take a quiz:
//! ```bash
//! quiz "Binary Search Trees"
//! ```
//!
//! Take a quiz from a saved file:
//! ```bash
//! quiz --from recursion.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use study_forge::{
    config::{SimulatedLatency, StudyConfig},
    models::{CorrectAnswer, LearningMaterial, QuestionKind, QuizQuestion},
    pipeline::{validate_topic, PipelineProgress},
    quiz::{is_answer_correct, Answer, QuestionStatus, QuizPhase, QuizReport, QuizSession},
    session::TemplateSession,
};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Take an interactive quiz on a study topic
#[derive(Parser, Debug)]
#[command(
    name = "quiz",
    version,
    about = "Take an interactive quiz on a study topic",
    long_about = "Answer the generated quiz one question at a time, then review your score.

EXAMPLES:
  Generate and take a quiz:
    quiz \"Binary Search Trees\"

  Take a quiz saved by the generate binary:
    quiz --from recursion.json"
)]
struct Args {
    /// Topic to generate a quiz for
    #[arg(value_name = "TOPIC", required_unless_present = "from", conflicts_with = "from")]
    topic: Option<String>,

    /// Load material from a JSON file written by `generate --format json`
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable simulated stage latency
    #[arg(long)]
    no_delay: bool,

    /// Logging verbosity level
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

/// JSON import: material with an optional topic.
#[derive(Deserialize)]
struct Import {
    #[serde(default)]
    topic: Option<String>,
    #[serde(flatten)]
    material: LearningMaterial,
}

/// Setup logging with the specified level
fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

/// Read material from a JSON export
fn load_material(path: &Path) -> Result<(String, LearningMaterial)> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let import: Import =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse learning material from {:?}", path))?;

    let topic = import.topic.unwrap_or_else(|| "Quiz".to_string());
    Ok((topic, import.material))
}

/// Run the pipeline for a topic
async fn generate_material(args: &Args, topic: &str) -> Result<LearningMaterial> {
    let validation = validate_topic(topic);
    if !validation.valid {
        anyhow::bail!("{}", validation.message.unwrap_or_default());
    }

    let mut config = StudyConfig::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;
    if args.no_delay {
        config.latency = SimulatedLatency::none();
    }

    let session = TemplateSession::from_config(&config);
    let reporter = |p: &PipelineProgress| eprintln!("[{:>3}%] {}", p.progress, p.message);

    let material = session
        .generate(topic, &reporter)
        .await
        .with_context(|| format!("Failed to generate a quiz for '{}'", topic))?;

    Ok((*material).clone())
}

fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Parse an option reference: a letter (`b`) or a 1-based number (`2`).
fn parse_option(input: &str, count: usize) -> Option<usize> {
    let input = input.trim();
    let index = if let Ok(n) = input.parse::<usize>() {
        n.checked_sub(1)?
    } else {
        let mut chars = input.chars();
        let c = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() || !c.is_ascii_uppercase() {
            return None;
        }
        (c as u8 - b'A') as usize
    };
    (index < count).then_some(index)
}

/// One dot per question: current, submitted or not yet submitted.
fn status_dots(quiz: &QuizSession) -> String {
    (0..quiz.len())
        .map(|k| {
            if k == quiz.current_index() {
                '◉'
            } else {
                match quiz.question_status(k) {
                    Ok(QuestionStatus::Submitted) => '●',
                    _ => '○',
                }
            }
        })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the current question, with feedback once it has been submitted
fn display_question(quiz: &QuizSession) {
    let Some(question) = quiz.current() else {
        println!("This quiz has no questions.");
        return;
    };

    let index = quiz.current_index();
    let submitted = matches!(quiz.question_status(index), Ok(QuestionStatus::Submitted));
    let answer = quiz.answer(&question.id);

    println!("\n{}", "═".repeat(80));
    println!(
        "Question {} of {}  [{}]  {}",
        index + 1,
        quiz.len(),
        question.kind.label(),
        status_dots(quiz)
    );
    println!("\n{}\n", question.question);

    match question.kind {
        QuestionKind::Mcq | QuestionKind::TrueFalse => {
            for (i, option) in question.options.iter().flatten().enumerate() {
                let chosen = answer == Some(&Answer::Choice(i));
                let correct = question.correct_answer == CorrectAnswer::Index(i);
                let marker = match (submitted, correct, chosen) {
                    (true, true, _) => "✓",
                    (true, false, true) => "✗",
                    (false, _, true) => ">",
                    _ => " ",
                };
                println!("  {} {}. {}", marker, option_letter(i), option);
            }
        }
        QuestionKind::ShortAnswer => match answer {
            Some(Answer::Text(text)) if submitted => println!("  Your answer: {}", text),
            _ => println!("  Type your answer and press Enter."),
        },
    }

    if submitted {
        if let Some(explanation) = &question.explanation {
            println!("\n  Explanation: {}", explanation);
        }
        let next_label = if quiz.is_last() { "/next to see results" } else { "/next to continue" };
        println!("\n  Submitted. Type {}.", next_label);
    }
}

/// Format the final results as a review table
fn format_report_table(questions: &[QuizQuestion], report: &QuizReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Question").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Result").add_attribute(Attribute::Bold),
    ]);

    for (idx, (question, review)) in questions.iter().zip(&report.review).enumerate() {
        let (result, color) = if review.correct {
            ("CORRECT", Color::Green)
        } else {
            ("INCORRECT", Color::Red)
        };

        // Truncate long questions
        let text = if question.question.chars().count() > 60 {
            format!("{}...", question.question.chars().take(57).collect::<String>())
        } else {
            question.question.clone()
        };

        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(text),
            Cell::new(review.kind.label()),
            Cell::new(result).fg(color),
        ]);
    }

    table.to_string()
}

fn display_results(quiz: &QuizSession) {
    let Some(report) = quiz.report() else {
        return;
    };

    println!("\n{}", "═".repeat(80));
    println!("Quiz Complete!");
    println!("\n  {}/{} correct ({}%)", report.score, report.total, report.percentage);
    println!("  {}\n", report.feedback.message());
    println!("{}", format_report_table(quiz.questions(), &report));
    println!("\nType /reset to try again, or Ctrl+D to exit.");
}

fn print_help() {
    println!("Commands:");
    println!("  A, B, ... or 1, 2, ... - Choose an option");
    println!("  <text>                 - Answer a short-answer question");
    println!("  /next                  - Go to the next question (after submitting)");
    println!("  /prev                  - Go to the previous question");
    println!("  /goto N                - Jump to question N");
    println!("  /reset                 - Start the quiz over");
    println!("  /help                  - Show this help");
    println!("  Ctrl+D or Ctrl+C       - Exit");
}

/// Apply one line of learner input to the quiz
fn handle_input(quiz: &mut QuizSession, line: &str) {
    if line.starts_with('/') {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "/help" => print_help(),
            "/next" => {
                if quiz.next() {
                    match quiz.phase() {
                        QuizPhase::Finished => display_results(quiz),
                        QuizPhase::Answering => display_question(quiz),
                    }
                } else if quiz.phase() == QuizPhase::Finished {
                    eprintln!("The quiz is finished. Type /reset to try again.");
                } else {
                    eprintln!("Submit an answer before moving on.");
                }
            }
            "/prev" => {
                if quiz.previous() {
                    display_question(quiz);
                } else {
                    eprintln!("Already at the first question.");
                }
            }
            "/goto" => {
                if parts.len() != 2 {
                    eprintln!("Usage: /goto N");
                    return;
                }
                match parts[1].parse::<usize>() {
                    Ok(n) if n > 0 => match quiz.jump_to(n - 1) {
                        Ok(()) if quiz.phase() == QuizPhase::Answering => display_question(quiz),
                        Ok(()) => eprintln!("The quiz is finished. Type /reset to try again."),
                        Err(e) => eprintln!("{}", e),
                    },
                    _ => eprintln!("Invalid question number: must be a positive integer"),
                }
            }
            "/reset" => {
                quiz.reset();
                println!("Quiz reset.");
                display_question(quiz);
            }
            _ => eprintln!("Unknown command: {}. Type /help for available commands.", parts[0]),
        }
        return;
    }

    if quiz.phase() == QuizPhase::Finished {
        eprintln!("The quiz is finished. Type /reset to try again.");
        return;
    }

    let Some((kind, count)) = quiz.current().map(|q| (q.kind, q.option_count())) else {
        return;
    };

    let outcome = match kind {
        QuestionKind::Mcq | QuestionKind::TrueFalse => match parse_option(line, count) {
            Some(index) => quiz.select_option(index),
            None => {
                eprintln!("Choose one of A-{}.", option_letter(count.saturating_sub(1)));
                return;
            }
        },
        QuestionKind::ShortAnswer => quiz
            .input_short_answer(line)
            .and_then(|_| quiz.submit_short_answer()),
    };

    match outcome {
        Ok(true) => {
            debug!(
                "Question {} correct: {}",
                quiz.current_index() + 1,
                quiz.current()
                    .map(|q| is_answer_correct(q, quiz.answer(&q.id)))
                    .unwrap_or(false)
            );
            display_question(quiz);
        }
        Ok(false) => eprintln!("This question has already been answered. Type /next to continue."),
        Err(e) => eprintln!("{}", e),
    }
}

/// Run the interactive quiz REPL
fn run_interactive(mut quiz: QuizSession, topic: &str) -> Result<()> {
    println!("Quiz: {}", topic);
    print_help();
    display_question(&quiz);

    let mut rl = DefaultEditor::new().with_context(|| "Failed to create readline editor")?;

    loop {
        let readline = rl.readline("Answer> ");
        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line).ok(); // Ignore errors from adding to history

                handle_input(&mut quiz, line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                error!("Error reading input: {}", err);
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(&args.log_level);

    let (topic, material) = match (&args.from, &args.topic) {
        (Some(path), _) => {
            info!("Loading material from: {}", path.display());
            load_material(path)?
        }
        (None, Some(topic)) => {
            info!("Generating quiz for '{}'", topic);
            let material = generate_material(&args, topic).await?;
            (topic.clone(), material)
        }
        (None, None) => anyhow::bail!("Either TOPIC or --from must be specified.\nUse --help for usage information."),
    };

    if material.quiz.is_empty() {
        anyhow::bail!("The material for '{}' contains no quiz questions.", topic);
    }

    run_interactive(QuizSession::new(material.quiz), &topic)
}
