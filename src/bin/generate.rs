//! Learning material generator binary entry point.
//!
//! Runs the full pipeline for one topic, showing stage progress on stderr,
//! and writes the material as Markdown or JSON.
//!
//! # Examples
//!
//! Print Markdown notes for a topic:
//! ```bash
//! generate "Binary Search Trees"
//! ```
//!
//! Save JSON for the quiz binary, without simulated latency:
//! ```bash
//! generate "Recursion" --format json --output recursion.json --no-delay
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use study_forge::{
    config::{SimulatedLatency, StudyConfig},
    models::{suggest_topics, CorrectAnswer, LearningMaterial},
    pipeline::{validate_topic, PipelineProgress},
    retrieval::{dataset_sources_for, DatasetCategory},
    session::TemplateSession,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output format for generated material
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable Markdown document
    Markdown,
    /// Machine-readable JSON, loadable by the quiz binary
    Json,
}

/// Generate study notes, explanations, code, examples and a quiz for a topic
#[derive(Parser, Debug)]
#[command(
    name = "generate",
    version,
    about = "Generate learning material for a study topic",
    long_about = "Generate study notes, an explanation, code samples, worked examples and a quiz for a topic.

EXAMPLES:
  Markdown to stdout:
    generate \"Binary Search Trees\"

  JSON file for the quiz binary:
    generate \"Recursion\" --format json --output recursion.json

  Topic ideas:
    generate --suggest sort

  Skip simulated latency:
    generate \"Hash Tables\" --no-delay --log-level debug"
)]
struct GenerateArgs {
    /// Topic to study (2 to 100 characters)
    #[arg(value_name = "TOPIC", required_unless_present_any = ["suggest", "sources"])]
    topic: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable simulated stage latency
    #[arg(long)]
    no_delay: bool,

    /// List topic suggestions matching TOPIC (or the defaults) and exit
    #[arg(long)]
    suggest: bool,

    /// List the reference dataset sources and exit
    #[arg(long)]
    sources: bool,

    /// Logging verbosity level
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

/// JSON export: the material plus the topic it was generated for.
#[derive(Serialize)]
struct Export<'a> {
    topic: &'a str,
    #[serde(flatten)]
    material: &'a LearningMaterial,
}

/// Initialize logging subsystem with the specified level
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &GenerateArgs) -> Result<StudyConfig> {
    let mut config = StudyConfig::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;

    if args.no_delay {
        debug!("Simulated latency disabled");
        config.latency = SimulatedLatency::none();
    }

    Ok(config)
}

/// Create a progress bar tracking pipeline stages as a percentage
fn create_progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

fn print_suggestions(input: &str) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Topic").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
        ]);

    for suggestion in suggest_topics(input) {
        table.add_row(vec![Cell::new(suggestion.topic), Cell::new(suggestion.category)]);
    }

    println!("{table}");
}

/// Print one table of dataset sources per category
fn print_sources() {
    for category in DatasetCategory::ALL {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Description").add_attribute(Attribute::Bold),
                Cell::new("URL").add_attribute(Attribute::Bold),
            ]);

        for source in dataset_sources_for(category) {
            table.add_row(vec![Cell::new(source.name), Cell::new(source.description), Cell::new(source.url)]);
        }

        println!("{} datasets\n{table}\n", category.label());
    }
}

/// Render material as a single Markdown document
fn render_markdown(topic: &str, material: &LearningMaterial) -> String {
    let mut out = format!("# {topic}\n\n");

    out.push_str("## Study Notes\n\n");
    out.push_str(material.notes.trim());
    out.push_str("\n\n## Explanation\n\n");
    out.push_str(material.explanation.trim());

    out.push_str("\n\n## Code\n");
    for (heading, lang, source) in [
        ("Python", "python", &material.code.python),
        ("Java", "java", &material.code.java),
        ("JavaScript", "javascript", &material.code.javascript),
    ] {
        out.push_str(&format!("\n### {heading}\n\n```{lang}\n{source}\n```\n"));
    }

    out.push_str("\n## Examples\n");
    for (i, example) in material.examples.iter().enumerate() {
        out.push_str(&format!(
            "\n### Example {}\n\n**Input:** `{}`\n\n**Output:** `{}`\n",
            i + 1,
            example.input,
            example.output
        ));
        if let Some(explanation) = &example.explanation {
            out.push_str(&format!("\n{explanation}\n"));
        }
    }

    out.push_str("\n## Quiz\n");
    for (i, question) in material.quiz.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", i + 1, question.question));
        for (j, option) in question.options.iter().flatten().enumerate() {
            out.push_str(&format!("   - {}. {}\n", option_letter(j), option));
        }
    }

    out.push_str("\n### Answer Key\n\n");
    for (i, question) in material.quiz.iter().enumerate() {
        let answer = match &question.correct_answer {
            CorrectAnswer::Index(j) => question
                .options
                .as_ref()
                .and_then(|opts| opts.get(*j))
                .map(|opt| format!("{}. {}", option_letter(*j), opt))
                .unwrap_or_else(|| j.to_string()),
            CorrectAnswer::Text(text) => text.clone(),
        };
        out.push_str(&format!("{}. {}", i + 1, answer));
        if let Some(explanation) = &question.explanation {
            out.push_str(&format!(" ({explanation})"));
        }
        out.push('\n');
    }

    out
}

fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = GenerateArgs::parse();

    // Initialize logging
    init_logging(&args.log_level).context("Failed to initialize logging")?;
    debug!("CLI arguments: {:?}", args);

    if args.suggest {
        print_suggestions(args.topic.as_deref().unwrap_or_default());
        return Ok(());
    }
    if args.sources {
        print_sources();
        return Ok(());
    }

    let topic = args.topic.clone().unwrap_or_default();
    let validation = validate_topic(&topic);
    if !validation.valid {
        anyhow::bail!(
            "{}\nUse --suggest to see topic ideas.",
            validation.message.unwrap_or_default()
        );
    }

    let config = load_config(&args)?;
    info!("Generating learning material for '{}'", topic);

    let start_time = Instant::now();
    let session = TemplateSession::from_config(&config);
    let components = session.describe();
    debug!(
        "Using embedder {} ({} dimensions) with {} retriever",
        components.embedding_model, components.embedding_dimension, components.retriever
    );
    let progress = create_progress_bar()?;

    // Drive the bar from the progress channel while the pipeline runs
    let (tx, mut rx) = mpsc::unbounded_channel::<PipelineProgress>();
    let run = {
        let session = &session;
        let topic = topic.as_str();
        async move {
            let result = session.generate(topic, &tx).await;
            drop(tx);
            result
        }
    };
    let watch = async {
        while let Some(event) = rx.recv().await {
            progress.set_position(u64::from(event.progress));
            progress.set_message(event.message);
        }
    };
    let (result, ()) = tokio::join!(run, watch);

    let material = match result {
        Ok(material) => {
            progress.finish_with_message("Done!");
            material
        }
        Err(e) => {
            progress.abandon_with_message("Failed");
            error!("Generation failed: {}", e);
            return Err(e).context("Failed to generate learning material");
        }
    };

    let rendered = match args.format {
        OutputFormat::Markdown => render_markdown(&topic, &material),
        OutputFormat::Json => serde_json::to_string_pretty(&Export {
            topic: &topic,
            material: &material,
        })
        .context("Failed to serialize material to JSON")?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).with_context(|| format!("Failed to write output file: {:?}", path))?;
            info!("Wrote output to {:?}", path);
        }
        None => println!("{rendered}"),
    }

    // Display final statistics
    let elapsed = start_time.elapsed();
    eprintln!("\n╔════════════════════════════════════════╗");
    eprintln!("║      Generation Completed              ║");
    eprintln!("╠════════════════════════════════════════╣");
    eprintln!("║ Embedding model:      {:>16} ║", components.embedding_model);
    eprintln!("║ Examples:             {:>16} ║", material.examples.len());
    eprintln!("║ Quiz questions:       {:>16} ║", material.quiz.len());
    eprintln!("║ Simulated latency:    {:>13.2?} ║", config.latency.total());
    eprintln!("║ Elapsed time:         {:>13.2?} ║", elapsed);
    eprintln!("╚════════════════════════════════════════╝");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_forge::pipeline::TemplatePipeline;

    #[tokio::test]
    async fn test_markdown_contains_every_section() {
        let pipeline = TemplatePipeline::from_config(&StudyConfig::instant());
        let material = pipeline.run("Recursion").await.unwrap();
        let doc = render_markdown("Recursion", &material);

        for heading in ["# Recursion", "## Study Notes", "## Explanation", "### Python", "### Java", "### JavaScript", "## Examples", "## Quiz", "### Answer Key"] {
            assert!(doc.contains(heading), "missing {heading}");
        }
        assert!(doc.contains("```python\n\"\"\"\nRecursion Implementation in Python"));
        assert!(doc.contains("   - D. O(n²)"));
        assert!(doc.contains("6. returns false"));
    }

    #[test]
    fn test_option_letters() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }
}
