//! Command-line interface for the labeler.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use eurlex_rules::{RuleConfig, RuleEngine, RuleStep};
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{list_input_files, run_batch, BatchSummary, FileResult};
use crate::config::{default_jobs, training_output_path};
use crate::encoding::TrainingRecord;
use crate::error::Result;
use crate::extract::{extract_lines, ContentFormat};
use crate::pipeline::LabelPipeline;
use crate::splitting::{segment, trim_annexes};

/// EUR-Lex Labeler - Build classifier training data from EUR-Lex exports.
#[derive(Parser)]
#[command(name = "eurlex-labeler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Label a directory of JSONL exports and write train_data.tsv.
    Label {
        /// Directory containing *.jsonl export files
        input_dir: PathBuf,

        /// Directory for train_data.tsv (must not contain one yet)
        output_dir: PathBuf,

        /// YAML rule configuration (default: built-in FISMA rules)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Number of worker threads (default: available CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// How to read document content
        #[arg(short, long, value_enum, default_value_t = ContentFormat::Auto)]
        format: ContentFormat,
    },

    /// Print the articles of a single HTML or text document.
    Segment {
        /// Document file
        file: PathBuf,

        /// How to read the document
        #[arg(short, long, value_enum, default_value_t = ContentFormat::Auto)]
        format: ContentFormat,

        /// Keep articles from the first ANNEX onward
        #[arg(long)]
        keep_annexes: bool,
    },

    /// Decode and summarize the rows of a training file.
    Decode {
        /// Training file (TSV)
        training_file: PathBuf,
    },

    /// Print the effective rule configuration as YAML.
    Rules {
        /// YAML rule configuration to validate (default: built-in FISMA rules)
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Label {
            input_dir,
            output_dir,
            rules,
            jobs,
            format,
        } => label_command(&input_dir, &output_dir, rules.as_deref(), jobs, format),
        Commands::Segment {
            file,
            format,
            keep_annexes,
        } => segment_command(&file, format, keep_annexes),
        Commands::Decode { training_file } => decode_command(&training_file),
        Commands::Rules { rules } => rules_command(rules.as_deref()),
    }
}

/// Execute the label command.
fn label_command(
    input_dir: &Path,
    output_dir: &Path,
    rules: Option<&Path>,
    jobs: Option<usize>,
    format: ContentFormat,
) -> Result<()> {
    // Fail on an existing training file before loading rules or listing input
    training_output_path(output_dir)?;

    let config = load_rules(rules)?;
    let pipeline = LabelPipeline::new(RuleEngine::new(&config), format);
    let jobs = jobs.unwrap_or_else(default_jobs);
    let total = list_input_files(input_dir)?.len();

    println!(
        "{} {} export files from {}",
        style("Labeling").bold(),
        style(total).cyan(),
        style(input_dir.display()).green()
    );
    println!();

    let pb = ProgressBar::new(total as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let summary = run_batch(&pipeline, input_dir, output_dir, jobs, |result: &FileResult| {
        if let Some(name) = result.path().file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    });
    pb.finish_and_clear();
    let summary = summary?;

    print_summary(&summary);
    Ok(())
}

fn load_rules(rules: Option<&Path>) -> Result<RuleConfig> {
    match rules {
        Some(path) => Ok(RuleConfig::load(path)?),
        None => Ok(RuleConfig::default()),
    }
}

fn print_summary(summary: &BatchSummary) {
    println!("  Files: {}", summary.files);
    println!(
        "  Labeled: {} ({} accepted, {} rejected)",
        style(summary.labeled).green().bold(),
        summary.accepted,
        summary.rejected
    );
    println!("  Records read: {}", summary.records_read);
    println!("  Unvalidated: {}", summary.unvalidated);
    println!("  Ineligible: {}", summary.ineligible);
    if summary.malformed > 0 {
        println!("  Malformed lines: {}", style(summary.malformed).yellow().bold());
    }
    if summary.failed_files > 0 {
        println!("  Failed files: {}", style(summary.failed_files).red().bold());
    }

    if !summary.by_step.is_empty() {
        println!();
        println!("  {}", style("Labeled by rule:").bold());
        for step in RuleStep::ALL {
            if let Some(count) = summary.by_step.get(&step) {
                println!("    {:<28} {count}", step.as_str());
            }
        }
    }

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        summary.output_path.display()
    );
}

/// Execute the segment command.
fn segment_command(file: &Path, format: ContentFormat, keep_annexes: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let articles = segment(extract_lines(&content, format));
    let total = articles.len();
    let articles = if keep_annexes {
        articles
    } else {
        trim_annexes(articles)
    };

    println!(
        "{} {} ({} articles, {} after annex trimming)",
        style("Segmented").bold(),
        style(file.display()).cyan(),
        total,
        articles.len()
    );

    for (index, article) in articles.iter().enumerate() {
        let title = article
            .heading()
            .map(|h| match h.ordinal {
                Some(ordinal) => format!("{} {ordinal}", h.kind.as_str()),
                None => h.kind.as_str().to_string(),
            })
            .unwrap_or_else(|| "(untitled)".to_string());

        println!();
        println!(
            "{} {}",
            style(format!("[{}]", index + 1)).dim(),
            style(title).green().bold()
        );
        println!("{}", article.text());
    }

    Ok(())
}

/// Execute the decode command.
fn decode_command(training_file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(training_file)?;
    let mut decoded = 0usize;
    let mut skipped = 0usize;

    for (index, row) in content.lines().enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        let parsed = TrainingRecord::parse_line(index + 1, row)
            .and_then(|record| record.decoded_content().map(|text| (record, text)));

        match parsed {
            Ok((record, text)) => {
                decoded += 1;
                println!(
                    "{}\t{}\t{} chars",
                    style(&record.celex_id).cyan(),
                    record.label.name(),
                    text.chars().count()
                );
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(line = index + 1, error = %e, "Skipping training row");
            }
        }
    }

    println!();
    println!("  Decoded: {}", style(decoded).green().bold());
    if skipped > 0 {
        println!("  Skipped: {}", style(skipped).yellow().bold());
    }

    Ok(())
}

/// Execute the rules command.
fn rules_command(rules: Option<&Path>) -> Result<()> {
    let config = load_rules(rules)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
