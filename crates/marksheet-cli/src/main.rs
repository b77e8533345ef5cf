//! `marksheet` command-line interface.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use marksheet_core::{
    check_against_schema, few_shot_examples, normalize, response_schema, Outcome,
    ResultValidator, Rubric, DEFAULT_TOTAL_SCORE,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Validate scorer responses against rubric ceilings and normalize queries.
#[derive(Parser, Debug)]
#[command(name = "marksheet", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a scorer response read from a file or stdin
    Validate {
        #[command(flatten)]
        ceiling: Ceiling,

        /// Response file; stdin when omitted or "-"
        input: Option<PathBuf>,
    },

    /// Print the normalized form of each argument
    Normalize {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Print the structured-output JSON Schema for a ceiling
    Schema {
        #[command(flatten)]
        ceiling: Ceiling,

        /// Check a response file ("-" for stdin) against the schema instead
        #[arg(long, value_name = "INPUT")]
        check: Option<PathBuf>,
    },

    /// Check a rubric file and print its coverage and stored form
    Rubric {
        /// Rubric file (.yaml, .yml or .json)
        path: PathBuf,
    },

    /// Print the few-shot scorer examples for a ceiling as JSON
    Examples {
        #[command(flatten)]
        ceiling: Ceiling,
    },
}

#[derive(Args, Debug)]
struct Ceiling {
    /// Maximum valid score; ignored when --rubric is given
    #[arg(long, env = "MARKSHEET_TOTAL_SCORE")]
    total_score: Option<u32>,

    /// Take the ceiling from a rubric file
    #[arg(long)]
    rubric: Option<PathBuf>,
}

impl Ceiling {
    fn validator(&self) -> Result<ResultValidator> {
        if let Some(path) = &self.rubric {
            let rubric = Rubric::from_file(path)
                .with_context(|| format!("Failed to load rubric {}", path.display()))?;
            return Ok(rubric.validator()?);
        }
        let total_score = self.total_score.unwrap_or(DEFAULT_TOTAL_SCORE);
        Ok(ResultValidator::new(total_score)?)
    }
}

// Exit codes for `validate`.
const EXIT_ACCEPTED: u8 = 0;
const EXIT_SCORER_ERROR: u8 = 1;
const EXIT_MALFORMED: u8 = 2;
const EXIT_FAILURE: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("marksheet={level},marksheet_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<u8> {
    match command {
        Command::Validate { ceiling, input } => {
            let validator = ceiling.validator()?;
            let text = read_input(input.as_ref())?;
            let outcome = validator.parse_response(&text);

            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(exit_code(&outcome))
        }

        Command::Normalize { text } => {
            for line in &text {
                println!("{}", normalize(line));
            }
            Ok(EXIT_ACCEPTED)
        }

        Command::Schema { ceiling, check } => {
            let validator = ceiling.validator()?;
            match check {
                Some(input) => {
                    let text = read_input(Some(&input))?;
                    match schema_errors(validator.total_score(), &text)? {
                        Ok(()) => {
                            println!("Response matches the schema");
                            Ok(EXIT_ACCEPTED)
                        }
                        Err(errors) => {
                            for error in &errors {
                                println!("{}", error);
                            }
                            Ok(EXIT_MALFORMED)
                        }
                    }
                }
                None => {
                    let schema = response_schema(validator.total_score());
                    println!("{}", serde_json::to_string_pretty(&schema)?);
                    Ok(EXIT_ACCEPTED)
                }
            }
        }

        Command::Rubric { path } => {
            let rubric = Rubric::from_file(&path)
                .with_context(|| format!("Failed to load rubric {}", path.display()))?;

            tracing::info!(
                name = %rubric.name,
                total_score = rubric.total_score,
                brackets = rubric.brackets.len(),
                "Rubric is valid"
            );

            println!("{} (total score {})", rubric.name, rubric.total_score);
            println!("Coverage: {}%", rubric.coverage_percentage());
            let content = rubric.to_markdown();
            if !content.is_empty() {
                println!();
                println!("{}", content);
            }
            Ok(EXIT_ACCEPTED)
        }

        Command::Examples { ceiling } => {
            let validator = ceiling.validator()?;
            let examples = few_shot_examples(validator.total_score());
            println!("{}", serde_json::to_string_pretty(&examples)?);
            Ok(EXIT_ACCEPTED)
        }
    }
}

fn exit_code(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Accepted { .. } => EXIT_ACCEPTED,
        Outcome::ScorerError { .. } => EXIT_SCORER_ERROR,
        Outcome::Malformed { .. } => EXIT_MALFORMED,
    }
}

/// Schema errors for a response text. Text that is not JSON is an `Err`.
fn schema_errors(total_score: u32, text: &str) -> Result<Result<(), Vec<String>>> {
    let raw: serde_json::Value =
        serde_json::from_str(text.trim()).context("Response is not valid JSON")?;
    Ok(check_against_schema(total_score, &raw))
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
