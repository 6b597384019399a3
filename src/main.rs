// Identity card / form cross-check from the command line

use clap::{Parser, Subcommand};
use kimlik_match::models::{TraceEvent, ValidationReport};
use kimlik_match::processing::{extract_with_trace, TextRecognizer};
use kimlik_match::validation::check_id;
use kimlik_match::{IdentityError, IdentityValidator, Settings};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kimlik-match")]
#[command(about = "Cross-checks the name and TCKN on an identity card against a signed form")]
struct Cli {
    /// Override the minimum name similarity (0-100)
    #[arg(long, global = true)]
    min_name_similarity: Option<u8>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare an identity card against a form
    Validate {
        /// Identity card: line file (.json/.txt/.tsv) or image
        id: PathBuf,
        /// Signed form: line file (.json/.txt/.tsv) or image
        form: PathBuf,
        /// Include the extraction, checksum and match trace
        #[arg(long)]
        trace: bool,
    },
    /// Extract the name and TCKN from one document
    Extract {
        file: PathBuf,
        /// Include the extraction trace
        #[arg(long)]
        trace: bool,
    },
    /// Check TCKN candidates against the checksum
    CheckId {
        #[arg(required = true)]
        numbers: Vec<String>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Serialize)]
struct IdCheckReport<'a> {
    number: &'a str,
    result: kimlik_match::validation::IdCheck,
}

#[derive(Serialize)]
struct TracedReport<'a> {
    #[serde(flatten)]
    report: &'a ValidationReport,
    trace: &'a [TraceEvent],
}

#[cfg(feature = "tesseract")]
fn recognizer(settings: &Settings) -> Option<Box<dyn TextRecognizer>> {
    Some(Box::new(kimlik_match::processing::TesseractRecognizer::new(
        settings.ocr_languages.clone(),
    )))
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_settings: &Settings) -> Option<Box<dyn TextRecognizer>> {
    None
}

fn print_json<T: Serialize>(value: &T) -> Result<(), IdentityError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<bool, IdentityError> {
    let mut settings = Settings::from_env()?;
    if let Some(threshold) = cli.min_name_similarity {
        settings.min_name_similarity = threshold;
        settings.validate()?;
    }
    info!("{} ({})", settings.app_name, settings.environment);

    let recognizer = recognizer(&settings);
    let validator = IdentityValidator::new(settings);

    match cli.command {
        Command::Validate { id, form, trace } => {
            let report = validator.validate_files(&id, &form, recognizer.as_deref())?;
            if trace {
                print_json(&TracedReport {
                    report: &report,
                    trace: &report.trace,
                })?;
            } else {
                print_json(&report)?;
            }
            Ok(report.is_valid)
        }
        Command::Extract { file, trace } => {
            let lines = validator.load_lines(&file, recognizer.as_deref())?;
            let extraction = extract_with_trace(&lines);
            if trace {
                print_json(&extraction)?;
            } else {
                print_json(&extraction.fields)?;
            }
            Ok(true)
        }
        Command::CheckId { numbers } => {
            let reports: Vec<IdCheckReport> = numbers
                .iter()
                .map(|number| IdCheckReport {
                    number,
                    result: check_id(number),
                })
                .collect();
            print_json(&reports)?;
            Ok(reports.iter().all(|report| report.result.is_valid()))
        }
        Command::Config => {
            print_json(validator.settings())?;
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(2)
        }
    }
}
