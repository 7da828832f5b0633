//! `validate` command
//!
//! Loads each source in turn, runs the rule engine over it and prints a
//! verdict. The first source that fails to load or validate ends the run.

use std::time::Duration;

use serde::Serialize;

use imagr_validator_core::{ReportMode, RuleViolation, Validator, ValidatorOptions};

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::error::{LoadError, ValidatorError};
use crate::loader::{DocumentFormat, DocumentLoader, LoaderOptions, Source};

/// One line of `--format json` output.
#[derive(Debug, Serialize)]
struct SourceReport<'a> {
    source: String,
    valid: bool,
    format: Option<DocumentFormat>,
    violations: &'a [RuleViolation],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Builds validator options from the command line.
#[must_use]
pub const fn validator_options(args: &ValidateArgs) -> ValidatorOptions {
    ValidatorOptions {
        password_rule: args.password_rule,
        script_rule: args.script_rule,
        mode: if args.report_all {
            ReportMode::CollectAll
        } else {
            ReportMode::FailFast
        },
    }
}

/// Builds loader options: environment defaults, overridden by flags.
#[must_use]
pub fn loader_options(args: &ValidateArgs) -> LoaderOptions {
    let mut options = LoaderOptions::default();
    if let Some(secs) = args.timeout_secs {
        options.fetch_timeout = Duration::from_secs(secs);
    }
    if let Some(size) = args.max_size {
        options.max_document_size = size;
    }
    options
}

/// Validates every source named on the command line.
///
/// # Errors
///
/// Returns the first load failure, or [`ValidatorError::Invalid`] for the
/// first source that violates a rule.
pub async fn run(args: &ValidateArgs) -> Result<(), ValidatorError> {
    let loader = DocumentLoader::new(loader_options(args));
    let validator = Validator::new(validator_options(args));

    for arg in &args.sources {
        let source = Source::parse(arg);
        let document = match loader.load(&source).await {
            Ok(document) => document,
            Err(e) => {
                if args.format == OutputFormat::Json {
                    print_load_failure(&source, &e)?;
                }
                return Err(e.into());
            }
        };

        let report = validator.report(&document.root);
        tracing::info!(
            source = %source,
            violations = report.violations.len(),
            "validated configuration"
        );

        match args.format {
            OutputFormat::Human => {
                if report.is_valid() {
                    println!("SUCCESS: {source} is a valid configuration");
                } else {
                    for violation in &report.violations {
                        eprintln!("ERROR: {violation}");
                    }
                }
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(&SourceReport {
                    source: source.to_string(),
                    valid: report.is_valid(),
                    format: Some(document.format),
                    violations: &report.violations,
                    error: None,
                })?;
                println!("{line}");
            }
        }

        let count = report.violations.len();
        if let Err(violation) = report.into_result() {
            return Err(ValidatorError::Invalid {
                source_name: source.to_string(),
                violation,
                count,
            });
        }
    }

    Ok(())
}

fn print_load_failure(source: &Source, error: &LoadError) -> Result<(), ValidatorError> {
    let line = serde_json::to_string(&SourceReport {
        source: source.to_string(),
        valid: false,
        format: None,
        violations: &[],
        error: Some(error.to_string()),
    })?;
    println!("{line}");
    Ok(())
}
