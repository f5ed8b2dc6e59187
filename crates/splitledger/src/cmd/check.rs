//! Implementation of the `sledger-check` command.

use crate::cmd::completions::ShellType;
use crate::cmd::{init_tracing, OutputFormat};
use crate::report::{self, JsonDiagnostic, JsonOutput};
use anyhow::{Context, Result};
use clap::Parser;
use splitledger_loader::{LoadError, LoadResult, Loader};
use splitledger_validate::{validate, ErrorCode, ValidationError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Validate a ledger file and report errors.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger file to check
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Show verbose output including timing information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Map an expense that failed to load onto the validation code it violates.
fn load_error_diagnostic(error: &LoadError) -> Option<ValidationError> {
    let (code, expense) = match error {
        LoadError::Decimal { expense, .. } | LoadError::Amount { expense, .. } => {
            (ErrorCode::InvalidAmount, expense)
        }
        LoadError::PercentageKey { expense, .. }
        | LoadError::DuplicatePercentage { expense, .. } => (ErrorCode::InvalidSplit, expense),
        LoadError::Io { .. } | LoadError::Json { .. } => return None,
    };
    Some(ValidationError::new(code, error.to_string()).with_context(format!("expense {expense}")))
}

/// Every diagnostic for a loaded ledger: load errors, option warnings, then
/// validation findings.
pub fn collect_diagnostics(file: &str, loaded: &LoadResult) -> Vec<JsonDiagnostic> {
    let mut diagnostics: Vec<JsonDiagnostic> = loaded
        .errors
        .iter()
        .filter_map(load_error_diagnostic)
        .map(|e| JsonDiagnostic::from_validation(file, &e))
        .collect();

    diagnostics.extend(
        loaded
            .options
            .warnings
            .iter()
            .map(|w| JsonDiagnostic::from_option_warning(file, w)),
    );

    diagnostics.extend(
        validate(&loaded.ledger)
            .iter()
            .map(|e| JsonDiagnostic::from_validation(file, e)),
    );

    diagnostics
}

fn run(args: &Args) -> Result<ExitCode> {
    let file = args.file.as_ref().context("FILE is required")?;
    let start = std::time::Instant::now();

    if !file.exists() {
        anyhow::bail!("file not found: {}", file.display());
    }

    let loaded = Loader::new()
        .load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let diagnostics = collect_diagnostics(&file.display().to_string(), &loaded);
    let error_count = diagnostics.iter().filter(|d| d.is_error()).count();
    let warning_count = diagnostics.len() - error_count;

    tracing::debug!(
        "checked {} expenses: {} errors, {} warnings in {:.2?}",
        loaded.ledger.expenses.len() + loaded.errors.len(),
        error_count,
        warning_count,
        start.elapsed()
    );

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            let output = JsonOutput {
                diagnostics,
                error_count,
                warning_count,
            };
            serde_json::to_writer_pretty(&mut stdout, &output)?;
            writeln!(stdout)?;
        }
        OutputFormat::Text if !args.quiet => {
            report::write_diagnostics(&diagnostics, &mut stdout)?;
            report::print_summary(error_count, warning_count, &mut stdout)?;
        }
        OutputFormat::Text => {}
    }

    if error_count > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Main entry point for the check command.
pub fn main() -> ExitCode {
    main_with_name("sledger-check")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(diagnostics: &[JsonDiagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn test_clean_ledger() {
        let loaded = Loader::new()
            .load_str(
                r#"{
                    "users": [{"id": 1, "name": "Alice"}],
                    "groups": [{"id": 10, "name": "Solo", "members": [1]}],
                    "expenses": [{"id": 1, "group": 10, "amount": "5.00", "payer": 1}]
                }"#,
            )
            .unwrap();
        assert!(collect_diagnostics("<string>", &loaded).is_empty());
    }

    #[test]
    fn test_diagnostic_order_and_codes() {
        let loaded = Loader::new()
            .load_str(
                r#"{
                    "options": {"timezone": "UTC"},
                    "users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}],
                    "groups": [{"id": 10, "name": "Trip", "members": [1, 2]}],
                    "expenses": [
                        {"id": 1, "group": 10, "amount": "lots", "payer": 1},
                        {"id": 2, "group": 10, "amount": "5.00", "payer": 3},
                        {"id": 3, "group": 10, "amount": "5.00", "payer": 1,
                         "split": {"type": "percentage", "percentages": {"x": 100}}}
                    ],
                    "deletions": [9]
                }"#,
            )
            .unwrap();

        let diagnostics = collect_diagnostics("<string>", &loaded);
        assert_eq!(
            codes(&diagnostics),
            vec!["E2001", "E2003", "E4001", "E2002", "E3001"]
        );
        assert_eq!(diagnostics[0].context.as_deref(), Some("expense 1"));
        assert_eq!(diagnostics.iter().filter(|d| d.is_error()).count(), 3);
    }

    #[test]
    fn test_duplicate_percentage_is_invalid_split() {
        let loaded = Loader::new()
            .load_str(
                r#"{
                    "users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}],
                    "groups": [{"id": 10, "name": "Trip", "members": [1, 2]}],
                    "expenses": [{"id": 4, "group": 10, "amount": "9.00", "payer": 1,
                        "split": {"type": "percentage",
                                  "percentages": {"1": 50, "2": 50, "02": 50}}}]
                }"#,
            )
            .unwrap();

        let diagnostics = collect_diagnostics("<string>", &loaded);
        assert_eq!(codes(&diagnostics), vec!["E2003"]);
        assert!(diagnostics[0].message.contains("user 2 has more than one percentage"));
        assert_eq!(diagnostics[0].context.as_deref(), Some("expense 4"));
    }

    #[test]
    fn test_io_errors_are_not_diagnostics() {
        let err = LoadError::Io {
            path: PathBuf::from("missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(load_error_diagnostic(&err).is_none());
    }
}
