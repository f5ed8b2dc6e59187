//! Implementation of the `sledger-balances` command.

use crate::cmd::completions::ShellType;
use crate::cmd::{init_tracing, load_complete, OutputFormat};
use crate::report::{self, GroupReport};
use anyhow::{Context, Result};
use clap::Parser;
use splitledger_balance::{group_sheet, group_total, member_positions};
use splitledger_core::{GroupId, Ledger};
use splitledger_validate::validate;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Show net balances and member positions for a group.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger file to read
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Group to report on
    #[arg(
        short,
        long,
        value_name = "ID",
        required_unless_present = "generate_completions"
    )]
    pub group: Option<u64>,

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

/// Compute the report for one group of a validated ledger.
pub fn group_report(ledger: &Ledger, group: GroupId) -> Result<GroupReport> {
    let group = ledger
        .group(group)
        .with_context(|| format!("unknown group {group}"))?;
    let expenses = ledger.group_expenses(group.id);

    let sheet = group_sheet(group, &expenses)
        .with_context(|| format!("failed to compute balances for group {}", group.id))?;

    Ok(GroupReport {
        group: group.clone(),
        balances: sheet.net_balances(),
        positions: member_positions(group, &sheet),
        total: group_total(group.id, &expenses),
    })
}

fn run(args: &Args) -> Result<ExitCode> {
    let file = args.file.as_ref().context("FILE is required")?;
    let group = GroupId(args.group.context("--group is required")?);
    let start = std::time::Instant::now();

    let loaded = load_complete(file)?;
    let ledger = &loaded.ledger;

    let errors: Vec<_> = validate(ledger)
        .into_iter()
        .filter(|e| !e.code.is_warning())
        .collect();
    if !errors.is_empty() {
        if !args.quiet {
            let mut stderr = io::stderr().lock();
            report::report_validation_errors(&errors, &mut stderr)?;
            writeln!(
                stderr,
                "refusing to compute balances: {} validation error(s)",
                errors.len()
            )?;
        }
        return Ok(ExitCode::from(1));
    }

    let report = group_report(ledger, group)?;
    tracing::debug!(
        "group {}: {} balances in {:.2?}",
        group,
        report.balances.len(),
        start.elapsed()
    );

    if args.quiet {
        return Ok(ExitCode::SUCCESS);
    }

    let config = loaded.options.format_config();
    let users = ledger.users_by_id();
    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => report::write_group_text(&report, &users, &config, &mut stdout)?,
        OutputFormat::Json => {
            let json = report::group_json(&report, &users, &config);
            serde_json::to_writer_pretty(&mut stdout, &json)?;
            writeln!(stdout)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the balances command.
pub fn main() -> ExitCode {
    main_with_name("sledger-balances")
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
