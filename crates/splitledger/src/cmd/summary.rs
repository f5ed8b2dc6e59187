//! Implementation of the `sledger-summary` command.

use crate::cmd::completions::ShellType;
use crate::cmd::{init_tracing, load_complete, OutputFormat};
use crate::report;
use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use splitledger_balance::{compute_user_summary, group_sheet, UserBalanceSummary};
use splitledger_core::{GroupId, Ledger, NetBalance, UserId};
use splitledger_validate::validate;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Summarize what a user owes and is owed across their groups.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger file to read
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// User to summarize
    #[arg(
        short,
        long,
        value_name = "ID",
        required_unless_present = "generate_completions"
    )]
    pub user: Option<u64>,

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

/// Net balances of every group `user` belongs to, computed in parallel.
pub fn user_group_balances(
    ledger: &Ledger,
    user: UserId,
) -> Result<BTreeMap<GroupId, Vec<NetBalance>>> {
    ledger
        .groups_of(user)
        .par_iter()
        .map(|group| -> Result<(GroupId, Vec<NetBalance>)> {
            let expenses = ledger.group_expenses(group.id);
            let sheet = group_sheet(group, &expenses)
                .with_context(|| format!("failed to compute balances for group {}", group.id))?;
            Ok((group.id, sheet.net_balances()))
        })
        .collect()
}

/// Compute the summary for `user` over a validated ledger.
pub fn user_summary(ledger: &Ledger, user: UserId) -> Result<UserBalanceSummary> {
    let per_group = user_group_balances(ledger, user)?;
    Ok(compute_user_summary(user, &per_group))
}

fn run(args: &Args) -> Result<ExitCode> {
    let file = args.file.as_ref().context("FILE is required")?;
    let user = UserId(args.user.context("--user is required")?);
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
                "refusing to compute summary: {} validation error(s)",
                errors.len()
            )?;
        }
        return Ok(ExitCode::from(1));
    }

    if ledger.user(user).is_none() {
        tracing::debug!("user {} is not in the ledger", user);
    }

    let summary = user_summary(ledger, user)?;
    tracing::debug!(
        "user {}: {} unsettled groups in {:.2?}",
        user,
        summary.groups.len(),
        start.elapsed()
    );

    if args.quiet {
        return Ok(ExitCode::SUCCESS);
    }

    let config = loaded.options.format_config();
    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => report::write_summary_text(&summary, ledger, &config, &mut stdout)?,
        OutputFormat::Json => {
            let json = report::summary_json(&summary, ledger, &config);
            serde_json::to_writer_pretty(&mut stdout, &json)?;
            writeln!(stdout)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the summary command.
pub fn main() -> ExitCode {
    main_with_name("sledger-summary")
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
