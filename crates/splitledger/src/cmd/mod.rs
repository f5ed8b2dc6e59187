//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod balances;
pub mod check;
pub mod completions;
pub mod summary;

use anyhow::{Context, Result};
use clap::ValueEnum;
use splitledger_loader::{LoadResult, Loader};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Install the debug log subscriber when `--verbose` is given.
pub(crate) fn init_tracing(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load a ledger file for a reporting command. Fails on any collected load
/// error.
pub(crate) fn load_complete(file: &Path) -> Result<LoadResult> {
    if !file.exists() {
        anyhow::bail!("file not found: {}", file.display());
    }

    let result = Loader::new()
        .load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    if let Some(first) = result.errors.first() {
        anyhow::bail!(
            "failed to load {}: {} expense(s) could not be read; first: {first}",
            file.display(),
            result.errors.len()
        );
    }

    tracing::debug!(
        "loaded {}: {} users, {} groups, {} expenses, {} deletions",
        file.display(),
        result.ledger.users.len(),
        result.ledger.groups.len(),
        result.ledger.expenses.len(),
        result.ledger.deletions.len()
    );
    Ok(result)
}
