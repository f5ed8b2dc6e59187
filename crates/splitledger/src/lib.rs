//! Shared expense tracking tools.
//!
//! This crate provides command-line tools for working with splitledger files:
//!
//! - `sledger-balances`: Net balances and member positions for a group
//! - `sledger-summary`: One user's standing across all of their groups
//! - `sledger-check`: Validate a ledger file
//!
//! It also re-exports the engine entry points, so callers embedding the
//! engine need only this crate.
//!
//! # Example Usage
//!
//! ```bash
//! sledger-check trip.json
//! sledger-balances trip.json --group 10
//! sledger-summary trip.json --user 1 --format json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod report;

pub use splitledger_balance::{
    aggregate, compute_group_balances, compute_user_summary, group_sheet, group_total,
    member_positions, reduce, BalanceSheet, GroupSummary, UserBalanceSummary,
};
pub use splitledger_split::{build_edges, compute_shares, suggest_percentages, SplitError};
pub use splitledger_validate::{validate, validate_split, ErrorCode, Severity, ValidationError};
