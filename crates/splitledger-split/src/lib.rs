//! Split calculator and ledger builder.
//!
//! This crate provides the per-expense half of the engine:
//! - Share computation for equal and percentage splits ([`compute_shares`])
//! - Debt edges from shares ([`build_edges`])
//! - Initial percentage suggestions for input forms ([`suggest_percentages`])
//!
//! Everything here depends only on a single expense, never on history.
//!
//! # Exactness
//!
//! Amounts are integer minor units. Integer division leaves some units over;
//! they are handed out one at a time in ascending participant id order, so
//! shares always add up to the expense amount.
//!
//! ```
//! use splitledger_core::{Amount, Expense, ExpenseId, GroupId, UserId};
//! use splitledger_split::{build_edges, split_expense};
//!
//! // Alice pays $10.00 for three people
//! let people = [UserId(1), UserId(2), UserId(3)];
//! let expense = Expense::new(ExpenseId(1), GroupId(1), UserId(1), Amount::from_minor(1000));
//!
//! let shares = split_expense(&expense, &people).unwrap();
//! let total: Amount = shares.iter().map(|s| s.amount).sum();
//! assert_eq!(total, expense.amount);
//!
//! // Bob and Carol owe Alice 333 each; Alice's own 334 is not a debt
//! let edges = build_edges(&expense, &shares);
//! assert_eq!(edges.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod edges;
mod split;
mod suggest;

pub use edges::{build_edges, expense_edges};
pub use split::{check_split, compute_shares, split_expense, SplitError, SplitIssue};
pub use suggest::suggest_percentages;
