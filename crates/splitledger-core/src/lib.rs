//! Core types for splitledger
//!
//! This crate provides the fundamental types used throughout the splitledger project:
//!
//! - [`Amount`] - A signed count of currency minor units
//! - [`UserId`], [`GroupId`], [`ExpenseId`] - Opaque, ordered identifiers
//! - [`User`], [`Group`], [`Expense`] - Records owned by the external store
//! - [`SplitPolicy`] - How an expense is divided (equal or percentage)
//! - [`Share`], [`DebtEdge`], [`NetBalance`] - Derived engine outputs
//! - [`Ledger`] - A full expense history with deletion events
//!
//! # Example
//!
//! ```
//! use splitledger_core::{Amount, Expense, ExpenseId, Group, GroupId, SplitPolicy, UserId};
//! use rust_decimal_macros::dec;
//!
//! let alice = UserId(1);
//! let bob = UserId(2);
//! let group = Group::new(GroupId(10), "Trip").with_members([alice, bob]);
//!
//! let amount = Amount::from_decimal(dec!(20.00), 2).unwrap();
//! let expense = Expense::new(ExpenseId(100), group.id, bob, amount)
//!     .with_split(SplitPolicy::percentage([(alice, 50), (bob, 50)]));
//!
//! assert!(group.is_member(expense.payer));
//! assert_eq!(expense.amount.minor_units(), 2000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod balance;
pub mod expense;
pub mod format;
pub mod id;
pub mod ledger;

pub use amount::{Amount, AmountError, MAX_SCALE};
pub use balance::{DebtEdge, MemberPosition, NetBalance, Share};
pub use expense::{Expense, Group, SplitPolicy, User};
pub use format::{display_name, format_amount, format_net_balance, format_number, FormatConfig};
pub use id::{ExpenseId, GroupId, UserId};
pub use ledger::Ledger;

// Re-export commonly used external types
pub use rust_decimal::Decimal;
