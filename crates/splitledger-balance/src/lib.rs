//! Balance reducer and aggregator.
//!
//! This crate folds whole histories:
//! - [`BalanceSheet`] nets a group's debt edges pairwise
//! - [`aggregate`] turns per-group balances into one user's summary
//! - [`compute_group_balances`] and [`compute_user_summary`] are the engine
//!   entry points used by the command line tools
//!
//! Debts are never netted across groups. Recomputing from the full history
//! and updating a sheet incrementally give identical results.
//!
//! # Example
//!
//! ```
//! use splitledger_balance::compute_group_balances;
//! use splitledger_core::{Amount, Expense, ExpenseId, Group, GroupId, NetBalance, UserId};
//!
//! let group = Group::new(GroupId(1), "Trip").with_members([UserId(1), UserId(2)]);
//! let expenses = vec![
//!     Expense::new(ExpenseId(1), GroupId(1), UserId(1), Amount::from_minor(3000)),
//!     Expense::new(ExpenseId(2), GroupId(1), UserId(2), Amount::from_minor(1000)),
//! ];
//!
//! let balances = compute_group_balances(&group, &expenses).unwrap();
//! assert_eq!(
//!     balances,
//!     vec![NetBalance::new(UserId(2), UserId(1), Amount::from_minor(1000))]
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod sheet;
mod summary;

pub use sheet::{reduce, BalanceSheet};
pub use summary::{aggregate, GroupSummary, UserBalanceSummary};

use splitledger_core::{Amount, Expense, Group, GroupId, MemberPosition, NetBalance, UserId};
use splitledger_split::SplitError;
use std::collections::BTreeMap;

/// Build the balance sheet for one group from its full expense history.
///
/// Every member of `group` takes part in every expense. Expenses recorded
/// against other groups are skipped.
///
/// Shares are derived from the group's current membership, not the
/// membership at the time an expense was recorded. Adding or removing a
/// member therefore changes the shares of every past expense of the group.
pub fn group_sheet(group: &Group, expenses: &[Expense]) -> Result<BalanceSheet, SplitError> {
    let members = group.member_ids();
    let mut sheet = BalanceSheet::new();
    let mut applied = 0usize;

    for expense in expenses.iter().filter(|e| e.group == group.id) {
        sheet.apply_expense(expense, &members)?;
        applied += 1;
    }

    tracing::debug!(
        "group {}: {} expenses applied, {} unsettled pairs",
        group.id,
        applied,
        sheet.len()
    );
    Ok(sheet)
}

/// Net balances for one group, recomputed from its full history.
///
/// Idempotent: the same history always yields the same balances, in pair
/// order, whatever order the expenses are given in.
pub fn compute_group_balances(
    group: &Group,
    expenses: &[Expense],
) -> Result<Vec<NetBalance>, SplitError> {
    Ok(group_sheet(group, expenses)?.net_balances())
}

/// Every member's signed position in the group, zero positions included.
#[must_use]
pub fn member_positions(group: &Group, sheet: &BalanceSheet) -> Vec<MemberPosition> {
    group
        .members
        .iter()
        .map(|&user| MemberPosition {
            user,
            amount: sheet.position(user),
        })
        .collect()
}

/// Sum of the amounts of `group`'s expenses. Expenses recorded against
/// other groups are skipped; the caller passes live expenses only.
#[must_use]
pub fn group_total(group: GroupId, expenses: &[Expense]) -> Amount {
    let total: i128 = expenses
        .iter()
        .filter(|e| e.group == group)
        .map(|e| i128::from(e.amount.minor_units()))
        .sum();
    Amount::from_i128_saturating(total)
}

/// Summarize `user`'s standing across the given per-group balances.
#[must_use]
pub fn compute_user_summary(
    user: UserId,
    per_group_balances: &BTreeMap<GroupId, Vec<NetBalance>>,
) -> UserBalanceSummary {
    let summary = aggregate(user, per_group_balances);
    tracing::debug!(
        "user {}: {} of {} groups unsettled, total {}",
        user,
        summary.groups.len(),
        per_group_balances.len(),
        summary.total
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitledger_core::{ExpenseId, SplitPolicy};

    fn trip() -> Group {
        Group::new(GroupId(1), "Trip").with_members([UserId(1), UserId(2), UserId(3)])
    }

    #[test]
    fn test_other_groups_expenses_skipped() {
        let expenses = vec![
            Expense::new(ExpenseId(1), GroupId(1), UserId(1), Amount::from_minor(300)),
            Expense::new(ExpenseId(2), GroupId(2), UserId(9), Amount::from_minor(999)),
        ];

        let balances = compute_group_balances(&trip(), &expenses).unwrap();
        assert_eq!(balances.len(), 2);
        assert!(balances.iter().all(|b| b.creditor == UserId(1)));
    }

    #[test]
    fn test_first_invalid_expense_fails_the_group() {
        let expenses = vec![
            Expense::new(ExpenseId(1), GroupId(1), UserId(1), Amount::from_minor(300)),
            Expense::new(ExpenseId(2), GroupId(1), UserId(2), Amount::from_minor(100))
                .with_split(SplitPolicy::percentage([(UserId(1), 40), (UserId(3), 40)])),
        ];

        let err = compute_group_balances(&trip(), &expenses).unwrap_err();
        assert!(matches!(err, SplitError::InvalidSplit(_)));
    }

    #[test]
    fn test_member_positions_include_settled_members() {
        let expenses = vec![Expense::new(
            ExpenseId(1),
            GroupId(1),
            UserId(1),
            Amount::from_minor(200),
        )
        .with_split(SplitPolicy::percentage([(UserId(1), 50), (UserId(2), 50)]))];

        let sheet = group_sheet(&trip(), &expenses).unwrap();
        let positions = member_positions(&trip(), &sheet);

        assert_eq!(positions.len(), 3);
        assert_eq!(positions[0].amount, Amount::from_minor(100));
        assert_eq!(positions[1].amount, Amount::from_minor(-100));
        assert_eq!(positions[2].amount, Amount::ZERO);
    }

    #[test]
    fn test_group_total() {
        let expenses = vec![
            Expense::new(ExpenseId(1), GroupId(1), UserId(1), Amount::from_minor(3000)),
            Expense::new(ExpenseId(2), GroupId(1), UserId(2), Amount::from_minor(2000)),
            Expense::new(ExpenseId(3), GroupId(2), UserId(9), Amount::from_minor(700)),
        ];
        assert_eq!(group_total(GroupId(1), &expenses), Amount::from_minor(5000));
        assert_eq!(group_total(GroupId(2), &expenses), Amount::from_minor(700));
        assert_eq!(group_total(GroupId(3), &expenses), Amount::ZERO);
        assert_eq!(group_total(GroupId(1), &[]), Amount::ZERO);
    }

    #[test]
    fn test_membership_change_reshapes_history() {
        let expenses = vec![Expense::new(
            ExpenseId(1),
            GroupId(1),
            UserId(1),
            Amount::from_minor(300),
        )];

        let before = compute_group_balances(&trip(), &expenses).unwrap();
        let grown = trip().with_member(UserId(4));
        let after = compute_group_balances(&grown, &expenses).unwrap();

        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 3);
        assert!(after.iter().all(|b| b.amount == Amount::from_minor(75)));
    }
}
