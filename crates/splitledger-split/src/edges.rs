//! Ledger builder: turns one expense's shares into debt edges.

use crate::split::{split_expense, SplitError};
use splitledger_core::{Amount, DebtEdge, Expense, Share, UserId};
use std::collections::BTreeMap;

/// Emit one debt edge per non-payer participant with a positive share.
///
/// The payer's own share is money they spent on themself and never becomes
/// an edge. Shares belonging to other expenses are ignored, and repeated
/// shares for the same participant are merged, so the result is a set keyed
/// by debtor, ordered by debtor id.
///
/// ```
/// use splitledger_core::{Amount, Expense, ExpenseId, GroupId, UserId};
/// use splitledger_split::{build_edges, split_expense};
///
/// let expense = Expense::new(ExpenseId(1), GroupId(1), UserId(1), Amount::from_minor(3000));
/// let shares = split_expense(&expense, &[UserId(1), UserId(2), UserId(3)]).unwrap();
/// let edges = build_edges(&expense, &shares);
///
/// assert_eq!(edges.len(), 2);
/// assert!(edges.iter().all(|e| e.creditor == UserId(1)));
/// ```
pub fn build_edges(expense: &Expense, shares: &[Share]) -> Vec<DebtEdge> {
    let mut owed: BTreeMap<UserId, Amount> = BTreeMap::new();

    for share in shares {
        if share.expense != expense.id || share.participant == expense.payer {
            continue;
        }
        *owed.entry(share.participant).or_default() += share.amount;
    }

    owed.into_iter()
        .filter(|(_, amount)| amount.is_positive())
        .map(|(debtor, amount)| DebtEdge::new(debtor, expense.payer, amount))
        .collect()
}

/// Split an expense among `participants` and build its edges in one step.
pub fn expense_edges(
    expense: &Expense,
    participants: &[UserId],
) -> Result<Vec<DebtEdge>, SplitError> {
    let shares = split_expense(expense, participants)?;
    Ok(build_edges(expense, &shares))
}
