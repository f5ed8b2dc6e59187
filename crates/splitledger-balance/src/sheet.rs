//! Balance sheet: the pairwise reduction of a group's debt edges.
//!
//! A [`BalanceSheet`] stores one signed running total per unordered pair of
//! users, keyed by `(min(a, b), max(a, b))`. A positive total means the lower
//! id owes the higher id. Every edge is a plain signed addition, so applying
//! edges is commutative and associative and a sheet built incrementally is
//! always identical to one rebuilt from scratch.

use splitledger_core::{Amount, DebtEdge, Expense, MemberPosition, NetBalance, UserId};
use splitledger_split::{expense_edges, SplitError};
use std::collections::BTreeMap;
use std::fmt;

/// Pairwise net totals for one group.
///
/// # Example
///
/// ```
/// use splitledger_balance::BalanceSheet;
/// use splitledger_core::{Amount, DebtEdge, NetBalance, UserId};
///
/// let mut sheet = BalanceSheet::new();
/// sheet.add_edge(&DebtEdge::new(UserId(2), UserId(1), Amount::from_minor(1000)));
/// sheet.add_edge(&DebtEdge::new(UserId(1), UserId(2), Amount::from_minor(400)));
///
/// assert_eq!(
///     sheet.net_balances(),
///     vec![NetBalance::new(UserId(2), UserId(1), Amount::from_minor(600))]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    pairs: BTreeMap<(UserId, UserId), i128>,
}

impl BalanceSheet {
    /// Create an empty (fully settled) sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from a set of edges.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a DebtEdge>) -> Self {
        let mut sheet = Self::new();
        for edge in edges {
            sheet.add_edge(edge);
        }
        sheet
    }

    /// Whether every pair is settled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of unsettled pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Add one edge in its direction.
    ///
    /// A self-edge carries no debt and is ignored.
    pub fn add_edge(&mut self, edge: &DebtEdge) {
        self.adjust(edge.debtor, edge.creditor, i128::from(edge.amount.minor_units()));
    }

    /// Remove one previously added edge.
    pub fn remove_edge(&mut self, edge: &DebtEdge) {
        self.adjust(edge.debtor, edge.creditor, -i128::from(edge.amount.minor_units()));
    }

    /// Add a batch of edges, typically those of one new expense.
    pub fn apply_edges(&mut self, edges: &[DebtEdge]) {
        for edge in edges {
            self.add_edge(edge);
        }
    }

    /// Remove a batch of edges previously applied with [`apply_edges`](Self::apply_edges).
    pub fn revert_edges(&mut self, edges: &[DebtEdge]) {
        for edge in edges {
            self.remove_edge(edge);
        }
    }

    /// Split a new expense among `participants` and add its edges.
    ///
    /// On error the sheet is left untouched.
    pub fn apply_expense(
        &mut self,
        expense: &Expense,
        participants: &[UserId],
    ) -> Result<(), SplitError> {
        let edges = expense_edges(expense, participants)?;
        self.apply_edges(&edges);
        Ok(())
    }

    /// Remove a deleted expense's contribution.
    ///
    /// `participants` must be the set the expense was applied with; its
    /// edges are recomputed deterministically and subtracted. On error the
    /// sheet is left untouched.
    pub fn revert_expense(
        &mut self,
        expense: &Expense,
        participants: &[UserId],
    ) -> Result<(), SplitError> {
        let edges = expense_edges(expense, participants)?;
        self.revert_edges(&edges);
        Ok(())
    }

    /// Fold another sheet into this one.
    pub fn merge(&mut self, other: &Self) {
        for (&(low, high), &value) in &other.pairs {
            self.adjust(low, high, value);
        }
    }

    /// The net balance between two users, or `None` when settled.
    #[must_use]
    pub fn balance_between(&self, a: UserId, b: UserId) -> Option<NetBalance> {
        let key = pair_key(a, b);
        self.pairs
            .get(&key)
            .map(|&value| net_balance(key, value))
    }

    /// One [`NetBalance`] per unsettled pair, ordered by pair.
    #[must_use]
    pub fn net_balances(&self) -> Vec<NetBalance> {
        self.pairs
            .iter()
            .map(|(&key, &value)| net_balance(key, value))
            .collect()
    }

    /// Signed net position of everyone on the sheet, ordered by user.
    ///
    /// Positive means the group owes the user. Users whose pairs are all
    /// settled do not appear. The positions always add up to zero.
    #[must_use]
    pub fn positions(&self) -> Vec<MemberPosition> {
        let mut totals: BTreeMap<UserId, i128> = BTreeMap::new();
        for (&(low, high), &value) in &self.pairs {
            *totals.entry(low).or_default() -= value;
            *totals.entry(high).or_default() += value;
        }

        totals
            .into_iter()
            .filter(|(_, total)| *total != 0)
            .map(|(user, total)| MemberPosition {
                user,
                amount: Amount::from_i128_saturating(total),
            })
            .collect()
    }

    /// Signed net position of a single user.
    #[must_use]
    pub fn position(&self, user: UserId) -> Amount {
        let total: i128 = self
            .pairs
            .iter()
            .map(|(&(low, high), &value)| {
                if low == user {
                    -value
                } else if high == user {
                    value
                } else {
                    0
                }
            })
            .sum();
        Amount::from_i128_saturating(total)
    }

    fn adjust(&mut self, debtor: UserId, creditor: UserId, units: i128) {
        if debtor == creditor || units == 0 {
            return;
        }

        let key = pair_key(debtor, creditor);
        let signed = if debtor < creditor { units } else { -units };

        let value = self.pairs.entry(key).or_default();
        *value += signed;
        if *value == 0 {
            self.pairs.remove(&key);
        }
    }
}

impl<'a> Extend<&'a DebtEdge> for BalanceSheet {
    fn extend<I: IntoIterator<Item = &'a DebtEdge>>(&mut self, iter: I) {
        for edge in iter {
            self.add_edge(edge);
        }
    }
}

impl FromIterator<DebtEdge> for BalanceSheet {
    fn from_iter<I: IntoIterator<Item = DebtEdge>>(iter: I) -> Self {
        let mut sheet = Self::new();
        for edge in iter {
            sheet.add_edge(&edge);
        }
        sheet
    }
}

impl fmt::Display for BalanceSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(settled)");
        }
        for (i, balance) in self.net_balances().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{balance}")?;
        }
        Ok(())
    }
}

/// Reduce a group's edges to its net balances in one call.
#[must_use]
pub fn reduce(edges: &[DebtEdge]) -> Vec<NetBalance> {
    BalanceSheet::from_edges(edges).net_balances()
}

const fn pair_key(a: UserId, b: UserId) -> (UserId, UserId) {
    if a.0 <= b.0 {
        (a, b)
    } else {
        (b, a)
    }
}

fn net_balance((low, high): (UserId, UserId), value: i128) -> NetBalance {
    let amount = Amount::from_i128_saturating(value.abs());
    if value > 0 {
        NetBalance::new(low, high, amount)
    } else {
        NetBalance::new(high, low, amount)
    }
}
