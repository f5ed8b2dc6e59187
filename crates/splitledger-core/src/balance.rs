//! Derived records: shares, debt edges and net balances.
//!
//! None of these are stored. They exist only as results of running the
//! engine over an expense history and carry no identity beyond their fields.

use crate::amount::Amount;
use crate::id::{ExpenseId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One participant's portion of a single expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Share {
    /// The expense this share belongs to.
    pub expense: ExpenseId,
    /// The participant.
    pub participant: UserId,
    /// Owed amount, never negative.
    pub amount: Amount,
}

/// A directed single-expense debt: `debtor` owes `creditor` `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DebtEdge {
    /// Who owes.
    pub debtor: UserId,
    /// Who is owed.
    pub creditor: UserId,
    /// Strictly positive amount.
    pub amount: Amount,
}

impl DebtEdge {
    /// Create an edge.
    #[must_use]
    pub const fn new(debtor: UserId, creditor: UserId, amount: Amount) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }
}

impl fmt::Display for DebtEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.debtor, self.creditor, self.amount)
    }
}

/// The reduced debt between two members of a group.
///
/// A settled pair has no `NetBalance` at all, so `amount` is always
/// positive and only one direction ever exists for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetBalance {
    /// Who owes.
    pub debtor: UserId,
    /// Who is owed.
    pub creditor: UserId,
    /// Strictly positive amount.
    pub amount: Amount,
}

impl NetBalance {
    /// Create a net balance.
    #[must_use]
    pub const fn new(debtor: UserId, creditor: UserId, amount: Amount) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }

    /// Whether `user` is on either side of this balance.
    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.debtor == user || self.creditor == user
    }

    /// The other side of the balance, if `user` is involved.
    #[must_use]
    pub fn counterparty(&self, user: UserId) -> Option<UserId> {
        if self.debtor == user {
            Some(self.creditor)
        } else if self.creditor == user {
            Some(self.debtor)
        } else {
            None
        }
    }

    /// The balance as seen by `user`: positive when owed to them, negative
    /// when they owe, `None` when not involved.
    #[must_use]
    pub fn signed_for(&self, user: UserId) -> Option<Amount> {
        if self.creditor == user {
            Some(self.amount)
        } else if self.debtor == user {
            Some(-self.amount)
        } else {
            None
        }
    }
}

impl fmt::Display for NetBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {}: {}", self.debtor, self.creditor, self.amount)
    }
}

/// A member's signed net position inside one group.
///
/// Positive means the rest of the group owes this member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberPosition {
    /// The member.
    pub user: UserId,
    /// Signed net amount.
    pub amount: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_balance_perspective() {
        let bal = NetBalance::new(UserId(2), UserId(1), Amount::from_minor(1000));

        assert!(bal.involves(UserId(1)));
        assert!(bal.involves(UserId(2)));
        assert!(!bal.involves(UserId(3)));

        assert_eq!(bal.counterparty(UserId(1)), Some(UserId(2)));
        assert_eq!(bal.counterparty(UserId(2)), Some(UserId(1)));
        assert_eq!(bal.counterparty(UserId(3)), None);

        assert_eq!(bal.signed_for(UserId(1)), Some(Amount::from_minor(1000)));
        assert_eq!(bal.signed_for(UserId(2)), Some(Amount::from_minor(-1000)));
        assert_eq!(bal.signed_for(UserId(3)), None);
    }

    #[test]
    fn test_display() {
        let edge = DebtEdge::new(UserId(2), UserId(1), Amount::from_minor(250));
        assert_eq!(edge.to_string(), "2 -> 1: 250");
        let bal = NetBalance::new(UserId(3), UserId(1), Amount::from_minor(1000));
        assert_eq!(bal.to_string(), "3 owes 1: 1000");
    }
}
