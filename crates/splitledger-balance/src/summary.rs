//! Balance aggregator: one user's view across all of their groups.

use serde::Serialize;
use splitledger_core::{Amount, GroupId, NetBalance, UserId};
use std::collections::BTreeMap;

/// A user's balances within one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Net balances in this group that involve the user.
    pub balances: Vec<NetBalance>,
    /// Signed subtotal from the user's perspective.
    pub subtotal: Amount,
}

/// Where a user stands overall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserBalanceSummary {
    /// The user.
    pub user: UserId,
    /// Groups in which the user has at least one unsettled balance.
    pub groups: BTreeMap<GroupId, GroupSummary>,
    /// Everything others owe the user.
    pub owed_to_user: Amount,
    /// Everything the user owes others, as a non-negative amount.
    pub owed_by_user: Amount,
    /// `owed_to_user - owed_by_user`; positive means net creditor.
    pub total: Amount,
}

impl UserBalanceSummary {
    /// A summary with no groups and zero totals.
    #[must_use]
    pub fn empty(user: UserId) -> Self {
        Self {
            user,
            groups: BTreeMap::new(),
            owed_to_user: Amount::ZERO,
            owed_by_user: Amount::ZERO,
            total: Amount::ZERO,
        }
    }

    /// Whether the user is settled up everywhere.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.groups.is_empty()
    }

    /// The user's figures for one group, if unsettled there.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&GroupSummary> {
        self.groups.get(&id)
    }
}

/// Aggregate per-group net balances into `user`'s summary.
///
/// Only balances involving the user count. A user that appears nowhere gets
/// [`UserBalanceSummary::empty`].
///
/// ```
/// use splitledger_balance::aggregate;
/// use splitledger_core::{Amount, GroupId, NetBalance, UserId};
/// use std::collections::BTreeMap;
///
/// let mut groups = BTreeMap::new();
/// groups.insert(
///     GroupId(1),
///     vec![NetBalance::new(UserId(2), UserId(1), Amount::from_minor(500))],
/// );
/// groups.insert(
///     GroupId(2),
///     vec![NetBalance::new(UserId(1), UserId(3), Amount::from_minor(200))],
/// );
///
/// let summary = aggregate(UserId(1), &groups);
/// assert_eq!(summary.owed_to_user, Amount::from_minor(500));
/// assert_eq!(summary.owed_by_user, Amount::from_minor(200));
/// assert_eq!(summary.total, Amount::from_minor(300));
/// ```
#[must_use]
pub fn aggregate(
    user: UserId,
    per_group_balances: &BTreeMap<GroupId, Vec<NetBalance>>,
) -> UserBalanceSummary {
    let mut summary = UserBalanceSummary::empty(user);
    let mut owed_to: i128 = 0;
    let mut owed_by: i128 = 0;

    for (&group, balances) in per_group_balances {
        let mut subtotal: i128 = 0;
        let mut mine = Vec::new();

        for balance in balances {
            let units = i128::from(balance.amount.minor_units());
            if balance.creditor == user {
                subtotal += units;
                owed_to += units;
            } else if balance.debtor == user {
                subtotal -= units;
                owed_by += units;
            } else {
                continue;
            }
            mine.push(*balance);
        }

        if !mine.is_empty() {
            summary.groups.insert(
                group,
                GroupSummary {
                    balances: mine,
                    subtotal: Amount::from_i128_saturating(subtotal),
                },
            );
        }
    }

    summary.owed_to_user = Amount::from_i128_saturating(owed_to);
    summary.owed_by_user = Amount::from_i128_saturating(owed_by);
    summary.total = Amount::from_i128_saturating(owed_to - owed_by);
    summary
}
