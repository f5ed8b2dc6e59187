//! An expense history as handed to the engine.

use crate::expense::{Expense, Group, User};
use crate::id::{ExpenseId, GroupId, UserId};
use std::collections::{BTreeMap, BTreeSet};

/// Users, groups, expenses and deletion events, as recorded.
///
/// Nothing here is checked on construction; duplicates and dangling
/// references are reported by validation. Deleted expenses stay in
/// `expenses` and are filtered out by the accessors that deal in live
/// expenses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// Known users.
    pub users: Vec<User>,
    /// Known groups.
    pub groups: Vec<Group>,
    /// Every recorded expense, deleted ones included.
    pub expenses: Vec<Expense>,
    /// Deletion events, in the order they happened.
    pub deletions: Vec<ExpenseId>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a user by id.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Look up a group by id.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Users keyed by id, for display name lookups.
    #[must_use]
    pub fn users_by_id(&self) -> BTreeMap<UserId, User> {
        self.users.iter().map(|u| (u.id, u.clone())).collect()
    }

    /// Ids named by at least one deletion event.
    #[must_use]
    pub fn deleted_ids(&self) -> BTreeSet<ExpenseId> {
        self.deletions.iter().copied().collect()
    }

    /// Whether an expense has been deleted.
    #[must_use]
    pub fn is_deleted(&self, id: ExpenseId) -> bool {
        self.deletions.contains(&id)
    }

    /// Expenses not removed by a deletion event, in recorded order.
    pub fn live_expenses(&self) -> impl Iterator<Item = &Expense> {
        let deleted = self.deleted_ids();
        self.expenses
            .iter()
            .filter(move |e| !deleted.contains(&e.id))
    }

    /// Live expenses of one group.
    #[must_use]
    pub fn group_expenses(&self, group: GroupId) -> Vec<Expense> {
        self.live_expenses()
            .filter(|e| e.group == group)
            .cloned()
            .collect()
    }

    /// Groups `user` is a member of, ordered by group id.
    #[must_use]
    pub fn groups_of(&self, user: UserId) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.iter().filter(|g| g.is_member(user)).collect();
        groups.sort_by_key(|g| g.id);
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;

    fn sample() -> Ledger {
        Ledger {
            users: vec![User::new(UserId(1), "Alice"), User::new(UserId(2), "Bob")],
            groups: vec![
                Group::new(GroupId(20), "Home").with_members([UserId(1), UserId(2)]),
                Group::new(GroupId(10), "Trip").with_members([UserId(1)]),
            ],
            expenses: vec![
                Expense::new(ExpenseId(1), GroupId(10), UserId(1), Amount::from_minor(100)),
                Expense::new(ExpenseId(2), GroupId(20), UserId(2), Amount::from_minor(200)),
                Expense::new(ExpenseId(3), GroupId(20), UserId(1), Amount::from_minor(300)),
            ],
            deletions: vec![ExpenseId(2)],
        }
    }

    #[test]
    fn test_lookups() {
        let ledger = sample();
        assert_eq!(ledger.user(UserId(2)).map(|u| u.name.as_str()), Some("Bob"));
        assert!(ledger.user(UserId(9)).is_none());
        assert_eq!(ledger.group(GroupId(10)).map(|g| g.name.as_str()), Some("Trip"));
        assert_eq!(ledger.users_by_id().len(), 2);
    }

    #[test]
    fn test_deleted_expenses_are_not_live() {
        let ledger = sample();
        assert!(ledger.is_deleted(ExpenseId(2)));

        let live: Vec<ExpenseId> = ledger.live_expenses().map(|e| e.id).collect();
        assert_eq!(live, vec![ExpenseId(1), ExpenseId(3)]);

        let home = ledger.group_expenses(GroupId(20));
        assert_eq!(home.len(), 1);
        assert_eq!(home[0].id, ExpenseId(3));
    }

    #[test]
    fn test_groups_of_sorted_by_id() {
        let ledger = sample();
        let ids: Vec<GroupId> = ledger.groups_of(UserId(1)).iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![GroupId(10), GroupId(20)]);
        assert_eq!(ledger.groups_of(UserId(2)).len(), 1);
    }
}
