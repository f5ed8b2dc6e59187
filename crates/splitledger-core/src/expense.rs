//! Users, groups, expenses and split policies.
//!
//! These are the records the external store owns. The engine only reads
//! them.

use crate::amount::Amount;
use crate::id::{ExpenseId, GroupId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A person who can take part in groups and expenses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl User {
    /// Create a new user.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A set of users sharing expenses. Balances are computed per group and
/// never netted across groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Member ids. Ordered by id, so insertion order never matters.
    pub members: BTreeSet<UserId>,
}

impl Group {
    /// Create a group with no members.
    #[must_use]
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    /// Add a member.
    #[must_use]
    pub fn with_member(mut self, user: UserId) -> Self {
        self.members.insert(user);
        self
    }

    /// Add several members.
    #[must_use]
    pub fn with_members(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.members.extend(users);
        self
    }

    /// Check whether a user belongs to this group.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Members in ascending id order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<UserId> {
        self.members.iter().copied().collect()
    }
}

/// How an expense amount is divided among participants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Everyone pays the same, remainder units go to the lowest ids.
    #[default]
    Equal,
    /// Integer percentages that must add up to exactly 100.
    Percentage {
        /// Participant id to percentage. Participants not listed pay 0%.
        percentages: BTreeMap<UserId, i32>,
    },
}

impl SplitPolicy {
    /// Build a percentage policy from `(user, percent)` pairs.
    #[must_use]
    pub fn percentage(entries: impl IntoIterator<Item = (UserId, i32)>) -> Self {
        Self::Percentage {
            percentages: entries.into_iter().collect(),
        }
    }

    /// Short tag used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percentage { .. } => "percentage",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// A single shared expense. Immutable once recorded; corrections are new
/// expenses or deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Identifier.
    pub id: ExpenseId,
    /// Owning group.
    pub group: GroupId,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Total amount, in minor units.
    pub amount: Amount,
    /// Who paid.
    pub payer: UserId,
    /// How the amount is divided.
    #[serde(default)]
    pub split: SplitPolicy,
}

impl Expense {
    /// Create an equally split expense.
    #[must_use]
    pub fn new(id: ExpenseId, group: GroupId, payer: UserId, amount: Amount) -> Self {
        Self {
            id,
            group,
            description: None,
            amount,
            payer,
            split: SplitPolicy::Equal,
        }
    }

    /// Set the split policy.
    #[must_use]
    pub fn with_split(mut self, split: SplitPolicy) -> Self {
        self.split = split;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
