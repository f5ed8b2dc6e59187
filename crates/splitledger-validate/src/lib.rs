//! Validation rules for splitledger histories.
//!
//! This crate checks a whole [`Ledger`] before balances are computed:
//!
//! - References (expenses to groups, groups to users)
//! - Id uniqueness
//! - Expense amounts, payers and percentage splits
//! - Deletion events
//!
//! It also exposes [`validate_split`], the single-expense check the
//! expense creation flow runs before anything is recorded.
//!
//! # Error Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | E1001 | Expense references an unknown group |
//! | E1002 | Group references an unknown user |
//! | E1003 | Duplicate user, group or expense id |
//! | E2001 | Invalid expense amount |
//! | E2002 | Payer is not a member of the group |
//! | E2003 | Invalid percentage split |
//! | E2004 | Group has no members |
//! | E3001 | Deletion of an unknown expense (warning) |
//! | E3002 | Expense deleted more than once (warning) |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use splitledger_core::{Amount, Expense, Group, Ledger, SplitPolicy, UserId};
use splitledger_split::{check_split, SplitError};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    // === Reference Errors (E1xxx) ===
    /// E1001: Expense recorded against a group that does not exist.
    UnknownGroup,
    /// E1002: Group member that is not a known user.
    UnknownMember,
    /// E1003: The same id used twice for users, groups or expenses.
    DuplicateId,

    // === Expense Errors (E2xxx) ===
    /// E2001: Amount is zero, negative or too large.
    InvalidAmount,
    /// E2002: Payer is not a member of the expense's group.
    PayerNotMember,
    /// E2003: Percentages are out of range, do not total 100, or name non-members.
    InvalidSplit,
    /// E2004: Group with no members.
    EmptyGroup,

    // === Deletion Warnings (E3xxx) ===
    /// E3001: Deletion names an expense that was never recorded.
    UnknownDeletion,
    /// E3002: Expense deleted more than once.
    DuplicateDeletion,
}

impl ErrorCode {
    /// Get the error code string (e.g., "E1001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownGroup => "E1001",
            Self::UnknownMember => "E1002",
            Self::DuplicateId => "E1003",
            Self::InvalidAmount => "E2001",
            Self::PayerNotMember => "E2002",
            Self::InvalidSplit => "E2003",
            Self::EmptyGroup => "E2004",
            Self::UnknownDeletion => "E3001",
            Self::DuplicateDeletion => "E3002",
        }
    }

    /// Check if this is a warning (not an error).
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::UnknownDeletion | Self::DuplicateDeletion)
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Severity level for validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Balances cannot be trusted.
    Error,
    /// Suspicious but harmless.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ValidationError {
    /// Error code.
    pub code: ErrorCode,
    /// Error message.
    pub message: String,
    /// Additional context.
    pub context: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Severity of the underlying code.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Check a prospective expense before it is recorded.
///
/// Rejects empty participant sets, amounts outside `(0, MAX_EXPENSE]` and
/// unusable percentage maps. The payer is not checked here.
///
/// ```
/// use splitledger_core::{Amount, SplitPolicy, UserId};
/// use splitledger_validate::validate_split;
///
/// let people = [UserId(1), UserId(2), UserId(3)];
/// let bad = SplitPolicy::percentage([(UserId(1), 40), (UserId(2), 40), (UserId(3), 10)]);
/// let good = SplitPolicy::percentage([(UserId(1), 40), (UserId(2), 40), (UserId(3), 20)]);
///
/// assert!(validate_split(Amount::from_minor(1000), &bad, &people).is_err());
/// assert!(validate_split(Amount::from_minor(1000), &good, &people).is_ok());
/// ```
pub fn validate_split(
    amount: Amount,
    policy: &SplitPolicy,
    participants: &[UserId],
) -> Result<(), SplitError> {
    check_split(amount, policy, participants)
}

/// Validate a whole ledger.
///
/// Returns every problem found, errors and warnings alike, in the order
/// users, groups, expenses, deletions. Deleted expenses are not checked.
pub fn validate(ledger: &Ledger) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_duplicate_ids(ledger, &mut errors);

    let users: BTreeSet<UserId> = ledger.users.iter().map(|u| u.id).collect();
    for group in &ledger.groups {
        validate_group(group, &users, &mut errors);
    }

    for expense in ledger.live_expenses() {
        match ledger.group(expense.group) {
            Some(group) => validate_expense(expense, group, &mut errors),
            None => errors.push(
                ValidationError::new(
                    ErrorCode::UnknownGroup,
                    format!(
                        "Expense {} references unknown group {}",
                        expense.id, expense.group
                    ),
                )
                .with_context(expense_context(expense)),
            ),
        }
    }

    validate_deletions(ledger, &mut errors);

    errors
}

fn check_duplicate_ids(ledger: &Ledger, errors: &mut Vec<ValidationError>) {
    let mut seen = BTreeSet::new();
    for user in &ledger.users {
        if !seen.insert(user.id) {
            errors.push(ValidationError::new(
                ErrorCode::DuplicateId,
                format!("Duplicate user id {}", user.id),
            ));
        }
    }

    let mut seen = BTreeSet::new();
    for group in &ledger.groups {
        if !seen.insert(group.id) {
            errors.push(ValidationError::new(
                ErrorCode::DuplicateId,
                format!("Duplicate group id {}", group.id),
            ));
        }
    }

    let mut seen = BTreeSet::new();
    for expense in &ledger.expenses {
        if !seen.insert(expense.id) {
            errors.push(
                ValidationError::new(
                    ErrorCode::DuplicateId,
                    format!("Duplicate expense id {}", expense.id),
                )
                .with_context(expense_context(expense)),
            );
        }
    }
}

fn validate_group(group: &Group, users: &BTreeSet<UserId>, errors: &mut Vec<ValidationError>) {
    if group.members.is_empty() {
        errors.push(ValidationError::new(
            ErrorCode::EmptyGroup,
            format!("Group {} ({}) has no members", group.id, group.name),
        ));
        return;
    }

    for member in group.members.iter().filter(|m| !users.contains(m)) {
        errors.push(ValidationError::new(
            ErrorCode::UnknownMember,
            format!(
                "Group {} ({}) references unknown user {member}",
                group.id, group.name
            ),
        ));
    }
}

fn validate_expense(expense: &Expense, group: &Group, errors: &mut Vec<ValidationError>) {
    // An empty group is reported once, on the group itself.
    if group.members.is_empty() {
        return;
    }

    if !group.is_member(expense.payer) {
        errors.push(
            ValidationError::new(
                ErrorCode::PayerNotMember,
                format!(
                    "Payer {} of expense {} is not a member of group {}",
                    expense.payer, expense.id, group.id
                ),
            )
            .with_context(expense_context(expense)),
        );
    }

    let Err(err) = validate_split(expense.amount, &expense.split, &group.member_ids()) else {
        return;
    };
    let code = match err {
        SplitError::EmptyParticipants => return,
        SplitError::InvalidAmount(_) => ErrorCode::InvalidAmount,
        SplitError::InvalidSplit(_) | SplitError::InvalidPayer(_) => ErrorCode::InvalidSplit,
    };
    errors.push(
        ValidationError::new(code, format!("Expense {}: {err}", expense.id))
            .with_context(expense_context(expense)),
    );
}

fn validate_deletions(ledger: &Ledger, errors: &mut Vec<ValidationError>) {
    let recorded: BTreeSet<_> = ledger.expenses.iter().map(|e| e.id).collect();
    let mut seen = BTreeSet::new();

    for &id in &ledger.deletions {
        if !recorded.contains(&id) {
            errors.push(ValidationError::new(
                ErrorCode::UnknownDeletion,
                format!("Deletion of unknown expense {id}"),
            ));
        } else if !seen.insert(id) {
            errors.push(ValidationError::new(
                ErrorCode::DuplicateDeletion,
                format!("Expense {id} is deleted more than once"),
            ));
        }
    }
}

fn expense_context(expense: &Expense) -> String {
    match &expense.description {
        Some(description) => format!("expense {} \"{description}\"", expense.id),
        None => format!("expense {}", expense.id),
    }
}
