//! Integration tests for the validation crate.
//!
//! One test per error code, plus split checks for the expense creation flow.

use proptest::prelude::*;
use splitledger_core::{Amount, Expense, ExpenseId, Group, GroupId, Ledger, SplitPolicy, User, UserId};
use splitledger_split::SplitError;
use splitledger_validate::{validate, validate_split, ErrorCode, Severity};

// ============================================================================
// Helper Functions
// ============================================================================

fn base_ledger() -> Ledger {
    Ledger {
        users: vec![
            User::new(UserId(1), "Alice"),
            User::new(UserId(2), "Bob"),
            User::new(UserId(3), "Carol"),
        ],
        groups: vec![Group::new(GroupId(10), "Trip").with_members([UserId(1), UserId(2), UserId(3)])],
        expenses: Vec::new(),
        deletions: Vec::new(),
    }
}

fn expense(id: u64, payer: u64, minor: i64) -> Expense {
    Expense::new(ExpenseId(id), GroupId(10), UserId(payer), Amount::from_minor(minor))
}

fn validate_codes(ledger: &Ledger) -> Vec<ErrorCode> {
    validate(ledger).iter().map(|e| e.code).collect()
}

// ============================================================================
// Reference Errors (E1xxx)
// ============================================================================

#[test]
fn test_e1001_unknown_group() {
    let mut ledger = base_ledger();
    let mut e = expense(1, 1, 100);
    e.group = GroupId(77);
    ledger.expenses.push(e);

    let errors = validate(&ledger);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::UnknownGroup);
    assert!(errors[0].message.contains("77"));
}

#[test]
fn test_e1002_unknown_member() {
    let mut ledger = base_ledger();
    ledger.groups.push(Group::new(GroupId(11), "Home").with_members([UserId(1), UserId(42)]));

    assert_eq!(validate_codes(&ledger), vec![ErrorCode::UnknownMember]);
}

#[test]
fn test_e1003_duplicate_ids() {
    let mut ledger = base_ledger();
    ledger.users.push(User::new(UserId(2), "Bobby"));
    ledger.groups.push(Group::new(GroupId(10), "Again").with_member(UserId(1)));
    ledger.expenses.push(expense(5, 1, 100));
    ledger.expenses.push(expense(5, 2, 100));

    let codes = validate_codes(&ledger);
    assert_eq!(
        codes.iter().filter(|c| **c == ErrorCode::DuplicateId).count(),
        3,
        "expected one E1003 each for users, groups and expenses: {codes:?}"
    );
}

// ============================================================================
// Expense Errors (E2xxx)
// ============================================================================

#[test]
fn test_e2001_invalid_amount() {
    let mut ledger = base_ledger();
    ledger.expenses.push(expense(1, 1, 0));
    ledger.expenses.push(expense(2, 1, -100));
    ledger.expenses.push(expense(3, 1, Amount::MAX_EXPENSE.minor_units() + 1));
    ledger.expenses.push(expense(4, 1, Amount::MAX_EXPENSE.minor_units()));

    assert_eq!(
        validate_codes(&ledger),
        vec![ErrorCode::InvalidAmount; 3]
    );
}

#[test]
fn test_e2002_payer_not_member() {
    let mut ledger = base_ledger();
    ledger.users.push(User::new(UserId(4), "Dave"));
    ledger.expenses.push(expense(1, 4, 100));

    assert_eq!(validate_codes(&ledger), vec![ErrorCode::PayerNotMember]);
}

#[test]
fn test_e2003_invalid_split() {
    let mut ledger = base_ledger();
    ledger.expenses.push(
        expense(1, 1, 1000)
            .with_split(SplitPolicy::percentage([(UserId(1), 40), (UserId(2), 40), (UserId(3), 10)])),
    );
    ledger.expenses.push(
        expense(2, 1, 1000).with_split(SplitPolicy::percentage([(UserId(1), 50), (UserId(9), 50)])),
    );
    ledger.expenses.push(
        expense(3, 1, 1000).with_split(SplitPolicy::percentage([(UserId(1), 150), (UserId(2), -50)])),
    );

    let errors = validate(&ledger);
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e.code == ErrorCode::InvalidSplit));
    assert_eq!(errors[0].context.as_deref(), Some("expense 1"));
}

#[test]
fn test_e2004_empty_group() {
    let mut ledger = base_ledger();
    ledger.groups.push(Group::new(GroupId(11), "Nobody"));

    let errors = validate(&ledger);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::EmptyGroup);
    assert!(errors[0].message.contains("Nobody"));
}

// ============================================================================
// Deletion Warnings (E3xxx)
// ============================================================================

#[test]
fn test_e3001_unknown_deletion() {
    let mut ledger = base_ledger();
    ledger.deletions.push(ExpenseId(404));

    let errors = validate(&ledger);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::UnknownDeletion);
    assert_eq!(errors[0].severity(), Severity::Warning);
}

#[test]
fn test_e3002_duplicate_deletion() {
    let mut ledger = base_ledger();
    ledger.expenses.push(expense(1, 1, 100));
    ledger.deletions.extend([ExpenseId(1), ExpenseId(1)]);

    let errors = validate(&ledger);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::DuplicateDeletion);
    assert_eq!(errors[0].severity(), Severity::Warning);
}

#[test]
fn test_deleted_bad_expense_is_ignored() {
    let mut ledger = base_ledger();
    ledger.expenses.push(expense(1, 9, -1));
    ledger.deletions.push(ExpenseId(1));

    assert!(validate(&ledger).is_empty());
}

// ============================================================================
// Split Checks
// ============================================================================

#[test]
fn test_validate_split_rejections() {
    let people = [UserId(1), UserId(2)];

    assert_eq!(
        validate_split(Amount::from_minor(100), &SplitPolicy::Equal, &[]),
        Err(SplitError::EmptyParticipants)
    );
    assert_eq!(
        validate_split(Amount::ZERO, &SplitPolicy::Equal, &people),
        Err(SplitError::InvalidAmount(Amount::ZERO))
    );
    assert!(matches!(
        validate_split(
            Amount::from_minor(100),
            &SplitPolicy::percentage([(UserId(1), 99)]),
            &people
        ),
        Err(SplitError::InvalidSplit(_))
    ));
    assert_eq!(
        validate_split(Amount::from_minor(100), &SplitPolicy::Equal, &people),
        Ok(())
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Two-way percentages pass exactly when they total 100.
    #[test]
    fn prop_two_way_percentages(a in 0i32..=100, b in 0i32..=100, minor in 1i64..1_000_000) {
        let policy = SplitPolicy::percentage([(UserId(1), a), (UserId(2), b)]);
        let result = validate_split(Amount::from_minor(minor), &policy, &[UserId(1), UserId(2)]);
        prop_assert_eq!(result.is_ok(), a + b == 100);
    }
}
