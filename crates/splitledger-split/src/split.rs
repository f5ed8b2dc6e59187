//! Share computation.
//!
//! Divides an expense amount among its participants in integer minor units.
//! Both policies hand out the units that integer division leaves over one at
//! a time, in ascending participant id order, so the shares always add up to
//! the amount exactly and identical input always yields identical output.

use splitledger_core::{Amount, Expense, ExpenseId, Share, SplitPolicy, UserId};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that reject a split before any share is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Amount is zero, negative, or above [`Amount::MAX_EXPENSE`].
    #[error("invalid amount {0}: must be positive and at most {max}", max = Amount::MAX_EXPENSE)]
    InvalidAmount(Amount),

    /// The payer is not among the participants.
    #[error("payer {0} is not a participant")]
    InvalidPayer(UserId),

    /// The percentage map is unusable.
    #[error("invalid split: {0}")]
    InvalidSplit(SplitIssue),

    /// Nobody to split between.
    #[error("split has no participants")]
    EmptyParticipants,
}

/// Why a percentage split was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitIssue {
    /// Percentages do not add up to exactly 100.
    #[error("percentages sum to {0}, expected 100")]
    BadTotal(i64),

    /// A percentage below zero.
    #[error("negative percentage {percent} for user {user}")]
    NegativePercentage {
        /// The participant.
        user: UserId,
        /// The rejected percentage.
        percent: i32,
    },

    /// A percentage above 100.
    #[error("percentage {percent} for user {user} exceeds 100")]
    PercentageTooLarge {
        /// The participant.
        user: UserId,
        /// The rejected percentage.
        percent: i32,
    },

    /// A percentage given for someone outside the participant set.
    #[error("user {0} has a percentage but is not a participant")]
    UnknownParticipant(UserId),
}

/// Compute every participant's exact share of an expense.
///
/// Participants are deduplicated and ordered by id; the result holds one
/// share per participant (zero shares included) in that order.
///
/// # Errors
///
/// Checked in order, before anything is computed:
/// [`SplitError::EmptyParticipants`], [`SplitError::InvalidAmount`],
/// [`SplitError::InvalidPayer`], [`SplitError::InvalidSplit`].
///
/// # Example
///
/// ```
/// use splitledger_core::{Amount, ExpenseId, SplitPolicy, UserId};
/// use splitledger_split::compute_shares;
///
/// let people = [UserId(1), UserId(2), UserId(3)];
/// let shares = compute_shares(
///     ExpenseId(1),
///     Amount::from_minor(1000),
///     &SplitPolicy::Equal,
///     &people,
///     UserId(1),
/// )
/// .unwrap();
///
/// let cents: Vec<i64> = shares.iter().map(|s| s.amount.minor_units()).collect();
/// assert_eq!(cents, vec![334, 333, 333]);
/// ```
pub fn compute_shares(
    expense: ExpenseId,
    amount: Amount,
    policy: &SplitPolicy,
    participants: &[UserId],
    payer: UserId,
) -> Result<Vec<Share>, SplitError> {
    let participants = normalize_participants(participants);

    check_participants(&participants)?;
    check_amount(amount)?;
    if !participants.contains(&payer) {
        return Err(SplitError::InvalidPayer(payer));
    }

    let amounts = match policy {
        SplitPolicy::Equal => equal_amounts(amount, participants.len()),
        SplitPolicy::Percentage { percentages } => {
            check_percentages(percentages, &participants)?;
            percentage_amounts(amount, &participants, percentages)
        }
    };

    Ok(participants
        .into_iter()
        .zip(amounts)
        .map(|(participant, amount)| Share {
            expense,
            participant,
            amount,
        })
        .collect())
}

/// Compute the shares of a recorded expense among `participants`.
pub fn split_expense(expense: &Expense, participants: &[UserId]) -> Result<Vec<Share>, SplitError> {
    compute_shares(
        expense.id,
        expense.amount,
        &expense.split,
        participants,
        expense.payer,
    )
}

/// Check a split without computing shares and without a payer.
///
/// This is the subset of [`compute_shares`]' checks that the expense
/// creation flow can run before a payer is chosen.
pub fn check_split(
    amount: Amount,
    policy: &SplitPolicy,
    participants: &[UserId],
) -> Result<(), SplitError> {
    let participants = normalize_participants(participants);
    check_participants(&participants)?;
    check_amount(amount)?;
    if let SplitPolicy::Percentage { percentages } = policy {
        check_percentages(percentages, &participants)?;
    }
    Ok(())
}

fn normalize_participants(participants: &[UserId]) -> BTreeSet<UserId> {
    participants.iter().copied().collect()
}

fn check_participants(participants: &BTreeSet<UserId>) -> Result<(), SplitError> {
    if participants.is_empty() {
        Err(SplitError::EmptyParticipants)
    } else {
        Ok(())
    }
}

fn check_amount(amount: Amount) -> Result<(), SplitError> {
    if amount.is_positive() && amount <= Amount::MAX_EXPENSE {
        Ok(())
    } else {
        Err(SplitError::InvalidAmount(amount))
    }
}

fn check_percentages(
    percentages: &BTreeMap<UserId, i32>,
    participants: &BTreeSet<UserId>,
) -> Result<(), SplitError> {
    let mut total: i64 = 0;
    for (&user, &percent) in percentages {
        if percent < 0 {
            return Err(SplitError::InvalidSplit(SplitIssue::NegativePercentage {
                user,
                percent,
            }));
        }
        if percent > 100 {
            return Err(SplitError::InvalidSplit(SplitIssue::PercentageTooLarge {
                user,
                percent,
            }));
        }
        if !participants.contains(&user) {
            return Err(SplitError::InvalidSplit(SplitIssue::UnknownParticipant(
                user,
            )));
        }
        total += i64::from(percent);
    }

    if total == 100 {
        Ok(())
    } else {
        Err(SplitError::InvalidSplit(SplitIssue::BadTotal(total)))
    }
}

/// `amount / n` for everyone, plus one unit each for the first
/// `amount % n` participants.
fn equal_amounts(amount: Amount, n: usize) -> Vec<Amount> {
    let total = amount.minor_units();
    let n_units = n as i64;
    let base = total / n_units;
    let remainder = (total - base * n_units) as usize;

    (0..n)
        .map(|i| {
            if i < remainder {
                Amount::from_minor(base + 1)
            } else {
                Amount::from_minor(base)
            }
        })
        .collect()
}

/// Floor of `amount * percent / 100` for everyone, then leftover units one
/// at a time to participants with a positive percentage, lowest id first.
fn percentage_amounts(
    amount: Amount,
    participants: &BTreeSet<UserId>,
    percentages: &BTreeMap<UserId, i32>,
) -> Vec<Amount> {
    let total = i128::from(amount.minor_units());
    let percent_of = |user: &UserId| i128::from(percentages.get(user).copied().unwrap_or(0));

    let mut units: Vec<i128> = participants
        .iter()
        .map(|user| total * percent_of(user) / 100)
        .collect();

    let mut leftover = total - units.iter().sum::<i128>();
    // Each floor loses less than one unit, so a single pass always suffices.
    debug_assert!(leftover >= 0);
    for (slot, user) in units.iter_mut().zip(participants) {
        if leftover == 0 {
            break;
        }
        if percent_of(user) > 0 {
            *slot += 1;
            leftover -= 1;
        }
    }
    debug_assert_eq!(leftover, 0);

    units.into_iter().map(Amount::from_i128_saturating).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<UserId> {
        raw.iter().copied().map(UserId).collect()
    }

    fn cents(shares: &[Share]) -> Vec<(u64, i64)> {
        shares
            .iter()
            .map(|s| (s.participant.get(), s.amount.minor_units()))
            .collect()
    }

    #[test]
    fn test_equal_even() {
        let shares = compute_shares(
            ExpenseId(1),
            Amount::from_minor(3000),
            &SplitPolicy::Equal,
            &ids(&[1, 2, 3]),
            UserId(1),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(1, 1000), (2, 1000), (3, 1000)]);
        assert!(shares.iter().all(|s| s.expense == ExpenseId(1)));
    }

    #[test]
    fn test_equal_remainder_goes_to_lowest_ids() {
        let shares = compute_shares(
            ExpenseId(1),
            Amount::from_minor(1000),
            &SplitPolicy::Equal,
            &ids(&[3, 1, 2]),
            UserId(2),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(1, 334), (2, 333), (3, 333)]);

        let shares = compute_shares(
            ExpenseId(1),
            Amount::from_minor(1001),
            &SplitPolicy::Equal,
            &ids(&[7, 5, 6]),
            UserId(7),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(5, 334), (6, 334), (7, 333)]);
    }

    #[test]
    fn test_equal_fewer_units_than_people() {
        let shares = compute_shares(
            ExpenseId(1),
            Amount::from_minor(2),
            &SplitPolicy::Equal,
            &ids(&[1, 2, 3, 4]),
            UserId(4),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(1, 1), (2, 1), (3, 0), (4, 0)]);
    }

    #[test]
    fn test_duplicate_participants_collapse() {
        let shares = compute_shares(
            ExpenseId(1),
            Amount::from_minor(100),
            &SplitPolicy::Equal,
            &ids(&[2, 1, 2]),
            UserId(1),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(1, 50), (2, 50)]);
    }

    #[test]
    fn test_percentage_exact() {
        let policy = SplitPolicy::percentage([(UserId(1), 50), (UserId(3), 50)]);
        let shares = compute_shares(
            ExpenseId(2),
            Amount::from_minor(2000),
            &policy,
            &ids(&[1, 2, 3]),
            UserId(2),
        )
        .unwrap();
        // Payer is a participant with no percentage: share 0
        assert_eq!(cents(&shares), vec![(1, 1000), (2, 0), (3, 1000)]);
    }

    #[test]
    fn test_percentage_leftover_distribution() {
        // 101 * {34, 33, 33}: floors {34, 33, 33} = 100, leftover 1 -> id 1
        let policy = SplitPolicy::percentage([(UserId(1), 34), (UserId(2), 33), (UserId(3), 33)]);
        let shares = compute_shares(
            ExpenseId(3),
            Amount::from_minor(101),
            &policy,
            &ids(&[1, 2, 3]),
            UserId(1),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(1, 35), (2, 33), (3, 33)]);
    }

    #[test]
    fn test_percentage_leftover_skips_zero_percent() {
        // 5 * {0, 50, 50}: floors {0, 2, 2}, leftover 1 goes to id 2, not id 1
        let policy = SplitPolicy::percentage([(UserId(1), 0), (UserId(2), 50), (UserId(3), 50)]);
        let shares = compute_shares(
            ExpenseId(4),
            Amount::from_minor(5),
            &policy,
            &ids(&[1, 2, 3]),
            UserId(1),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(1, 0), (2, 3), (3, 2)]);
    }

    #[test]
    fn test_percentage_must_sum_to_100() {
        let participants = ids(&[1, 2, 3]);
        let bad = SplitPolicy::percentage([(UserId(1), 40), (UserId(2), 40), (UserId(3), 10)]);
        let err = compute_shares(
            ExpenseId(1),
            Amount::from_minor(1000),
            &bad,
            &participants,
            UserId(1),
        )
        .unwrap_err();
        assert_eq!(err, SplitError::InvalidSplit(SplitIssue::BadTotal(90)));

        let good = SplitPolicy::percentage([(UserId(1), 40), (UserId(2), 40), (UserId(3), 20)]);
        let shares = compute_shares(
            ExpenseId(1),
            Amount::from_minor(1000),
            &good,
            &participants,
            UserId(1),
        )
        .unwrap();
        assert_eq!(cents(&shares), vec![(1, 400), (2, 400), (3, 200)]);
    }

    #[test]
    fn test_percentage_absent_is_invalid() {
        let empty = SplitPolicy::Percentage {
            percentages: BTreeMap::new(),
        };
        let err = compute_shares(
            ExpenseId(1),
            Amount::from_minor(1000),
            &empty,
            &ids(&[1, 2]),
            UserId(1),
        )
        .unwrap_err();
        assert_eq!(err, SplitError::InvalidSplit(SplitIssue::BadTotal(0)));
    }

    #[test]
    fn test_negative_percentage() {
        let policy = SplitPolicy::percentage([(UserId(1), 110), (UserId(2), -10)]);
        let err = compute_shares(
            ExpenseId(1),
            Amount::from_minor(1000),
            &policy,
            &ids(&[1, 2]),
            UserId(1),
        )
        .unwrap_err();
        // Map iteration is by id, so user 1's 110 is seen first
        assert_eq!(
            err,
            SplitError::InvalidSplit(SplitIssue::PercentageTooLarge {
                user: UserId(1),
                percent: 110
            })
        );

        let policy = SplitPolicy::percentage([(UserId(1), -10), (UserId(2), 110)]);
        let err = check_split(Amount::from_minor(1000), &policy, &ids(&[1, 2])).unwrap_err();
        assert_eq!(
            err,
            SplitError::InvalidSplit(SplitIssue::NegativePercentage {
                user: UserId(1),
                percent: -10
            })
        );
    }

    #[test]
    fn test_percentage_for_outsider() {
        let policy = SplitPolicy::percentage([(UserId(1), 50), (UserId(9), 50)]);
        let err = check_split(Amount::from_minor(1000), &policy, &ids(&[1, 2])).unwrap_err();
        assert_eq!(
            err,
            SplitError::InvalidSplit(SplitIssue::UnknownParticipant(UserId(9)))
        );
    }

    #[test]
    fn test_invalid_amount() {
        for bad in [0, -1, Amount::MAX_EXPENSE.minor_units() + 1] {
            let err = compute_shares(
                ExpenseId(1),
                Amount::from_minor(bad),
                &SplitPolicy::Equal,
                &ids(&[1, 2]),
                UserId(1),
            )
            .unwrap_err();
            assert_eq!(err, SplitError::InvalidAmount(Amount::from_minor(bad)));
        }
    }

    #[test]
    fn test_max_amount_accepted() {
        let policy = SplitPolicy::percentage([(UserId(1), 33), (UserId(2), 67)]);
        let shares = compute_shares(
            ExpenseId(1),
            Amount::MAX_EXPENSE,
            &policy,
            &ids(&[1, 2]),
            UserId(1),
        )
        .unwrap();
        let total: Amount = shares.iter().map(|s| s.amount).sum();
        assert_eq!(total, Amount::MAX_EXPENSE);
    }

    #[test]
    fn test_invalid_payer() {
        let err = compute_shares(
            ExpenseId(1),
            Amount::from_minor(1000),
            &SplitPolicy::Equal,
            &ids(&[1, 2]),
            UserId(3),
        )
        .unwrap_err();
        assert_eq!(err, SplitError::InvalidPayer(UserId(3)));
    }

    #[test]
    fn test_empty_participants_checked_first() {
        let err = compute_shares(
            ExpenseId(1),
            Amount::from_minor(-5),
            &SplitPolicy::Equal,
            &[],
            UserId(1),
        )
        .unwrap_err();
        assert_eq!(err, SplitError::EmptyParticipants);
    }

    #[test]
    fn test_split_expense_uses_expense_fields() {
        let expense = Expense::new(
            ExpenseId(9),
            splitledger_core::GroupId(1),
            UserId(2),
            Amount::from_minor(10),
        );
        let shares = split_expense(&expense, &ids(&[1, 2, 3])).unwrap();
        assert_eq!(cents(&shares), vec![(1, 4), (2, 3), (3, 3)]);
        assert!(shares.iter().all(|s| s.expense == ExpenseId(9)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SplitError::InvalidSplit(SplitIssue::BadTotal(90)).to_string(),
            "invalid split: percentages sum to 90, expected 100"
        );
        assert_eq!(
            SplitError::InvalidPayer(UserId(3)).to_string(),
            "payer 3 is not a participant"
        );
    }
}
