//! Initial percentage suggestions for the expense creation flow.
//!
//! Purely cosmetic: the suggestion only pre-fills a form. It has no bearing
//! on how leftover units are distributed when shares are computed.

use splitledger_core::UserId;
use std::collections::{BTreeMap, BTreeSet};

/// Suggest integer percentages that add up to 100.
///
/// Everyone gets `100 / n`; the participant with the highest id absorbs the
/// remainder. Returns an empty map for no participants.
///
/// ```
/// use splitledger_core::UserId;
/// use splitledger_split::suggest_percentages;
///
/// let suggestion = suggest_percentages(&[UserId(1), UserId(2), UserId(3)]);
/// assert_eq!(suggestion.values().copied().collect::<Vec<_>>(), vec![33, 33, 34]);
/// ```
pub fn suggest_percentages(participants: &[UserId]) -> BTreeMap<UserId, i32> {
    let participants: BTreeSet<UserId> = participants.iter().copied().collect();
    let Some(&last) = participants.last() else {
        return BTreeMap::new();
    };

    let n = participants.len() as i32;
    let each = 100 / n;
    participants
        .into_iter()
        .map(|user| {
            let percent = if user == last { 100 - each * (n - 1) } else { each };
            (user, percent)
        })
        .collect()
}
