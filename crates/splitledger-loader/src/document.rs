//! Wire shape of the JSON ledger document.
//!
//! These types mirror the file exactly and convert into the core model.
//! Percentage maps are keyed by strings here because JSON object keys are
//! always strings.

use crate::LoadError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use splitledger_core::{Amount, Expense, ExpenseId, Group, GroupId, SplitPolicy, User, UserId};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LedgerDoc {
    pub options: Map<String, Value>,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub expenses: Vec<ExpenseDoc>,
    pub deletions: Vec<ExpenseId>,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseDoc {
    pub id: ExpenseId,
    pub group: GroupId,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: AmountDoc,
    pub payer: UserId,
    #[serde(default)]
    pub split: SplitDoc,
}

/// A decimal amount written either as a string (`"30.00"`) or a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountDoc {
    Text(String),
    Number(Number),
}

impl fmt::Display for AmountDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SplitDoc {
    #[default]
    Equal,
    Percentage {
        percentages: BTreeMap<String, i32>,
    },
}

impl ExpenseDoc {
    /// Convert into a core [`Expense`], with amounts at `scale` minor digits.
    pub fn into_expense(self, scale: u32) -> Result<Expense, LoadError> {
        let text = self.amount.to_string();
        let number = parse_decimal(text.trim()).ok_or_else(|| LoadError::Decimal {
            expense: self.id,
            value: text.clone(),
        })?;
        let amount = Amount::from_decimal(number, scale).map_err(|source| LoadError::Amount {
            expense: self.id,
            value: text,
            source,
        })?;

        let split = match self.split {
            SplitDoc::Equal => SplitPolicy::Equal,
            SplitDoc::Percentage { percentages } => {
                let mut entries = BTreeMap::new();
                for (key, percent) in percentages {
                    let user = key
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| LoadError::PercentageKey {
                            expense: self.id,
                            key: key.clone(),
                        })?;
                    // "2" and "02" name the same user.
                    if entries.insert(UserId(user), percent).is_some() {
                        return Err(LoadError::DuplicatePercentage {
                            expense: self.id,
                            user: UserId(user),
                        });
                    }
                }
                SplitPolicy::percentage(entries)
            }
        };

        let mut expense = Expense::new(self.id, self.group, self.payer, amount).with_split(split);
        expense.description = self.description;
        Ok(expense)
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
