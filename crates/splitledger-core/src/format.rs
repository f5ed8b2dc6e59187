//! Money formatting at the display boundary.
//!
//! Amounts are integer minor units internally; this module renders them as
//! decimals with a currency code and, optionally, digit grouping.

use crate::amount::Amount;
use crate::balance::NetBalance;
use crate::expense::User;
use crate::id::UserId;
use std::collections::BTreeMap;

/// Formatter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Currency code appended to amounts (default: "USD").
    pub currency: String,
    /// Number of minor-unit digits (default: 2).
    pub scale: u32,
    /// Insert thousands separators.
    pub render_commas: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            scale: 2,
            render_commas: false,
        }
    }
}

impl FormatConfig {
    /// Create a new config for a currency and scale.
    #[must_use]
    pub fn new(currency: impl Into<String>, scale: u32) -> Self {
        Self {
            currency: currency.into(),
            scale,
            ..Default::default()
        }
    }

    /// Enable or disable thousands separators.
    #[must_use]
    pub const fn with_commas(mut self, render_commas: bool) -> Self {
        self.render_commas = render_commas;
        self
    }
}

/// Format an amount as `<number> <currency>`.
///
/// ```
/// use splitledger_core::{format_amount, Amount, FormatConfig};
///
/// let config = FormatConfig::default();
/// assert_eq!(format_amount(Amount::from_minor(1000), &config), "10.00 USD");
/// assert_eq!(format_amount(Amount::from_minor(-5), &config), "-0.05 USD");
/// ```
pub fn format_amount(amount: Amount, config: &FormatConfig) -> String {
    format!("{} {}", format_number(amount, config), config.currency)
}

/// Format just the decimal number of an amount.
pub fn format_number(amount: Amount, config: &FormatConfig) -> String {
    let number = amount.to_decimal(config.scale).to_string();
    if config.render_commas {
        add_commas(&number)
    } else {
        number
    }
}

/// Format a net balance as `<debtor> owes <creditor> <amount>`, using
/// display names where known.
pub fn format_net_balance(
    balance: &NetBalance,
    users: &BTreeMap<UserId, User>,
    config: &FormatConfig,
) -> String {
    format!(
        "{} owes {} {}",
        display_name(balance.debtor, users),
        display_name(balance.creditor, users),
        format_amount(balance.amount, config)
    )
}

/// A user's display name, falling back to `user#<id>`.
pub fn display_name(id: UserId, users: &BTreeMap<UserId, User>) -> String {
    users
        .get(&id)
        .map_or_else(|| format!("user#{id}"), |u| u.name.clone())
}

fn add_commas(number: &str) -> String {
    let (sign, unsigned) = number
        .strip_prefix('-')
        .map_or(("", number), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
