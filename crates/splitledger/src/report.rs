//! Rendering of command results as text or JSON.

use serde::Serialize;
use splitledger_balance::UserBalanceSummary;
use splitledger_core::{
    display_name, format_amount, format_net_balance, format_number, Amount, FormatConfig, Group,
    GroupId, Ledger, MemberPosition, NetBalance, User, UserId,
};
use splitledger_loader::OptionWarning;
use splitledger_validate::{Severity, ValidationError};
use std::collections::BTreeMap;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

/// Everything `sledger-balances` shows for one group.
#[derive(Debug, Clone)]
pub struct GroupReport {
    /// The group.
    pub group: Group,
    /// Net balances, in pair order.
    pub balances: Vec<NetBalance>,
    /// Every member's position, zero positions included.
    pub positions: Vec<MemberPosition>,
    /// Sum of live expense amounts.
    pub total: Amount,
}

/// A net balance in JSON output.
#[derive(Debug, Serialize)]
pub struct JsonBalance {
    /// Debtor id.
    pub debtor: UserId,
    /// Debtor display name.
    pub debtor_name: String,
    /// Creditor id.
    pub creditor: UserId,
    /// Creditor display name.
    pub creditor_name: String,
    /// Decimal amount, e.g. `"10.00"`.
    pub amount: String,
}

impl JsonBalance {
    fn new(balance: &NetBalance, users: &BTreeMap<UserId, User>, config: &FormatConfig) -> Self {
        Self {
            debtor: balance.debtor,
            debtor_name: display_name(balance.debtor, users),
            creditor: balance.creditor,
            creditor_name: display_name(balance.creditor, users),
            amount: decimal(balance.amount, config),
        }
    }
}

/// A member position in JSON output.
#[derive(Debug, Serialize)]
pub struct JsonPosition {
    /// Member id.
    pub user: UserId,
    /// Display name.
    pub name: String,
    /// Signed decimal amount; positive means the group owes the member.
    pub amount: String,
}

/// JSON output of `sledger-balances`.
#[derive(Debug, Serialize)]
pub struct JsonGroupReport {
    /// Group id.
    pub group: GroupId,
    /// Group name.
    pub name: String,
    /// Currency of every amount.
    pub currency: String,
    /// Net balances.
    pub balances: Vec<JsonBalance>,
    /// Member positions.
    pub positions: Vec<JsonPosition>,
    /// Total spent in the group.
    pub total_spent: String,
}

/// One group of a user summary in JSON output.
#[derive(Debug, Serialize)]
pub struct JsonSummaryGroup {
    /// Group id.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// Signed subtotal from the user's perspective.
    pub subtotal: String,
    /// Balances involving the user.
    pub balances: Vec<JsonBalance>,
}

/// JSON output of `sledger-summary`.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    /// User id.
    pub user: UserId,
    /// Display name.
    pub name: String,
    /// Currency of every amount.
    pub currency: String,
    /// Unsettled groups.
    pub groups: Vec<JsonSummaryGroup>,
    /// Total owed to the user.
    pub owed_to_user: String,
    /// Total the user owes.
    pub owed_by_user: String,
    /// Signed net total.
    pub total: String,
}

/// A diagnostic message in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// Ledger file path
    pub file: String,
    /// Severity: "error" or "warning"
    pub severity: String,
    /// Error code (e.g., "E1001")
    pub code: String,
    /// Error message
    pub message: String,
    /// Optional context information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl JsonDiagnostic {
    /// Diagnostic for a validation finding in `file`.
    pub fn from_validation(file: &str, error: &ValidationError) -> Self {
        Self {
            file: file.to_string(),
            severity: error.severity().to_string(),
            code: error.code.code().to_string(),
            message: error.message.clone(),
            context: error.context.clone(),
        }
    }

    /// Diagnostic for an option warning in `file`.
    pub fn from_option_warning(file: &str, warning: &OptionWarning) -> Self {
        Self {
            file: file.to_string(),
            severity: Severity::Warning.to_string(),
            code: warning.code.to_string(),
            message: warning.message.clone(),
            context: Some(format!("option \"{}\" = {}", warning.option, warning.value)),
        }
    }

    /// Whether this diagnostic fails the check.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error.to_string()
    }
}

/// JSON output structure for all diagnostics.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// List of diagnostics
    pub diagnostics: Vec<JsonDiagnostic>,
    /// Total error count
    pub error_count: usize,
    /// Total warning count
    pub warning_count: usize,
}

fn decimal(amount: Amount, config: &FormatConfig) -> String {
    amount.to_decimal(config.scale).to_string()
}

fn write_heading<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(writer)
}

/// Build the JSON form of a group report.
pub fn group_json(
    report: &GroupReport,
    users: &BTreeMap<UserId, User>,
    config: &FormatConfig,
) -> JsonGroupReport {
    JsonGroupReport {
        group: report.group.id,
        name: report.group.name.clone(),
        currency: config.currency.clone(),
        balances: report
            .balances
            .iter()
            .map(|b| JsonBalance::new(b, users, config))
            .collect(),
        positions: report
            .positions
            .iter()
            .map(|p| JsonPosition {
                user: p.user,
                name: display_name(p.user, users),
                amount: decimal(p.amount, config),
            })
            .collect(),
        total_spent: decimal(report.total, config),
    }
}

/// Write a group report as text.
pub fn write_group_text<W: Write>(
    report: &GroupReport,
    users: &BTreeMap<UserId, User>,
    config: &FormatConfig,
    writer: &mut W,
) -> io::Result<()> {
    write_heading(
        writer,
        &format!("{} (group {})", report.group.name, report.group.id),
    )?;

    if report.balances.is_empty() {
        writeln!(writer, "All settled up")?;
    } else {
        for balance in &report.balances {
            writeln!(writer, "{}", format_net_balance(balance, users, config))?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Positions")?;
    let width = report
        .positions
        .iter()
        .map(|p| display_name(p.user, users).len())
        .max()
        .unwrap_or(0);
    for position in &report.positions {
        writeln!(
            writer,
            "  {:<width$}  {:>15} {}",
            display_name(position.user, users),
            format_number(position.amount, config),
            config.currency
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "Total spent: {}", format_amount(report.total, config))
}

/// Build the JSON form of a user summary.
pub fn summary_json(
    summary: &UserBalanceSummary,
    ledger: &Ledger,
    config: &FormatConfig,
) -> JsonSummary {
    let users = ledger.users_by_id();
    JsonSummary {
        user: summary.user,
        name: display_name(summary.user, &users),
        currency: config.currency.clone(),
        groups: summary
            .groups
            .iter()
            .map(|(&id, group)| JsonSummaryGroup {
                id,
                name: group_name(ledger, id),
                subtotal: decimal(group.subtotal, config),
                balances: group
                    .balances
                    .iter()
                    .map(|b| JsonBalance::new(b, &users, config))
                    .collect(),
            })
            .collect(),
        owed_to_user: decimal(summary.owed_to_user, config),
        owed_by_user: decimal(summary.owed_by_user, config),
        total: decimal(summary.total, config),
    }
}

/// Write a user summary as text.
pub fn write_summary_text<W: Write>(
    summary: &UserBalanceSummary,
    ledger: &Ledger,
    config: &FormatConfig,
    writer: &mut W,
) -> io::Result<()> {
    let users = ledger.users_by_id();
    write_heading(
        writer,
        &format!("Summary for {}", display_name(summary.user, &users)),
    )?;

    if summary.is_settled() {
        writeln!(writer, "All settled up")?;
        writeln!(writer)?;
    }

    for (&id, group) in &summary.groups {
        writeln!(
            writer,
            "{} (group {id}): {}",
            group_name(ledger, id),
            signed(group.subtotal, config)
        )?;
        for balance in &group.balances {
            writeln!(writer, "  {}", format_net_balance(balance, &users, config))?;
        }
        writeln!(writer)?;
    }

    let rows = [
        ("Owed to you:", format_amount(summary.owed_to_user, config)),
        ("You owe:", format_amount(summary.owed_by_user, config)),
        ("Net:", signed(summary.total, config)),
    ];
    let width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    for (label, value) in rows {
        writeln!(writer, "{label:<13}{value:>width$}")?;
    }
    Ok(())
}

fn signed(amount: Amount, config: &FormatConfig) -> String {
    if amount.is_positive() {
        format!("+{}", format_amount(amount, config))
    } else {
        format_amount(amount, config)
    }
}

fn group_name(ledger: &Ledger, id: GroupId) -> String {
    ledger
        .group(id)
        .map_or_else(|| format!("group#{id}"), |g| g.name.clone())
}

/// Report validation errors to the given writer.
pub fn report_validation_errors<W: Write>(
    errors: &[ValidationError],
    writer: &mut W,
) -> io::Result<usize> {
    for error in errors {
        writeln!(
            writer,
            "{}[{}]: {}",
            error.severity(),
            error.code.code(),
            error.message
        )?;
        if let Some(ctx) = &error.context {
            writeln!(writer, "  context: {ctx}")?;
        }
        writeln!(writer)?;
    }

    Ok(errors.len())
}

/// Write diagnostics in the same layout as [`report_validation_errors`],
/// prefixed with the file they belong to.
pub fn write_diagnostics<W: Write>(diagnostics: &[JsonDiagnostic], writer: &mut W) -> io::Result<()> {
    for diag in diagnostics {
        writeln!(
            writer,
            "{}: {}[{}]: {}",
            diag.file, diag.severity, diag.code, diag.message
        )?;
        if let Some(ctx) = &diag.context {
            writeln!(writer, "  context: {ctx}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Print a summary of errors and warnings.
pub fn print_summary<W: Write>(errors: usize, warnings: usize, writer: &mut W) -> io::Result<()> {
    let error_text = if errors == 1 { "error" } else { "errors" };
    let warning_text = if warnings == 1 { "warning" } else { "warnings" };

    match (errors, warnings) {
        (0, 0) => writeln!(writer, "\x1b[32m\u{2713}\x1b[0m No errors found"),
        (0, _) => writeln!(writer, "\x1b[33m\u{26A0}\x1b[0m {warnings} {warning_text}"),
        (_, 0) => writeln!(writer, "\x1b[31m\u{2717}\x1b[0m {errors} {error_text}"),
        _ => writeln!(
            writer,
            "\x1b[31m\u{2717}\x1b[0m {errors} {error_text}, {warnings} {warning_text}"
        ),
    }
}
