//! Ledger options parsing and storage.

use serde_json::Value;
use splitledger_core::{FormatConfig, MAX_SCALE};
use std::collections::BTreeMap;

/// Known option names.
const KNOWN_OPTIONS: &[&str] = &["currency", "scale", "render_commas"];

/// Option validation warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionWarning {
    /// Warning code (E4001, E4002).
    pub code: &'static str,
    /// Warning message.
    pub message: String,
    /// Option name.
    pub option: String,
    /// Option value, as written.
    pub value: String,
}

/// Ledger options, from the document's `options` object.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Currency code used when rendering amounts.
    pub currency: String,

    /// Number of minor-unit digits. Amounts with more fractional digits
    /// are rejected.
    pub scale: u32,

    /// Whether to group thousands with commas when rendering.
    pub render_commas: bool,

    /// Unknown options, kept as given.
    pub custom: BTreeMap<String, Value>,

    /// Validation warnings collected while setting options.
    pub warnings: Vec<OptionWarning>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// Create new options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            currency: "USD".to_string(),
            scale: 2,
            render_commas: false,
            custom: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Set an option by name.
    ///
    /// Invalid values leave the current value in place; both invalid values
    /// and unknown names are recorded in `self.warnings`.
    pub fn set(&mut self, key: &str, value: &Value) {
        if !KNOWN_OPTIONS.contains(&key) {
            self.warn("E4001", format!("Unknown option \"{key}\""), key, value);
            self.custom.insert(key.to_string(), value.clone());
            return;
        }

        match key {
            "currency" => match value.as_str().map(str::trim) {
                Some(code) if !code.is_empty() => self.currency = code.to_string(),
                _ => self.warn(
                    "E4002",
                    format!("Invalid value {value} for option \"{key}\": expected currency code"),
                    key,
                    value,
                ),
            },
            "scale" => match value.as_u64() {
                Some(scale) if scale <= u64::from(MAX_SCALE) => self.scale = scale as u32,
                _ => self.warn(
                    "E4002",
                    format!(
                        "Invalid value {value} for option \"{key}\": expected integer 0 to {MAX_SCALE}"
                    ),
                    key,
                    value,
                ),
            },
            "render_commas" => match value.as_bool() {
                Some(flag) => self.render_commas = flag,
                None => self.warn(
                    "E4002",
                    format!("Invalid value {value} for option \"{key}\": expected true or false"),
                    key,
                    value,
                ),
            },
            _ => {}
        }
    }

    /// Get a custom option value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.custom.get(key)
    }

    /// Rendering settings derived from these options.
    #[must_use]
    pub fn format_config(&self) -> FormatConfig {
        FormatConfig::new(self.currency.clone(), self.scale).with_commas(self.render_commas)
    }

    fn warn(&mut self, code: &'static str, message: String, key: &str, value: &Value) {
        self.warnings.push(OptionWarning {
            code,
            message,
            option: key.to_string(),
            value: value.to_string(),
        });
    }
}
