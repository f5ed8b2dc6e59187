//! Ledger file loader.
//!
//! This crate reads an expense history from a JSON document and hands it to
//! the engine as a [`Ledger`]: users, groups, expenses and deletion events,
//! plus typed [`Options`].
//!
//! # Features
//!
//! - Decimal amounts converted to exact minor units at the configured scale
//! - Options with defaults and coded warnings for unknown or invalid values
//! - Partial results: a bad expense is reported and skipped, the rest loads
//!
//! # Example
//!
//! ```
//! use splitledger_loader::Loader;
//!
//! let source = r#"{
//!     "users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}],
//!     "groups": [{"id": 10, "name": "Trip", "members": [1, 2]}],
//!     "expenses": [
//!         {"id": 100, "group": 10, "amount": "30.00", "payer": 1, "split": {"type": "equal"}}
//!     ]
//! }"#;
//!
//! let result = Loader::new().load_str(source).unwrap();
//! assert!(result.errors.is_empty());
//! assert_eq!(result.ledger.expenses[0].amount.minor_units(), 3000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod options;

pub use options::{OptionWarning, Options};

use document::LedgerDoc;
use splitledger_core::{AmountError, ExpenseId, Ledger, UserId};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading a file.
    #[error("failed to read file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not have the ledger shape.
    #[error("invalid ledger document {name}: {source}")]
    Json {
        /// File path, or `<string>` for in-memory sources.
        name: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An expense amount is not a decimal number.
    #[error("expense {expense}: amount {value:?} is not a decimal number")]
    Decimal {
        /// The offending expense.
        expense: ExpenseId,
        /// The amount as written.
        value: String,
    },

    /// An expense amount cannot be represented in minor units.
    #[error("expense {expense}: invalid amount {value}: {source}")]
    Amount {
        /// The offending expense.
        expense: ExpenseId,
        /// The amount as written.
        value: String,
        /// Why the conversion failed.
        #[source]
        source: AmountError,
    },

    /// A percentage map key that is not a user id.
    #[error("expense {expense}: percentage key {key:?} is not a user id")]
    PercentageKey {
        /// The offending expense.
        expense: ExpenseId,
        /// The key as written.
        key: String,
    },

    /// Two percentage map keys that name the same user, e.g. `"2"` and `"02"`.
    #[error("expense {expense}: user {user} has more than one percentage")]
    DuplicatePercentage {
        /// The offending expense.
        expense: ExpenseId,
        /// The user named twice.
        user: UserId,
    },
}

/// Result of loading a ledger document.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded history. Expenses that failed to convert are absent.
    pub ledger: Ledger,
    /// Parsed options.
    pub options: Options,
    /// Per-expense errors encountered during loading.
    pub errors: Vec<LoadError>,
    /// The file the ledger came from, if any.
    pub path: Option<PathBuf>,
}

impl LoadResult {
    /// Whether anything was skipped.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Ledger document loader.
#[derive(Debug, Default)]
pub struct Loader {
    /// Options applied before the document's own `options` object.
    base_options: Options,
}

impl Loader {
    /// Create a new loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `options` instead of the defaults. The document's own
    /// options still take precedence.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.base_options = options;
        self
    }

    /// Load a ledger file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] in the following cases:
    ///
    /// - [`LoadError::Io`] - Failed to read the file
    /// - [`LoadError::Json`] - The file is not a ledger document
    ///
    /// Note: amount and percentage errors are collected in
    /// [`LoadResult::errors`] rather than returned directly, allowing
    /// partial results to be returned.
    pub fn load(&self, path: &Path) -> Result<LoadResult, LoadError> {
        let source = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut result = self.load_named(&source, &path.display().to_string())?;
        result.path = Some(path.to_path_buf());
        Ok(result)
    }

    /// Load a ledger from an in-memory document.
    pub fn load_str(&self, source: &str) -> Result<LoadResult, LoadError> {
        self.load_named(source, "<string>")
    }

    fn load_named(&self, source: &str, name: &str) -> Result<LoadResult, LoadError> {
        let doc: LedgerDoc = serde_json::from_str(source).map_err(|e| LoadError::Json {
            name: name.to_string(),
            source: e,
        })?;

        let mut options = self.base_options.clone();
        for (key, value) in &doc.options {
            options.set(key, value);
        }

        let mut errors = Vec::new();
        let mut expenses = Vec::with_capacity(doc.expenses.len());
        for raw in doc.expenses {
            match raw.into_expense(options.scale) {
                Ok(expense) => expenses.push(expense),
                Err(e) => errors.push(e),
            }
        }

        Ok(LoadResult {
            ledger: Ledger {
                users: doc.users,
                groups: doc.groups,
                expenses,
                deletions: doc.deletions,
            },
            options,
            errors,
            path: None,
        })
    }
}

/// Load a ledger file.
///
/// This is a convenience function that creates a loader and loads a single file.
pub fn load(path: &Path) -> Result<LoadResult, LoadError> {
    Loader::new().load(path)
}
