//! Error types for formula parsing and analysis
//!
//! Only a formula that cannot be turned into an evaluable expression is a
//! hard failure. Everything that goes wrong after that point degrades to a
//! placeholder inside an otherwise complete report.

/// Errors surfaced to callers of the analysis API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The formula was empty after trimming.
    #[error("Expression is empty")]
    EmptyExpression,

    /// The normalised formula could not be parsed into an expression tree.
    #[error("Cannot parse `{expr}`: {reason}")]
    Parse {
        /// Canonical text that failed to parse
        expr: String,
        /// Parser diagnostic
        reason: String,
    },

    /// An analysis interval must satisfy `lo < hi` with finite bounds.
    #[error("Invalid interval [{lo}, {hi}]: lower bound must be finite and below the upper bound")]
    InvalidInterval {
        /// Requested lower bound
        lo: f64,
        /// Requested upper bound
        hi: f64,
    },

    /// The analysis configuration could not be deserialised.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for the parse failures a caller must report to the user.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::EmptyExpression | Error::Parse { .. })
    }
}

/// Result type for curve analysis
pub type Result<T> = std::result::Result<T, Error>;
