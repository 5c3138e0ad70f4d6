//! Error types.
//!
//! Segmentation itself never fails from the caller's point of view: scanner
//! and rule errors are recovered inside the crate. Only rule-table loading
//! surfaces errors.

use thiserror::Error;

/// A widget name that is not part of [`crate::WidgetName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown widget `{0}`")]
pub struct UnknownWidget(pub String);

/// A tab designation other than `story`, `reflection` or `challenge`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tab `{0}` (expected story, reflection or challenge)")]
pub struct UnknownTab(pub String);

/// Internal scanner failure. Recovered by degrading to a single text block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A marker literal was empty and would match everywhere.
    #[error("marker {index} has an empty literal")]
    EmptyLiteral { index: usize },
    /// More markers than `limits::MAX_MARKERS`.
    #[error("more than {limit} markers")]
    TooManyMarkers { limit: usize },
    /// More marker matches than `limits::MAX_SCAN_MATCHES`.
    #[error("more than {limit} marker matches")]
    TooManyMatches { limit: usize },
}

/// Failure while applying a segmentation rule. Recovered by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// `Sequence`/`Guarded` nesting deeper than `limits::MAX_RULE_DEPTH`.
    #[error("rule nesting deeper than {limit}")]
    TooDeep { limit: usize },
}

/// Failure while loading a rule table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rule table: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("lesson range {start}..={end} is empty")]
    EmptyRange { start: u32, end: u32 },
    #[error("shape rule needs exactly one of `contains` or `known_tags = true`")]
    InvalidTrigger,
    #[error("empty literal in rule for {0}")]
    EmptyLiteral(String),
    #[error("invalid marker in rule for {context}: {reason}")]
    InvalidMarker { context: String, reason: &'static str },
}
