//! Core domain models for name validation results and crate errors
//!
//! Architecture: Rich Domain Models - A validation outcome carries its own failure reason
//! - ValidationResult keeps the valid/invalid invariant behind read-only accessors
//! - ValidationError is the closed taxonomy of rejection reasons, each with a fixed message
//! - BatchReport acts as an aggregate root over many validation outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason a raw name was rejected by the sanitizer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Input was empty or contained only whitespace
    #[error("empty input")]
    EmptyInput,

    /// Input exceeded the configured maximum length
    #[error("input too long")]
    TooLong { max_length: usize },

    /// Input matched a deny-list rule
    #[error("invalid characters detected")]
    DangerousPattern { rule_id: String },

    /// Normalized input fell outside the allowed character set
    #[error("only letters, numbers, and hyphens allowed")]
    InvalidCharacterSet,
}

impl ValidationError {
    /// Stable snake_case code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::TooLong { .. } => "too_long",
            Self::DangerousPattern { .. } => "dangerous_pattern",
            Self::InvalidCharacterSet => "invalid_character_set",
        }
    }
}

/// Outcome of validating one raw name
///
/// Exactly one of `is_valid()` or a non-empty `error_message()` holds, and the
/// sanitized value is non-empty only for valid results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    sanitized_value: String,
    error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ValidationError>,
}

impl ValidationResult {
    pub(crate) fn valid(sanitized_value: impl Into<String>) -> Self {
        let sanitized_value = sanitized_value.into();
        debug_assert!(!sanitized_value.is_empty());
        Self { is_valid: true, sanitized_value, error_message: String::new(), error: None }
    }

    pub(crate) fn invalid(error: ValidationError) -> Self {
        Self {
            is_valid: false,
            sanitized_value: String::new(),
            error_message: error.to_string(),
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Trimmed, lowercased name; empty when invalid
    pub fn sanitized_value(&self) -> &str {
        &self.sanitized_value
    }

    /// Fixed rejection message; empty when valid
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Convert into a `Result`, yielding the sanitized value on success
    pub fn into_result(self) -> Result<String, ValidationError> {
        match self.error {
            None => Ok(self.sanitized_value),
            Some(error) => Err(error),
        }
    }
}

/// Count of rejected inputs by failure kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureCounts {
    pub empty_input: usize,
    pub too_long: usize,
    pub dangerous_pattern: usize,
    pub invalid_character_set: usize,
}

impl FailureCounts {
    pub fn total(&self) -> usize {
        self.empty_input + self.too_long + self.dangerous_pattern + self.invalid_character_set
    }

    pub fn add(&mut self, error: &ValidationError) {
        match error {
            ValidationError::EmptyInput => self.empty_input += 1,
            ValidationError::TooLong { .. } => self.too_long += 1,
            ValidationError::DangerousPattern { .. } => self.dangerous_pattern += 1,
            ValidationError::InvalidCharacterSet => self.invalid_character_set += 1,
        }
    }
}

/// Summary statistics for a batch of validations
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Number of inputs checked
    pub total: usize,
    /// Number of inputs accepted
    pub valid: usize,
    /// Rejections broken down by reason
    pub failures: FailureCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when validation was performed
    pub validated_at: DateTime<Utc>,
}

/// A fragment of input matched by a deny rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub rule_id: String,
    pub category: String,
    pub matched_text: String,
    /// Byte offset of the match within the scanned input
    pub offset: usize,
}

/// One input and its validation outcome
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub input: String,
    pub result: ValidationResult,
    /// Every deny rule the input tripped; empty unless rejected as dangerous
    pub matches: Vec<PatternMatch>,
}

/// Validation outcomes for a list of names, in input order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Create a new empty batch report
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            summary: BatchSummary { validated_at: Utc::now(), ..Default::default() },
        }
    }

    /// Add an outcome to the report
    pub fn add_entry(&mut self, input: impl Into<String>, result: ValidationResult) {
        self.add_entry_with_matches(input, result, Vec::new());
    }

    /// Add an outcome together with the deny rules that explain it
    pub fn add_entry_with_matches(
        &mut self,
        input: impl Into<String>,
        result: ValidationResult,
        matches: Vec<PatternMatch>,
    ) {
        self.summary.total += 1;
        match result.error() {
            None => self.summary.valid += 1,
            Some(error) => self.summary.failures.add(error),
        }
        self.entries.push(BatchEntry { input: input.into(), result, matches });
    }

    /// Whether any input was rejected
    pub fn has_invalid(&self) -> bool {
        self.summary.failures.total() > 0
    }

    pub fn invalid_entries(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.result.is_valid())
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur outside the sanitizer itself
#[derive(Debug, thiserror::Error)]
pub enum PokedexError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Pattern compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// A name was rejected before any request was made
    #[error("Invalid name: {0}")]
    Validation(#[from] ValidationError),

    /// The API has no Pokémon with this name
    #[error("Pokémon '{name}' not found")]
    NotFound { name: String },

    /// The API answered with an unexpected status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Transport or decoding failure
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Report could not be rendered
    #[error("Report error: {message}")]
    Report { message: String },
}

impl PokedexError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    /// Create a report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report { message: message.into() }
    }
}

/// Result type for Pokedex operations
pub type PokedexResult<T> = Result<T, PokedexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_result_invariant() {
        let result = ValidationResult::valid("pikachu");

        assert!(result.is_valid());
        assert_eq!(result.sanitized_value(), "pikachu");
        assert_eq!(result.error_message(), "");
        assert!(result.error().is_none());
    }

    #[test]
    fn test_invalid_result_invariant() {
        let result = ValidationResult::invalid(ValidationError::TooLong { max_length: 50 });

        assert!(!result.is_valid());
        assert_eq!(result.sanitized_value(), "");
        assert_eq!(result.error_message(), "input too long");
        assert_eq!(result.error().map(|e| e.code()), Some("too_long"));
    }

    #[test]
    fn test_error_messages_are_fixed() {
        assert_eq!(ValidationError::EmptyInput.to_string(), "empty input");
        assert_eq!(
            ValidationError::DangerousPattern { rule_id: "sql_keywords".to_string() }.to_string(),
            "invalid characters detected"
        );
        assert_eq!(
            ValidationError::InvalidCharacterSet.to_string(),
            "only letters, numbers, and hyphens allowed"
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationResult::valid("mew").into_result(), Ok("mew".to_string()));
        assert_eq!(
            ValidationResult::invalid(ValidationError::EmptyInput).into_result(),
            Err(ValidationError::EmptyInput)
        );
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::new();
        report.add_entry("pikachu", ValidationResult::valid("pikachu"));
        report.add_entry("", ValidationResult::invalid(ValidationError::EmptyInput));
        report.add_entry(
            "a;b",
            ValidationResult::invalid(ValidationError::DangerousPattern {
                rule_id: "statement_terminators".to_string(),
            }),
        );

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.valid, 1);
        assert_eq!(report.summary.failures.empty_input, 1);
        assert_eq!(report.summary.failures.dangerous_pattern, 1);
        assert!(report.has_invalid());
        assert_eq!(report.invalid_entries().count(), 2);
    }

    #[test]
    fn test_batch_entry_keeps_matches() {
        let mut report = BatchReport::new();
        report.add_entry_with_matches(
            "a/b",
            ValidationResult::invalid(ValidationError::DangerousPattern {
                rule_id: "path_separators".to_string(),
            }),
            vec![PatternMatch {
                rule_id: "path_separators".to_string(),
                category: "traversal".to_string(),
                matched_text: "/".to_string(),
                offset: 1,
            }],
        );
        report.add_entry("mew", ValidationResult::valid("mew"));

        assert_eq!(report.summary.failures.dangerous_pattern, 1);
        assert_eq!(report.entries[0].matches[0].offset, 1);
        assert!(report.entries[1].matches.is_empty());

        let json = serde_json::to_value(&report.entries[0]).unwrap();
        assert_eq!(json["matches"][0]["rule_id"], "path_separators");
        assert_eq!(json["matches"][0]["matched_text"], "/");
    }

    #[test]
    fn test_validation_error_serializes_with_kind_tag() {
        let json = serde_json::to_value(ValidationError::DangerousPattern {
            rule_id: "angle_brackets".to_string(),
        })
        .unwrap();

        assert_eq!(json["kind"], "dangerous_pattern");
        assert_eq!(json["rule_id"], "angle_brackets");
    }
}
