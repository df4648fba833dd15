//! Name sanitization before a value becomes a URL path segment
//!
//! Architecture: Domain Service - NameSanitizer is a pure function over owned, immutable tables
//! - Checks run empty -> length -> deny-list -> allow-list and stop at the first failure
//! - The deny-list scans the raw input so casing and padding cannot hide a fragment
//! - The allow-list is applied to the normalized value as a second, stricter gate

use crate::config::PokedexConfig;
use crate::domain::validation::{PokedexError, PokedexResult, ValidationError, ValidationResult};
use crate::patterns::{DenyList, PatternMatch};
use regex::Regex;

/// Validates and normalizes free-text Pokémon names
#[derive(Debug, Clone)]
pub struct NameSanitizer {
    max_length: usize,
    deny_list: DenyList,
    allow: Regex,
}

impl NameSanitizer {
    /// Build a sanitizer from the sanitizer settings and deny rules of a configuration
    pub fn new(config: &PokedexConfig) -> PokedexResult<Self> {
        let allow = Regex::new(&config.sanitizer.allow_pattern).map_err(|e| {
            PokedexError::pattern(format!(
                "Invalid allow pattern '{}': {}",
                config.sanitizer.allow_pattern, e
            ))
        })?;

        Ok(Self {
            max_length: config.sanitizer.max_length,
            deny_list: DenyList::from_config(config)?,
            allow,
        })
    }

    /// Sanitizer with the built-in deny-list and allow-list
    pub fn with_defaults() -> PokedexResult<Self> {
        Self::new(&PokedexConfig::default())
    }

    /// Validate a raw name and produce its canonical form
    pub fn validate(&self, raw: &str) -> ValidationResult {
        match self.check(raw) {
            Ok(candidate) => ValidationResult::valid(candidate),
            Err(error) => {
                tracing::debug!("Rejected input {:?}: {}", raw, error.code());
                ValidationResult::invalid(error)
            }
        }
    }

    /// Whether no deny rule matches the input; empty input is never safe
    pub fn is_safe_input(&self, raw: &str) -> bool {
        !raw.is_empty() && !self.deny_list.is_match(raw)
    }

    /// Every deny rule the raw input trips, for diagnostics
    pub fn explain(&self, raw: &str) -> Vec<PatternMatch> {
        self.deny_list.matches(raw)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn deny_list(&self) -> &DenyList {
        &self.deny_list
    }

    fn check(&self, raw: &str) -> Result<String, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        let candidate = trimmed.to_lowercase();

        // Padding counts toward the limit
        if raw.chars().count() > self.max_length {
            return Err(ValidationError::TooLong { max_length: self.max_length });
        }

        if let Some(found) = self.deny_list.first_match(raw) {
            return Err(ValidationError::DangerousPattern { rule_id: found.rule_id });
        }

        if !self.allow.is_match(&candidate) {
            return Err(ValidationError::InvalidCharacterSet);
        }

        Ok(candidate)
    }
}
