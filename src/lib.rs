//! Pokedex Guard - Safe Pokédex lookups over PokeAPI
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Name sanitization is pure domain logic with no I/O
//! - The HTTP client is an adapter that only ever sees sanitized names
//! - Reporting translates results for terminals and programs

pub mod client;
pub mod config;
pub mod domain;
pub mod patterns;
pub mod report;
pub mod sanitizer;

// Re-export main types for convenient access
pub use domain::pokemon::Pokemon;
pub use domain::validation::{
    BatchReport, BatchSummary, PokedexError, PokedexResult, ValidationError, ValidationResult,
};

pub use config::{ConfigBuilder, PatternCategory, PatternRule, PokedexConfig};

pub use client::PokeApiClient;

pub use patterns::{DenyList, PatternMatch};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use sanitizer::NameSanitizer;

use lazy_static::lazy_static;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

lazy_static! {
    static ref DEFAULT_SANITIZER: NameSanitizer = NameSanitizer::with_defaults()
        .expect("Built-in sanitizer rules failed to compile - this is a critical error");
}

/// Main Pokédex service combining validation, lookup and formatting
pub struct Pokedex {
    config: PokedexConfig,
    sanitizer: NameSanitizer,
    client: PokeApiClient,
    report_formatter: ReportFormatter,
}

/// Statistics about the loaded deny-list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternStats {
    pub enabled_categories: usize,
    pub disabled_categories: usize,
    pub enabled_rules: usize,
    pub disabled_rules: usize,
}

impl Pokedex {
    /// Create a Pokédex with the given configuration
    pub fn new_with_config(config: PokedexConfig) -> PokedexResult<Self> {
        config.validate()?;
        let sanitizer = NameSanitizer::new(&config)?;
        let client = PokeApiClient::new(&config.api)?;

        Ok(Self { config, sanitizer, client, report_formatter: ReportFormatter::default() })
    }

    /// Create a Pokédex with default configuration
    pub fn new() -> PokedexResult<Self> {
        Self::new_with_config(PokedexConfig::default())
    }

    /// Create a Pokédex loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> PokedexResult<Self> {
        let config = PokedexConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn config(&self) -> &PokedexConfig {
        &self.config
    }

    pub fn sanitizer(&self) -> &NameSanitizer {
        &self.sanitizer
    }

    pub fn client(&self) -> &PokeApiClient {
        &self.client
    }

    /// Validate a single raw name
    pub fn validate(&self, raw: &str) -> ValidationResult {
        self.sanitizer.validate(raw)
    }

    /// Validate many names in parallel, keeping input order
    pub fn validate_batch<S: AsRef<str> + Sync>(&self, inputs: &[S]) -> BatchReport {
        let start_time = Instant::now();

        let results: Vec<(ValidationResult, Vec<PatternMatch>)> = inputs
            .par_iter()
            .map(|raw| {
                let result = self.sanitizer.validate(raw.as_ref());
                let matches = self.rejection_matches(raw.as_ref(), &result);
                (result, matches)
            })
            .collect();

        let mut report = BatchReport::new();
        for (raw, (result, matches)) in inputs.iter().zip(results) {
            report.add_entry_with_matches(raw.as_ref(), result, matches);
        }
        report.set_execution_time(start_time.elapsed().as_millis() as u64);

        report
    }

    /// Validate a raw name and fetch it; rejected names never reach the network
    pub async fn lookup(&self, raw: &str) -> PokedexResult<Pokemon> {
        let name = self.sanitizer.validate(raw).into_result()?;
        self.client.fetch_pokemon(&name).await
    }

    /// Format a single validation outcome
    pub fn format_validation(
        &self,
        input: &str,
        result: &ValidationResult,
        format: OutputFormat,
    ) -> PokedexResult<String> {
        let matches = self.rejection_matches(input, result);
        self.report_formatter.format_validation(input, result, &matches, format)
    }

    /// Format a batch report
    pub fn format_batch(&self, report: &BatchReport, format: OutputFormat) -> PokedexResult<String> {
        self.report_formatter.format_batch(report, format)
    }

    /// Format a fetched Pokémon
    pub fn format_pokemon(&self, pokemon: &Pokemon, format: OutputFormat) -> PokedexResult<String> {
        self.report_formatter.format_pokemon(pokemon, format)
    }

    /// Get deny-list statistics
    pub fn pattern_statistics(&self) -> PatternStats {
        let mut stats = PatternStats::default();

        for category in self.config.patterns.values() {
            if category.enabled {
                stats.enabled_categories += 1;
                for rule in &category.rules {
                    if rule.enabled {
                        stats.enabled_rules += 1;
                    } else {
                        stats.disabled_rules += 1;
                    }
                }
            } else {
                stats.disabled_categories += 1;
                stats.disabled_rules += category.rules.len();
            }
        }

        stats
    }

    /// Deny rules behind a dangerous-pattern rejection; empty for any other outcome
    fn rejection_matches(&self, raw: &str, result: &ValidationResult) -> Vec<PatternMatch> {
        match result.error() {
            Some(ValidationError::DangerousPattern { .. }) => self.sanitizer.explain(raw),
            _ => Vec::new(),
        }
    }
}

/// Validate a raw name with the built-in rules
pub fn validate_name(raw: &str) -> ValidationResult {
    DEFAULT_SANITIZER.validate(raw)
}

/// Quick deny-list check with the built-in rules
pub fn is_safe_input(raw: &str) -> bool {
    DEFAULT_SANITIZER.is_safe_input(raw)
}

/// Validate and fetch a Pokémon with default settings
pub async fn lookup(raw: &str) -> PokedexResult<Pokemon> {
    Pokedex::new()?.lookup(raw).await
}
