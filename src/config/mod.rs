//! Configuration loading and management for Pokedex Guard
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to validated domain settings
//! - Default deny-list and allow-list tables are embedded in code, not files
//! - Configuration acts as a repository for sanitizer rules and API settings

use crate::domain::validation::{PokedexError, PokedexResult};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Configuration versions this build understands
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// File names probed, in order, when no explicit config path is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["pokedex.yaml", "pokedex.yml", ".pokedex.yaml"];

pub const DEFAULT_MAX_LENGTH: usize = 50;
pub const DEFAULT_ALLOW_PATTERN: &str = r"^[a-z0-9\- ]+$";
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for Pokedex Guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokedexConfig {
    /// Configuration format version
    pub version: String,
    /// Length limit and allow-list
    #[serde(default)]
    pub sanitizer: SanitizerSettings,
    /// Deny-list rules organized by category
    pub patterns: BTreeMap<String, PatternCategory>,
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Length limit and allow-list applied after the deny-list scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizerSettings {
    /// Maximum number of characters in the untrimmed input
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Regex the trimmed, lowercased input must match in full
    #[serde(default = "default_allow_pattern")]
    pub allow_pattern: String,
}

impl Default for SanitizerSettings {
    fn default() -> Self {
        Self { max_length: DEFAULT_MAX_LENGTH, allow_pattern: DEFAULT_ALLOW_PATTERN.to_string() }
    }
}

/// Endpoint and transport settings for PokeAPI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// A category of deny-list rules (e.g., "injection", "traversal")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCategory {
    /// Whether this category is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// What the rules in this category protect against
    #[serde(default)]
    pub description: String,
    /// Individual deny rules, scanned in order
    pub rules: Vec<PatternRule>,
}

/// Individual deny-list rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    /// Unique identifier for this rule
    pub id: String,
    /// Regex that rejects the input when it matches anywhere
    pub pattern: String,
    /// Human-readable description of what the rule catches
    #[serde(default)]
    pub description: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Case sensitivity for the regex; deny rules ignore case by default
    #[serde(default)]
    pub case_sensitive: bool,
}

impl PatternRule {
    fn new(id: &str, pattern: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
            description: description.to_string(),
            enabled: true,
            case_sensitive: false,
        }
    }

    /// Compile this rule's regex honoring its case sensitivity
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.pattern).case_insensitive(!self.case_sensitive).build()
    }
}

impl PokedexConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PokedexResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            PokedexError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            PokedexError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> PokedexResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| PokedexError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first config file found in the working directory, or defaults
    pub fn discover() -> PokedexResult<Self> {
        for name in DEFAULT_CONFIG_FILES {
            if Path::new(name).exists() {
                tracing::debug!("Loading configuration from '{}'", name);
                return Self::load_from_file(name);
            }
        }
        Ok(Self::default())
    }

    /// Get default configuration with built-in deny-list
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            sanitizer: SanitizerSettings::default(),
            patterns: Self::default_patterns(),
            api: ApiConfig::default(),
        }
    }

    fn default_patterns() -> BTreeMap<String, PatternCategory> {
        let mut patterns = BTreeMap::new();

        patterns.insert(
            "control".to_string(),
            PatternCategory {
                enabled: true,
                description: "Non-printing characters".to_string(),
                rules: vec![PatternRule::new(
                    "control_characters",
                    r"[\x00-\x1f]",
                    "ASCII control character",
                )],
            },
        );

        patterns.insert(
            "injection".to_string(),
            PatternCategory {
                enabled: true,
                description: "SQL and shell injection fragments".to_string(),
                rules: vec![
                    PatternRule::new(
                        "statement_terminators",
                        r#"[;'"`]"#,
                        "Statement terminator or quote",
                    ),
                    PatternRule::new("sql_line_comment", r"--", "SQL line comment"),
                    PatternRule::new("block_comment_open", r"/\*", "Block comment start"),
                    PatternRule::new("block_comment_close", r"\*/", "Block comment end"),
                    PatternRule::new(
                        "sql_keywords",
                        r"\b(SELECT|INSERT|UPDATE|DELETE|DROP|TRUNCATE|ALTER|CREATE|EXEC|UNION|OR|AND)\b",
                        "SQL keyword as a standalone word",
                    ),
                ],
            },
        );

        patterns.insert(
            "markup".to_string(),
            PatternCategory {
                enabled: true,
                description: "HTML and script injection".to_string(),
                rules: vec![PatternRule::new("angle_brackets", r"[<>]", "Angle bracket")],
            },
        );

        patterns.insert(
            "traversal".to_string(),
            PatternCategory {
                enabled: true,
                description: "Path traversal out of the request path segment".to_string(),
                rules: vec![
                    PatternRule::new("parent_traversal", r"\.\.", "Parent directory reference"),
                    PatternRule::new("path_separators", r"[/\\]", "Path separator"),
                ],
            },
        );

        patterns
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> PokedexResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(PokedexError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        if self.sanitizer.max_length == 0 {
            return Err(PokedexError::config("sanitizer.max_length must be greater than 0"));
        }

        Regex::new(&self.sanitizer.allow_pattern).map_err(|e| {
            PokedexError::config(format!(
                "Invalid allow pattern '{}': {}",
                self.sanitizer.allow_pattern, e
            ))
        })?;

        // Rule IDs are reported back to callers, so they must be unique across categories
        let mut seen = HashSet::new();
        for (category_name, category) in &self.patterns {
            for rule in &category.rules {
                if !seen.insert(rule.id.as_str()) {
                    return Err(PokedexError::config(format!(
                        "Duplicate rule ID '{}' in category '{}'",
                        rule.id, category_name
                    )));
                }

                rule.compile().map_err(|e| {
                    PokedexError::config(format!(
                        "Invalid regex pattern in rule '{}': {}",
                        rule.id, e
                    ))
                })?;
            }
        }

        if !(self.api.base_url.starts_with("https://") || self.api.base_url.starts_with("http://"))
        {
            return Err(PokedexError::config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(PokedexError::config("api.timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    /// Get all enabled rules across all enabled categories, in scan order
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&String, &PatternRule)> {
        self.patterns.iter().filter(|(_, category)| category.enabled).flat_map(
            |(name, category)| {
                category.rules.iter().filter(|rule| rule.enabled).map(move |rule| (name, rule))
            },
        )
    }

    /// Look up a rule and its category name by rule ID
    pub fn find_rule(&self, rule_id: &str) -> Option<(&String, &PatternCategory, &PatternRule)> {
        self.patterns.iter().find_map(|(name, category)| {
            category.rules.iter().find(|r| r.id == rule_id).map(|rule| (name, category, rule))
        })
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> PokedexResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PokedexError::config(format!("Failed to serialize config: {e}")))
    }

    /// Stable fingerprint of the configuration
    pub fn fingerprint(&self) -> String {
        // BTreeMap keeps categories ordered, so the YAML form is deterministic
        let serialized = serde_yaml::to_string(self).unwrap_or_default();
        let digest = Sha256::digest(serialized.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl Default for PokedexConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_true() -> bool {
    true
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_allow_pattern() -> String {
    DEFAULT_ALLOW_PATTERN.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("pokedex-guard/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: PokedexConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: PokedexConfig::default() }
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.config.sanitizer.max_length = max_length;
        self
    }

    pub fn allow_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.sanitizer.allow_pattern = pattern.into();
        self
    }

    /// Add or replace a pattern category
    pub fn add_category(mut self, name: impl Into<String>, category: PatternCategory) -> Self {
        self.config.patterns.insert(name.into(), category);
        self
    }

    /// Disable a category by name, if present
    pub fn disable_category(mut self, name: &str) -> Self {
        if let Some(category) = self.config.patterns.get_mut(name) {
            category.enabled = false;
        }
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.api.timeout_secs = secs;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> PokedexResult<PokedexConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
