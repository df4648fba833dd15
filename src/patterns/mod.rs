//! Deny-list engine for detecting dangerous fragments in raw input
//!
//! Architectural Principle: Service Layer - Pattern matching is compiled once and reused
//! - DenyList owns the compiled regexes for every enabled rule
//! - Scan order is deterministic: categories by name, rules as declared
//! - Matches carry the rule and category that fired so callers can explain rejections

use crate::config::{PatternRule, PokedexConfig};
use crate::domain::validation::{PokedexError, PokedexResult};
use regex::Regex;

pub use crate::domain::validation::PatternMatch;

/// A compiled deny-list rule with metadata
#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    rule_id: String,
    category: String,
}

/// Ordered collection of compiled deny rules
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    rules: Vec<CompiledRule>,
}

impl DenyList {
    /// Create an empty deny list that matches nothing
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compile every enabled rule of the configuration
    pub fn from_config(config: &PokedexConfig) -> PokedexResult<Self> {
        let mut deny_list = Self::new();
        for (category, rule) in config.enabled_rules() {
            deny_list.add_rule(category, rule)?;
        }
        Ok(deny_list)
    }

    /// Append a rule to the end of the scan order
    pub fn add_rule(&mut self, category: &str, rule: &PatternRule) -> PokedexResult<()> {
        tracing::debug!(
            "Compiling deny rule '{}' in category '{}' with pattern '{}'",
            rule.id,
            category,
            rule.pattern
        );

        let regex = rule.compile().map_err(|e| {
            PokedexError::pattern(format!("Invalid regex '{}' in rule '{}': {}", rule.pattern, rule.id, e))
        })?;

        self.rules.push(CompiledRule {
            regex,
            rule_id: rule.id.clone(),
            category: category.to_string(),
        });
        Ok(())
    }

    /// First rule in scan order that matches anywhere in the input
    pub fn first_match(&self, input: &str) -> Option<PatternMatch> {
        self.rules.iter().find_map(|rule| Self::match_rule(rule, input))
    }

    /// Every rule that matches, in scan order; one entry per rule
    pub fn matches(&self, input: &str) -> Vec<PatternMatch> {
        self.rules.iter().filter_map(|rule| Self::match_rule(rule, input)).collect()
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.rules.iter().any(|rule| rule.regex.is_match(input))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn match_rule(rule: &CompiledRule, input: &str) -> Option<PatternMatch> {
        rule.regex.find(input).map(|m| PatternMatch {
            rule_id: rule.rule_id.clone(),
            category: rule.category.clone(),
            matched_text: m.as_str().to_string(),
            offset: m.start(),
        })
    }
}
