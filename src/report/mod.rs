//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - Validation outcomes and Pokédex entries are rendered for terminals or programs
//! - Each format encapsulates its own layout rules
//! - Domain types stay free of presentation concerns

use crate::domain::pokemon::{stat_ratio, Pokemon};
use crate::domain::validation::{
    BatchEntry, BatchReport, PatternMatch, PokedexError, PokedexResult, ValidationError,
    ValidationResult,
};
use serde_json::Value as JsonValue;
use std::io::Write;
use std::str::FromStr;

/// Width of a stat bar in human output, in cells
const STAT_BAR_WIDTH: usize = 20;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

impl FromStr for OutputFormat {
    type Err = PokedexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(PokedexError::report(format!(
                "Unknown output format '{}'. Available: {}",
                other,
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Only list rejected names in batch reports
    pub invalid_only: bool,
    /// List every deny rule a rejected input tripped
    pub show_matches: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, invalid_only: false, show_matches: true }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Good,
    Bad,
    Dim,
    Accent,
    Bold,
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Format a single validation outcome with the deny rules that explain it
    pub fn format_validation(
        &self,
        input: &str,
        result: &ValidationResult,
        matches: &[PatternMatch],
        format: OutputFormat,
    ) -> PokedexResult<String> {
        match format {
            OutputFormat::Human => Ok(format!("{}\n", self.human_entry(input, result, matches))),
            OutputFormat::Json => to_pretty_json(&self.entry_json(input, result, matches)),
        }
    }

    /// Format a batch of validation outcomes with a summary
    pub fn format_batch(&self, report: &BatchReport, format: OutputFormat) -> PokedexResult<String> {
        let entries: Vec<&BatchEntry> = report
            .entries
            .iter()
            .filter(|e| !self.options.invalid_only || !e.result.is_valid())
            .collect();

        match format {
            OutputFormat::Human => {
                let mut output = String::new();
                for entry in &entries {
                    output.push_str(&self.human_entry(&entry.input, &entry.result, &entry.matches));
                    output.push('\n');
                }
                output.push_str(&self.format_batch_summary(report));
                Ok(output)
            }
            OutputFormat::Json => {
                let entries: Vec<JsonValue> = entries
                    .iter()
                    .map(|e| self.entry_json(&e.input, &e.result, &e.matches))
                    .collect();
                to_pretty_json(&serde_json::json!({
                    "entries": entries,
                    "summary": report.summary,
                }))
            }
        }
    }

    /// Format a fetched Pokémon
    pub fn format_pokemon(&self, pokemon: &Pokemon, format: OutputFormat) -> PokedexResult<String> {
        match format {
            OutputFormat::Human => Ok(self.human_pokemon(pokemon)),
            OutputFormat::Json => to_pretty_json(&pokemon_json(pokemon)),
        }
    }

    /// Write a formatted batch report to a writer
    pub fn write_batch<W: Write>(
        &self,
        report: &BatchReport,
        format: OutputFormat,
        mut writer: W,
    ) -> PokedexResult<()> {
        let formatted = self.format_batch(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn entry_json(
        &self,
        input: &str,
        result: &ValidationResult,
        matches: &[PatternMatch],
    ) -> JsonValue {
        let mut entry = serde_json::json!({
            "input": input,
            "result": result,
        });
        if self.options.show_matches {
            entry["matches"] = serde_json::json!(matches);
        }
        entry
    }

    fn human_entry(
        &self,
        input: &str,
        result: &ValidationResult,
        matches: &[PatternMatch],
    ) -> String {
        match result.error() {
            None => format!(
                "✅ {:?} -> {}",
                input,
                self.paint(result.sanitized_value(), Tone::Good)
            ),
            Some(error) => {
                let mut line =
                    format!("❌ {:?} {}", input, self.paint(result.error_message(), Tone::Bad));
                if self.options.show_matches {
                    let rules: Vec<String> = if matches.is_empty() {
                        match error {
                            ValidationError::DangerousPattern { rule_id } => vec![rule_id.clone()],
                            _ => Vec::new(),
                        }
                    } else {
                        matches
                            .iter()
                            .map(|m| format!("{} {:?}", m.rule_id, m.matched_text))
                            .collect()
                    };
                    if !rules.is_empty() {
                        let listed = format!("[{}]", rules.join(", "));
                        line.push_str(&format!(" {}", self.paint(&listed, Tone::Dim)));
                    }
                }
                line
            }
        }
    }

    fn format_batch_summary(&self, report: &BatchReport) -> String {
        let summary = &report.summary;
        let invalid = summary.failures.total();
        let execution_time = (summary.execution_time_ms as f64) / 1000.0;

        let mut parts = vec![self.paint(&format!("{} valid", summary.valid), Tone::Good)];
        if invalid > 0 {
            parts.push(self.paint(&format!("{invalid} invalid"), Tone::Bad));
        }

        format!(
            "📊 {} {} of {} name{} ({:.1}s)\n",
            self.paint("Summary:", Tone::Bold),
            parts.join(", "),
            summary.total,
            if summary.total == 1 { "" } else { "s" },
            execution_time
        )
    }

    fn human_pokemon(&self, pokemon: &Pokemon) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}  {}\n",
            self.paint(&pokemon.display_name(), Tone::Bold),
            self.paint(&pokemon.dex_number(), Tone::Dim)
        ));
        output.push_str(&format!(
            "Height: {:.1} m   Weight: {:.1} kg\n\n",
            pokemon.height_m(),
            pokemon.weight_kg()
        ));

        for (name, value) in pokemon.tracked_stats() {
            let filled = (stat_ratio(value) * STAT_BAR_WIDTH as f64).round() as usize;
            let bar = format!(
                "{}{}",
                "█".repeat(filled),
                "░".repeat(STAT_BAR_WIDTH.saturating_sub(filled))
            );
            output.push_str(&format!(
                "{:<8} {} {:>3}\n",
                name.to_uppercase(),
                self.paint(&bar, Tone::Accent),
                value
            ));
        }

        let types = pokemon.type_names();
        let abilities = pokemon.ability_names();
        output.push('\n');
        output.push_str(&format!(
            "Type: {}\n",
            if types.is_empty() { "---".to_string() } else { types.join(" / ") }
        ));
        output.push_str(&format!(
            "Abilities: {}\n",
            if abilities.is_empty() { "---".to_string() } else { abilities.join(", ") }
        ));
        if let Some(url) = pokemon.artwork_url() {
            output.push_str(&format!("Artwork: {}\n", self.paint(url, Tone::Dim)));
        }

        output
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if self.options.use_colors {
            colorize(text, tone)
        } else {
            text.to_string()
        }
    }
}

#[cfg(feature = "colors")]
fn colorize(text: &str, tone: Tone) -> String {
    use colored::Colorize;

    match tone {
        Tone::Good => text.green().to_string(),
        Tone::Bad => text.red().to_string(),
        Tone::Dim => text.dimmed().to_string(),
        Tone::Accent => text.bright_red().to_string(),
        Tone::Bold => text.bold().to_string(),
    }
}

#[cfg(not(feature = "colors"))]
fn colorize(text: &str, _tone: Tone) -> String {
    text.to_string()
}

fn pokemon_json(pokemon: &Pokemon) -> JsonValue {
    let stats: serde_json::Map<String, JsonValue> = pokemon
        .tracked_stats()
        .into_iter()
        .map(|(name, value)| (name.to_string(), JsonValue::from(value)))
        .collect();

    serde_json::json!({
        "id": pokemon.id,
        "name": pokemon.name,
        "display_name": pokemon.display_name(),
        "dex_number": pokemon.dex_number(),
        "height_m": pokemon.height_m(),
        "weight_kg": pokemon.weight_kg(),
        "base_experience": pokemon.base_experience,
        "stats": stats,
        "types": pokemon.type_names(),
        "abilities": pokemon.ability_names(),
        "artwork_url": pokemon.artwork_url(),
    })
}

fn to_pretty_json(value: &JsonValue) -> PokedexResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PokedexError::report(format!("JSON serialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pokemon::fixtures::PIKACHU_JSON;
    use crate::sanitizer::NameSanitizer;

    fn plain() -> ReportFormatter {
        ReportFormatter::new(ReportOptions { use_colors: false, ..Default::default() })
    }

    fn create_test_batch() -> BatchReport {
        let mut report = BatchReport::new();
        report.add_entry("Pikachu", ValidationResult::valid("pikachu"));
        report.add_entry(
            "a;b",
            ValidationResult::invalid(ValidationError::DangerousPattern {
                rule_id: "statement_terminators".to_string(),
            }),
        );
        report.set_execution_time(1200);
        report
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_human_batch() {
        let output = plain().format_batch(&create_test_batch(), OutputFormat::Human).unwrap();

        assert!(output.contains("\"Pikachu\" -> pikachu"));
        assert!(output.contains("invalid characters detected [statement_terminators]"));
        assert!(output.contains("Summary: 1 valid, 1 invalid of 2 names (1.2s)"));
    }

    #[test]
    fn test_invalid_only_filter() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            invalid_only: true,
            ..Default::default()
        });

        let output = formatter.format_batch(&create_test_batch(), OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(json["entries"].as_array().unwrap().len(), 1);
        assert_eq!(json["entries"][0]["input"], "a;b");
        // The summary still covers every input
        assert_eq!(json["summary"]["total"], 2);
    }

    #[test]
    fn test_json_validation() {
        let result = ValidationResult::invalid(ValidationError::EmptyInput);
        let output = plain().format_validation("  ", &result, &[], OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(json["input"], "  ");
        assert_eq!(json["result"]["is_valid"], false);
        assert_eq!(json["result"]["sanitized_value"], "");
        assert_eq!(json["result"]["error_message"], "empty input");
        assert_eq!(json["result"]["error"]["kind"], "empty_input");
        assert_eq!(json["matches"], serde_json::json!([]));
    }

    #[test]
    fn test_json_validation_lists_every_match() {
        let sanitizer = NameSanitizer::with_defaults().unwrap();
        let input = "../../etc/passwd";
        let result = sanitizer.validate(input);
        let matches = sanitizer.explain(input);

        let output =
            plain().format_validation(input, &result, &matches, OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(json["result"]["error"]["rule_id"], "parent_traversal");
        let found = json["matches"].as_array().unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0]["rule_id"], "parent_traversal");
        assert_eq!(found[0]["category"], "traversal");
        assert_eq!(found[0]["matched_text"], "..");
        assert_eq!(found[0]["offset"], 0);
        assert_eq!(found[1]["rule_id"], "path_separators");
        assert_eq!(found[1]["matched_text"], "/");
        assert_eq!(found[1]["offset"], 2);
    }

    #[test]
    fn test_batch_lists_every_match() {
        let sanitizer = NameSanitizer::with_defaults().unwrap();
        let input = "../../etc/passwd";
        let mut report = BatchReport::new();
        report.add_entry_with_matches(input, sanitizer.validate(input), sanitizer.explain(input));

        let json: JsonValue = serde_json::from_str(
            &plain().format_batch(&report, OutputFormat::Json).unwrap(),
        )
        .unwrap();
        let ids: Vec<&str> = json["entries"][0]["matches"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|m| m["rule_id"].as_str())
            .collect();
        assert_eq!(ids, vec!["parent_traversal", "path_separators"]);

        let human = plain().format_batch(&report, OutputFormat::Human).unwrap();
        assert!(human.contains(
            "invalid characters detected [parent_traversal \"..\", path_separators \"/\"]"
        ));
    }

    #[test]
    fn test_hide_matches() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            show_matches: false,
            ..Default::default()
        });
        let sanitizer = NameSanitizer::with_defaults().unwrap();
        let result = sanitizer.validate("<b>");
        let matches = sanitizer.explain("<b>");

        let human =
            formatter.format_validation("<b>", &result, &matches, OutputFormat::Human).unwrap();
        assert!(!human.contains("angle_brackets"));

        let json: JsonValue = serde_json::from_str(
            &formatter.format_validation("<b>", &result, &matches, OutputFormat::Json).unwrap(),
        )
        .unwrap();
        assert!(json.get("matches").is_none());
    }

    #[test]
    fn test_human_pokemon() {
        let pokemon: Pokemon = serde_json::from_str(PIKACHU_JSON).unwrap();
        let output = plain().format_pokemon(&pokemon, OutputFormat::Human).unwrap();

        assert!(output.starts_with("Pikachu  No. 025\n"));
        assert!(output.contains("Height: 0.4 m   Weight: 6.0 kg"));
        // 90 / 255 of 20 cells rounds to 7
        assert!(output.contains(&format!("SPEED    {}{}  90", "█".repeat(7), "░".repeat(13))));
        assert!(output.contains("Type: Electric"));
        assert!(output.contains("Abilities: Static, Lightning Rod"));
        assert!(output.contains("Artwork: https://example.test/artwork/25.png"));
    }

    #[test]
    fn test_json_pokemon() {
        let pokemon: Pokemon = serde_json::from_str(PIKACHU_JSON).unwrap();
        let output = plain().format_pokemon(&pokemon, OutputFormat::Json).unwrap();
        let json: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(json["dex_number"], "No. 025");
        assert_eq!(json["stats"]["hp"], 35);
        assert_eq!(json["types"][0], "Electric");
        assert!(json["stats"].get("special-attack").is_none());
    }

    #[test]
    fn test_write_batch() {
        let mut buffer = Vec::new();
        plain().write_batch(&create_test_batch(), OutputFormat::Human, &mut buffer).unwrap();

        assert!(String::from_utf8(buffer).unwrap().contains("Summary:"));
    }
}
