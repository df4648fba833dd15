//! Pokedex Guard CLI - Command-line interface for safe Pokédex lookups
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like file I/O, process exit codes, and terminal output
//! - Provides clean separation between user interface and business logic

use clap::{Parser, Subcommand, ValueEnum};
use pokedex_guard::{
    OutputFormat, Pokedex, PokedexConfig, PokedexError, PokedexResult, ReportFormatter,
    ReportOptions,
};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Pokedex Guard - Safe Pokédex lookups
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(version)]
#[command(about = "Look up Pokémon on PokeAPI with strict input sanitization")]
#[command(
    long_about = "Pokedex Guard validates and normalizes Pokémon names against a configurable deny-list and allow-list before they are used in a PokeAPI request path."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate names without contacting the API
    Check {
        /// Names to validate
        names: Vec<String>,

        /// Read additional names from a file, one per line
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Only list rejected names
        #[arg(long)]
        invalid_only: bool,
    },

    /// Validate a name and fetch it from PokeAPI
    Lookup {
        /// Pokémon name
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// List deny-list rules
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> PokedexResult<i32> {
    let use_colors = !cli.no_color;

    match cli.command {
        Commands::Check { names, from_file, format, invalid_only } => {
            run_check(cli.config, names, from_file, format, invalid_only, use_colors)
        }
        Commands::Lookup { name, format } => run_lookup(cli.config, name, format, use_colors).await,
        Commands::Rules { enabled_only, category } => {
            run_list_rules(cli.config, enabled_only, category)
        }
        Commands::Explain { rule_id } => run_explain(cli.config, rule_id),
        Commands::ValidateConfig { config_file } => run_validate_config(config_file.or(cli.config)),
    }
}

fn load_config(config_path: Option<PathBuf>) -> PokedexResult<PokedexConfig> {
    match config_path {
        Some(path) => PokedexConfig::load_from_file(path),
        None => PokedexConfig::discover(),
    }
}

fn build_pokedex(config: PokedexConfig, options: ReportOptions) -> PokedexResult<Pokedex> {
    Ok(Pokedex::new_with_config(config)?.with_report_formatter(ReportFormatter::new(options)))
}

fn run_check(
    config_path: Option<PathBuf>,
    mut names: Vec<String>,
    from_file: Option<PathBuf>,
    format: OutputFormatArg,
    invalid_only: bool,
    use_colors: bool,
) -> PokedexResult<i32> {
    if let Some(path) = from_file {
        let contents = fs::read_to_string(&path)?;
        names.extend(contents.lines().filter(|line| !line.is_empty()).map(str::to_string));
    }

    if names.is_empty() {
        eprintln!("No names to check. Pass names as arguments or use --from-file.");
        return Ok(1);
    }

    let pokedex = build_pokedex(
        load_config(config_path)?,
        ReportOptions { use_colors, invalid_only, ..Default::default() },
    )?;

    let report = pokedex.validate_batch(&names);
    print!("{}", pokedex.format_batch(&report, format.into())?);

    Ok(if report.has_invalid() { 1 } else { 0 })
}

async fn run_lookup(
    config_path: Option<PathBuf>,
    name: String,
    format: OutputFormatArg,
    use_colors: bool,
) -> PokedexResult<i32> {
    let pokedex =
        build_pokedex(load_config(config_path)?, ReportOptions { use_colors, ..Default::default() })?;

    match pokedex.lookup(&name).await {
        Ok(pokemon) => {
            print!("{}", pokedex.format_pokemon(&pokemon, format.into())?);
            Ok(0)
        }
        Err(e @ (PokedexError::Validation(_) | PokedexError::NotFound { .. })) => {
            eprintln!("❌ {e}");
            Ok(1)
        }
        Err(PokedexError::Http(e)) => {
            tracing::debug!("Request failed: {:?}", e);
            eprintln!("❌ Network error: {e}");
            Ok(1)
        }
        Err(e @ PokedexError::Api { .. }) => {
            eprintln!("❌ {e}");
            Ok(1)
        }
        Err(e) => Err(e),
    }
}

fn run_validate_config(config_path: Option<PathBuf>) -> PokedexResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("pokedex.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match PokedexConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            let total_categories = config.patterns.len();
            let enabled_categories = config.patterns.values().filter(|c| c.enabled).count();
            let total_rules: usize = config.patterns.values().map(|c| c.rules.len()).sum();
            let enabled_rules = config.enabled_rules().count();

            println!("📊 Configuration summary:");
            println!("  Categories: {total_categories} total, {enabled_categories} enabled");
            println!("  Rules: {total_rules} total, {enabled_rules} enabled");
            println!("  Max length: {}", config.sanitizer.max_length);
            println!("  API: {}", config.api.base_url);
            println!("  Fingerprint: {}", config.fingerprint());

            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn run_explain(config_path: Option<PathBuf>, rule_id: String) -> PokedexResult<i32> {
    let config = load_config(config_path)?;

    if let Some((category_name, category, rule)) = config.find_rule(&rule_id) {
        println!("📖 Rule: {}", rule.id);
        println!("📂 Category: {category_name}");
        println!("✅ Enabled: {}", rule.enabled && category.enabled);
        println!("🔠 Case sensitive: {}", rule.case_sensitive);
        println!();
        println!("📝 Description:");
        println!("   {}", rule.description);
        println!();
        println!("🔎 Pattern:");
        println!("   {}", rule.pattern);
        println!();
        println!("Inputs matching this rule are rejected with \"invalid characters detected\".");
        return Ok(0);
    }

    eprintln!("❌ Rule '{rule_id}' not found");
    println!();
    println!("Available rules:");

    for (category_name, category) in &config.patterns {
        println!("  {category_name}:");
        for rule in &category.rules {
            println!("    - {}", rule.id);
        }
    }

    Ok(1)
}

fn run_list_rules(
    config_path: Option<PathBuf>,
    enabled_only: bool,
    category_filter: Option<String>,
) -> PokedexResult<i32> {
    let config = load_config(config_path)?;

    println!("📋 Deny-list Rules\n");

    for (category_name, category) in &config.patterns {
        if let Some(ref filter) = category_filter {
            if category_name != filter {
                continue;
            }
        }

        if enabled_only && !category.enabled {
            continue;
        }

        let status = if category.enabled { "✅" } else { "❌" };
        println!("{status}📂 {category_name} - {}", category.description);

        for rule in &category.rules {
            if enabled_only && !rule.enabled {
                continue;
            }

            let rule_status = if rule.enabled { "✅" } else { "❌" };
            println!("  {rule_status}🔍 {} `{}` - {}", rule.id, rule.pattern, rule.description);
        }
        println!();
    }

    println!(
        "Allow-list: {} (max {} characters)",
        config.sanitizer.allow_pattern, config.sanitizer.max_length
    );

    Ok(0)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_default_config(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("pokedex.yaml");
        fs::write(&path, PokedexConfig::default().to_yaml().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_check_command() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_default_config(&temp_dir);

        let clean = run_check(
            Some(config.clone()),
            vec!["pikachu".to_string(), "Mr-Mime".to_string()],
            None,
            OutputFormatArg::Json,
            false,
            false,
        );
        assert_eq!(clean.unwrap(), 0);

        let dirty = run_check(
            Some(config),
            vec!["pikachu".to_string(), "x'; DROP TABLE y".to_string()],
            None,
            OutputFormatArg::Human,
            true,
            false,
        );
        assert_eq!(dirty.unwrap(), 1);
    }

    #[test]
    fn test_check_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_default_config(&temp_dir);
        let names = temp_dir.path().join("names.txt");
        fs::write(&names, "bulbasaur\n\nivysaur\nvenusaur\n").unwrap();

        let result =
            run_check(Some(config), vec![], Some(names), OutputFormatArg::Human, false, false);
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_check_without_names() {
        let result = run_check(None, vec![], None, OutputFormatArg::Human, false, false);
        assert_eq!(result.unwrap(), 1);

        // A file with only blank lines counts as no names too
        let temp_dir = TempDir::new().unwrap();
        let names = temp_dir.path().join("blank.txt");
        fs::write(&names, "\n\n").unwrap();
        let result = run_check(None, vec![], Some(names), OutputFormatArg::Json, false, false);
        assert_eq!(result.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lookup_invalid_name_exits_without_request() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_default_config(&temp_dir);

        let result = run_lookup(Some(config), "<pikachu>".to_string(), OutputFormatArg::Human, false)
            .await;
        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_default_config(&temp_dir);
        assert_eq!(run_validate_config(Some(config)).unwrap(), 0);

        let broken = temp_dir.path().join("broken.yaml");
        fs::write(&broken, "version: \"9.9\"\npatterns: {}\n").unwrap();
        assert_eq!(run_validate_config(Some(broken)).unwrap(), 1);
    }

    #[test]
    fn test_explain_rule() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_default_config(&temp_dir);

        assert_eq!(run_explain(Some(config.clone()), "sql_keywords".to_string()).unwrap(), 0);
        assert_eq!(run_explain(Some(config), "nonexistent_rule".to_string()).unwrap(), 1);
    }

    #[test]
    fn test_list_rules() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_default_config(&temp_dir);

        assert_eq!(run_list_rules(Some(config.clone()), false, None).unwrap(), 0);
        assert_eq!(run_list_rules(Some(config), true, Some("traversal".to_string())).unwrap(), 0);
    }
}
