use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_editor::EditorConfig;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Undo depth kept per editing session
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Debounce window in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Default document category
    #[arg(short, long, default_value = "general")]
    pub category: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = Config::path(cwd);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagesmith project...".bright_blue().bold());

    let defaults = EditorConfig::default();
    let config = Config {
        editor: EditorConfig {
            max_history: args.max_history.unwrap_or(defaults.max_history),
            debounce_ms: args.debounce_ms.unwrap_or(defaults.debounce_ms),
        }
        .with_defaults(),
        default_category: args.category,
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: pagesmith new page.json --name \"My page\"");
    println!("  2. Run: pagesmith replay page.json edits.json --out page.json");

    Ok(())
}
