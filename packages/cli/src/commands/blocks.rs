use anyhow::Result;
use colored::Colorize;
use pagesmith_editor::BlockType;

/// List every block type the editor can create
pub fn blocks() -> Result<()> {
    println!("{}", "Available blocks".bright_blue().bold());
    for kind in BlockType::ALL {
        println!("  {:<16} {}", kind.as_str().bright_white(), kind.label().dimmed());
    }
    Ok(())
}
