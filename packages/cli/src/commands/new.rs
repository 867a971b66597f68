use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{BlockType, Document, UuidIdGenerator};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Where to write the document
    pub out: PathBuf,

    /// Document name
    #[arg(short, long, default_value = "Untitled")]
    pub name: String,

    /// Document category (defaults to the config's)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Starter blocks, comma separated (e.g. hero,text,cta)
    #[arg(short, long, value_delimiter = ',')]
    pub blocks: Vec<String>,

    /// Force overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let out = cwd.join(&args.out);

    if out.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            out.display()
        ));
    }

    let category = args.category.unwrap_or(config.default_category);
    let document = skeleton(&args.name, &category, &args.blocks)?;

    fs::write(&out, document.to_json()?)?;

    println!(
        "  {} Created {} ({} blocks)",
        "✓".green(),
        args.out.display(),
        document.len()
    );

    Ok(())
}

/// Fresh document with the given starter blocks
pub fn skeleton(name: &str, category: &str, blocks: &[String]) -> Result<Document> {
    let mut ids = UuidIdGenerator;
    let mut document = Document::new(name, category);

    for tag in blocks {
        let kind: BlockType = tag.trim().parse()?;
        document = document.add_block(kind, &mut ids).0;
    }

    Ok(document)
}
