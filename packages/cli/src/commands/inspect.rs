use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{Block, Columns, Document};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Document JSON file
    pub document: PathBuf,
}

pub fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let source = fs::read_to_string(cwd.join(&args.document))?;
    let document = Document::from_json(&source)?;

    println!(
        "{} {} {}",
        "📄".bright_blue(),
        document.name().bold(),
        format!("[{}]", document.category()).dimmed()
    );
    for line in outline(&document) {
        println!("  {line}");
    }

    Ok(())
}

/// One line per block, in render order
pub fn outline(document: &Document) -> Vec<String> {
    document
        .blocks()
        .enumerate()
        .map(|(index, block)| outline_line(index, block))
        .collect()
}

fn outline_line(index: usize, block: &Block) -> String {
    let mut line = format!("{index:>2}. {:<16} {}", block.block_type().as_str(), block.title);
    if block.columns != Columns::Full {
        line.push_str(&format!(" ({:?})", block.columns).to_lowercase());
    }
    if !block.visible {
        line.push_str(" [hidden]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_editor::{BlockPatch, BlockType, SequentialIdGenerator};

    #[test]
    fn test_outline_marks_hidden_and_narrow_blocks() {
        let mut ids = SequentialIdGenerator::new();
        let doc = Document::with_id("doc-1", "Page", "general");
        let (doc, hero) = doc.add_block(BlockType::Hero, &mut ids);
        let (doc, text) = doc.add_block(BlockType::Text, &mut ids);
        let doc = doc
            .update_block(&hero, &BlockPatch::new().visible(false))
            .unwrap()
            .update_block(&text, &BlockPatch::new().columns(Columns::Half))
            .unwrap();

        let lines = outline(&doc);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 0. hero"));
        assert!(lines[0].ends_with("[hidden]"));
        assert!(lines[1].ends_with("(half)"));
    }
}
