use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{
    BlockId, Document, Editor, EditorConfig, ManualClock, Mutation, SequentialIdGenerator,
};
use serde::Deserialize;
use serde_json::Value;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document JSON file to start from
    pub document: PathBuf,

    /// JSON array of edit steps
    pub script: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Override the configured undo depth
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Override the configured debounce window
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Stop at the first rejected mutation
    #[arg(long)]
    pub strict: bool,
}

/// Session controls that are not document mutations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Control {
    Select { block_id: BlockId },
    Undo,
    Redo,
    Flush,
    /// Let the clock run forward
    Wait { ms: u64 },
}

impl Control {
    const OPS: [&'static str; 5] = ["select", "undo", "redo", "flush", "wait"];
}

/// One entry of a replay script
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Control(Control),
    Mutation(Mutation),
}

/// Parse a script (a JSON array of steps). A bad step is reported by its
/// index with the error of the shape its `op` selects.
pub fn parse_steps(script: &str) -> Result<Vec<Step>> {
    let values: Vec<Value> = serde_json::from_str(script)?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let op = value.get("op").and_then(Value::as_str).unwrap_or_default();
            let step = if Control::OPS.contains(&op) {
                serde_json::from_value(value).map(Step::Control)
            } else {
                serde_json::from_value(value).map(Step::Mutation)
            };
            step.map_err(|err| anyhow!("step {index}: {err}"))
        })
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    pub applied: usize,
    pub rejected: usize,
    pub commits: usize,
    pub notifications: usize,
    pub past: usize,
    pub future: usize,
}

pub fn replay(args: ReplayArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let editor_config = config.editor_config(args.max_history, args.debounce_ms);

    let source = fs::read_to_string(cwd.join(&args.document))
        .with_context(|| format!("reading {}", args.document.display()))?;
    let document = Document::from_json(&source)?;

    let script = fs::read_to_string(cwd.join(&args.script))
        .with_context(|| format!("reading {}", args.script.display()))?;
    let steps =
        parse_steps(&script).with_context(|| format!("parsing {}", args.script.display()))?;

    let (result, report) = run_script(document, &steps, editor_config, args.strict)?;
    let json = result.to_json()?;

    match &args.out {
        Some(out) => fs::write(cwd.join(out), json)?,
        None => println!("{json}"),
    }

    eprintln!(
        "{} {} steps, {} applied, {} rejected",
        "✓".green(),
        report.steps,
        report.applied.to_string().bright_white(),
        if report.rejected > 0 {
            report.rejected.to_string().yellow()
        } else {
            report.rejected.to_string().normal()
        }
    );
    eprintln!(
        "  {} commits, {} notifications, {} undo / {} redo available",
        report.commits, report.notifications, report.past, report.future
    );

    Ok(())
}

/// Play `steps` through an editor session on a simulated clock.
///
/// The clock only moves on `wait`, and the session is ticked after every
/// step, so edits between two waits shorter than the debounce window
/// coalesce into one history entry. Whatever is still pending at the end
/// is flushed.
pub fn run_script(
    document: Document,
    steps: &[Step],
    config: EditorConfig,
    strict: bool,
) -> Result<(Document, ReplayReport)> {
    let clock = ManualClock::new(0);
    let mut editor = Editor::with_parts(
        document,
        config,
        Box::new(clock.clone()),
        Box::new(SequentialIdGenerator::new()),
    );

    let notified = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&notified);
    editor.on_change(move |_| counter.set(counter.get() + 1));

    let mut report = ReplayReport {
        steps: steps.len(),
        ..ReplayReport::default()
    };

    for (index, step) in steps.iter().enumerate() {
        let outcome = match step {
            Step::Control(Control::Select { block_id }) => editor.select(block_id),
            Step::Control(Control::Undo) => {
                editor.undo();
                Ok(())
            }
            Step::Control(Control::Redo) => {
                editor.redo();
                Ok(())
            }
            Step::Control(Control::Flush) => {
                if editor.flush() {
                    report.commits += 1;
                }
                Ok(())
            }
            Step::Control(Control::Wait { ms }) => {
                clock.advance(*ms);
                Ok(())
            }
            Step::Mutation(mutation) => editor.apply(mutation).map(|_| ()),
        };

        match outcome {
            Ok(()) => report.applied += 1,
            Err(err) if strict => return Err(anyhow!("step {index}: {err}")),
            Err(_) => report.rejected += 1,
        }

        if editor.tick() {
            report.commits += 1;
        }
    }

    if editor.flush() {
        report.commits += 1;
    }

    report.notifications = notified.get();
    report.past = editor.history().past_len();
    report.future = editor.history().future_len();
    tracing::debug!(?report, "replay finished");

    Ok((editor.committed().clone(), report))
}
