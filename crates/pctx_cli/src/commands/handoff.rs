//! Hand-off note generation.

use anyhow::{Context, Result};
use pctx_core::{ContextStore, PctxError};
use std::path::Path;

/// Write AI_HANDOFF.md from the current context.
pub fn run(
    root: &Path,
    next_task: Option<&str>,
    decisions: &[String],
    files: &[String],
) -> Result<()> {
    let next_task = next_task.ok_or(PctxError::MissingArgument("--next-task"))?;
    let store = ContextStore::open(root).context("Failed to open project root")?;

    let path = store.write_handoff(next_task, decisions, files)?;

    println!("Updated {}", path.display());
    Ok(())
}
