//! Initialize the context document.

use anyhow::{Context, Result};
use pctx_core::ContextStore;
use std::path::Path;

/// Create PROJECT_CONTEXT.json in the project root if it is absent.
pub fn run(root: &Path) -> Result<()> {
    let store = ContextStore::open(root).context("Failed to open project root")?;

    if store.init()? {
        println!("Initialized {}", store.context_path().display());
        println!();
        println!("Layout:");
        println!("  PROJECT_CONTEXT.json  - Live context document");
        println!("  SESSIONS.jsonl        - Append-only session log");
        println!("  AI_HANDOFF.md         - Generated hand-off note");
        println!("  archive/              - Domain and full-context snapshots");
    } else {
        println!(
            "{} already exists, left unchanged",
            store.context_path().display()
        );
    }

    Ok(())
}
