//! Print the context document.

use anyhow::{Context, Result};
use pctx_core::ContextStore;
use std::path::Path;

/// Print the current context document as 2-space-indented JSON.
pub fn run(root: &Path) -> Result<()> {
    let store = ContextStore::open(root).context("Failed to open project root")?;
    let doc = store.load()?;

    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
