//! Full context reset.

use anyhow::{Context, Result};
use console::style;
use pctx_core::ContextStore;
use std::path::Path;

/// Archive the whole document and replace it with a fresh skeleton.
pub fn run(root: &Path, preserve_active: bool) -> Result<()> {
    let store = ContextStore::open(root).context("Failed to open project root")?;

    let report = store.reset(preserve_active)?;

    println!(
        "{} Reset context. Previous context archived to {}",
        style("✓").green(),
        report.archive_file.display()
    );
    if let Some(domain) = &report.preserved_domain {
        println!("  Kept active domain '{}'", domain);
    }

    Ok(())
}
