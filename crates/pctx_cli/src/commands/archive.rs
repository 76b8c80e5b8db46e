//! Archive a domain or list the archive index.

use anyhow::{Context, Result};
use console::style;
use pctx_core::{ContextStore, PctxError};
use std::path::Path;

/// Move a domain into an archive snapshot.
pub fn run(root: &Path, domain: Option<&str>) -> Result<()> {
    let domain = domain.ok_or(PctxError::MissingArgument("--domain"))?;
    let store = ContextStore::open(root).context("Failed to open project root")?;

    match store.archive_domain(domain)? {
        Some(outcome) => println!(
            "{} Archived domain '{}' to {}",
            style("✓").green(),
            outcome.domain,
            outcome.file_name
        ),
        None => println!("Domain '{}' not found", domain),
    }

    Ok(())
}

/// Print the archive manifest.
pub fn list(root: &Path) -> Result<()> {
    let store = ContextStore::open(root).context("Failed to open project root")?;
    let entries = store.read_archive_index()?;

    if entries.is_empty() {
        println!("No archived entries");
        return Ok(());
    }

    println!("{}", style("Archive index:").bold());
    for entry in &entries {
        println!(
            "  {}  {:<20} {}",
            style(&entry.date).dim(),
            entry.name,
            style(&entry.file).cyan()
        );
    }

    Ok(())
}
