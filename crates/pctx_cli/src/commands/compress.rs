//! Compression pass over the context document.

use anyhow::{Context, Result};
use console::style;
use pctx_core::ContextStore;
use std::path::Path;

/// Archive inactive domains (or all but the active one with `aggressive`).
pub fn run(root: &Path, aggressive: bool) -> Result<()> {
    let store = ContextStore::open(root).context("Failed to open project root")?;

    if aggressive {
        println!(
            "{} Running aggressive compression (all domains except the active one)...",
            style("→").yellow()
        );
    } else {
        println!("{} Archiving inactive domains...", style("→").cyan());
    }

    let report = store.compress(aggressive)?;

    for outcome in &report.archived {
        println!(
            "  Archived domain '{}' to {}",
            outcome.domain, outcome.file_name
        );
    }
    if report.archived.is_empty() {
        println!("  Nothing to archive");
    }

    println!(
        "  Context size: {}KB / {}KB",
        style(report.size_kb).cyan(),
        report.size_limit_kb
    );

    if report.over_limit {
        println!(
            "{} Context size {}KB exceeds limit",
            style("⚠").yellow().bold(),
            report.size_kb
        );
    }

    if let Some(reset) = &report.reset {
        println!(
            "{} Reset context. Previous context archived to {}",
            style("✓").green(),
            reset.archive_file.display()
        );
    }

    Ok(())
}
