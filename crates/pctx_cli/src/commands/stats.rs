//! Project statistics.

use anyhow::{Context, Result};
use console::style;
use pctx_core::ContextStore;
use std::path::Path;

/// Print session, domain and token statistics.
pub fn run(root: &Path, json: bool) -> Result<()> {
    let store = ContextStore::open(root).context("Failed to open project root")?;
    let stats = store.statistics()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!(
        "{}",
        style(format!("Project Statistics: {}", stats.project_name)).bold()
    );
    println!("{}", "=".repeat(40));
    println!("Total Sessions: {}", stats.total_sessions);
    println!("Active Domains: {}", stats.active_domains);
    println!("Context Size: {}KB", stats.context_size_kb);
    println!("Total Tokens In: {}", thousands(stats.total_tokens_in));
    println!("Total Tokens Out: {}", thousands(stats.total_tokens_out));
    println!("Efficiency Ratio: {:.2}%", stats.efficiency_ratio * 100.0);

    Ok(())
}

/// Formats `n` with comma thousands separators.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
