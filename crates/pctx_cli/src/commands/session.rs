//! Record a work session.

use anyhow::{Context, Result};
use pctx_core::{ContextStore, PctxError};
use std::path::Path;

/// Append a session to SESSIONS.jsonl and bump the session counter.
pub fn run(
    root: &Path,
    domain: Option<&str>,
    deliverables: Vec<String>,
    tokens_in: u64,
    tokens_out: u64,
    model: Option<&str>,
) -> Result<()> {
    let domain = domain.ok_or(PctxError::MissingArgument("--domain"))?;
    let store = ContextStore::open(root).context("Failed to open project root")?;

    let session = store.record_session(domain, deliverables, tokens_in, tokens_out, model)?;

    println!("Logged session {}", session);
    Ok(())
}
