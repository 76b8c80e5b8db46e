//! Update a working-memory domain.

use anyhow::{Context, Result};
use pctx_core::{ContextStore, DomainUpdates, PctxError};
use serde_json::Value;
use std::path::Path;

/// Field values supplied on the command line.
///
/// Empty lists and `None` are left out of the update.
#[derive(Debug, Default)]
pub struct DomainArgs {
    pub files_created: Vec<String>,
    pub decisions_made: Vec<String>,
    pub critical_facts: Vec<String>,
    pub constraints: Vec<String>,
    pub status: Option<String>,
    pub priority: Option<i64>,
}

impl DomainArgs {
    fn into_updates(self) -> DomainUpdates {
        let mut updates = DomainUpdates::new();

        for (key, values) in [
            ("files_created", self.files_created),
            ("decisions_made", self.decisions_made),
            ("critical_facts", self.critical_facts),
            ("constraints", self.constraints),
        ] {
            if !values.is_empty() {
                updates.insert(key.to_string(), Value::from(values));
            }
        }
        if let Some(status) = self.status {
            updates.insert("status".to_string(), Value::from(status));
        }
        if let Some(priority) = self.priority {
            updates.insert("priority".to_string(), Value::from(priority));
        }

        updates
    }
}

/// Merge the supplied fields into the domain and make it active.
pub fn run(root: &Path, domain: Option<&str>, args: DomainArgs) -> Result<()> {
    let domain = domain.ok_or(PctxError::MissingArgument("--domain"))?;
    let store = ContextStore::open(root).context("Failed to open project root")?;

    store.update_domain(domain, &args.into_updates())?;

    println!("Updated domain '{}'", domain);
    Ok(())
}
