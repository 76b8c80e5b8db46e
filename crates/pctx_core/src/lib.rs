//! PCTX Core Library
//!
//! Keeps the working state of a project for coding agents in a handful of
//! local files:
//! - `PROJECT_CONTEXT.json` - the size-bounded context document
//! - `SESSIONS.jsonl` - append-only session log
//! - `archive/` - domain snapshots, full-context snapshots and `INDEX.jsonl`
//! - `AI_HANDOFF.md` - generated hand-off note
//!
//! # Quick Start
//!
//! ```
//! use pctx_core::ContextStore;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let store = ContextStore::open(tmp.path()).unwrap();
//!
//! let session = store
//!     .record_session("backend", vec!["api.rs".into()], 1000, 500, Some("gpt"))
//!     .unwrap();
//! assert_eq!(session, 1);
//!
//! let doc = store.load().unwrap();
//! assert_eq!(doc.working_memory.session_count, 1);
//! ```
//!
//! # Domains
//!
//! Domains are created on first update and collapsed to a stub on archival:
//!
//! ```
//! use pctx_core::ContextStore;
//! use serde_json::json;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let store = ContextStore::open(tmp.path()).unwrap();
//!
//! let updates = json!({ "constraints": ["no breaking API changes"] });
//! store.update_domain("api", updates.as_object().unwrap()).unwrap();
//!
//! let outcome = store.archive_domain("api").unwrap().unwrap();
//! assert!(outcome.path.exists());
//! assert!(store.load().unwrap().working_memory.domains["api"].is_archived());
//! ```
//!
//! # Concurrency
//!
//! Mutating operations hold an exclusive advisory lock on `.pctx.lock` in the
//! project root for the whole load + mutate + save. A second writer gets
//! `PctxError::StoreLocked` instead of racing.

mod config;
mod error;
mod fsutil;
mod handoff;
mod jsonl;
mod lock;
mod store;
mod types;

pub use config::{Config, ContextConfig, ProjectDefaults, SessionConfig, CONFIG_FILE};
pub use error::{PctxError, Result};
pub use store::{
    measure_kb, ArchiveOutcome, CompressReport, ContextStore, ResetReport, ARCHIVE_DIR,
    ARCHIVE_INDEX_FILE, CONTEXT_FILE, HANDOFF_FILE, SESSIONS_FILE,
};
pub use types::*;

use chrono::NaiveDateTime;

/// Time source for every timestamp the store writes.
///
/// Lets tests pin dates. Production code uses [`SystemClock`].
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime + Send + Sync,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
