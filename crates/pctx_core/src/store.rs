//! The context store: load, save and every mutation of a project root.
//!
//! Each mutating operation is a full read-modify-write of the context
//! document, performed while holding the store lock.

use crate::config::Config;
use crate::error::{PctxError, Result};
use crate::fsutil::{atomic_write, write_json_pretty};
use crate::handoff;
use crate::jsonl;
use crate::lock::StoreLock;
use crate::types::{
    ArchiveIndexEntry, ArchiveKind, ArchivedDomain, ContextDocument, Domain, DomainArchive,
    DomainUpdates, SessionRecord, Statistics, STATUS_INACTIVE,
};
use crate::{Clock, SystemClock};
use chrono::NaiveDateTime;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Context document file name.
pub const CONTEXT_FILE: &str = "PROJECT_CONTEXT.json";
/// Session log file name.
pub const SESSIONS_FILE: &str = "SESSIONS.jsonl";
/// Hand-off note file name.
pub const HANDOFF_FILE: &str = "AI_HANDOFF.md";
/// Archive directory name.
pub const ARCHIVE_DIR: &str = "archive";
/// Archive manifest file name, inside the archive directory.
pub const ARCHIVE_INDEX_FILE: &str = "INDEX.jsonl";

const LOCK_FILE: &str = ".pctx.lock";

/// Outcome of archiving a single domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveOutcome {
    /// Domain that was archived.
    pub domain: String,
    /// Archive file name, relative to the archive directory.
    pub file_name: String,
    /// Full path of the written snapshot.
    pub path: PathBuf,
}

/// Report from a compression pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressReport {
    /// Domains archived during the pass, in traversal order.
    pub archived: Vec<ArchiveOutcome>,
    /// Document size after archival, in KB.
    pub size_kb: f64,
    /// Size limit of the document, in KB.
    pub size_limit_kb: f64,
    /// Whether the size still exceeded the limit after archival.
    pub over_limit: bool,
    /// Set when an aggressive pass fell through to a full reset.
    pub reset: Option<ResetReport>,
}

/// Report from a full reset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetReport {
    /// Snapshot of the superseded document.
    pub archive_file: PathBuf,
    /// Domain carried over into the fresh document, if any.
    pub preserved_domain: Option<String>,
}

/// Handle on one project root.
///
/// Holds no document state between calls; every operation reloads from disk.
pub struct ContextStore {
    root: PathBuf,
    config: Config,
    clock: Arc<dyn Clock>,
}

impl ContextStore {
    /// Opens the store rooted at `root`.
    ///
    /// Loads `pctx.toml` if present and creates the archive directory if
    /// missing. The context document itself is not created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let config = Config::load(&root)?;
        fs::create_dir_all(root.join(ARCHIVE_DIR))?;

        Ok(Self {
            root,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets a custom clock, used for every timestamp the store writes.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context_path(&self) -> PathBuf {
        self.root.join(CONTEXT_FILE)
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.root.join(SESSIONS_FILE)
    }

    pub fn handoff_path(&self) -> PathBuf {
        self.root.join(HANDOFF_FILE)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    pub fn archive_index_path(&self) -> PathBuf {
        self.archive_dir().join(ARCHIVE_INDEX_FILE)
    }

    /// Builds a default document stamped with the store clock's date.
    pub fn default_document(&self) -> ContextDocument {
        ContextDocument::skeleton(&self.config, self.now().date())
    }

    /// Reads the context document.
    ///
    /// Returns a fresh default document if the file does not exist; that
    /// document is not persisted until saved.
    ///
    /// # Errors
    ///
    /// Returns `CorruptData` if the file exists but is not a valid document.
    pub fn load(&self) -> Result<ContextDocument> {
        let path = self.context_path();
        if !path.exists() {
            debug!(path = %path.display(), "no context document, using defaults");
            return Ok(self.default_document());
        }

        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| PctxError::CorruptData {
            path,
            reason: e.to_string(),
        })
    }

    /// Recomputes size accounting and writes the document.
    pub fn save(&self, doc: &mut ContextDocument) -> Result<()> {
        let _lock = self.lock()?;
        self.save_unlocked(doc)
    }

    /// Creates the default document if none exists.
    ///
    /// Returns `true` if a new document was written.
    pub fn init(&self) -> Result<bool> {
        let _lock = self.lock()?;
        if self.context_path().exists() {
            debug!("context document already present, init is a no-op");
            return Ok(false);
        }

        let mut doc = self.default_document();
        self.save_unlocked(&mut doc)?;
        info!(path = %self.context_path().display(), "initialized context document");
        Ok(true)
    }

    /// Logs one session and bumps the session counter.
    ///
    /// `model` falls back to the configured default model. Returns the new
    /// session number.
    pub fn record_session(
        &self,
        domain: &str,
        deliverables: Vec<String>,
        tokens_in: u64,
        tokens_out: u64,
        model: Option<&str>,
    ) -> Result<u64> {
        let _lock = self.lock()?;
        let mut doc = self.load()?;

        doc.working_memory.session_count += 1;
        let session = doc.working_memory.session_count;

        let record = SessionRecord {
            session,
            date: self.timestamp(),
            domain: domain.to_string(),
            tokens_in,
            tokens_out,
            deliverables,
            ai_model: model
                .unwrap_or(self.config.session.default_model.as_str())
                .to_string(),
        };
        jsonl::append(&self.sessions_path(), &record)?;

        doc.working_memory.last_session = Some(session);
        doc.context_health.sessions_since_reset += 1;
        self.save_unlocked(&mut doc)?;

        info!(session, domain, tokens_in, tokens_out, "recorded session");
        Ok(session)
    }

    /// Shallow-merges `updates` into a domain and makes it the active domain.
    ///
    /// The domain is created with default fields if absent. Returns the
    /// merged record.
    pub fn update_domain(&self, name: &str, updates: &DomainUpdates) -> Result<Domain> {
        let _lock = self.lock()?;
        let mut doc = self.load()?;

        let domain = doc.working_memory.upsert_domain(name);
        domain.merge(name, updates)?;
        let merged = domain.clone();

        doc.working_memory.active_domain = Some(name.to_string());
        self.save_unlocked(&mut doc)?;

        debug!(domain = name, keys = updates.len(), "updated domain");
        Ok(merged)
    }

    /// Moves a domain's record into an archive snapshot and collapses it.
    ///
    /// Returns `None` if the domain is absent. An archived stub is archived
    /// again: the new snapshot holds the stub and replaces any same-day
    /// snapshot of that domain.
    pub fn archive_domain(&self, name: &str) -> Result<Option<ArchiveOutcome>> {
        let _lock = self.lock()?;
        self.archive_domain_unlocked(name)
    }

    /// Archives inactive domains, or with `aggressive` every domain except
    /// the active one.
    ///
    /// Traversal is over the domains as they were when the pass started, so
    /// an aggressive pass also re-archives stubs left by earlier passes.
    /// If the document is still over its size limit afterwards, a warning is
    /// logged and an aggressive pass falls through to a full reset that
    /// keeps the active domain.
    pub fn compress(&self, aggressive: bool) -> Result<CompressReport> {
        let _lock = self.lock()?;
        let snapshot = self.load()?;
        let active = snapshot.working_memory.active_domain();

        let mut archived = Vec::new();
        for (name, domain) in &snapshot.working_memory.domains {
            let sweep = if domain.status() == STATUS_INACTIVE {
                true
            } else {
                aggressive && active != Some(name.as_str())
            };

            if sweep {
                if let Some(outcome) = self.archive_domain_unlocked(name)? {
                    archived.push(outcome);
                }
            }
        }

        let doc = self.load()?;
        let size_kb = measure_kb(&doc)?;
        let size_limit_kb = doc.context_health.size_limit_kb;
        let over_limit = size_kb > size_limit_kb;

        let mut reset = None;
        if over_limit {
            warn!(size_kb, size_limit_kb, "context size exceeds limit after compression");
            if aggressive {
                reset = Some(self.reset_unlocked(true)?);
            }
        }

        info!(archived = archived.len(), size_kb, "compression pass complete");
        Ok(CompressReport {
            archived,
            size_kb,
            size_limit_kb,
            over_limit,
            reset,
        })
    }

    /// Supersedes the whole document with a fresh skeleton.
    ///
    /// The old document is written verbatim to
    /// `archive/full_context_session_<N>.json`. The project block and the
    /// session counter carry over; with `preserve_active` so does the active
    /// domain's record.
    pub fn reset(&self, preserve_active: bool) -> Result<ResetReport> {
        let _lock = self.lock()?;
        self.reset_unlocked(preserve_active)
    }

    /// Summarises the session log and the current document.
    pub fn statistics(&self) -> Result<Statistics> {
        let doc = self.load()?;
        let sessions = self.read_sessions()?;

        let total_tokens_in: u64 = sessions.iter().map(|s| s.tokens_in).sum();
        let total_tokens_out: u64 = sessions.iter().map(|s| s.tokens_out).sum();
        let efficiency_ratio = if total_tokens_in > 0 {
            total_tokens_out as f64 / total_tokens_in as f64
        } else {
            0.0
        };

        Ok(Statistics {
            project_name: doc.project.name.clone(),
            total_sessions: sessions.len() as u64,
            active_domains: doc.working_memory.active_domain_count(),
            context_size_kb: doc.context_health.size_kb,
            total_tokens_in,
            total_tokens_out,
            efficiency_ratio,
        })
    }

    /// Parses the whole session log.
    pub fn read_sessions(&self) -> Result<Vec<SessionRecord>> {
        jsonl::read_all(&self.sessions_path())
    }

    /// Parses the archive manifest.
    pub fn read_archive_index(&self) -> Result<Vec<ArchiveIndexEntry>> {
        jsonl::read_all(&self.archive_index_path())
    }

    /// Reads a per-domain archive snapshot by file name.
    pub fn read_domain_archive(&self, file_name: &str) -> Result<DomainArchive> {
        let path = self.archive_dir().join(file_name);
        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes).map_err(|e| PctxError::CorruptData {
            path,
            reason: e.to_string(),
        })
    }

    /// Renders the hand-off note and overwrites `AI_HANDOFF.md`.
    pub fn write_handoff(
        &self,
        next_task: &str,
        decisions: &[String],
        active_files: &[String],
    ) -> Result<PathBuf> {
        let _lock = self.lock()?;
        let doc = self.load()?;

        let note = handoff::render(&doc, next_task, decisions, active_files, self.now().date());
        let path = self.handoff_path();
        atomic_write(&path, note.as_bytes())?;

        info!(path = %path.display(), "wrote hand-off note");
        Ok(path)
    }

    fn archive_domain_unlocked(&self, name: &str) -> Result<Option<ArchiveOutcome>> {
        let mut doc = self.load()?;

        let Some(data) = doc.working_memory.domains.get(name).cloned() else {
            debug!(domain = name, "domain not present, nothing to archive");
            return Ok(None);
        };

        let now = self.now();
        let archived_date = format_timestamp(now);
        let file_name = format!(
            "domain_{}_{}.json",
            file_safe(name),
            now.format("%Y%m%d")
        );
        let path = self.archive_dir().join(&file_name);

        write_json_pretty(
            &path,
            &DomainArchive {
                domain: name.to_string(),
                archived_date: archived_date.clone(),
                data,
            },
        )?;

        jsonl::append(
            &self.archive_index_path(),
            &ArchiveIndexEntry {
                kind: ArchiveKind::Domain,
                name: name.to_string(),
                date: archived_date.clone(),
                file: file_name.clone(),
            },
        )?;

        doc.working_memory.domains.insert(
            name.to_string(),
            Domain::Archived(ArchivedDomain::new(archived_date, file_name.clone())),
        );
        self.save_unlocked(&mut doc)?;

        info!(domain = name, file = %file_name, "archived domain");
        Ok(Some(ArchiveOutcome {
            domain: name.to_string(),
            file_name,
            path,
        }))
    }

    fn reset_unlocked(&self, preserve_active: bool) -> Result<ResetReport> {
        let old = self.load()?;
        let session_count = old.working_memory.session_count;

        let archive_file = self
            .archive_dir()
            .join(format!("full_context_session_{}.json", session_count));
        write_json_pretty(&archive_file, &old)?;

        let mut fresh = self.default_document();
        fresh.project = old.project.clone();
        fresh.working_memory.session_count = session_count;

        let mut preserved_domain = None;
        if preserve_active {
            if let Some(active) = old.working_memory.active_domain() {
                if let Some(domain) = old.working_memory.domains.get(active) {
                    fresh
                        .working_memory
                        .domains
                        .insert(active.to_string(), domain.clone());
                    fresh.working_memory.active_domain = Some(active.to_string());
                    preserved_domain = Some(active.to_string());
                }
            }
        }

        fresh.context_health.last_reset = self.now().format("%Y-%m-%d").to_string();
        self.save_unlocked(&mut fresh)?;

        info!(
            archive = %archive_file.display(),
            preserved = ?preserved_domain,
            "reset context"
        );
        Ok(ResetReport {
            archive_file,
            preserved_domain,
        })
    }

    fn save_unlocked(&self, doc: &mut ContextDocument) -> Result<()> {
        let size_kb = measure_kb(doc)?;
        doc.context_health.size_kb = size_kb;

        let threshold = doc.context_health.size_limit_kb * self.config.context.compression_ratio;
        if size_kb > threshold {
            doc.context_health.compression_enabled = true;
            warn!(
                size_kb,
                size_limit_kb = doc.context_health.size_limit_kb,
                "context size approaching limit"
            );
        }

        let path = self.context_path();
        write_json_pretty(&path, doc)?;
        debug!(path = %path.display(), size_kb, "saved context document");
        Ok(())
    }

    fn lock(&self) -> Result<StoreLock> {
        StoreLock::acquire(&self.root.join(LOCK_FILE))
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Serialized size of `doc` in KB, rounded to two decimals.
///
/// Measured on single-line UTF-8 JSON with `", "` and `": "` separators.
pub fn measure_kb(doc: &ContextDocument) -> Result<f64> {
    let kb = to_spaced_vec(doc)?.len() as f64 / 1024.0;
    Ok((kb * 100.0).round() / 100.0)
}

/// Single-line JSON with a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_vec<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value
        .serialize(&mut ser)
        .map_err(|e| PctxError::Serialization(e.to_string()))?;
    Ok(out)
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Bytes escaped in archive file names. `%` is escaped too, so distinct
/// domain names never share a file.
const FILE_NAME_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

/// Percent-encodes a domain name for use as a file name component.
fn file_safe(name: &str) -> String {
    utf8_percent_encode(name, FILE_NAME_ESCAPES).to_string()
}
