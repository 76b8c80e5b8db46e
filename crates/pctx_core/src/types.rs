//! Persisted data model: the context document, session records and
//! archive manifest entries.
//!
//! Every object in the context document keeps unrecognised keys in a
//! flattened `extra` map so that a load/save cycle never drops data written
//! by other tools.

use crate::config::Config;
use crate::error::{PctxError, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status string carried by a freshly created domain.
pub const STATUS_ACTIVE: &str = "active";

/// Status string that marks a domain for archival by `compress`.
pub const STATUS_INACTIVE: &str = "inactive";

/// Status string of a collapsed, archived domain.
pub const STATUS_ARCHIVED: &str = "archived";

/// Shallow key/value updates merged into a domain record.
pub type DomainUpdates = Map<String, Value>;

/// The single JSON state file of a project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Project metadata. Survives resets unchanged.
    pub project: Project,
    /// Focus pointer, session counter and domains.
    pub working_memory: WorkingMemory,
    /// Size accounting.
    pub context_health: ContextHealth,
    /// Caller preferences. Never interpreted here.
    #[serde(default = "default_ai_instructions")]
    pub ai_instructions: Map<String, Value>,
    /// Unrecognised top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContextDocument {
    /// Builds the default skeleton for a new project.
    pub fn skeleton(config: &Config, today: NaiveDate) -> Self {
        let today = today.format("%Y-%m-%d").to_string();

        Self {
            project: Project {
                name: config.project.name.clone(),
                version: config.project.version.clone(),
                description: String::new(),
                status: STATUS_ACTIVE.to_string(),
                phase: "Initial".to_string(),
                start_date: today.clone(),
                deployment: Deployment {
                    platform: String::new(),
                    url: String::new(),
                    environment: config.project.environment.clone(),
                    extra: Map::new(),
                },
                extra: Map::new(),
            },
            working_memory: WorkingMemory::default(),
            context_health: ContextHealth {
                size_kb: 0.0,
                size_limit_kb: config.context.size_limit_kb,
                sessions_since_reset: 0,
                last_reset: today,
                compression_enabled: false,
                extra: Map::new(),
            },
            ai_instructions: default_ai_instructions(),
            extra: Map::new(),
        }
    }
}

/// Project metadata block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub version: String,
    pub description: String,
    pub status: String,
    pub phase: String,
    pub start_date: String,
    pub deployment: Deployment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deployment sub-record of the project block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    pub platform: String,
    pub url: String,
    pub environment: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Working memory: what is being worked on right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingMemory {
    /// Pointer to the current focus domain. Not an exclusivity lock.
    pub active_domain: Option<String>,
    /// Monotonic session counter.
    pub session_count: u64,
    /// Number of the most recently recorded session.
    pub last_session: Option<u64>,
    /// Domains in insertion order.
    pub domains: IndexMap<String, Domain>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkingMemory {
    /// Returns the active domain name, treating an empty string as unset.
    pub fn active_domain(&self) -> Option<&str> {
        self.active_domain.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns the named domain, creating a default live record if absent.
    pub fn upsert_domain(&mut self, name: &str) -> &mut Domain {
        self.domains
            .entry(name.to_string())
            .or_insert_with(|| Domain::Live(DomainRecord::default()))
    }

    /// Counts domains whose live status is "active".
    pub fn active_domain_count(&self) -> usize {
        self.domains
            .values()
            .filter(|d| d.status() == STATUS_ACTIVE)
            .count()
    }
}

/// Size accounting block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextHealth {
    /// Serialized size in KB, recomputed on every save.
    #[serde(default)]
    pub size_kb: f64,
    #[serde(default = "default_size_limit_kb")]
    pub size_limit_kb: f64,
    #[serde(default)]
    pub sessions_since_reset: u64,
    #[serde(default)]
    pub last_reset: String,
    /// Set once the size crosses the compression threshold.
    #[serde(default)]
    pub compression_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named area of work.
///
/// Archived domains are collapsed to a stub; the full record only lives on
/// in the archive snapshot. Values that fit neither shape (hand edits,
/// mistyped fields, non-objects) load as `Other` and are written back
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Domain {
    Archived(ArchivedDomain),
    Live(DomainRecord),
    Other(Value),
}

impl Domain {
    /// The `status` field, or `""` when an `Other` value carries no string
    /// status.
    pub fn status(&self) -> &str {
        match self {
            Domain::Archived(_) => STATUS_ARCHIVED,
            Domain::Live(record) => &record.status,
            Domain::Other(value) => value.get("status").and_then(Value::as_str).unwrap_or(""),
        }
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, Domain::Archived(_))
    }

    /// Returns the live record, if this domain is a well-formed live record.
    pub fn as_live(&self) -> Option<&DomainRecord> {
        match self {
            Domain::Live(record) => Some(record),
            Domain::Archived(_) | Domain::Other(_) => None,
        }
    }

    /// Shallow-merges `updates` into this domain.
    ///
    /// Works on the JSON object form: matching keys are replaced, new keys
    /// are added. The merged object must then type as a stub or a live
    /// record, so merging extra keys into an archived stub turns it back
    /// into a live record and an `Other` object can be repaired by an update
    /// that fixes its fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUpdate` if the domain is not a JSON object or a known
    /// field ends up with the wrong type. `self` is left unchanged in that
    /// case.
    pub fn merge(&mut self, name: &str, updates: &DomainUpdates) -> Result<()> {
        let invalid = |reason: String| PctxError::InvalidUpdate {
            domain: name.to_string(),
            reason,
        };

        let mut object = match serde_json::to_value(&*self)
            .map_err(|e| PctxError::Serialization(e.to_string()))?
        {
            Value::Object(object) => object,
            other => return Err(invalid(format!("domain is not an object: {}", other))),
        };

        for (key, value) in updates {
            object.insert(key.clone(), value.clone());
        }

        let merged = Value::Object(object);
        *self = match serde_json::from_value::<ArchivedDomain>(merged.clone()) {
            Ok(stub) => Domain::Archived(stub),
            Err(_) => Domain::Live(
                serde_json::from_value(merged).map_err(|e| invalid(e.to_string()))?,
            ),
        };
        Ok(())
    }
}

/// Full record of a domain that is still live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(default = "default_domain_status")]
    pub status: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub critical_facts: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub decisions_made: Vec<String>,
    #[serde(default)]
    pub files_created: Vec<String>,
    /// Keys added by updates that have no dedicated field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DomainRecord {
    fn default() -> Self {
        Self {
            status: default_domain_status(),
            priority: default_priority(),
            critical_facts: Vec::new(),
            constraints: Vec::new(),
            decisions_made: Vec::new(),
            files_created: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Collapsed form of an archived domain.
///
/// Serializes to exactly `{status: "archived", archived_date, archive_file}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchivedDomain {
    status: ArchivedMarker,
    pub archived_date: String,
    pub archive_file: String,
}

impl ArchivedDomain {
    pub fn new(archived_date: impl Into<String>, archive_file: impl Into<String>) -> Self {
        Self {
            status: ArchivedMarker::Archived,
            archived_date: archived_date.into(),
            archive_file: archive_file.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ArchivedMarker {
    Archived,
}

/// One line of the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session number; equals the counter value at time of writing.
    pub session: u64,
    /// ISO-8601 local timestamp.
    pub date: String,
    pub domain: String,
    #[serde(default)]
    pub tokens_in: u64,
    #[serde(default)]
    pub tokens_out: u64,
    #[serde(default)]
    pub deliverables: Vec<String>,
    #[serde(default)]
    pub ai_model: String,
}

/// What an archive index entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    Domain,
}

/// One line of `archive/INDEX.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveIndexEntry {
    #[serde(rename = "type")]
    pub kind: ArchiveKind,
    pub name: String,
    pub date: String,
    /// Archive file name, relative to the archive directory.
    pub file: String,
}

/// Contents of a per-domain archive snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainArchive {
    pub domain: String,
    pub archived_date: String,
    /// The domain record as it was immediately before archival.
    pub data: Domain,
}

/// Summary produced by `ContextStore::statistics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub project_name: String,
    /// Sessions counted in the log, independent of the document counter.
    pub total_sessions: u64,
    pub active_domains: usize,
    pub context_size_kb: f64,
    pub total_tokens_in: u64,
    pub total_tokens_out: u64,
    /// tokens_out / tokens_in, or 0 when no input tokens were recorded.
    pub efficiency_ratio: f64,
}

fn default_ai_instructions() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("preferred_language".into(), Value::from("python"));
    map.insert("code_style".into(), Value::from("production_ready"));
    map.insert("testing_required".into(), Value::from(true));
    map.insert("documentation_level".into(), Value::from("comprehensive"));
    map
}

fn default_size_limit_kb() -> f64 {
    100.0
}

fn default_domain_status() -> String {
    STATUS_ACTIVE.to_string()
}

fn default_priority() -> i64 {
    1
}
