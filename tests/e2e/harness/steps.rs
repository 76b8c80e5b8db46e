use pctx_core::DomainUpdates;

use super::assertions::Assertion;

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // Store operations
    Init,
    RecordSession {
        domain: String,
        deliverables: Vec<String>,
        tokens_in: u64,
        tokens_out: u64,
        model: Option<String>,
    },
    UpdateDomain {
        name: String,
        updates: DomainUpdates,
    },
    ArchiveDomain {
        name: String,
    },
    Compress {
        aggressive: bool,
    },
    Reset {
        preserve_active: bool,
    },
    WriteHandoff {
        next_task: String,
        decisions: Vec<String>,
        files: Vec<String>,
    },

    // Direct document edits
    SetSizeLimit {
        kb: f64,
    },
    SetProjectName {
        name: String,
    },

    // Time control
    WaitHours {
        hours: u64,
    },
    WaitDays {
        days: u64,
    },

    // Failure simulation
    OverwriteFile {
        path: String,
        content: Vec<u8>,
    },
    Restart,

    /// Run the inner step and record its error instead of failing
    Attempt(Box<ScenarioStep>),

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
