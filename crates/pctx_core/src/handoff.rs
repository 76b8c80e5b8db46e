//! Markdown hand-off note rendering.

use crate::types::ContextDocument;
use chrono::NaiveDate;

/// Renders the hand-off note for `doc`.
///
/// Empty `decisions` or `active_files` render a placeholder line. A
/// "Critical Constraints" section is added when the active domain is live
/// and has constraints.
pub fn render(
    doc: &ContextDocument,
    next_task: &str,
    decisions: &[String],
    active_files: &[String],
    date: NaiveDate,
) -> String {
    let wm = &doc.working_memory;

    let mut out = format!(
        "# AI Handoff Document\n\
         *Last Updated: Session {} - {}*\n\
         \n\
         ## Quick Context\n\
         - **Project**: {}\n\
         - **Current Focus**: {}\n\
         - **Next Task**: {}\n\
         \n\
         ## Recent Decisions\n",
        wm.session_count,
        date.format("%Y-%m-%d"),
        doc.project.name,
        wm.active_domain().unwrap_or(""),
        next_task,
    );

    if decisions.is_empty() {
        out.push_str("- No recent decisions recorded\n");
    } else {
        for (i, decision) in decisions.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, decision));
        }
    }

    out.push_str("\n## Active Files\n");
    if active_files.is_empty() {
        out.push_str("- No active files recorded\n");
    } else {
        for file in active_files {
            out.push_str(&format!("- `{}`\n", file));
        }
    }

    let constraints = wm
        .active_domain()
        .and_then(|name| wm.domains.get(name))
        .and_then(|domain| domain.as_live())
        .map(|record| record.constraints.as_slice())
        .unwrap_or_default();
    if !constraints.is_empty() {
        out.push_str("\n## Critical Constraints\n");
        for constraint in constraints {
            out.push_str(&format!("- {}\n", constraint));
        }
    }

    out.push_str(&format!("\n## For Next Session\n{}\n", next_task));
    out
}
