use crate::harness::{Assertion, Scenario};
use serde_json::{json, Value};

fn worked_project() -> Scenario {
    Scenario::new("reset")
        .init()
        .sets_project_name("Atlas")
        .records_session("a", 100, 40)
        .records_session("b", 200, 80)
        .updates_domain("a", json!({ "critical_facts": ["legacy auth"] }))
        .updates_domain("b", json!({ "constraints": ["keep p99 under 50ms"] }))
}

#[test]
fn test_reset_preserves_active_domain() {
    worked_project()
        .wait_days(2)
        .resets(true)
        .assert(Assertion::ArchiveFileExists {
            file: "full_context_session_2.json".into(),
        })
        .assert(Assertion::ProjectName("Atlas".into()))
        .assert_session_count(2)
        .assert(Assertion::SessionsSinceReset(0))
        .assert(Assertion::DomainCount(1))
        .assert_active_domain(Some("b"))
        .assert(Assertion::DomainHasConstraint {
            name: "b".into(),
            constraint: "keep p99 under 50ms".into(),
        })
        .assert(Assertion::LastReset("2026-03-16".into()))
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_reset_can_discard_active_domain() {
    worked_project()
        .resets(false)
        .assert(Assertion::DomainCount(0))
        .assert_active_domain(None)
        .assert_session_count(2)
        .run()
        .unwrap();
}

#[test]
fn test_reset_snapshot_is_the_old_document() {
    worked_project()
        .resets(true)
        .assert(Assertion::Custom(Box::new(|store| {
            let path = store.archive_dir().join("full_context_session_2.json");
            let snapshot: Value = serde_json::from_slice(&std::fs::read(path)?)?;
            let domains = &snapshot["working_memory"]["domains"];
            anyhow::ensure!(domains["a"]["critical_facts"][0] == "legacy auth");
            anyhow::ensure!(domains["b"].is_object());
            anyhow::ensure!(snapshot["context_health"]["sessions_since_reset"] == 2);
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_reset_leaves_session_log_alone() {
    worked_project()
        .resets(true)
        .records_session("b", 10, 10)
        .assert(Assertion::SessionLogLines(3))
        .assert_session_count(3)
        .assert(Assertion::SessionsSinceReset(1))
        .assert(Assertion::TotalSessions(3))
        .run()
        .unwrap();
}

#[test]
fn test_reset_without_active_domain() {
    Scenario::new("reset_no_focus")
        .records_session("a", 1, 1)
        .resets(true)
        .assert(Assertion::DomainCount(0))
        .assert_active_domain(None)
        .assert(Assertion::SizeMatchesDocument)
        .run()
        .unwrap();
}

#[test]
fn test_reset_preserves_archived_stub() {
    Scenario::new("reset_archived_focus")
        .focuses("api")
        .archives("api")
        .resets(true)
        .assert_archived("api")
        .assert(Assertion::ArchiveIndexConsistent)
        .run()
        .unwrap();
}

#[test]
fn test_repeated_resets_overwrite_snapshot() {
    Scenario::new("reset_twice")
        .focuses("a")
        .resets(true)
        .resets(false)
        .assert(Assertion::ArchiveFileExists {
            file: "full_context_session_0.json".into(),
        })
        .assert(Assertion::Custom(Box::new(|store| {
            let path = store.archive_dir().join("full_context_session_0.json");
            let snapshot: Value = serde_json::from_slice(&std::fs::read(path)?)?;
            anyhow::ensure!(snapshot["working_memory"]["active_domain"] == "a");
            Ok(())
        })))
        .assert(Assertion::DomainCount(0))
        .run()
        .unwrap();
}
