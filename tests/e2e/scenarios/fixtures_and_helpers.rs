use crate::harness::clock::MockClock;
use crate::harness::{Assertion, Scenario};

/// Test that fixture loading works correctly
#[test]
fn test_fixture_loading() {
    Scenario::new("fixture_loading")
        .from_fixture("default")
        .assert(Assertion::ProjectName("Atlas".into()))
        .assert_session_count(3)
        .assert(Assertion::LastSession(Some(3)))
        .assert_active_domain(Some("backend"))
        .assert(Assertion::DomainCount(3))
        .assert_status("legacy", "inactive")
        .assert(Assertion::SessionLogLines(3))
        .run()
        .unwrap();
}

#[test]
fn test_fixture_statistics() {
    Scenario::new("fixture_statistics")
        .from_fixture("default")
        .assert(Assertion::TotalSessions(3))
        .assert(Assertion::TokenTotals {
            tokens_in: 12000,
            tokens_out: 6000,
        })
        .assert(Assertion::EfficiencyRatio(0.5))
        .assert(Assertion::Custom(Box::new(|store| {
            let stats = store.statistics()?;
            anyhow::ensure!(stats.active_domains == 2, "got {}", stats.active_domains);
            anyhow::ensure!(stats.context_size_kb == 1.2);
            Ok(())
        })))
        .run()
        .unwrap();
}

#[test]
fn test_fixture_session_continues_numbering() {
    Scenario::new("fixture_numbering")
        .from_fixture("default")
        .records_session("backend", 100, 100)
        .assert_session_count(4)
        .assert(Assertion::SessionLogLines(4))
        .assert(Assertion::SessionsSinceReset(4))
        .assert(Assertion::SizeMatchesDocument)
        .run()
        .unwrap();
}

#[test]
fn test_fixture_compress_then_handoff() {
    Scenario::new("fixture_compress_handoff")
        .from_fixture("default")
        .compresses(false)
        .assert_archived("legacy")
        .assert_status("frontend", "active")
        .writes_handoff("Ship invoice export", &["CSV first"], &["src/export.rs"])
        .assert(Assertion::HandoffContains("- **Current Focus**: backend".into()))
        .assert(Assertion::HandoffContains("- never delete invoices".into()))
        .assert(Assertion::HandoffContains("*Last Updated: Session 3 - 2026-03-14*".into()))
        .run()
        .unwrap();
}

#[test]
fn test_fixture_reset_keeps_project_block() {
    Scenario::new("fixture_reset")
        .from_fixture("default")
        .resets(true)
        .assert(Assertion::ArchiveFileExists {
            file: "full_context_session_3.json".into(),
        })
        .assert(Assertion::Custom(Box::new(|store| {
            let doc = store.load()?;
            anyhow::ensure!(doc.project.version == "0.3.0");
            anyhow::ensure!(doc.project.deployment.platform == "fly.io");
            anyhow::ensure!(doc.project.start_date == "2026-02-02");
            anyhow::ensure!(doc.ai_instructions["preferred_language"] == "python");
            Ok(())
        })))
        .run()
        .unwrap();
}

/// Test that the mock clock moves between days
#[test]
fn test_mock_clock_advances() {
    let clock = MockClock::new();
    let start = clock.now();
    assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2026-03-14 09:00");

    clock.advance_hours(20);
    assert_eq!(clock.now().format("%Y-%m-%d").to_string(), "2026-03-15");

    let provider = clock.as_provider();
    clock.advance_days(1);
    assert_eq!(provider().format("%Y-%m-%d").to_string(), "2026-03-16");
}

/// Test that expect_failure fails the scenario when the step succeeds
#[test]
fn test_expect_failure_rejects_success() {
    let result = Scenario::new("unexpected_success")
        .records_session("api", 1, 1)
        .expect_failure()
        .run();

    assert!(!result.success);
    assert_eq!(result.failure_step, Some(0));
}

/// Test that wait_hours crosses into the next day for archive names
#[test]
fn test_wait_hours_changes_archive_day() {
    Scenario::new("wait_hours")
        .focuses("api")
        .wait_hours(15)
        .archives("api")
        .assert(Assertion::ArchiveFileExists {
            file: "domain_api_20260315.json".into(),
        })
        .run()
        .unwrap();
}
