//! End-to-end scenarios exercising the classifier, manager, and profile
//! library together, as a caller outside the crate would.

use std::sync::Arc;

use quarantine::audit::RecordingAuditLogger;
use quarantine::classifier::{Classifier, TriggerClassifier};
use quarantine::evidence::{Evidence, EvidenceType};
use quarantine::facts::WorkloadFacts;
use quarantine::manager::{BaseQuarantineManager, HardenedQuarantineManager, QuarantineManager, QuarantineRequest};
use quarantine::metrics::InMemoryMetricsSink;
use quarantine::policy::QuarantinePolicy;
use quarantine::profiles::{Dialect, ProfileLibrary};
use quarantine::reason::QuarantineReason;
use quarantine::record::{NetworkOverride, ReleaseApproval};
use quarantine::store::{MemoryQuarantineStore, RecordFilter};
use quarantine::trigger::AutoQuarantineTrigger;
use quarantine_shared::cancellation::CancellationToken;
use quarantine_shared::errors::QuarantineError;

fn hardened_manager() -> (HardenedQuarantineManager, Arc<RecordingAuditLogger>, Arc<InMemoryMetricsSink>) {
    let base = BaseQuarantineManager::new(
        Arc::new(MemoryQuarantineStore::new()),
        Arc::new(TriggerClassifier::with_defaults()),
        QuarantinePolicy::with_defaults(),
    );
    let audit = Arc::new(RecordingAuditLogger::new());
    let metrics = Arc::new(InMemoryMetricsSink::new());
    let manager = HardenedQuarantineManager::new(
        Arc::new(base),
        audit.clone(),
        metrics.clone(),
        ProfileLibrary::new(),
    );
    (manager, audit, metrics)
}

/// Scenario 1: CPU-abuse auto-quarantine.
#[test]
fn cpu_abuse_auto_quarantine() {
    let classifier = TriggerClassifier::with_defaults();
    let facts = WorkloadFacts::new("w1", "blaze").with_cpu(9000.0).with_mem(512.0);
    let outcome = classifier.classify(&facts);
    assert!(outcome.quarantine);
    assert_eq!(outcome.reason, Some(QuarantineReason::ResourceAbuse));
    assert_eq!(outcome.evidence.len(), 1);
    assert_eq!(outcome.evidence[0].kind, EvidenceType::SyscallTrace);
}

/// Scenario 2: first-match precedence over a later-also-matching trigger.
#[test]
fn first_match_precedence() {
    let triggers = vec![
        AutoQuarantineTrigger::new("cpu > 8000", QuarantineReason::ResourceAbuse, true),
        AutoQuarantineTrigger::new(
            r#"metadata["untrusted"] == "true""#,
            QuarantineReason::UntrustedSource,
            true,
        ),
    ];
    let classifier = TriggerClassifier::new(triggers);
    let facts = WorkloadFacts::new("w1", "blaze")
        .with_cpu(9000.0)
        .with_metadata("untrusted", "true");
    let outcome = classifier.classify(&facts);
    assert_eq!(outcome.reason, Some(QuarantineReason::ResourceAbuse));
}

/// Scenario 3: a broken predicate is skipped, not fatal to the scan.
#[test]
fn broken_predicate_is_skipped() {
    let triggers = vec![
        AutoQuarantineTrigger::new("cpu >>> 8000", QuarantineReason::ResourceAbuse, true),
        AutoQuarantineTrigger::new("mem > 100", QuarantineReason::ResourceAbuse, true),
    ];
    let classifier = TriggerClassifier::new(triggers);
    let facts = WorkloadFacts::new("w1", "blaze").with_mem(200.0);
    let outcome = classifier.classify(&facts);
    assert!(outcome.quarantine);
    assert_eq!(outcome.reason, Some(QuarantineReason::ResourceAbuse));
}

/// Scenario 4: auto-quarantine rejects empty evidence and writes nothing.
#[tokio::test]
async fn auto_quarantine_rejects_empty_evidence() {
    let (manager, _audit, _metrics) = hardened_manager();
    let cancel = CancellationToken::new();
    let req = QuarantineRequest::auto("w1", QuarantineReason::ResourceAbuse, Vec::new(), "scheduler");
    let err = manager.quarantine(req, &cancel).await.unwrap_err();
    match err {
        QuarantineError::Validation(msg) => assert!(msg.contains("evidence")),
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(manager.list(&RecordFilter::default(), &cancel).await.unwrap().is_empty());
}

/// Scenario 5: release with a network override audits in the documented
/// order (quarantine, then override, then release) and increments the
/// override counter exactly once.
#[tokio::test]
async fn release_with_network_override_audits_in_order() {
    let (manager, audit, metrics) = hardened_manager();
    let cancel = CancellationToken::new();

    let req = QuarantineRequest::manual(
        "X",
        QuarantineReason::SuspiciousBehavior,
        vec![Evidence::new(EvidenceType::NetworkLog, "flagged", Vec::new())],
        "operator",
    );
    manager.quarantine(req, &cancel).await.unwrap();

    let approval = ReleaseApproval::new("security-team", "reviewed").with_network_override(NetworkOverride {
        network_mode: "monitored".to_string(),
        allowed_egress: vec!["a.example".to_string()],
        justification: "analysis".to_string(),
    });
    manager.release("X", approval, &cancel).await.unwrap();

    let events = audit.events();
    let event_types: Vec<String> = events
        .iter()
        .map(|(_, fields)| {
            fields
                .get("event_type")
                .and_then(|v| v.as_str())
                .unwrap_or("?")
                .to_string()
        })
        .collect();
    assert_eq!(event_types, vec!["quarantine", "network_override", "release"]);
    assert_eq!(metrics.counter("quarantine.network_override"), 1);
}

/// Scenario 6: profile gradation wire format — strict carries the
/// additional rule groups, default does not.
#[test]
fn profile_gradation_wire_format() {
    let library = ProfileLibrary::new();
    let strict = library.get_by_name("quarantine-strict").unwrap();
    let strict_json = library.serialize(&strict, Dialect::VmmNative);
    for needle in ["\"chmod\"", "\"msgget\"", "\"capset\"", "SCMP_ACT_ERRNO"] {
        assert!(strict_json.contains(needle));
    }

    let default = library.get_by_name("default").unwrap();
    let default_json = library.serialize(&default, Dialect::VmmNative);
    for needle in ["\"chmod\"", "\"msgget\"", "\"capset\""] {
        assert!(!default_json.contains(needle));
    }
}

/// Universal invariant: every canonical name resolves and gradation holds.
#[test]
fn canonical_profiles_are_gradated_and_default_to_allow() {
    let library = ProfileLibrary::new();
    let default = library.get_by_name("default").unwrap();
    let quarantine = library.get_by_name("quarantine").unwrap();
    let strict = library.get_by_name("quarantine-strict").unwrap();
    assert!(default.syscall_count() < quarantine.syscall_count());
    assert!(quarantine.syscall_count() < strict.syscall_count());
    for p in [&default, &quarantine, &strict] {
        assert_eq!(p.default_action, quarantine::profiles::Action::Allow);
    }
}

/// Universal invariant: `set_policy` with empty defaults normalizes to
/// network mode `none` and profile name `quarantine`.
#[tokio::test]
async fn set_policy_with_empty_defaults_normalizes() {
    let (manager, _audit, _metrics) = hardened_manager();
    let cancel = CancellationToken::new();
    let isolation = quarantine::policy::IsolationConfig {
        network_mode: quarantine::policy::NetworkMode::None,
        allowed_egress: Vec::new(),
        seccomp_profile: String::new(),
        storage: quarantine::policy::StorageBackend {
            isolated_dir: String::new(),
            snapshot_based: false,
        },
        monitoring: quarantine::policy::MonitoringToggles::default(),
    };
    manager
        .set_policy(QuarantinePolicy::new(Vec::new(), Vec::new(), isolation, 0), &cancel)
        .await
        .unwrap();
    let active = manager.isolation_config();
    assert_eq!(active.network_mode, quarantine::policy::NetworkMode::None);
    assert_eq!(active.seccomp_profile, "quarantine");
}
