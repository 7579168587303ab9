//! Integration tests exercising the full operation path:
//! boundary call → lock table → engine transition → reputation ledger →
//! store writes — wired the way the daemon wires them, with nullable
//! collaborators and the in-memory backend.

use std::sync::Arc;

use civis_nullables::{NullClock, NullNotifier};
use civis_service::{CivicService, Clock, ServiceError};
use civis_store::UserStore;
use civis_store_mem::MemoryStore;
use civis_types::{
    Category, PhoneNumber, PolicyParams, Rank, Report, ReportStatus, Role, Timestamp, User,
};
use civis_verification::VerificationError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    service: CivicService,
    store: Arc<MemoryStore>,
    notifier: Arc<NullNotifier>,
    clock: Arc<NullClock>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(NullNotifier::new());
    let clock = Arc::new(NullClock::new(1_000_000));
    let service = CivicService::new(
        store.clone(),
        store.clone(),
        notifier.clone(),
        clock.clone(),
        PolicyParams::civis_defaults(),
    );
    Harness {
        service,
        store,
        notifier,
        clock,
    }
}

fn phone(s: &str) -> PhoneNumber {
    PhoneNumber::new(s)
}

fn seed_citizen(store: &MemoryStore, number: &str) -> PhoneNumber {
    let identity = phone(number);
    let mut user = User::new(identity.clone(), Role::User, Timestamp::new(0));
    user.is_verified = true;
    store.put_user(&user).unwrap();
    identity
}

fn seed_admin(store: &MemoryStore, number: &str) -> PhoneNumber {
    let identity = phone(number);
    let mut user = User::new(identity.clone(), Role::Admin, Timestamp::new(0));
    user.is_verified = true;
    store.put_user(&user).unwrap();
    identity
}

async fn submit(h: &Harness, by: &PhoneNumber) -> Report {
    h.service
        .submit_report(
            "Collapsed road shoulder",
            "The shoulder on route 9 has collapsed into the ditch",
            Category::Infrastructure,
            by,
        )
        .await
        .unwrap()
}

fn points_of(store: &MemoryStore, identity: &PhoneNumber) -> i64 {
    store.get_user(identity).unwrap().verification_points
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_creates_pending_report_and_alerts() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");

    let report = submit(&h, &reporter).await;
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.created_by, reporter);
    assert_eq!(report.verification_count, 0);

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("New report received"));
    assert!(sent[0].contains("Collapsed road shoulder"));
}

#[tokio::test]
async fn submit_by_unknown_user_is_rejected() {
    let h = harness();
    let result = h
        .service
        .submit_report(
            "Collapsed road shoulder",
            "The shoulder on route 9 has collapsed into the ditch",
            Category::Infrastructure,
            &phone("5559998888"),
        )
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::Verification(VerificationError::UnknownUser(_)))
    ));
}

#[tokio::test]
async fn notifier_failure_does_not_fail_submission() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    h.notifier.fail_next_sends();

    let report = submit(&h, &reporter).await;
    assert_eq!(report.status, ReportStatus::Pending);
    assert!(h.notifier.sent().is_empty());
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn third_verification_reaches_quorum() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let report = submit(&h, &reporter).await;

    let a = seed_citizen(&h.store, "5550000002");
    let b = seed_citizen(&h.store, "5550000003");
    let c = seed_citizen(&h.store, "5550000004");

    h.service.verify_report(report.id, &a).await.unwrap();
    let after_two = h.service.verify_report(report.id, &b).await.unwrap();
    assert_eq!(after_two.verification_count, 2);
    assert!(!after_two.verified);

    let after_three = h.service.verify_report(report.id, &c).await.unwrap();
    assert_eq!(after_three.verification_count, 3);
    assert!(after_three.verified);
    assert_eq!(after_three.verified_at, Some(h.clock.now()));
    assert_eq!(points_of(&h.store, &c), 1);
}

#[tokio::test]
async fn verify_credits_one_point_and_rank_stays_consistent() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let verifier = seed_citizen(&h.store, "5550000002");
    let report = submit(&h, &reporter).await;

    h.service.verify_report(report.id, &verifier).await.unwrap();

    let user = h.store.get_user(&verifier).unwrap();
    assert_eq!(user.verification_points, 1);
    assert_eq!(user.rank, Rank::New);
}

#[tokio::test]
async fn submitter_cannot_verify_own_report() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let report = submit(&h, &reporter).await;

    let result = h.service.verify_report(report.id, &reporter).await;
    assert!(matches!(
        result,
        Err(ServiceError::Verification(VerificationError::SelfVerification))
    ));
    assert_eq!(points_of(&h.store, &reporter), 0);
}

#[tokio::test]
async fn double_verification_rejected_without_side_effects() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let verifier = seed_citizen(&h.store, "5550000002");
    let report = submit(&h, &reporter).await;

    h.service.verify_report(report.id, &verifier).await.unwrap();
    let result = h.service.verify_report(report.id, &verifier).await;
    assert!(matches!(
        result,
        Err(ServiceError::Verification(VerificationError::AlreadyVerified(_)))
    ));

    let current = h.service.get_report_by_id(report.id).unwrap();
    assert_eq!(current.verification_count, 1);
    assert_eq!(points_of(&h.store, &verifier), 1);
}

#[tokio::test]
async fn admin_cannot_verify() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let admin = seed_admin(&h.store, "5550009999");
    let report = submit(&h, &reporter).await;

    let result = h.service.verify_report(report.id, &admin).await;
    assert!(matches!(
        result,
        Err(ServiceError::Verification(VerificationError::AdminCannotVerify))
    ));
}

// ---------------------------------------------------------------------------
// Undo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn undo_at_59_minutes_succeeds_and_debits_the_point() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let verifier = seed_citizen(&h.store, "5550000002");
    let report = submit(&h, &reporter).await;

    h.service.verify_report(report.id, &verifier).await.unwrap();
    assert_eq!(points_of(&h.store, &verifier), 1);

    h.clock.advance(59 * 60);
    let updated = h
        .service
        .undo_verify_report(report.id, &verifier)
        .await
        .unwrap();
    assert_eq!(updated.verification_count, 0);
    assert_eq!(points_of(&h.store, &verifier), 0);
}

#[tokio::test]
async fn undo_at_61_minutes_is_forbidden() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let verifier = seed_citizen(&h.store, "5550000002");
    let report = submit(&h, &reporter).await;

    h.service.verify_report(report.id, &verifier).await.unwrap();
    h.clock.advance(61 * 60);

    let result = h.service.undo_verify_report(report.id, &verifier).await;
    assert!(matches!(
        result,
        Err(ServiceError::Verification(
            VerificationError::UndoWindowExpired { .. }
        ))
    ));
    // Nothing changed on either side.
    let current = h.service.get_report_by_id(report.id).unwrap();
    assert_eq!(current.verification_count, 1);
    assert_eq!(points_of(&h.store, &verifier), 1);
}

#[tokio::test]
async fn undo_drops_report_back_below_quorum() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let report = submit(&h, &reporter).await;

    let verifiers: Vec<PhoneNumber> = ["5550000002", "5550000003", "5550000004"]
        .iter()
        .map(|s| seed_citizen(&h.store, s))
        .collect();
    for v in &verifiers {
        h.service.verify_report(report.id, v).await.unwrap();
    }
    assert!(h.service.get_report_by_id(report.id).unwrap().verified);

    let updated = h
        .service
        .undo_verify_report(report.id, &verifiers[0])
        .await
        .unwrap();
    assert!(!updated.verified);
    assert_eq!(updated.verified_at, None);
    assert_eq!(updated.verification_count, 2);
}

// ---------------------------------------------------------------------------
// Status transitions and the reputation cascade
// ---------------------------------------------------------------------------

async fn quorum_report(h: &Harness) -> (Report, Vec<PhoneNumber>, PhoneNumber) {
    let reporter = seed_citizen(&h.store, "5550000001");
    let admin = seed_admin(&h.store, "5550009999");
    let report = submit(h, &reporter).await;

    let verifiers: Vec<PhoneNumber> = ["5550000002", "5550000003", "5550000004"]
        .iter()
        .map(|s| seed_citizen(&h.store, s))
        .collect();
    for v in &verifiers {
        h.service.verify_report(report.id, v).await.unwrap();
    }
    (report, verifiers, admin)
}

#[tokio::test]
async fn resolution_awards_two_points_to_each_verifier() {
    let h = harness();
    let (report, verifiers, admin) = quorum_report(&h).await;

    let updated = h
        .service
        .set_report_status(report.id, ReportStatus::Resolved, Some("Fixed"), &admin)
        .await
        .unwrap();
    assert_eq!(updated.status, ReportStatus::Resolved);
    assert_eq!(updated.comments.len(), 1);

    for v in &verifiers {
        // 1 from the verify itself, +2 from the cascade.
        assert_eq!(points_of(&h.store, v), 3);
        assert_eq!(h.store.get_user(v).unwrap().rank, Rank::New);
    }
}

#[tokio::test]
async fn repeating_resolved_does_not_cascade_twice() {
    let h = harness();
    let (report, verifiers, admin) = quorum_report(&h).await;

    h.service
        .set_report_status(report.id, ReportStatus::Resolved, None, &admin)
        .await
        .unwrap();
    h.service
        .set_report_status(report.id, ReportStatus::Resolved, None, &admin)
        .await
        .unwrap();

    for v in &verifiers {
        assert_eq!(points_of(&h.store, v), 3);
    }
}

#[tokio::test]
async fn rejection_then_resolution_applies_both_cascades() {
    let h = harness();
    let (report, verifiers, admin) = quorum_report(&h).await;

    h.service
        .set_report_status(report.id, ReportStatus::Rejected, None, &admin)
        .await
        .unwrap();
    for v in &verifiers {
        // 1 from verify, -1 from rejection.
        assert_eq!(points_of(&h.store, v), 0);
    }

    h.service
        .set_report_status(report.id, ReportStatus::Resolved, None, &admin)
        .await
        .unwrap();
    for v in &verifiers {
        assert_eq!(points_of(&h.store, v), 2);
    }
}

#[tokio::test]
async fn neutral_transition_leaves_points_alone() {
    let h = harness();
    let (report, verifiers, admin) = quorum_report(&h).await;

    h.service
        .set_report_status(report.id, ReportStatus::InProgress, Some("On it"), &admin)
        .await
        .unwrap();
    for v in &verifiers {
        assert_eq!(points_of(&h.store, v), 1);
    }
}

#[tokio::test]
async fn status_update_requires_admin() {
    let h = harness();
    let (report, verifiers, _admin) = quorum_report(&h).await;

    let result = h
        .service
        .set_report_status(report.id, ReportStatus::Resolved, None, &verifiers[0])
        .await;
    assert!(matches!(result, Err(ServiceError::AdminRequired)));
}

#[tokio::test]
async fn ranks_update_through_cascades() {
    let h = harness();
    let (report, verifiers, admin) = quorum_report(&h).await;

    // Lift one verifier to 4 points so the +2 cascade crosses the
    // Trusted threshold.
    let mut lifted = h.store.get_user(&verifiers[0]).unwrap();
    lifted.verification_points = 4;
    h.store.put_user(&lifted).unwrap();

    h.service
        .set_report_status(report.id, ReportStatus::Resolved, None, &admin)
        .await
        .unwrap();

    let after = h.store.get_user(&verifiers[0]).unwrap();
    assert_eq!(after.verification_points, 6);
    assert_eq!(after.rank, Rank::Trusted);
}

// ---------------------------------------------------------------------------
// Delete / get / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_is_admin_only_and_unconditional() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let admin = seed_admin(&h.store, "5550009999");
    let report = submit(&h, &reporter).await;

    let denied = h.service.delete_report(report.id, &reporter).await;
    assert!(matches!(denied, Err(ServiceError::AdminRequired)));

    h.service.delete_report(report.id, &admin).await.unwrap();
    let gone = h.service.get_report_by_id(report.id);
    assert!(matches!(
        gone,
        Err(ServiceError::Verification(VerificationError::UnknownReport(_)))
    ));
}

#[tokio::test]
async fn list_reports_newest_first() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");

    let first = submit(&h, &reporter).await;
    h.clock.advance(100);
    let second = submit(&h, &reporter).await;

    let listed = h.service.list_reports().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn statistics_aggregate_reports_and_users() {
    let h = harness();
    let (report, _verifiers, admin) = quorum_report(&h).await;
    // quorum_report seeds 1 reporter + 3 verifiers + 1 admin.

    h.clock.advance(2 * 3600);
    let reporter = phone("5550000001");
    h.service
        .submit_report(
            "Overflowing bins",
            "Bins behind the market have not been emptied in weeks",
            Category::Services,
            &reporter,
        )
        .await
        .unwrap();
    h.service
        .set_report_status(report.id, ReportStatus::Resolved, None, &admin)
        .await
        .unwrap();

    let stats = h.service.statistics().unwrap();
    assert_eq!(stats.total_reports, 2);
    assert_eq!(stats.verified_reports, 1);
    assert_eq!(stats.resolved_reports, 1);
    assert_eq!(stats.total_users, 5);
    assert_eq!(stats.admin_users, 1);
    assert_eq!(stats.category_distribution.get("infrastructure"), Some(&1));
    assert_eq!(stats.category_distribution.get("services"), Some(&1));
    assert_eq!(stats.status_distribution.get("Resolved"), Some(&1));
    assert_eq!(stats.status_distribution.get("Pending"), Some(&1));
    // The quorum report verified immediately after submission.
    assert_eq!(stats.average_response_hours, 0);
}

// ---------------------------------------------------------------------------
// SMS ingestion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sms_report_is_created_and_confirmed() {
    let h = harness();
    let sender = seed_citizen(&h.store, "5550000007");

    let report = h
        .service
        .ingest_sms(
            &sender,
            "Issue: Fallen tree - A tree is blocking the bike lane on Birch Street",
        )
        .await
        .unwrap();

    assert_eq!(report.category, Category::Services);
    assert_eq!(report.created_by, sender);
    assert_eq!(report.title, "Fallen tree");

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 2); // admin alert + confirmation
    assert!(sent[1].contains("Thank you for your report"));
}

#[tokio::test]
async fn malformed_sms_is_rejected() {
    let h = harness();
    let sender = seed_citizen(&h.store, "5550000007");

    let result = h.service.ingest_sms(&sender, "the bridge is broken").await;
    assert!(matches!(result, Err(ServiceError::MalformedSmsBody)));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_verifications_never_lose_counts() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let report = submit(&h, &reporter).await;

    let service = Arc::new(h.service);
    let mut handles = Vec::new();
    for i in 0..8 {
        let verifier = seed_citizen(&h.store, &format!("55500001{:02}", i));
        let service = service.clone();
        let id = report.id;
        handles.push(tokio::spawn(async move {
            service.verify_report(id, &verifier).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let current = service.get_report_by_id(report.id).unwrap();
    assert_eq!(current.verification_count, 8);
    assert_eq!(current.verified_by.len(), 8);
    assert!(current.verified);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_verifies_by_one_user_across_reports_keep_points_exact() {
    let h = harness();
    let reporter = seed_citizen(&h.store, "5550000001");
    let verifier = seed_citizen(&h.store, "5550000002");

    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(submit(&h, &reporter).await.id);
    }

    let service = Arc::new(h.service);
    let mut handles = Vec::new();
    for id in ids {
        let service = service.clone();
        let verifier = verifier.clone();
        handles.push(tokio::spawn(async move {
            service.verify_report(id, &verifier).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(points_of(&h.store, &verifier), 6);
}
