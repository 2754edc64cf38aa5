//! Tests for single-worklog settlement, previews and audit trails.

use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::domain::entities::{AuditAction, WorkLogStatus};
use crate::domain::value_objects::SettleOptions;
use crate::errors::DomainError;
use crate::repositories::AuditLogRepository;
use super::mocks::{test_config, Harness};

#[tokio::test]
async fn test_settle_one_commits_amount_remittance_and_audit() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(4), dec!(25))], &[dec!(10)]);

    let result = h
        .orchestrator
        .settle_one(worklog.id, SettleOptions::new(true))
        .await
        .unwrap();

    assert_eq!(result.worklog_id, worklog.id);
    assert_eq!(result.amount, dec!(99.00));
    assert_eq!(result.status, WorkLogStatus::Settled);

    let stored = h.worklogs.get_worklog(worklog.id).unwrap();
    assert_eq!(stored.status, WorkLogStatus::Settled);
    assert_eq!(stored.amount, Some(dec!(99.00)));
    assert!(stored.settled_at.is_some());

    let remittances = h.worklogs.get_all_remittances();
    assert_eq!(remittances.len(), 1);
    assert_eq!(remittances[0].id, result.remittance_id);
    assert_eq!(remittances[0].user_id, user.id);

    let logs = h.audit.get_all_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::Settled);
    assert_eq!(logs[0].entity_id, worklog.id);
    assert_eq!(logs[0].detail["amount"], "99.00");
}

#[tokio::test]
async fn test_settle_one_without_finalize() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(4), dec!(25))], &[dec!(10)]);

    let result = h
        .orchestrator
        .settle_one(worklog.id, SettleOptions::new(false))
        .await
        .unwrap();
    assert_eq!(result.amount.to_string(), "90.00");
}

#[tokio::test]
async fn test_second_settle_is_already_settled_and_amount_unchanged() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(4), dec!(25))], &[dec!(10)]);

    h.orchestrator
        .settle_one(worklog.id, SettleOptions::new(true))
        .await
        .unwrap();
    let second = h
        .orchestrator
        .settle_one(worklog.id, SettleOptions::new(false))
        .await;

    assert_eq!(second, Err(DomainError::AlreadySettled { worklog_id: worklog.id }));
    assert_eq!(h.worklogs.get_worklog(worklog.id).unwrap().amount, Some(dec!(99.00)));
    assert_eq!(h.worklogs.get_all_remittances().len(), 1);

    let trail = h.orchestrator.audit_trail(worklog.id, 10).await.unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail.iter().filter(|l| l.action == AuditAction::Failed).count(), 1);
}

#[tokio::test]
async fn test_missing_worklog_is_not_found_and_audited() {
    let h = Harness::new();
    let missing = Uuid::new_v4();

    let result = h.orchestrator.settle_one(missing, SettleOptions::default()).await;

    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    let logs = h.audit.get_all_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::Failed);
    assert_eq!(logs[0].detail["kind"], "not_found");
}

#[tokio::test]
async fn test_invalid_segment_leaves_worklog_open() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(2), dec!(50)), (dec!(-1), dec!(50))], &[]);

    let result = h.orchestrator.settle_one(worklog.id, SettleOptions::default()).await;

    assert!(matches!(result, Err(DomainError::InvalidSegment { .. })));
    assert!(h.worklogs.get_worklog(worklog.id).unwrap().is_open());
    assert!(h.worklogs.get_all_remittances().is_empty());
    assert_eq!(h.worklogs.commit_attempts(), 0);
    assert_eq!(h.audit.get_all_logs()[0].detail["kind"], "invalid_segment");
}

#[tokio::test]
async fn test_negative_total_is_invalid_amount() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(1), dec!(10))], &[dec!(25)]);

    let result = h.orchestrator.settle_one(worklog.id, SettleOptions::default()).await;

    assert!(matches!(result, Err(DomainError::InvalidAmount { .. })));
    assert!(h.worklogs.get_worklog(worklog.id).unwrap().is_open());
}

#[tokio::test]
async fn test_worklog_without_segments_settles_to_zero() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[], &[]);

    let result = h
        .orchestrator
        .settle_one(worklog.id, SettleOptions::new(true))
        .await
        .unwrap();
    assert_eq!(result.amount.to_string(), "0.00");
}

#[tokio::test]
async fn test_transient_commit_failure_is_retried() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    h.worklogs.fail_next_commits(2);

    let result = h.orchestrator.settle_one(worklog.id, SettleOptions::default()).await;

    assert!(result.is_ok());
    assert_eq!(h.worklogs.commit_attempts(), 3);
    assert_eq!(h.audit.get_all_logs().len(), 1);
}

#[tokio::test]
async fn test_transient_failures_beyond_retries_are_reported() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    h.worklogs.fail_next_commits(10);

    let result = h.orchestrator.settle_one(worklog.id, SettleOptions::default()).await;

    assert!(matches!(result, Err(DomainError::TransientStorage { .. })));
    assert_eq!(h.worklogs.commit_attempts(), 3);
    assert!(h.worklogs.get_worklog(worklog.id).unwrap().is_open());

    let logs = h.audit.get_all_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].detail["kind"], "transient_storage");
}

#[tokio::test]
async fn test_audit_outage_aborts_settlement() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    h.audit.set_should_fail(true);

    let result = h.orchestrator.settle_one(worklog.id, SettleOptions::default()).await;

    assert!(matches!(result, Err(DomainError::AuditPersistence { .. })));
    assert!(h.worklogs.get_worklog(worklog.id).unwrap().is_open());
    assert!(h.worklogs.get_all_remittances().is_empty());
}

#[tokio::test]
async fn test_failed_audit_outage_returns_audit_persistence() {
    let h = Harness::new();
    h.audit.set_should_fail(true);

    let result = h
        .orchestrator
        .settle_one(Uuid::new_v4(), SettleOptions::default())
        .await;

    match result {
        Err(DomainError::AuditPersistence { message }) => assert!(message.contains("not found")),
        other => panic!("expected AuditPersistence, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_settles_produce_one_remittance() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(8), dec!(30))], &[]);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let orchestrator = Arc::clone(&h.orchestrator);
        let id = worklog.id;
        handles.push(tokio::spawn(async move {
            orchestrator.settle_one(id, SettleOptions::default()).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(e.is_conflict(), "unexpected error: {:?}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(h.worklogs.get_all_remittances().len(), 1);
    assert_eq!(h.audit.count_by_entity(worklog.id).await.unwrap(), 8);
    assert_eq!(h.worklogs.get_worklog(worklog.id).unwrap().amount, Some(dec!(240)));
}

#[tokio::test]
async fn test_owner_is_notified_on_success_only() {
    let h = Harness::new();
    let user = h.user().await;
    let good = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    let bad = h.worklog(user.id, &[(dec!(-1), dec!(10))], &[]);

    h.orchestrator.settle_one(good.id, SettleOptions::default()).await.unwrap();
    let _ = h.orchestrator.settle_one(bad.id, SettleOptions::default()).await;

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, user.id);
    assert!(sent[0].1.contains(&good.id.to_string()));
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_settlement() {
    let h = Harness::new();
    *h.notifier.fail.lock().unwrap() = true;
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);

    let result = h.orchestrator.settle_one(worklog.id, SettleOptions::default()).await;

    assert!(result.is_ok());
    assert!(h.worklogs.get_worklog(worklog.id).unwrap().is_settled());
}

#[tokio::test]
async fn test_async_notification_is_delivered_in_background() {
    let config = wr_shared::SettlementConfig {
        notify_async: true,
        ..test_config()
    };
    let h = Harness::with_config(config);
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);

    h.orchestrator.settle_one(worklog.id, SettleOptions::default()).await.unwrap();

    for _ in 0..50 {
        if !h.notifier.sent().is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_default_options_follow_config() {
    let h = Harness::new();
    assert!(!h.orchestrator.default_options().finalize);

    let config = wr_shared::SettlementConfig {
        finalize_by_default: true,
        ..test_config()
    };
    let h = Harness::with_config(config);
    assert!(h.orchestrator.default_options().finalize);
}

#[tokio::test]
async fn test_preview_open_worklog_commits_nothing() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(4), dec!(25))], &[dec!(10)]);

    let preview = h.orchestrator.preview(worklog.id, true).await.unwrap();

    assert_eq!(preview.status, WorkLogStatus::Open);
    assert_eq!(preview.base_amount, Some(dec!(100)));
    assert_eq!(preview.adjustment_amount, Some(dec!(10)));
    assert_eq!(preview.amount, dec!(99.00));
    assert!(preview.finalize);
    assert!(h.worklogs.get_worklog(worklog.id).unwrap().is_open());
    assert!(h.audit.get_all_logs().is_empty());
}

#[tokio::test]
async fn test_preview_settled_worklog_returns_committed_amount() {
    let h = Harness::new();
    let user = h.user().await;
    let worklog = h.worklog(user.id, &[(dec!(4), dec!(25))], &[dec!(10)]);
    h.orchestrator
        .settle_one(worklog.id, SettleOptions::new(false))
        .await
        .unwrap();

    let preview = h.orchestrator.preview(worklog.id, true).await.unwrap();

    assert_eq!(preview.status, WorkLogStatus::Settled);
    assert_eq!(preview.amount, dec!(90.00));
    assert_eq!(preview.base_amount, None);
}

#[tokio::test]
async fn test_preview_missing_worklog() {
    let h = Harness::new();
    let result = h.orchestrator.preview(Uuid::new_v4(), false).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}
