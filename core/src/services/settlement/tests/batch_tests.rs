//! Tests for batch and settle-all runs.

use std::time::Duration;

use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::domain::entities::{AuditAction, User};
use crate::domain::value_objects::SettleOptions;
use crate::errors::DomainError;
use crate::services::settlement::CancellationFlag;

use super::mocks::{test_config, Harness};

#[tokio::test]
async fn test_batch_isolates_failing_item() {
    let h = Harness::new();
    let user = h.user().await;
    let a = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    let b = h.worklog(user.id, &[(dec!(-1), dec!(10))], &[]);
    let c = h.worklog(user.id, &[(dec!(2), dec!(10))], &[]);

    let batch = h
        .orchestrator
        .settle_batch(&[a.id, b.id, c.id], SettleOptions::default(), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(batch.processed, 3);
    assert_eq!(batch.succeeded, 2);
    assert_eq!(batch.failed, 1);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].worklog_id, b.id);
    assert_eq!(batch.errors[0].kind, "invalid_segment");

    assert!(h.worklogs.get_worklog(a.id).unwrap().is_settled());
    assert!(h.worklogs.get_worklog(b.id).unwrap().is_open());
    assert!(h.worklogs.get_worklog(c.id).unwrap().is_settled());

    let settled: Vec<Uuid> = batch.settled.iter().map(|r| r.worklog_id).collect();
    assert_eq!(settled, vec![a.id, c.id]);
}

#[tokio::test]
async fn test_empty_batch_is_validation_error() {
    let h = Harness::new();
    let result = h
        .orchestrator
        .settle_batch(&[], SettleOptions::default(), &CancellationFlag::new())
        .await;

    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(h.audit.get_all_logs().is_empty());
}

#[tokio::test]
async fn test_duplicate_ids_settle_once() {
    let config = wr_shared::SettlementConfig {
        max_concurrency: 1,
        ..test_config()
    };
    let h = Harness::with_config(config);
    let user = h.user().await;
    let a = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);

    let batch = h
        .orchestrator
        .settle_batch(&[a.id, a.id], SettleOptions::default(), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(batch.processed, 2);
    assert_eq!(batch.succeeded, 1);
    assert_eq!(batch.errors[0].kind, "already_settled");
    assert_eq!(h.worklogs.get_all_remittances().len(), 1);
}

#[tokio::test]
async fn test_batch_reports_missing_worklogs_per_item() {
    let h = Harness::new();
    let user = h.user().await;
    let a = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    let missing = Uuid::new_v4();

    let batch = h
        .orchestrator
        .settle_batch(&[missing, a.id], SettleOptions::default(), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(batch.succeeded, 1);
    assert_eq!(batch.errors[0].worklog_id, missing);
    assert_eq!(batch.errors[0].kind, "not_found");
}

#[tokio::test]
async fn test_cancelled_batch_processes_nothing() {
    let h = Harness::new();
    let user = h.user().await;
    let a = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let batch = h
        .orchestrator
        .settle_batch(&[a.id], SettleOptions::default(), &cancel)
        .await
        .unwrap();

    assert!(batch.is_empty());
    assert!(h.worklogs.get_worklog(a.id).unwrap().is_open());
    assert!(h.audit.get_all_logs().is_empty());
}

#[tokio::test]
async fn test_cancellation_mid_batch_keeps_committed_items() {
    let config = wr_shared::SettlementConfig {
        max_concurrency: 1,
        ..test_config()
    };
    let h = Harness::with_config(config);
    let user = h.user().await;
    let ids: Vec<Uuid> = (0..5)
        .map(|_| h.worklog(user.id, &[(dec!(1), dec!(10))], &[]).id)
        .collect();

    // Cancel from inside the first item's success notification.
    let cancel = CancellationFlag::new();
    h.notifier.cancel_on_notify(cancel.clone());

    let batch = h
        .orchestrator
        .settle_batch(&ids, SettleOptions::default(), &cancel)
        .await
        .unwrap();

    assert_eq!(batch.processed, 1);
    assert_eq!(batch.succeeded, 1);
    assert_eq!(batch.settled[0].worklog_id, ids[0]);
    assert!(h.worklogs.get_worklog(ids[0]).unwrap().is_settled());
    for id in &ids[1..] {
        assert!(h.worklogs.get_worklog(*id).unwrap().is_open());
    }
}

#[tokio::test]
async fn test_settle_all_open_covers_active_users_only() {
    let h = Harness::new();
    let active = h.user().await;
    let mut inactive = User::new("gone@example.com");
    inactive.deactivate();
    h.users.insert(inactive.clone()).await;

    let a1 = h.worklog(active.id, &[(dec!(1), dec!(10))], &[]);
    let a2 = h.worklog(active.id, &[(dec!(3), dec!(10))], &[dec!(5)]);
    let skipped = h.worklog(inactive.id, &[(dec!(1), dec!(10))], &[]);

    let batch = h
        .orchestrator
        .settle_all_open(SettleOptions::new(true), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(batch.processed, 2);
    assert_eq!(batch.succeeded, 2);
    assert!(h.worklogs.get_worklog(a1.id).unwrap().is_settled());
    assert_eq!(h.worklogs.get_worklog(a2.id).unwrap().amount, Some(dec!(27.50)));
    assert!(h.worklogs.get_worklog(skipped.id).unwrap().is_open());
}

#[tokio::test]
async fn test_settle_all_open_with_nothing_open_is_empty() {
    let h = Harness::new();
    h.user().await;

    let batch = h
        .orchestrator
        .settle_all_open(SettleOptions::default(), &CancellationFlag::new())
        .await
        .unwrap();

    assert!(batch.is_empty());
}

#[tokio::test]
async fn test_audit_rows_match_attempts() {
    let h = Harness::new();
    let user = h.user().await;
    let a = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    let b = h.worklog(user.id, &[(dec!(-1), dec!(10))], &[]);

    for _ in 0..3 {
        h.orchestrator
            .settle_batch(&[a.id, b.id], SettleOptions::default(), &CancellationFlag::new())
            .await
            .unwrap();
    }

    assert_eq!(h.orchestrator.audit_trail(a.id, 100).await.unwrap().len(), 3);
    assert_eq!(h.orchestrator.audit_trail(b.id, 100).await.unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_detached_batch_finishes_started_item_with_audit_row() {
    let config = wr_shared::SettlementConfig {
        max_concurrency: 1,
        retry_initial_delay_ms: 50,
        ..test_config()
    };
    let h = Harness::with_config(config);
    let user = h.user().await;
    let bad = h.worklog(user.id, &[(dec!(-1), dec!(10))], &[]);
    let good = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);

    // The failed row needs one retry, so the first item is still in flight
    // when the caller gives up.
    h.audit.fail_next_writes(1);
    let cancel = CancellationFlag::new();

    let abandoned = tokio::time::timeout(
        Duration::from_millis(10),
        h.orchestrator.settle_batch_detached(
            vec![bad.id, good.id],
            SettleOptions::default(),
            cancel.clone(),
        ),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(cancel.is_cancelled());

    tokio::time::sleep(Duration::from_secs(1)).await;

    let logs = h.audit.get_all_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].entity_id, bad.id);
    assert_eq!(logs[0].action, AuditAction::Failed);
    assert_eq!(h.audit.write_attempts(), 2);

    // Never started after the cancellation
    assert!(h.worklogs.get_worklog(good.id).unwrap().is_open());
    assert_eq!(h.worklogs.commit_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_detached_settle_still_records_failure() {
    let config = wr_shared::SettlementConfig {
        retry_initial_delay_ms: 50,
        ..test_config()
    };
    let h = Harness::with_config(config);
    let user = h.user().await;
    let bad = h.worklog(user.id, &[(dec!(-1), dec!(10))], &[]);
    h.audit.fail_next_writes(1);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(10),
        h.orchestrator
            .settle_one_detached(bad.id, SettleOptions::default()),
    )
    .await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_secs(1)).await;

    let logs = h.audit.get_all_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::Failed);
}

#[tokio::test]
async fn test_completed_detached_batch_leaves_flag_unset() {
    let h = Harness::new();
    let user = h.user().await;
    let a = h.worklog(user.id, &[(dec!(1), dec!(10))], &[]);
    let cancel = CancellationFlag::new();

    let batch = h
        .orchestrator
        .settle_batch_detached(vec![a.id], SettleOptions::default(), cancel.clone())
        .await
        .unwrap();

    assert_eq!(batch.succeeded, 1);
    assert!(!cancel.is_cancelled());
}
