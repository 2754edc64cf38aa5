//! Tests for the AuditRecorder.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{AuditAction, Remittance};
use crate::errors::DomainError;
use crate::repositories::audit::MockAuditLogRepository;
use crate::services::audit::AuditRecorder;
use crate::services::retry::RetryPolicy;

fn recorder(repo: &Arc<MockAuditLogRepository>) -> AuditRecorder<MockAuditLogRepository> {
    AuditRecorder::new(Arc::clone(repo), RetryPolicy::new(2, Duration::from_millis(10), 2))
}

#[tokio::test]
async fn test_append_persists_entry() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let recorder = recorder(&repo);
    let entity_id = Uuid::new_v4();

    let entry = recorder
        .append(entity_id, AuditAction::Settled, json!({"amount": "99.00"}))
        .await
        .unwrap();

    let logs = repo.get_all_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0], entry);
    assert_eq!(logs[0].detail["amount"], "99.00");
}

#[tokio::test(start_paused = true)]
async fn test_append_retries_transient_failures() {
    let repo = Arc::new(MockAuditLogRepository::new());
    repo.fail_next_writes(2);
    let recorder = recorder(&repo);

    let result = recorder
        .append(Uuid::new_v4(), AuditAction::Failed, json!({}))
        .await;

    assert!(result.is_ok());
    assert_eq!(repo.write_attempts(), 3);
    assert_eq!(repo.get_all_logs().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_append_exhausted_retries_is_audit_persistence() {
    let repo = Arc::new(MockAuditLogRepository::new());
    repo.fail_next_writes(5);
    let recorder = recorder(&repo);

    let result = recorder
        .append(Uuid::new_v4(), AuditAction::Failed, json!({}))
        .await;

    assert!(matches!(result, Err(DomainError::AuditPersistence { .. })));
    assert_eq!(repo.write_attempts(), 3);
    assert!(repo.get_all_logs().is_empty());
}

#[tokio::test]
async fn test_append_non_retriable_failure_is_audit_persistence() {
    let repo = Arc::new(MockAuditLogRepository::new());
    repo.set_should_fail(true);
    let recorder = recorder(&repo);

    let result = recorder
        .append(Uuid::new_v4(), AuditAction::Settled, json!({}))
        .await;

    assert!(matches!(result, Err(DomainError::AuditPersistence { .. })));
    assert_eq!(repo.write_attempts(), 1);
}

#[tokio::test]
async fn test_record_failure_stores_kind_and_message() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let recorder = recorder(&repo);
    let worklog_id = Uuid::new_v4();
    let failure = DomainError::InvalidSegment {
        segment_id: Uuid::new_v4(),
        reason: "negative hours".to_string(),
    };

    let entry = recorder.record_failure(worklog_id, &failure, true).await.unwrap();

    assert_eq!(entry.action, AuditAction::Failed);
    assert_eq!(entry.entity_id, worklog_id);
    assert_eq!(entry.detail["kind"], "invalid_segment");
    assert_eq!(entry.detail["finalize"], true);
    assert!(entry.detail["message"].as_str().unwrap().contains("negative hours"));
}

#[tokio::test]
async fn test_record_failure_reports_both_errors_when_audit_fails() {
    let repo = Arc::new(MockAuditLogRepository::new());
    repo.set_should_fail(true);
    let recorder = recorder(&repo);
    let worklog_id = Uuid::new_v4();
    let failure = DomainError::AlreadySettled { worklog_id };

    let result = recorder.record_failure(worklog_id, &failure, false).await;

    match result {
        Err(DomainError::AuditPersistence { message }) => {
            assert!(message.contains("already settled"));
        }
        other => panic!("expected AuditPersistence, got {:?}", other),
    }
}

#[test]
fn test_settled_entry_detail() {
    let worklog_id = Uuid::new_v4();
    let remittance = Remittance::new(worklog_id, Uuid::new_v4(), dec!(99.00), Utc::now());

    let entry = AuditRecorder::<MockAuditLogRepository>::settled_entry(
        worklog_id,
        &remittance,
        dec!(100),
        dec!(10),
        false,
    );

    assert_eq!(entry.action, AuditAction::Settled);
    assert_eq!(entry.detail["remittance_id"], json!(remittance.id));
    assert_eq!(entry.detail["amount"], "99.00");
    assert_eq!(entry.detail["base_amount"], "100");
    assert_eq!(entry.detail["finalize"], false);
}

#[tokio::test]
async fn test_trail_returns_newest_first() {
    let repo = Arc::new(MockAuditLogRepository::new());
    let recorder = recorder(&repo);
    let entity_id = Uuid::new_v4();

    recorder.append(entity_id, AuditAction::Failed, json!({})).await.unwrap();
    let last = recorder.append(entity_id, AuditAction::Settled, json!({})).await.unwrap();

    let trail = recorder.trail(entity_id, 10).await.unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].id, last.id);
}
