//! Tests for the mock user repository implementation

use uuid::Uuid;

use crate::domain::entities::User;
use crate::repositories::user::MockUserRepository;
use crate::repositories::UserRepository;

#[tokio::test]
async fn test_find_by_id() {
    let repo = MockUserRepository::new();
    let user = User::new("worker@example.com");
    repo.insert(user.clone()).await;

    assert_eq!(repo.find_by_id(user.id).await.unwrap(), Some(user));
    assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_find_active_skips_inactive_users() {
    let repo = MockUserRepository::new();
    let active = User::new("active@example.com");
    let mut inactive = User::new("inactive@example.com");
    inactive.deactivate();

    repo.insert(active.clone()).await;
    repo.insert(inactive).await;

    let users = repo.find_active().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, active.id);
}
