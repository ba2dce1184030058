mod common;

use common::{create_test_admin, create_test_document, create_test_pool};

use idm_core::Role;
use idm_db::{DbError, SqliteUserStore, UserFilter, UserPatch, UserStore};

use chrono::{Duration, SubsecRound, Utc};
use googletest::prelude::*;
use uuid::Uuid;

#[tokio::test]
async fn given_inserted_user_when_found_by_id_then_round_trips_all_fields() {
    // Given: An empty database
    let store = SqliteUserStore::new(create_test_pool().await);
    let doc = create_test_document("alice", 0);

    // When: Inserting the user
    store.insert_one(&doc).await.unwrap();

    // Then: Finding by ID returns an identical document
    let found = store.find_one(&UserFilter::Id(doc.id)).await.unwrap();
    assert_that!(found, some(eq(&doc)));
}

#[tokio::test]
async fn given_inserted_user_when_found_by_username_or_email_then_returned() {
    let store = SqliteUserStore::new(create_test_pool().await);
    let doc = create_test_document("alice", 0);
    store.insert_one(&doc).await.unwrap();

    let by_username = store
        .find_one(&UserFilter::Username("alice".to_string()))
        .await
        .unwrap();
    let by_email = store
        .find_one(&UserFilter::Email("alice@example.com".to_string()))
        .await
        .unwrap();

    assert_that!(by_username.map(|d| d.id), some(eq(doc.id)));
    assert_that!(by_email.map(|d| d.id), some(eq(doc.id)));
}

#[tokio::test]
async fn given_empty_database_when_finding_nonexistent_id_then_returns_none() {
    let store = SqliteUserStore::new(create_test_pool().await);

    let result = store.find_one(&UserFilter::Id(Uuid::new_v4())).await.unwrap();

    assert_that!(result, none());
}

#[tokio::test]
async fn given_existing_username_when_inserting_duplicate_then_unique_violation_on_username() {
    // Given
    let store = SqliteUserStore::new(create_test_pool().await);
    store
        .insert_one(&create_test_document("alice", 0))
        .await
        .unwrap();
    let mut duplicate = create_test_document("bob", 1);
    duplicate.username = "alice".to_string();

    // When
    let result = store.insert_one(&duplicate).await;

    // Then
    assert!(
        matches!(result, Err(DbError::UniqueViolation { ref field, .. }) if field == "username")
    );
}

#[tokio::test]
async fn given_existing_email_when_inserting_duplicate_then_unique_violation_on_email() {
    let store = SqliteUserStore::new(create_test_pool().await);
    store
        .insert_one(&create_test_document("alice", 0))
        .await
        .unwrap();
    let mut duplicate = create_test_document("bob", 1);
    duplicate.email = "alice@example.com".to_string();

    let result = store.insert_one(&duplicate).await;

    assert!(matches!(result, Err(DbError::UniqueViolation { ref field, .. }) if field == "email"));
}

#[tokio::test]
async fn given_users_when_paged_then_ordered_by_creation_with_skip_and_limit() {
    // Given
    let store = SqliteUserStore::new(create_test_pool().await);
    for (order, name) in ["alice", "bob", "carol", "dave", "erin"].iter().enumerate() {
        store
            .insert_one(&create_test_document(name, order as i64))
            .await
            .unwrap();
    }

    // When
    let page = store.find(&UserFilter::All, 1, 3).await.unwrap();

    // Then
    let names: Vec<_> = page.iter().map(|d| d.username.clone()).collect();
    assert_that!(
        names,
        elements_are![eq("bob"), eq("carol"), eq("dave")]
    );
}

#[tokio::test]
async fn given_mixed_roles_when_filtered_by_role_then_only_matching_returned() {
    let store = SqliteUserStore::new(create_test_pool().await);
    store
        .insert_one(&create_test_admin("root", 0))
        .await
        .unwrap();
    store
        .insert_one(&create_test_document("alice", 1))
        .await
        .unwrap();

    let admins = store.find(&UserFilter::Role(Role::Admin), 0, 100).await.unwrap();
    let users = store.find(&UserFilter::Role(Role::User), 0, 100).await.unwrap();

    assert_that!(admins.len(), eq(1));
    assert_that!(admins[0].role, eq(Role::Admin));
    assert_that!(users.len(), eq(1));
    assert_that!(users[0].username, eq("alice"));
}

#[tokio::test]
async fn given_existing_user_when_patched_then_only_patched_fields_change() {
    // Given
    let store = SqliteUserStore::new(create_test_pool().await);
    let doc = create_test_document("alice", 0);
    store.insert_one(&doc).await.unwrap();
    let later = Utc::now().trunc_subsecs(3) + Duration::seconds(1);
    let mut patch = UserPatch::new(later);
    patch.role = Some(Role::Admin);
    patch.is_active = Some(false);

    // When
    let modified = store
        .update_one(&UserFilter::Id(doc.id), &patch)
        .await
        .unwrap();

    // Then
    assert_that!(modified, eq(1));
    let found = store
        .find_one(&UserFilter::Id(doc.id))
        .await
        .unwrap()
        .unwrap();
    assert_that!(found.role, eq(Role::Admin));
    assert_that!(found.is_active, eq(false));
    assert_that!(found.username, eq(&doc.username));
    assert_that!(found.full_name, eq(&doc.full_name));
    assert_that!(found.password_hash, eq(&doc.password_hash));
    assert_that!(found.updated_at, eq(later));
    assert_that!(found.created_at, eq(doc.created_at));
}

#[tokio::test]
async fn given_patch_to_taken_username_when_applied_then_unique_violation() {
    let store = SqliteUserStore::new(create_test_pool().await);
    let alice = create_test_document("alice", 0);
    store.insert_one(&alice).await.unwrap();
    store
        .insert_one(&create_test_document("bob", 1))
        .await
        .unwrap();
    let mut patch = UserPatch::new(Utc::now());
    patch.username = Some("bob".to_string());

    let result = store.update_one(&UserFilter::Id(alice.id), &patch).await;

    assert!(
        matches!(result, Err(DbError::UniqueViolation { ref field, .. }) if field == "username")
    );
}

#[tokio::test]
async fn given_nonexistent_user_when_updated_then_zero_rows() {
    let store = SqliteUserStore::new(create_test_pool().await);

    let modified = store
        .update_one(&UserFilter::Id(Uuid::new_v4()), &UserPatch::new(Utc::now()))
        .await
        .unwrap();

    assert_that!(modified, eq(0));
}

#[tokio::test]
async fn given_existing_user_when_deleted_then_removed_and_second_delete_is_zero() {
    // Given
    let store = SqliteUserStore::new(create_test_pool().await);
    let doc = create_test_document("alice", 0);
    store.insert_one(&doc).await.unwrap();

    // When
    let first = store.delete_one(&UserFilter::Id(doc.id)).await.unwrap();
    let second = store.delete_one(&UserFilter::Id(doc.id)).await.unwrap();

    // Then
    assert_that!(first, eq(1));
    assert_that!(second, eq(0));
    assert_that!(
        store.find_one(&UserFilter::Id(doc.id)).await.unwrap(),
        none()
    );
}

#[tokio::test]
async fn given_role_filter_when_deleting_then_only_one_row_removed() {
    let store = SqliteUserStore::new(create_test_pool().await);
    store
        .insert_one(&create_test_document("alice", 0))
        .await
        .unwrap();
    store
        .insert_one(&create_test_document("bob", 1))
        .await
        .unwrap();

    let removed = store
        .delete_one(&UserFilter::Role(Role::User))
        .await
        .unwrap();

    assert_that!(removed, eq(1));
    assert_that!(store.find(&UserFilter::All, 0, 100).await.unwrap().len(), eq(1));
}
