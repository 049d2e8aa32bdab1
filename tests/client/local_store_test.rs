use nexlify::client::{ClientError, FileStorage, LocalCacheStore, LocalStorage, Storage};
use nexlify::modules::activity::schema::{ActivityType, SendNotificationRequest};
use nexlify::modules::inquiries::schema::{InquiryStatus, SubmitInquiryRequest};
use nexlify::modules::users::model::{Role, UserStatus};
use std::sync::Arc;

use super::support::{admin_request, client_over, course_input, offline_client, offline_store, register_request};

#[tokio::test]
async fn register_starts_a_local_session() {
    let (client, _) = offline_client();

    let user = client.register(&register_request("ada@example.com")).await.unwrap();

    assert_eq!(user.role, Role::User);
    assert_eq!(client.current_user().unwrap().id, user.id);
    assert!(client.session().token().unwrap().starts_with("local-"));
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let (client, store) = offline_client();
    client.register(&register_request("ada@example.com")).await.unwrap();

    let err = client.register(&register_request("ADA@example.com")).await.unwrap_err();

    assert!(matches!(err, ClientError::Conflict(_)));
    assert_eq!(store.get_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn admin_registration_needs_the_secret() {
    let (client, _) = offline_client();

    let admin = client.register(&admin_request("root@example.com")).await.unwrap();
    assert_eq!(admin.role, Role::Admin);

    let mut forged = admin_request("mallory@example.com");
    forged.admin_secret = Some("guess".to_string());
    let user = client.register(&forged).await.unwrap();
    assert_eq!(user.role, Role::User);
}

#[tokio::test]
async fn suspended_user_cannot_sign_in() {
    let (client, store) = offline_client();
    let user = client.register(&register_request("ada@example.com")).await.unwrap();
    client.logout().unwrap();

    store.update_user_status(&user.id, UserStatus::Suspended).await.unwrap();

    let err = client.login("ada@example.com", "TestPassword123!").await.unwrap_err();
    assert_eq!(err, ClientError::AccountStatus(UserStatus::Suspended));
    assert!(client.current_user().is_none());
}

#[tokio::test]
async fn changed_password_replaces_the_old_one() {
    let (client, _) = offline_client();
    client.register(&register_request("ada@example.com")).await.unwrap();

    assert_eq!(
        client.change_password("wrong", "NewPassword1!").await.unwrap_err(),
        ClientError::InvalidCredentials
    );
    client.change_password("TestPassword123!", "NewPassword1!").await.unwrap();
    client.logout().unwrap();

    assert_eq!(
        client.login("ada@example.com", "TestPassword123!").await.unwrap_err(),
        ClientError::InvalidCredentials
    );
    client.login("ada@example.com", "NewPassword1!").await.unwrap();
}

#[tokio::test]
async fn enrolling_updates_session_and_store_once() {
    let (client, store) = offline_client();
    let course = store.create_course(&course_input("Rust 101", 0.0)).await.unwrap();
    let user = client.register(&register_request("ada@example.com")).await.unwrap();

    client.enroll(&course.id).await.unwrap();
    let after = client.enroll(&course.id).await.unwrap();

    assert_eq!(after.enrolled_courses, vec![course.id.clone()]);
    assert_eq!(store.get_enrollments(&user.id).await.unwrap(), vec![course.id]);

    let feed = client.activity().await.unwrap();
    let enrollments = feed.iter().filter(|e| e.log_type == ActivityType::Enrollment).count();
    assert_eq!(enrollments, 1);
}

#[tokio::test]
async fn enrolling_in_a_missing_course_changes_nothing() {
    let (client, store) = offline_client();
    let user = client.register(&register_request("ada@example.com")).await.unwrap();

    let err = client.enroll("missing").await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(client.current_user().unwrap().enrolled_courses.is_empty());
    assert!(store.get_enrollments(&user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn session_and_data_survive_a_restart() {
    let path = std::env::temp_dir().join(format!("nexlify-{}.json", uuid::Uuid::new_v4()));

    let user_id = {
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(&path));
        let store = Arc::new(LocalCacheStore::new(storage.clone()));
        let client = client_over(store, storage);
        client.register(&register_request("ada@example.com")).await.unwrap().id
    };

    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(&path));
    let store = Arc::new(LocalCacheStore::new(storage.clone()));
    let client = client_over(store.clone(), storage);

    assert_eq!(client.current_user().unwrap().id, user_id);
    assert_eq!(client.refresh_user().await.unwrap().email, "ada@example.com");

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn notifications_are_kept_apart_from_activity() {
    let (client, store) = offline_client();
    client.register(&register_request("ada@example.com")).await.unwrap();
    store.register(&register_request("bob@example.com")).await.unwrap();

    let delivered = store
        .send_notification(&SendNotificationRequest {
            user_id: None,
            title: "Maintenance".to_string(),
            message: "Back at noon".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(delivered, 2);

    let notifications = client.notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].action, "Maintenance");
    assert!(client
        .activity()
        .await
        .unwrap()
        .iter()
        .all(|entry| entry.log_type != ActivityType::Notification));
}

#[tokio::test]
async fn inquiries_start_new_and_can_be_closed() {
    let (_, store) = offline_store();

    let inquiry = store
        .submit_inquiry(&SubmitInquiryRequest {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            message: "Storefront please".to_string(),
            service_type: "Web Development".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(inquiry.status, InquiryStatus::New);

    store.update_inquiry_status(&inquiry.id, InquiryStatus::Closed).await.unwrap();
    assert_eq!(store.get_inquiries().await.unwrap()[0].status, InquiryStatus::Closed);

    store.delete_inquiry(&inquiry.id).await.unwrap();
    assert!(matches!(
        store.delete_inquiry(&inquiry.id).await.unwrap_err(),
        ClientError::NotFound(_)
    ));
}
