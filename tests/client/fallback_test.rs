use axum::http::StatusCode;
use nexlify::client::{
    CacheMirror, ClientError, FallbackStore, LocalCacheStore, LocalStorage, MemoryStorage, RemoteStore, Storage,
};
use nexlify::modules::users::model::UserStatus;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use super::support::{
    client_over, product_input, register_request, spawn_routed_stub_api, spawn_stub_api, UNREACHABLE_API,
};

type Fallback = FallbackStore<RemoteStore, LocalCacheStore>;

fn fallback_over(base_url: &str) -> (Arc<dyn LocalStorage>, Arc<Fallback>) {
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
    let local = LocalCacheStore::new(storage.clone());
    (storage, Arc::new(FallbackStore::new(RemoteStore::new(base_url), local)))
}

#[tokio::test]
async fn unreachable_api_falls_back_to_local_cache() {
    let (storage, store) = fallback_over(UNREACHABLE_API);
    let client = client_over(store.clone(), storage);

    let user = client.register(&register_request("ada@example.com")).await.unwrap();

    assert!(client.session().token().unwrap().starts_with("local-"));
    assert_eq!(store.secondary().get_user(&user.id).await.unwrap().email, "ada@example.com");
}

#[tokio::test]
async fn server_errors_fall_back_to_local_cache() {
    let base = spawn_stub_api(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "Internal server error" })).await;
    let (_, store) = fallback_over(&base);
    let local = store.secondary();
    local.create_product(&product_input("Planner", 12.0)).await.unwrap();

    let products = store.get_products().await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Planner");
}

#[tokio::test]
async fn conflict_is_returned_without_touching_local_cache() {
    let base = spawn_stub_api(StatusCode::CONFLICT, json!({ "error": "Email already exists" })).await;
    let (_, store) = fallback_over(&base);
    let local = store.secondary();

    let err = store.register(&register_request("ada@example.com")).await.unwrap_err();

    assert_eq!(err, ClientError::Conflict("Email already exists".to_string()));
    assert!(local.get_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_credentials_are_not_retried_locally() {
    let base = spawn_stub_api(StatusCode::UNAUTHORIZED, json!({ "error": "Invalid credentials" })).await;
    let (_, store) = fallback_over(&base);
    let local = store.secondary();
    // The same account exists locally and would accept this password
    local.register(&register_request("ada@example.com")).await.unwrap();

    let err = store.login("ada@example.com", "TestPassword123!").await.unwrap_err();

    assert_eq!(err, ClientError::InvalidCredentials);
}

#[tokio::test]
async fn account_status_is_surfaced() {
    let base = spawn_stub_api(
        StatusCode::FORBIDDEN,
        json!({ "error": "Account banned", "status": "banned" }),
    )
    .await;
    let (_, store) = fallback_over(&base);

    let err = store.login("ada@example.com", "TestPassword123!").await.unwrap_err();

    assert_eq!(err, ClientError::AccountStatus(UserStatus::Banned));
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let base = spawn_stub_api(StatusCode::NOT_FOUND, json!({ "error": "Course not found" })).await;
    let (_, store) = fallback_over(&base);

    let err = store.get_course("missing").await.unwrap_err();

    assert_eq!(err, ClientError::NotFound("Course not found".to_string()));
}

fn remote_user() -> serde_json::Value {
    json!({
        "id": "remote-u1",
        "name": "Ada",
        "email": "ada@example.com",
        "role": "user",
        "status": "active",
        "balance": 0.0,
        "enrolledCourses": [],
        "purchasedProducts": [],
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

fn remote_course() -> serde_json::Value {
    json!({
        "id": "c1",
        "title": "Rust basics",
        "description": "Ownership first",
        "thumbnail": "",
        "level": "Beginner",
        "duration": "1h",
        "instructor": "Tester",
        "price": 0.0,
        "modules": [{
            "id": "m1",
            "title": "Start",
            "lessons": [{
                "id": "l1",
                "title": "Check",
                "type": "quiz",
                "content": "",
                "questions": [{ "id": "q1", "question": "1 + 1?", "options": ["1", "2", "3", "4"] }]
            }]
        }],
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn server_data_keeps_working_after_going_offline() {
    let base = spawn_routed_stub_api(HashMap::from([
        ("login", json!({ "user": remote_user(), "token": "server-token", "expiresIn": 3600 })),
        ("getCourses", json!([remote_course()])),
    ]))
    .await;
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());

    let online: Arc<Fallback> = Arc::new(FallbackStore::new(
        RemoteStore::new(&base),
        LocalCacheStore::new(storage.clone()),
    ));
    let client = client_over(online, storage.clone());
    client.login("ada@example.com", "TestPassword123!").await.unwrap();
    assert_eq!(client.storage().get_courses().await.unwrap().len(), 1);

    let offline: Arc<Fallback> = Arc::new(FallbackStore::new(
        RemoteStore::new(UNREACHABLE_API),
        LocalCacheStore::new(storage.clone()),
    ));
    let client = client_over(offline.clone(), storage);

    let courses = client.storage().get_courses().await.unwrap();
    assert_eq!(courses[0].id, "c1");

    let user = client.enroll("c1").await.unwrap();
    assert!(user.is_enrolled("c1"));
    let cached = offline.secondary().get_user("remote-u1").await.unwrap();
    assert_eq!(cached.enrolled_courses, vec!["c1".to_string()]);

    // The password the server accepted also works offline
    offline.login("ada@example.com", "TestPassword123!").await.unwrap();
}

#[tokio::test]
async fn cached_answer_keys_survive_a_redacted_listing() {
    let (_, store) = fallback_over(UNREACHABLE_API);
    let local = store.secondary();
    let mut keyed: nexlify::modules::courses::schema::CourseResponse =
        serde_json::from_value(remote_course()).unwrap();
    if let Some(questions) = keyed.modules[0].lessons[0].questions.as_mut() {
        questions[0].correct_answer = Some(1);
    }
    local.mirror_courses(std::slice::from_ref(&keyed)).await.unwrap();

    let redacted = keyed.clone().without_answer_keys();
    local.mirror_courses(std::slice::from_ref(&redacted)).await.unwrap();

    let cached = local.get_course("c1").await.unwrap();
    assert_eq!(cached.modules[0].lessons[0].questions()[0].correct_answer, Some(1));
}
