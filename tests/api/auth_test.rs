use axum::http::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{test_email, test_password, text_lesson_module, TestContext};

#[tokio::test]
#[serial]
async fn register_returns_created_user_and_session() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();

    let response = ctx
        .call(
            "register",
            json!({ "name": "Ada", "email": &email, "password": test_password() }),
            None,
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["status"], "active");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn duplicate_email_is_conflict_and_creates_no_row() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    ctx.register_user(&email).await;

    let response = ctx
        .call(
            "register",
            json!({ "name": "Again", "email": email.to_uppercase(), "password": test_password() }),
            None,
        )
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 1);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn password_is_stored_hashed() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    ctx.register_user(&email).await;

    let (hash,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE email = ?")
        .bind(&email)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_ne!(hash, test_password());
    assert!(hash.starts_with("$argon2id$"));

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn admin_role_without_secret_is_downgraded() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let response = ctx
        .call(
            "register",
            json!({
                "name": "Mallory",
                "email": test_email(),
                "password": test_password(),
                "role": "admin",
                "adminSecret": "guess"
            }),
            None,
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user"]["role"], "user");

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn wrong_password_is_invalid_credentials_without_token() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    ctx.register_user(&email).await;

    let response = ctx
        .call("login", json!({ "email": &email, "password": "WrongPassword1!" }), None)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid credentials");
    assert!(body.get("token").is_none());
    assert!(body.get("user").is_none());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn login_with_valid_credentials_returns_session() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    let (user_id, _) = ctx.register_user(&email).await;

    let response = ctx
        .call("login", json!({ "email": &email, "password": test_password() }), None)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert!(body["expiresIn"].as_i64().is_some_and(|secs| secs > 0));

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn suspended_user_gets_forbidden_with_status() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    let (user_id, _) = ctx.register_user(&email).await;
    let (_, admin_token) = ctx.register_admin().await;

    ctx.call(
        "updateUserStatus",
        json!({ "id": &user_id, "status": "suspended" }),
        Some(&admin_token),
    )
    .await
    .assert_status_ok();

    let response = ctx
        .call("login", json!({ "email": &email, "password": test_password() }), None)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["status"], "suspended");
    assert!(body.get("token").is_none());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn suspended_user_token_stops_working() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (user_id, token) = ctx.register_user(&test_email()).await;
    let (_, admin_token) = ctx.register_admin().await;
    let course_id = ctx.create_course(&admin_token, text_lesson_module()).await;

    ctx.call(
        "updateUserStatus",
        json!({ "id": &user_id, "status": "suspended" }),
        Some(&admin_token),
    )
    .await
    .assert_status_ok();

    let response = ctx
        .call("enroll", json!({ "userId": &user_id, "courseId": &course_id }), Some(&token))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["status"], "suspended");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn deleted_user_token_is_unauthorized() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (user_id, token) = ctx.register_user(&test_email()).await;
    let (_, admin_token) = ctx.register_admin().await;

    ctx.call("deleteUser", json!({ "id": &user_id }), Some(&admin_token))
        .await
        .assert_status_ok();

    ctx.call("getActivity", json!({ "userId": &user_id }), Some(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn change_password_requires_current_password() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    let (user_id, token) = ctx.register_user(&email).await;

    let response = ctx
        .call(
            "changePassword",
            json!({ "userId": &user_id, "currentPassword": "nope", "newPassword": "NewPassword1!" }),
            Some(&token),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    ctx.call(
        "changePassword",
        json!({ "userId": &user_id, "currentPassword": test_password(), "newPassword": "NewPassword1!" }),
        Some(&token),
    )
    .await
    .assert_status_ok();

    ctx.call("login", json!({ "email": &email, "password": "NewPassword1!" }), None)
        .await
        .assert_status_ok();

    ctx.cleanup().await;
}
