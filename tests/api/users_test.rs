use axum::http::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{test_email, TestContext};

#[tokio::test]
#[serial]
async fn user_can_read_self_but_not_others() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (alice_id, alice_token) = ctx.register_user(&test_email()).await;
    let (bob_id, _) = ctx.register_user(&test_email()).await;

    let response = ctx.call("getUser", json!({ "id": &alice_id }), Some(&alice_token)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], alice_id.as_str());
    assert_eq!(body["enrolledCourses"], json!([]));

    ctx.call("getUser", json!({ "id": &bob_id }), Some(&alice_token))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn admin_lists_users_without_password_hashes() {
    let Some(ctx) = TestContext::try_new().await else { return };
    ctx.register_user(&test_email()).await;
    let (_, admin_token) = ctx.register_admin().await;

    let response = ctx.call("getUsers", json!({}), Some(&admin_token)).await;
    response.assert_status_ok();
    let users: Vec<Value> = response.json();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn admin_update_replaces_balance_and_entitlements() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    let (user_id, _) = ctx.register_user(&email).await;
    let (_, admin_token) = ctx.register_admin().await;
    let course_id = ctx.create_course(&admin_token, json!([])).await;

    let response = ctx
        .call(
            "updateUser",
            json!({
                "id": &user_id,
                "name": "Renamed",
                "email": &email,
                "role": "user",
                "status": "active",
                "balance": 42.5,
                "enrolledCourses": [&course_id, &course_id],
                "purchasedProducts": ["p1"]
            }),
            Some(&admin_token),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["balance"], 42.5);
    assert_eq!(body["enrolledCourses"], json!([course_id]));
    assert_eq!(body["purchasedProducts"], json!(["p1"]));

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn admin_grant_of_unknown_course_is_rejected() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    let (user_id, _) = ctx.register_user(&email).await;
    let (_, admin_token) = ctx.register_admin().await;
    let course_id = ctx.create_course(&admin_token, json!([])).await;

    let response = ctx
        .call(
            "updateUser",
            json!({
                "id": &user_id,
                "name": "Renamed",
                "email": &email,
                "role": "user",
                "status": "active",
                "balance": 0.0,
                "enrolledCourses": [&course_id, "nope"],
                "purchasedProducts": []
            }),
            Some(&admin_token),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let user: Value = ctx
        .call("getUser", json!({ "id": &user_id }), Some(&admin_token))
        .await
        .json();
    assert_eq!(user["enrolledCourses"], json!([]));
    assert_eq!(user["name"], "Test User");

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn update_unknown_user_is_not_found() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin_token) = ctx.register_admin().await;

    ctx.call(
        "updateUserStatus",
        json!({ "id": "missing", "status": "banned" }),
        Some(&admin_token),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn delete_user_removes_row_but_not_self() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (user_id, _) = ctx.register_user(&test_email()).await;
    let (admin_id, admin_token) = ctx.register_admin().await;

    ctx.call("deleteUser", json!({ "id": &admin_id }), Some(&admin_token))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.call("deleteUser", json!({ "id": &user_id }), Some(&admin_token))
        .await
        .assert_status_ok();

    ctx.call("getUser", json!({ "id": &user_id }), Some(&admin_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn profile_update_changes_name_only() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let email = test_email();
    let (user_id, token) = ctx.register_user(&email).await;

    let response = ctx
        .call("updateProfile", json!({ "userId": &user_id, "name": "Grace" }), Some(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "Grace");
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "user");

    ctx.cleanup().await;
}
