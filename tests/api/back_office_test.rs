use axum::http::StatusCode;
use nexlify::services::data_url::{encode, MAX_HOSTED_FILE_BYTES};
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{test_email, TestContext};

#[tokio::test]
#[serial]
async fn inquiry_lifecycle() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;

    let response = ctx
        .call(
            "submitInquiry",
            json!({
                "name": "Grace",
                "email": "grace@example.com",
                "message": "We need a storefront",
                "serviceType": "Web Development"
            }),
            None,
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let inquiry: Value = response.json();
    let id = inquiry["id"].as_str().unwrap().to_string();
    assert_eq!(inquiry["status"], "new");

    ctx.call("getInquiries", json!({}), None)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.call("updateInquiryStatus", json!({ "id": &id, "status": "contacted" }), Some(&admin))
        .await
        .assert_status_ok();

    let listing: Vec<Value> = ctx.call("getInquiries", json!({}), Some(&admin)).await.json();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["status"], "contacted");

    ctx.call("deleteInquiry", json!({ "id": &id }), Some(&admin))
        .await
        .assert_status_ok();
    ctx.call("deleteInquiry", json!({ "id": &id }), Some(&admin))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn oversized_upload_is_rejected_without_row() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let big = vec![0u8; MAX_HOSTED_FILE_BYTES + 1];

    let response = ctx
        .call(
            "uploadFile",
            json!({ "name": "huge.bin", "dataUrl": encode("application/octet-stream", &big) }),
            Some(&admin),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "File too large");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hosted_files")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn uploaded_file_is_served_by_link() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let bytes = b"hello nexlify".to_vec();

    let response = ctx
        .call(
            "uploadFile",
            json!({ "name": "hello.txt", "dataUrl": encode("text/plain", &bytes) }),
            Some(&admin),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let meta: Value = response.json();
    let id = meta["id"].as_str().unwrap().to_string();
    assert_eq!(meta["size"], bytes.len());
    assert!(meta.get("dataUrl").is_none());

    let served = ctx.server.get(&format!("/files/{}", id)).await;
    served.assert_status_ok();
    assert_eq!(served.header("content-type"), "text/plain");
    assert_eq!(&served.as_bytes()[..], bytes.as_slice());

    let listing: Vec<Value> = ctx.call("getFiles", json!({}), Some(&admin)).await.json();
    assert_eq!(listing.len(), 1);

    ctx.call("deleteFile", json!({ "id": &id }), Some(&admin))
        .await
        .assert_status_ok();
    ctx.server
        .get(&format!("/files/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn settings_upsert_by_key() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;

    for title in ["Nexlify", "Nexlify Academy"] {
        ctx.call(
            "updateSettings",
            json!({ "key": "seo", "value": { "title": title, "description": "Learn and build" } }),
            Some(&admin),
        )
        .await
        .assert_status_ok();
    }
    ctx.call(
        "updateSettings",
        json!({ "key": "announcement", "value": "Summer sale" }),
        Some(&admin),
    )
    .await
    .assert_status_ok();

    let settings: Value = ctx.call("getSettings", json!({}), None).await.json();
    assert_eq!(settings["seo"]["title"], "Nexlify Academy");
    assert_eq!(settings["announcement"], "Summer sale");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM site_settings")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 2);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn broadcast_notification_reaches_every_user() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let (alice_id, alice_token) = ctx.register_user(&test_email()).await;
    ctx.register_user(&test_email()).await;

    let response = ctx
        .call(
            "sendNotification",
            json!({ "title": "Maintenance", "message": "Back at noon" }),
            Some(&admin),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["delivered"], 3);

    let notifications: Vec<Value> = ctx
        .call("getNotifications", json!({ "userId": &alice_id }), Some(&alice_token))
        .await
        .json();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["action"], "Maintenance");
    assert_eq!(notifications[0]["type"], "notification");

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn users_cannot_forge_notifications() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (user_id, token) = ctx.register_user(&test_email()).await;

    ctx.call(
        "logActivity",
        json!({ "userId": &user_id, "action": "Free credit", "type": "notification" }),
        Some(&token),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    ctx.call(
        "logActivity",
        json!({ "userId": &user_id, "action": "Viewed course", "type": "enrollment" }),
        Some(&token),
    )
    .await
    .assert_status_ok();

    ctx.cleanup().await;
}
