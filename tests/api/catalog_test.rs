use axum::http::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use crate::common::{test_email, text_lesson_module, TestContext};

fn quiz_modules() -> Value {
    json!([
        {
            "id": "m1",
            "title": "Basics",
            "lessons": [
                { "id": "l1", "title": "Intro", "type": "video", "content": "https://video.example/1", "duration": "5:00" },
                { "id": "l2", "title": "Reading", "type": "text", "content": "Some text" }
            ]
        },
        {
            "id": "m2",
            "title": "Check",
            "lessons": [
                {
                    "id": "l3",
                    "title": "Quiz",
                    "type": "quiz",
                    "content": "",
                    "questions": [
                        { "id": "q1", "question": "2 + 2?", "options": ["1", "2", "3", "4"], "correctAnswer": 3 }
                    ]
                }
            ]
        }
    ])
}

#[tokio::test]
#[serial]
async fn product_crud_round_trip() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;

    let response = ctx
        .call(
            "createProduct",
            json!({
                "title": "Brand Kit",
                "description": "Logos and fonts",
                "category": "Design",
                "price": 25.0,
                "imageUrl": "https://img.example/kit.png"
            }),
            Some(&admin),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    let product: Value = response.json();
    let id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["category"], "Design");

    let response = ctx
        .call(
            "updateProduct",
            json!({ "id": &id, "title": "Brand Kit Pro", "category": "Design", "price": 30.0 }),
            None,
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = ctx
        .call(
            "updateProduct",
            json!({ "id": &id, "title": "Brand Kit Pro", "category": "Design", "price": 30.0 }),
            Some(&admin),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["price"], 30.0);

    let listing: Vec<Value> = ctx.call("getProducts", json!({}), None).await.json();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["title"], "Brand Kit Pro");

    ctx.call("deleteProduct", json!({ "id": &id }), Some(&admin))
        .await
        .assert_status_ok();
    ctx.call("getProduct", json!({ "id": &id }), None)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn negative_price_is_rejected() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;

    ctx.call(
        "createProduct",
        json!({ "title": "Free money", "category": "Guide", "price": -1.0 }),
        Some(&admin),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn course_modules_survive_storage_unchanged() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let modules = quiz_modules();

    let id = ctx.create_course(&admin, modules.clone()).await;

    let response = ctx.call("getCourse", json!({ "id": &id }), Some(&admin)).await;
    response.assert_status_ok();
    let course: Value = response.json();
    assert_eq!(course["modules"], modules);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn answer_keys_only_reach_admins_and_enrolled_learners() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let (user_id, token) = ctx.register_user(&test_email()).await;
    let id = ctx.create_course(&admin, quiz_modules()).await;
    let question = |course: &Value| course["modules"][1]["lessons"][0]["questions"][0].clone();

    let listing: Vec<Value> = ctx.call("getCourses", json!({}), None).await.json();
    assert!(question(&listing[0]).get("correctAnswer").is_none());

    let anonymous: Value = ctx.call("getCourse", json!({ "id": &id }), None).await.json();
    assert!(question(&anonymous).get("correctAnswer").is_none());
    assert_eq!(question(&anonymous)["options"], json!(["1", "2", "3", "4"]));

    let before: Value = ctx.call("getCourse", json!({ "id": &id }), Some(&token)).await.json();
    assert!(question(&before).get("correctAnswer").is_none());

    ctx.call("enroll", json!({ "userId": &user_id, "courseId": &id }), Some(&token))
        .await
        .assert_status_ok();
    let enrolled: Value = ctx.call("getCourse", json!({ "id": &id }), Some(&token)).await.json();
    assert_eq!(question(&enrolled)["correctAnswer"], 3);

    let admin_listing: Vec<Value> = ctx.call("getCourses", json!({}), Some(&admin)).await.json();
    assert_eq!(question(&admin_listing[0])["correctAnswer"], 3);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn unreadable_course_row_is_skipped_in_listing() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let good = ctx.create_course(&admin, text_lesson_module()).await;
    let broken = ctx.create_course(&admin, text_lesson_module()).await;

    sqlx::query("UPDATE courses SET modules_json = 'not json' WHERE id = ?")
        .bind(&broken)
        .execute(&ctx.db)
        .await
        .unwrap();

    let response = ctx.call("getCourses", json!({}), None).await;
    response.assert_status_ok();
    let listing: Vec<Value> = response.json();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["id"], good.as_str());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn course_get_uses_query_parameter() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let id = ctx.create_course(&admin, text_lesson_module()).await;

    let response = ctx.server.get(&format!("/api?action=getCourse&id={}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], id.as_str());

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn duplicate_lesson_ids_are_rejected() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;

    let response = ctx
        .call(
            "createCourse",
            json!({
                "title": "Broken",
                "price": 10.0,
                "modules": [
                    { "id": "m1", "title": "A", "lessons": [{ "id": "l1", "title": "x", "type": "text" }] },
                    { "id": "m2", "title": "B", "lessons": [{ "id": "l1", "title": "y", "type": "text" }] }
                ]
            }),
            Some(&admin),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 0);

    ctx.cleanup().await;
}

#[tokio::test]
#[serial]
async fn deleting_course_drops_its_enrollments() {
    let Some(ctx) = TestContext::try_new().await else { return };
    let (_, admin) = ctx.register_admin().await;
    let (user_id, token) = ctx.register_user(&crate::common::test_email()).await;
    let course_id = ctx.create_course(&admin, text_lesson_module()).await;

    ctx.call("enroll", json!({ "userId": &user_id, "courseId": &course_id }), Some(&token))
        .await
        .assert_status_ok();
    ctx.call("deleteCourse", json!({ "id": &course_id }), Some(&admin))
        .await
        .assert_status_ok();

    let enrolled: Value = ctx
        .call("getEnrollments", json!({ "userId": &user_id }), Some(&token))
        .await
        .json();
    assert_eq!(enrolled, json!([]));

    ctx.cleanup().await;
}
