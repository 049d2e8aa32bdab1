use nexlify::classroom::{Classroom, MarkOutcome, ProgressStore};
use nexlify::client::{
    DataClient, LocalCacheStore, LocalSessionPort, LocalStorage, MemoryStorage, SessionContext, Storage,
};
use nexlify::modules::auth::schema::RegisterRequest;
use nexlify::modules::courses::schema::CourseInput;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn enrolled_learner_completes_a_text_lesson() {
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
    let store = Arc::new(LocalCacheStore::new(storage.clone()));
    let session = SessionContext::restore(Arc::new(LocalSessionPort::new(storage.clone())));
    let client = DataClient::new(store.clone(), session);

    let input: CourseInput = serde_json::from_value(json!({
        "title": "Rust 101",
        "price": 0.0,
        "modules": [
            {
                "id": "m1",
                "title": "Start",
                "lessons": [{ "id": "l1", "title": "Welcome", "type": "text", "content": "Hello" }]
            }
        ]
    }))
    .unwrap();
    let course = store.create_course(&input).await.unwrap();

    client
        .register(&RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "TestPassword123!".to_string(),
            role: None,
            admin_secret: None,
        })
        .await
        .unwrap();
    let user = client.enroll(&course.id).await.unwrap();
    assert!(user.is_enrolled(&course.id));

    let progress = ProgressStore::new(storage);
    let mut classroom = Classroom::open(course.clone(), user.id.clone(), progress.clone()).unwrap();

    assert_eq!(classroom.mark_complete(None).unwrap(), MarkOutcome::Completed { quiz: None });
    assert_eq!(progress.completed_lessons(&user.id, &course.id).unwrap(), vec!["l1"]);

    assert_eq!(
        classroom.mark_complete(None).unwrap(),
        MarkOutcome::AlreadyCompleted { quiz: None }
    );
    assert_eq!(progress.completed_lessons(&user.id, &course.id).unwrap(), vec!["l1"]);
    assert_eq!(classroom.progress_percent(), 100);
}
