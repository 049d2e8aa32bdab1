use nexlify::classroom::{Classroom, ClassroomError, MarkOutcome, Position, ProgressStore};
use nexlify::client::{LocalStorage, MemoryStorage};
use nexlify::modules::courses::schema::CourseResponse;
use serde_json::{json, Value};
use std::sync::Arc;

fn course(modules: Value) -> CourseResponse {
    serde_json::from_value(json!({
        "id": "c1",
        "title": "Rust 101",
        "description": "",
        "thumbnail": "",
        "level": "Beginner",
        "duration": "2h",
        "instructor": "Tester",
        "price": 0.0,
        "modules": modules,
        "createdAt": "2024-01-01T00:00:00Z"
    }))
    .unwrap()
}

fn two_module_course() -> CourseResponse {
    course(json!([
        {
            "id": "m1",
            "title": "Basics",
            "lessons": [
                { "id": "l1", "title": "Intro", "type": "video", "content": "https://video.example/1" },
                { "id": "l2", "title": "Reading", "type": "text", "content": "Text" }
            ]
        },
        { "id": "empty", "title": "Coming soon", "lessons": [] },
        {
            "id": "m2",
            "title": "Check",
            "lessons": [
                {
                    "id": "q",
                    "title": "Quiz",
                    "type": "quiz",
                    "content": "",
                    "questions": [
                        { "id": "q1", "question": "1 + 1?", "options": ["1", "2", "3", "4"], "correctAnswer": 1 },
                        { "id": "q2", "question": "2 + 2?", "options": ["1", "2", "3", "4"], "correctAnswer": 3 }
                    ]
                }
            ]
        }
    ]))
}

fn progress() -> ProgressStore {
    let storage: Arc<dyn LocalStorage> = Arc::new(MemoryStorage::new());
    ProgressStore::new(storage)
}

fn open(course: CourseResponse) -> Classroom {
    Classroom::open(course, "u1", progress()).unwrap()
}

#[test]
fn walks_lessons_in_order_skipping_empty_modules() {
    let mut classroom = open(two_module_course());

    assert_eq!(classroom.position(), Position::Lesson { module: 0, lesson: 0 });
    assert_eq!(classroom.next(), Position::Lesson { module: 0, lesson: 1 });
    assert_eq!(classroom.next(), Position::Lesson { module: 2, lesson: 0 });
    assert_eq!(classroom.current().unwrap().1.id, "q");
}

#[test]
fn next_past_the_last_lesson_completes_without_marking() {
    let mut classroom = open(two_module_course());
    classroom.select_lesson("m2", "q").unwrap();

    assert_eq!(classroom.next(), Position::Complete);
    assert!(classroom.is_complete());
    assert!(classroom.current().is_none());
    assert!(classroom.completed_lessons().is_empty());

    assert_eq!(classroom.next(), Position::Complete);
    assert!(matches!(classroom.mark_complete(None), Err(ClassroomError::NotOnLesson)));
}

#[test]
fn prev_stops_at_the_first_lesson_and_leaves_complete() {
    let mut classroom = open(two_module_course());

    assert_eq!(classroom.prev(), Position::Lesson { module: 0, lesson: 0 });

    classroom.select_lesson("m2", "q").unwrap();
    classroom.next();
    assert_eq!(classroom.prev(), Position::Lesson { module: 2, lesson: 0 });
}

#[test]
fn selecting_an_unknown_lesson_keeps_position() {
    let mut classroom = open(two_module_course());
    classroom.next();

    let err = classroom.select_lesson("m1", "nope").unwrap_err();

    assert!(matches!(err, ClassroomError::UnknownLesson { .. }));
    assert_eq!(classroom.position(), Position::Lesson { module: 0, lesson: 1 });
}

#[test]
fn lesson_ids_must_match_their_module() {
    let mut classroom = open(two_module_course());

    assert!(classroom.select_lesson("m2", "l1").is_err());
}

#[test]
fn course_without_lessons_cannot_be_opened() {
    let empty = course(json!([{ "id": "m1", "title": "Nothing", "lessons": [] }]));

    let result = Classroom::open(empty, "u1", progress());

    assert!(matches!(result, Err(ClassroomError::EmptyCourse)));
}

#[test]
fn quiz_needs_answers_and_a_passing_score() {
    let mut classroom = open(two_module_course());
    classroom.select_lesson("m2", "q").unwrap();

    assert!(matches!(classroom.mark_complete(None), Err(ClassroomError::AnswersRequired)));

    match classroom.mark_complete(Some(&[0, 0])).unwrap() {
        MarkOutcome::NotPassed(result) => {
            assert_eq!(result.correct, 0);
            assert_eq!(result.score, 0);
        }
        other => panic!("expected NotPassed, got {:?}", other),
    }
    assert!(!classroom.is_lesson_completed("q"));

    match classroom.mark_complete(Some(&[1, 0])).unwrap() {
        MarkOutcome::Completed { quiz: Some(result) } => {
            assert_eq!(result.score, 50);
            assert!(result.passed);
        }
        other => panic!("expected Completed, got {:?}", other),
    }
    assert!(classroom.is_lesson_completed("q"));
}

#[test]
fn marking_twice_is_deduplicated() {
    let mut classroom = open(two_module_course());

    assert_eq!(classroom.mark_complete(None).unwrap(), MarkOutcome::Completed { quiz: None });
    assert_eq!(
        classroom.mark_complete(None).unwrap(),
        MarkOutcome::AlreadyCompleted { quiz: None }
    );
    assert_eq!(classroom.completed_lessons(), ["l1".to_string()]);
    assert_eq!(classroom.progress_percent(), 33);
}

#[test]
fn reopening_resumes_at_the_first_unfinished_lesson() {
    let store = progress();
    store.mark_completed("u1", "c1", "l1").unwrap();

    let classroom = Classroom::open(two_module_course(), "u1", store.clone()).unwrap();
    assert_eq!(classroom.position(), Position::Lesson { module: 0, lesson: 1 });

    store.mark_completed("u1", "c1", "l2").unwrap();
    store.mark_completed("u1", "c1", "q").unwrap();
    let classroom = Classroom::open(two_module_course(), "u1", store).unwrap();
    assert_eq!(classroom.position(), Position::Lesson { module: 0, lesson: 0 });
    assert_eq!(classroom.progress_percent(), 100);
}

#[test]
fn progress_is_kept_per_user() {
    let store = progress();
    let mut ada = Classroom::open(two_module_course(), "ada", store.clone()).unwrap();
    ada.mark_complete(None).unwrap();

    let bob = Classroom::open(two_module_course(), "bob", store).unwrap();
    assert!(bob.completed_lessons().is_empty());
}
