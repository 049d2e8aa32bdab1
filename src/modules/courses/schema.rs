use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use super::model::Course;

/// Every quiz question offers exactly this many choices.
pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Video,
    Text,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`. Absent from payloads served to callers who cannot take the quiz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

impl Lesson {
    pub fn questions(&self) -> &[Question] {
        self.questions.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub level: String,
    pub duration: String,
    pub instructor: String,
    pub price: f64,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
    pub created_at: DateTime<Utc>,
}

impl CourseResponse {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Drops every quiz answer key.
    pub fn without_answer_keys(mut self) -> Self {
        let questions = self
            .modules
            .iter_mut()
            .flat_map(|module| module.lessons.iter_mut())
            .filter_map(|lesson| lesson.questions.as_mut())
            .flatten();
        for question in questions {
            question.correct_answer = None;
        }
        self
    }
}

impl TryFrom<Course> for CourseResponse {
    type Error = serde_json::Error;

    fn try_from(course: Course) -> Result<Self, Self::Error> {
        Ok(Self {
            modules: serde_json::from_str(&course.modules_json)?,
            id: course.id,
            title: course.title,
            description: course.description,
            thumbnail: course.thumbnail,
            level: course.level,
            duration: course.duration,
            instructor: course.instructor,
            price: course.price,
            created_at: course.created_at,
        })
    }
}

/// Create and update payload. `id` is required for updates only.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructor: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

/// Structural checks on the module tree that field validators cannot express.
pub fn validate_structure(modules: &[CourseModule]) -> Result<(), String> {
    let mut module_ids = HashSet::new();
    let mut lesson_ids = HashSet::new();

    for module in modules {
        if !module_ids.insert(module.id.as_str()) {
            return Err(format!("Duplicate module id: {}", module.id));
        }

        for lesson in &module.lessons {
            if !lesson_ids.insert(lesson.id.as_str()) {
                return Err(format!("Duplicate lesson id: {}", lesson.id));
            }

            for question in lesson.questions() {
                if question.options.len() != QUIZ_OPTION_COUNT {
                    return Err(format!(
                        "Question {} must have exactly {} options",
                        question.id, QUIZ_OPTION_COUNT
                    ));
                }
                match question.correct_answer {
                    Some(index) if index < QUIZ_OPTION_COUNT => {}
                    Some(_) => return Err(format!("Question {} has an out of range answer", question.id)),
                    None => return Err(format!("Question {} has no correct answer", question.id)),
                }
            }
        }
    }

    Ok(())
}
