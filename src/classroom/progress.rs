use std::sync::Arc;

use crate::client::error::ClientResult;
use crate::client::local_storage::{read_json, write_json, LocalStorage};

pub fn progress_key(user_id: &str, course_id: &str) -> String {
    format!("nexlify_progress_{}_{}", user_id, course_id)
}

/// Completed lesson ids per user and course. Local only, never synced.
#[derive(Clone)]
pub struct ProgressStore {
    storage: Arc<dyn LocalStorage>,
}

impl ProgressStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// In completion order.
    pub fn completed_lessons(&self, user_id: &str, course_id: &str) -> ClientResult<Vec<String>> {
        Ok(read_json(self.storage.as_ref(), &progress_key(user_id, course_id))?.unwrap_or_default())
    }

    /// Returns false when the lesson was already recorded.
    pub fn mark_completed(&self, user_id: &str, course_id: &str, lesson_id: &str) -> ClientResult<bool> {
        let mut completed = self.completed_lessons(user_id, course_id)?;
        if completed.iter().any(|id| id == lesson_id) {
            return Ok(false);
        }
        completed.push(lesson_id.to_string());
        write_json(self.storage.as_ref(), &progress_key(user_id, course_id), &completed)?;
        Ok(true)
    }

    pub fn reset(&self, user_id: &str, course_id: &str) -> ClientResult<()> {
        self.storage.remove_item(&progress_key(user_id, course_id))
    }
}
