use crate::client::error::ClientError;
use crate::modules::courses::schema::{CourseModule, CourseResponse, Lesson, LessonType};

use super::progress::ProgressStore;
use super::quiz::{score_quiz, QuizResult};

#[derive(Debug, thiserror::Error)]
pub enum ClassroomError {
    #[error("Course has no lessons")]
    EmptyCourse,

    #[error("Lesson {lesson_id} not found in module {module_id}")]
    UnknownLesson { module_id: String, lesson_id: String },

    #[error("Quiz answers are required")]
    AnswersRequired,

    #[error("Course already complete")]
    NotOnLesson,

    #[error(transparent)]
    Progress(#[from] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Lesson { module: usize, lesson: usize },
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkOutcome {
    Completed { quiz: Option<QuizResult> },
    AlreadyCompleted { quiz: Option<QuizResult> },
    NotPassed(QuizResult),
}

/// Walks a learner through a course in module, then lesson, order.
pub struct Classroom {
    course: CourseResponse,
    user_id: String,
    progress: ProgressStore,
    /// (module, lesson) index pairs in reading order; empty modules are skipped.
    order: Vec<(usize, usize)>,
    cursor: Option<usize>,
    completed: Vec<String>,
}

impl Classroom {
    /// Starts at the first lesson not yet completed, or the first lesson when all are done.
    pub fn open(
        course: CourseResponse,
        user_id: impl Into<String>,
        progress: ProgressStore,
    ) -> Result<Self, ClassroomError> {
        let order: Vec<(usize, usize)> = course
            .modules
            .iter()
            .enumerate()
            .flat_map(|(m, module)| (0..module.lessons.len()).map(move |l| (m, l)))
            .collect();
        if order.is_empty() {
            return Err(ClassroomError::EmptyCourse);
        }

        let user_id = user_id.into();
        let completed = progress.completed_lessons(&user_id, &course.id)?;

        let start = order
            .iter()
            .position(|&(m, l)| !completed.contains(&course.modules[m].lessons[l].id))
            .unwrap_or(0);

        Ok(Self {
            course,
            user_id,
            progress,
            order,
            cursor: Some(start),
            completed,
        })
    }

    pub fn position(&self) -> Position {
        match self.cursor {
            Some(i) => {
                let (module, lesson) = self.order[i];
                Position::Lesson { module, lesson }
            }
            None => Position::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn current(&self) -> Option<(&CourseModule, &Lesson)> {
        self.cursor.map(|i| {
            let (m, l) = self.order[i];
            let module = &self.course.modules[m];
            (module, &module.lessons[l])
        })
    }

    pub fn completed_lessons(&self) -> &[String] {
        &self.completed
    }

    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.completed.iter().any(|id| id == lesson_id)
    }

    /// Whole percent of lessons completed.
    pub fn progress_percent(&self) -> u32 {
        let done = self
            .order
            .iter()
            .filter(|&&(m, l)| self.is_lesson_completed(&self.course.modules[m].lessons[l].id))
            .count();
        (done * 100 / self.order.len()) as u32
    }

    /// Past the last lesson the classroom is `Complete`; further calls do nothing.
    pub fn next(&mut self) -> Position {
        if let Some(i) = self.cursor {
            self.cursor = if i + 1 < self.order.len() { Some(i + 1) } else { None };
        }
        self.position()
    }

    /// From `Complete` returns to the last lesson; at the first lesson does nothing.
    pub fn prev(&mut self) -> Position {
        self.cursor = match self.cursor {
            Some(i) => Some(i.saturating_sub(1)),
            None => Some(self.order.len() - 1),
        };
        self.position()
    }

    pub fn select_lesson(&mut self, module_id: &str, lesson_id: &str) -> Result<Position, ClassroomError> {
        let index = self.order.iter().position(|&(m, l)| {
            let module = &self.course.modules[m];
            module.id == module_id && module.lessons[l].id == lesson_id
        });

        match index {
            Some(i) => {
                self.cursor = Some(i);
                Ok(self.position())
            }
            None => Err(ClassroomError::UnknownLesson {
                module_id: module_id.to_string(),
                lesson_id: lesson_id.to_string(),
            }),
        }
    }

    /// Marks the current lesson. Quiz lessons need answers and a passing score.
    pub fn mark_complete(&mut self, answers: Option<&[usize]>) -> Result<MarkOutcome, ClassroomError> {
        let (_, lesson) = self.current().ok_or(ClassroomError::NotOnLesson)?;
        let lesson_id = lesson.id.clone();

        let quiz = match lesson.lesson_type {
            LessonType::Quiz => {
                let answers = answers.ok_or(ClassroomError::AnswersRequired)?;
                let result = score_quiz(lesson.questions(), answers);
                if !result.passed {
                    return Ok(MarkOutcome::NotPassed(result));
                }
                Some(result)
            }
            LessonType::Video | LessonType::Text => None,
        };

        let newly = self
            .progress
            .mark_completed(&self.user_id, &self.course.id, &lesson_id)?;
        if !newly {
            return Ok(MarkOutcome::AlreadyCompleted { quiz });
        }

        self.completed.push(lesson_id);
        Ok(MarkOutcome::Completed { quiz })
    }
}
