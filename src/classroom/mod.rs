//! Lesson sequencing, quiz scoring and local lesson progress.

pub mod progress;
pub mod quiz;
pub mod sequencer;

pub use progress::ProgressStore;
pub use quiz::{score_quiz, QuizResult, PASS_THRESHOLD};
pub use sequencer::{Classroom, ClassroomError, MarkOutcome, Position};
