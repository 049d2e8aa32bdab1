use serde::Serialize;

use crate::modules::courses::schema::Question;

/// Minimum percent score for a quiz lesson to count as completed.
pub const PASS_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    /// Whole percent, rounded down.
    pub score: u32,
    pub passed: bool,
}

/// Answers are option indices matched to questions by position. Missing answers,
/// and questions without an answer key, count as wrong.
pub fn score_quiz(questions: &[Question], answers: &[usize]) -> QuizResult {
    let total = questions.len();
    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.correct_answer == Some(**answer))
        .count();

    // An empty quiz has nothing to fail
    let score = if total == 0 {
        100
    } else {
        (correct * 100 / total) as u32
    };

    QuizResult {
        correct,
        total,
        score,
        passed: score >= PASS_THRESHOLD,
    }
}
