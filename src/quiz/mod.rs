// src/quiz/mod.rs

//! Answer checking and the state of one quiz attempt.

use serde::{Deserialize, Serialize};

use crate::models::quiz::QuizQuestion;

/// Outcome of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswerResult {
    pub question: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub correct: bool,
    pub points: i64,
    pub explanation: String,
}

/// Compares a selection with the correct option. Exact match only.
pub fn record_quiz_answer(
    question: &str,
    selected_answer: &str,
    correct_option: &str,
    points_if_correct: i64,
    explanation: &str,
) -> QuizAnswerResult {
    let correct = selected_answer == correct_option;
    QuizAnswerResult {
        question: question.to_string(),
        selected_answer: selected_answer.to_string(),
        correct_answer: correct_option.to_string(),
        correct,
        points: if correct { points_if_correct } else { 0 },
        explanation: explanation.to_string(),
    }
}

/// Walks a learner through a list of questions, one answer each.
///
/// Results are kept in submission order until the attempt is dropped;
/// starting a new attempt starts from an empty result list. Points earned
/// here are quiz XP and are kept apart from the glossary XP ledger.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    questions: Vec<QuizQuestion>,
    current: usize,
    results: Vec<QuizAnswerResult>,
}

impl QuizAttempt {
    pub fn start(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            results: Vec::new(),
        }
    }

    /// The question awaiting an answer, if any remain.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Records an answer to the current question and moves on.
    ///
    /// An empty selection, or a finished attempt, is ignored.
    pub fn submit(&mut self, selected_answer: &str) -> Option<&QuizAnswerResult> {
        if selected_answer.is_empty() {
            return None;
        }
        let question = self.questions.get(self.current)?;

        let result = record_quiz_answer(
            &question.question,
            selected_answer,
            &question.correct_answer,
            question.points,
            &question.explanation,
        );
        self.results.push(result);
        self.current += 1;
        self.results.last()
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    pub fn results(&self) -> &[QuizAnswerResult] {
        &self.results
    }

    /// Sum of points over correct answers so far.
    pub fn earned_xp(&self) -> i64 {
        self.results
            .iter()
            .filter(|r| r.correct)
            .map(|r| r.points)
            .sum()
    }
}
