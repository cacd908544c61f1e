//! Test-taking session.
//!
//! Holds the answer sheet while a learner works through a mock test one
//! question at a time. Submitting consumes the session, so the answers are
//! final once a score exists.

use crate::error::{InvalidInput, Result};
use crate::model::{AnswerSheet, Question, ScoreResult};
use crate::scoring::{percent, score, validate_questions};

/// Outcome of moving past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Next(usize),
    /// The current question was the last one; the session is ready to submit.
    Finished,
}

/// An in-progress attempt at a mock test.
#[derive(Debug, Clone)]
pub struct TestSession {
    questions: Vec<Question>,
    current: usize,
    answers: AnswerSheet,
}

impl TestSession {
    /// Start a session at the first question with no answers.
    pub fn start(questions: Vec<Question>) -> Result<Self> {
        validate_questions(&questions)?;
        Ok(Self {
            questions,
            current: 0,
            answers: AnswerSheet::new(),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question currently shown, `None` for an empty test.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Record (or replace) the learner's choice for a question.
    pub fn select(&mut self, question_id: &str, option: usize) -> Result<()> {
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(InvalidInput::UnknownQuestion(question_id.to_string()).into());
        }
        self.answers.insert(question_id.to_string(), option);
        Ok(())
    }

    /// The learner's current choice for a question.
    pub fn selection(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Position through the test, `(index + 1) / len * 100`.
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        percent(self.current + 1, self.questions.len())
    }

    /// Move to the next question, or report that the last one was reached.
    pub fn advance(&mut self) -> Advance {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Advance::Next(self.current)
        } else {
            Advance::Finished
        }
    }

    /// Finalize the answers and score the attempt.
    pub fn submit(self) -> Result<ScoreResult> {
        score(&self.questions, &self.answers)
    }
}
