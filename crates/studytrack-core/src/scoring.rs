//! Mock-test scoring.
//!
//! Turns a question set and the learner's answer sheet into a [`ScoreResult`].
//! Scoring is pure: persisting the result and the selected options is the
//! caller's job.

use std::collections::HashSet;

use crate::error::{InvalidInput, Result};
use crate::model::{AnswerSheet, Question, QuestionVerdict, ScoreResult};

/// Score a submitted attempt.
///
/// A question is correct only when the sheet holds its id with exactly the
/// correct option; unanswered questions are never correct. Selected indices
/// are not bounds-checked, an out-of-range selection is simply wrong.
///
/// Returns `InvalidInput` when the question set is malformed (duplicate ids,
/// fewer than two options, correct option out of range) or when the sheet
/// answers a question that is not in the test.
pub fn score(questions: &[Question], answers: &AnswerSheet) -> Result<ScoreResult> {
    validate_questions(questions)?;

    if let Some(unknown) = answers
        .keys()
        .find(|id| !questions.iter().any(|q| &q.id == *id))
    {
        return Err(InvalidInput::UnknownQuestion(unknown.clone()).into());
    }

    let verdicts: Vec<QuestionVerdict> = questions
        .iter()
        .map(|q| {
            let selected_option = answers.get(&q.id).copied();
            QuestionVerdict {
                question_id: q.id.clone(),
                selected_option,
                is_correct: selected_option == Some(q.correct_option),
            }
        })
        .collect();

    let total_questions = questions.len();
    let correct_answers = verdicts.iter().filter(|v| v.is_correct).count();
    let score_percent = percent(correct_answers, total_questions);

    tracing::debug!(
        total_questions,
        correct_answers,
        answered = answers.len(),
        "scored attempt"
    );

    Ok(ScoreResult {
        total_questions,
        correct_answers,
        score_percent,
        verdicts,
    })
}

/// `part / total * 100`, defined as 0 when `total` is 0.
pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Check the structural invariants of a question set.
pub(crate) fn validate_questions(questions: &[Question]) -> Result<()> {
    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.id.as_str()) {
            return Err(InvalidInput::DuplicateQuestion(q.id.clone()).into());
        }
        if q.options.len() < 2 {
            return Err(InvalidInput::TooFewOptions {
                question_id: q.id.clone(),
                count: q.options.len(),
            }
            .into());
        }
        if q.correct_option >= q.options.len() {
            return Err(InvalidInput::CorrectOptionOutOfRange {
                question_id: q.id.clone(),
                correct_option: q.correct_option,
                count: q.options.len(),
            }
            .into());
        }
    }
    Ok(())
}
