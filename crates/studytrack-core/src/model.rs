//! Core data model types for studytrack.
//!
//! Inbound records (`TestRecord`, `StudyPlanRecord`) use the persistence
//! layer's column names. They are consumed read-only; the core never mutates
//! them and owns none of them across calls.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Label used for test records that carry no subject.
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// A single multiple-choice question. Immutable once its test is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    /// Unique identifier within its test.
    pub id: String,
    /// Prompt shown to the learner.
    #[serde(alias = "question_text")]
    pub text: String,
    /// Ordered answer options (at least two).
    pub options: Vec<String>,
    /// 0-based index of the correct option.
    pub correct_option: usize,
    /// Optional explanation shown after submission.
    #[serde(default)]
    pub explanation: Option<String>,
}

/// The learner's selection per question id. Unanswered questions are absent.
pub type AnswerSheet = HashMap<String, usize>;

/// A mock test definition: header plus its ordered question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockTest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Correctness verdict for one question of a submitted attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionVerdict {
    pub question_id: String,
    /// The option the learner picked, `None` when unanswered.
    pub selected_option: Option<usize>,
    pub is_correct: bool,
}

/// The scored outcome of one attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    /// `correct / total * 100`, unrounded; 0 for an empty test.
    pub score_percent: f64,
    /// One verdict per question, in test order.
    pub verdicts: Vec<QuestionVerdict>,
}

impl ScoreResult {
    /// One-line summary, e.g. `You scored 80.0% (4/5)`.
    pub fn summary_line(&self) -> String {
        format!(
            "You scored {:.1}% ({}/{})",
            self.score_percent, self.correct_answers, self.total_questions
        )
    }
}

/// A persisted score row attached to a test record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreEntry {
    pub score_percent: f64,
    #[serde(default)]
    pub correct_answers: usize,
    #[serde(default)]
    pub total_questions: usize,
}

impl From<&ScoreResult> for ScoreEntry {
    fn from(result: &ScoreResult) -> Self {
        Self {
            score_percent: result.score_percent,
            correct_answers: result.correct_answers,
            total_questions: result.total_questions,
        }
    }
}

/// A mock test as returned by the persistence layer.
///
/// `scores` must be ordered most recent first; only the first entry is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub date_taken: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
}

impl TestRecord {
    /// The most recent score, if the test was ever taken.
    pub fn latest_score(&self) -> Option<&ScoreEntry> {
        self.scores.first()
    }

    /// The date the test counts under: when it was taken, else when it was created.
    pub fn history_date(&self) -> DateTime<Utc> {
        self.date_taken.unwrap_or(self.created_at)
    }

    /// Subject label, falling back to [`UNKNOWN_SUBJECT`].
    pub fn subject_label(&self) -> &str {
        self.subject.as_deref().unwrap_or(UNKNOWN_SUBJECT)
    }
}

/// Status of a study plan.
///
/// Values other than `Pending` and `Completed` are kept verbatim so they can
/// still be counted toward the plan total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanStatus {
    Pending,
    Completed,
    Other(String),
}

impl From<String> for PlanStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => PlanStatus::Pending,
            "Completed" => PlanStatus::Completed,
            _ => PlanStatus::Other(s),
        }
    }
}

impl From<PlanStatus> for String {
    fn from(status: PlanStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Pending => write!(f, "Pending"),
            PlanStatus::Completed => write!(f, "Completed"),
            PlanStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

/// A study plan as returned by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlanRecord {
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    pub status: PlanStatus,
}

/// Qualitative band a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Excellent => write!(f, "Excellent"),
            ScoreBand::Good => write!(f, "Good"),
            ScoreBand::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}

/// Direction of the improvement trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    pub fn from_trend(trend: f64) -> Self {
        if trend > 0.0 {
            TrendDirection::Up
        } else if trend < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
            TrendDirection::Flat => write!(f, "flat"),
        }
    }
}

/// History window selectable on the analytics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "1month")]
    OneMonth,
}

impl Period {
    /// Number of calendar months covered, `None` for all time.
    pub fn months(self) -> Option<u32> {
        match self {
            Period::All => None,
            Period::SixMonths => Some(6),
            Period::ThreeMonths => Some(3),
            Period::OneMonth => Some(1),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::All => write!(f, "all"),
            Period::SixMonths => write!(f, "6months"),
            Period::ThreeMonths => write!(f, "3months"),
            Period::OneMonth => write!(f, "1month"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Period::All),
            "6months" => Ok(Period::SixMonths),
            "3months" => Ok(Period::ThreeMonths),
            "1month" => Ok(Period::OneMonth),
            other => Err(format!("unknown period: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_status_keeps_unknown_values() {
        let plans: Vec<StudyPlanRecord> = serde_json::from_str(
            r#"[
                {"id": "p1", "status": "Completed"},
                {"id": "p2", "status": "Pending", "target_date": "2026-11-01"},
                {"id": "p3", "status": "Archived"}
            ]"#,
        )
        .unwrap();
        assert_eq!(plans[0].status, PlanStatus::Completed);
        assert_eq!(plans[1].status, PlanStatus::Pending);
        assert_eq!(plans[2].status, PlanStatus::Other("Archived".into()));

        let json = serde_json::to_string(&plans[2]).unwrap();
        assert!(json.contains("\"Archived\""));
    }

    #[test]
    fn test_record_defaults_and_fallbacks() {
        let record: TestRecord = serde_json::from_str(
            r#"{"id": "t1", "title": "Algebra", "created_at": "2026-10-01T09:00:00Z"}"#,
        )
        .unwrap();
        assert!(record.latest_score().is_none());
        assert_eq!(record.subject_label(), UNKNOWN_SUBJECT);
        assert_eq!(record.history_date(), record.created_at);
    }

    #[test]
    fn question_accepts_persistence_column_name() {
        let q: Question = serde_json::from_str(
            r#"{"id": "q1", "question_text": "2 + 2?", "options": ["3", "4"], "correct_option": 1}"#,
        )
        .unwrap();
        assert_eq!(q.text, "2 + 2?");
        assert!(q.explanation.is_none());
    }

    #[test]
    fn score_band_thresholds() {
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79.9), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(59.9), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::NeedsImprovement.to_string(), "Needs Improvement");
    }

    #[test]
    fn trend_direction_sign() {
        assert_eq!(TrendDirection::from_trend(2.5), TrendDirection::Up);
        assert_eq!(TrendDirection::from_trend(-0.1), TrendDirection::Down);
        assert_eq!(TrendDirection::from_trend(0.0), TrendDirection::Flat);
    }

    #[test]
    fn period_display_and_parse() {
        assert_eq!(Period::SixMonths.to_string(), "6months");
        assert_eq!("3months".parse::<Period>().unwrap(), Period::ThreeMonths);
        assert_eq!("ALL".parse::<Period>().unwrap(), Period::All);
        assert_eq!(Period::OneMonth.months(), Some(1));
        assert!("week".parse::<Period>().is_err());
    }

    #[test]
    fn summary_line_formats_one_decimal() {
        let result = ScoreResult {
            total_questions: 3,
            correct_answers: 2,
            score_percent: 200.0 / 3.0,
            verdicts: vec![],
        };
        assert_eq!(result.summary_line(), "You scored 66.7% (2/3)");
    }
}
