//! Record loading.
//!
//! Loads mock test definitions and answer sheets from TOML, and persistence
//! exports (tests, study plans) from JSON. Also validates test definitions.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::model::{AnswerSheet, MockTest, Question, StudyPlanRecord, TestRecord};

/// Intermediate TOML structure for test definition files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    id: String,
    title: String,
    #[serde(default)]
    subject: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(default)]
    options: Vec<String>,
    correct_option: usize,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlAnswerFile {
    #[serde(default)]
    answers: AnswerSheet,
}

/// Parse a single TOML file into a `MockTest`.
pub fn parse_mock_test(path: &Path) -> Result<MockTest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test file: {}", path.display()))?;

    parse_mock_test_str(&content, path)
}

/// Parse a TOML string into a `MockTest` (useful for testing).
pub fn parse_mock_test_str(content: &str, source_path: &Path) -> Result<MockTest> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            text: q.text,
            options: q.options,
            correct_option: q.correct_option,
            explanation: q.explanation,
        })
        .collect();

    Ok(MockTest {
        id: parsed.test.id,
        title: parsed.test.title,
        subject: parsed.test.subject,
        questions,
    })
}

/// Parse an answer sheet: an `[answers]` table of question id to option index.
pub fn parse_answers(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    parse_answers_str(&content, path)
}

pub fn parse_answers_str(content: &str, source_path: &Path) -> Result<AnswerSheet> {
    let parsed: TomlAnswerFile = toml::from_str(content)
        .with_context(|| format!("failed to parse answers: {}", source_path.display()))?;
    Ok(parsed.answers)
}

/// Load test records exported by the persistence layer, most recent first.
pub fn load_test_records(path: &Path) -> Result<Vec<TestRecord>> {
    load_json_array(path, "test records")
}

/// Load study plan records exported by the persistence layer.
pub fn load_study_plans(path: &Path) -> Result<Vec<StudyPlanRecord>> {
    load_json_array(path, "study plans")
}

fn load_json_array<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what}: {}", path.display()))
}

/// Recursively load all `.toml` test definitions from a directory.
pub fn load_test_directory(dir: &Path) -> Result<Vec<MockTest>> {
    let mut tests = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            tests.extend(load_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_mock_test(&path) {
                Ok(test) => tests.push(test),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// A warning from test validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a test definition for issues that would make scoring fail or
/// produce a meaningless percentage.
pub fn validate_mock_test(test: &MockTest) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if test.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "test has no questions; it will always score 0%".into(),
        });
    }

    let mut seen_ids = std::collections::HashSet::new();
    for q in &test.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in &test.questions {
        if q.options.len() < 2 {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("only {} option(s), at least 2 required", q.options.len()),
            });
        } else if q.correct_option >= q.options.len() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!(
                    "correct_option {} is out of range for {} options",
                    q.correct_option,
                    q.options.len()
                ),
            });
        }
    }

    for q in &test.questions {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "question text is empty".into(),
            });
        }
    }

    warnings
}
