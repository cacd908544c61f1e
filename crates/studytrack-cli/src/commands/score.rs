//! The `studytrack score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use studytrack_core::parser;
use studytrack_core::session::TestSession;

pub fn execute(test_path: PathBuf, answers_path: PathBuf, format: String) -> Result<()> {
    let test = parser::parse_mock_test(&test_path)?;
    let answers = parser::parse_answers(&answers_path)?;

    let mut session = TestSession::start(test.questions.clone())
        .with_context(|| format!("cannot take test {}", test.id))?;
    for (question_id, option) in &answers {
        session
            .select(question_id, *option)
            .with_context(|| format!("answer sheet {} does not match test {}", answers_path.display(), test.id))?;
    }
    let result = session.submit()?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            println!("{}", test.title);
            for (question, verdict) in test.questions.iter().zip(&result.verdicts) {
                let status = match verdict.selected_option {
                    None => "UNANSWERED".to_string(),
                    Some(_) if verdict.is_correct => "CORRECT".to_string(),
                    Some(selected) => format!(
                        "WRONG (picked {}, answer {})",
                        option_text(&question.options, selected),
                        option_text(&question.options, question.correct_option)
                    ),
                };
                println!("  [{}] {}: {}", question.id, question.text, status);
                if !verdict.is_correct {
                    if let Some(explanation) = &question.explanation {
                        println!("      {explanation}");
                    }
                }
            }
            println!("\n{}", result.summary_line());
        }
    }

    Ok(())
}

fn option_text(options: &[String], index: usize) -> String {
    options
        .get(index)
        .map(|o| format!("\"{o}\""))
        .unwrap_or_else(|| format!("#{index}"))
}
