//! The `studytrack validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(test_path: PathBuf) -> Result<()> {
    let tests = if test_path.is_dir() {
        studytrack_core::parser::load_test_directory(&test_path)?
    } else {
        vec![studytrack_core::parser::parse_mock_test(&test_path)?]
    };

    let mut total_warnings = 0;

    for test in &tests {
        println!("Mock test: {} ({} questions)", test.title, test.questions.len());

        let warnings = studytrack_core::parser::validate_mock_test(test);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All mock tests valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
