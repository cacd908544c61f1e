//! The `studytrack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("studytrack.toml").exists() {
        println!("studytrack.toml already exists, skipping.");
    } else {
        std::fs::write("studytrack.toml", SAMPLE_CONFIG)?;
        println!("Created studytrack.toml");
    }

    std::fs::create_dir_all("mock-tests")?;
    let sample_path = std::path::Path::new("mock-tests/sample-mathematics.toml");
    if sample_path.exists() {
        println!("mock-tests/sample-mathematics.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_TEST)?;
        println!("Created mock-tests/sample-mathematics.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: studytrack validate --test mock-tests/sample-mathematics.toml");
    println!("  2. Write an answer sheet ([answers] q1 = 0 ...) and run:");
    println!("     studytrack score --test mock-tests/sample-mathematics.toml --answers answers.toml");
    println!("  3. Export study_plans.json and mock_tests.json, then run: studytrack analyze");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studytrack configuration

output_dir = "./studytrack-results"
default_format = "text"
data_dir = "."
recent_tests_limit = 10
dashboard_recent_limit = 5
dashboard_upcoming_limit = 5
"#;

const SAMPLE_TEST: &str = r#"[test]
id = "sample-mathematics"
title = "Sample Mathematics Test"
subject = "Mathematics"

[[questions]]
id = "q1"
text = "What is 15 + 27?"
options = ["42", "41", "43", "40"]
correct_option = 0
explanation = "15 + 27 = 42"

[[questions]]
id = "q2"
text = "What is the square root of 64?"
options = ["6", "7", "8", "9"]
correct_option = 2
explanation = "8 x 8 = 64"

[[questions]]
id = "q3"
text = "What is 12 x 8?"
options = ["94", "95", "96", "97"]
correct_option = 2
explanation = "12 x 8 = 96"

[[questions]]
id = "q4"
text = "What is 144 / 12?"
options = ["11", "12", "13", "14"]
correct_option = 1
explanation = "144 / 12 = 12"

[[questions]]
id = "q5"
text = "What is 25% of 80?"
options = ["15", "20", "25", "30"]
correct_option = 1
explanation = "0.25 x 80 = 20"
"#;
