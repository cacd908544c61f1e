//! The `studytrack dashboard` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use studytrack_core::dashboard::summarize;
use studytrack_core::model::ScoreBand;
use studytrack_core::parser;

use crate::config::load_config_from;

pub fn execute(
    plans_path: Option<PathBuf>,
    tests_path: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let plans_path = plans_path.unwrap_or_else(|| config.study_plans_path());
    let tests_path = tests_path.unwrap_or_else(|| config.mock_tests_path());
    let plans = parser::load_study_plans(&plans_path)?;
    let tests = parser::load_test_records(&tests_path)?;

    let summary = summarize(&plans, &tests, config.dashboard_limits())
        .context("failed to summarize dashboard")?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Study plans: {} ({}/{} completed, {:.0}%)",
        summary.total_study_plans,
        summary.completed_study_plans,
        summary.total_study_plans,
        summary.completion_percent()
    );
    println!("Mock tests: {}", summary.total_mock_tests);
    println!("Average score: {:.1}%", summary.average_score);

    println!("\nRecent tests:");
    if summary.recent_tests.is_empty() {
        println!("  No tests taken yet.");
    }
    for t in &summary.recent_tests {
        println!(
            "  {} {:.1}% ({}) {}",
            t.title,
            t.score_percent,
            ScoreBand::from_score(t.score_percent),
            t.date_taken.format("%Y-%m-%d")
        );
    }

    println!("\nUpcoming plans:");
    if summary.upcoming_plans.is_empty() {
        println!("  Nothing scheduled.");
    }
    for p in &summary.upcoming_plans {
        println!("  {} {} [{}]", p.target_date, p.topic, p.subject_name);
    }

    Ok(())
}
