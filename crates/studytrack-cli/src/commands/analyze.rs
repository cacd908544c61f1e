//! The `studytrack analyze` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use studytrack_core::analytics::{aggregate, filter_by_period};
use studytrack_core::model::Period;
use studytrack_core::parser;
use studytrack_core::report::AnalyticsReport;
use studytrack_report::html::write_html_report;

use crate::config::load_config_from;

pub fn execute(
    plans_path: Option<PathBuf>,
    tests_path: Option<PathBuf>,
    now: Option<String>,
    period: String,
    format: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let period: Period = period.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
    let now = match now {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .with_context(|| format!("invalid --now timestamp: '{s}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let plans_path = plans_path.unwrap_or_else(|| config.study_plans_path());
    let tests_path = tests_path.unwrap_or_else(|| config.mock_tests_path());
    let plans = parser::load_study_plans(&plans_path)?;
    let tests = parser::load_test_records(&tests_path)?;
    let tests = filter_by_period(&tests, period, now);

    let snapshot = aggregate(&plans, &tests, now).context("failed to aggregate analytics")?;
    let report = AnalyticsReport::new(snapshot, now, period);

    let format = format.unwrap_or_else(|| config.default_format.clone());
    let formats: Vec<&str> = if format == "all" {
        vec!["text", "json", "html"]
    } else {
        format.split(',').map(|s| s.trim()).collect()
    };

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "text" => print_summary(&report, config.recent_tests_limit),
            "markdown" | "md" => {
                println!("{}", report.to_markdown(config.recent_tests_limit));
            }
            "json" => {
                let path = output.join(format!("analytics-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("analytics-{timestamp}.html"));
                write_html_report(&report, config.recent_tests_limit, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &AnalyticsReport, recent_limit: usize) {
    use comfy_table::{Cell, Table};

    let snap = &report.snapshot;
    let stats = &snap.overall_stats;
    let plans = &snap.study_plan_progress;

    println!(
        "Analytics ({}, as of {})",
        report.period,
        report.as_of.format("%Y-%m-%d")
    );
    println!(
        "Total tests: {}  Average: {:.1}%  Best: {:.1}%",
        stats.total_tests, stats.average_score, stats.best_score
    );
    match stats.trend_signal() {
        Some(trend) => println!("Trend: {} {:.1}%", stats.trend_direction(), trend.abs()),
        None => println!("Trend: not enough tests"),
    }
    println!(
        "Study plans: {}/{} completed ({:.0}%), {} pending",
        plans.completed,
        plans.total,
        plans.completion_percent(),
        plans.pending
    );

    if !snap.subject_performance.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Subject", "Average", "Tests", "Band"]);
        for s in &snap.subject_performance {
            table.add_row(vec![
                Cell::new(&s.subject),
                Cell::new(format!("{:.1}%", s.average_score)),
                Cell::new(s.test_count),
                Cell::new(studytrack_core::model::ScoreBand::from_score(s.average_score)),
            ]);
        }
        println!("\n{table}");
    }

    if !snap.monthly_progress.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Month", "Tests", "Average"]);
        for m in &snap.monthly_progress {
            table.add_row(vec![
                Cell::new(&m.month),
                Cell::new(m.tests_completed),
                Cell::new(format!("{:.1}%", m.average_score)),
            ]);
        }
        println!("\n{table}");
    }

    let recent = snap.recent_history(recent_limit);
    if !recent.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Test", "Subject", "Score", "Date"]);
        for t in recent {
            table.add_row(vec![
                Cell::new(&t.title),
                Cell::new(&t.subject),
                Cell::new(format!("{:.1}% ({})", t.score, t.band())),
                Cell::new(t.date.format("%Y-%m-%d")),
            ]);
        }
        println!("\n{table}");
    }
}
