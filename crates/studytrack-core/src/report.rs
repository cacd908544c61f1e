//! Analytics report with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::AnalyticsSnapshot;
use crate::model::{Period, ScoreBand};

/// A generated analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The instant the monthly window was anchored to.
    pub as_of: DateTime<Utc>,
    /// History window applied before aggregation.
    #[serde(default)]
    pub period: Period,
    pub snapshot: AnalyticsSnapshot,
}

impl AnalyticsReport {
    pub fn new(snapshot: AnalyticsSnapshot, as_of: DateTime<Utc>, period: Period) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            as_of,
            period,
            snapshot,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalyticsReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown, listing at most `recent_limit` history entries.
    pub fn to_markdown(&self, recent_limit: usize) -> String {
        let snap = &self.snapshot;
        let stats = &snap.overall_stats;
        let plans = &snap.study_plan_progress;
        let mut md = String::new();

        md.push_str(&format!(
            "## Study analytics ({}, as of {})\n\n",
            self.period,
            self.as_of.format("%Y-%m-%d")
        ));
        md.push_str(&format!(
            "**Summary:** {} tests, average {:.1}%, best {:.1}%, trend {}\n\n",
            stats.total_tests,
            stats.average_score,
            stats.best_score,
            match stats.trend_signal() {
                Some(t) => format!("{t:+.1}%"),
                None => "n/a".to_string(),
            }
        ));
        md.push_str(&format!(
            "**Study plans:** {}/{} completed ({:.0}%), {} pending\n\n",
            plans.completed,
            plans.total,
            plans.completion_percent(),
            plans.pending
        ));

        if !snap.subject_performance.is_empty() {
            md.push_str("### Subjects\n\n");
            md.push_str("| Subject | Average | Tests | Band |\n");
            md.push_str("|---------|---------|-------|------|\n");
            for s in &snap.subject_performance {
                md.push_str(&format!(
                    "| {} | {:.1}% | {} | {} |\n",
                    md_cell(&s.subject),
                    s.average_score,
                    s.test_count,
                    ScoreBand::from_score(s.average_score)
                ));
            }
            md.push('\n');
        }

        if !snap.monthly_progress.is_empty() {
            md.push_str("### Monthly progress\n\n");
            md.push_str("| Month | Tests | Average |\n");
            md.push_str("|-------|-------|---------|\n");
            for m in &snap.monthly_progress {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% |\n",
                    m.month, m.tests_completed, m.average_score
                ));
            }
            md.push('\n');
        }

        let recent = snap.recent_history(recent_limit);
        if !recent.is_empty() {
            md.push_str("### Recent tests\n\n");
            md.push_str("| Test | Subject | Score | Date |\n");
            md.push_str("|------|---------|-------|------|\n");
            for t in recent {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% ({}) | {} |\n",
                    md_cell(&t.title),
                    md_cell(&t.subject),
                    t.score,
                    t.band(),
                    t.date.format("%Y-%m-%d")
                ));
            }
        }

        md
    }
}

/// Escape a string for use inside a markdown table cell.
fn md_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
