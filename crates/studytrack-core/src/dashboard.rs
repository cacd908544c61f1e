//! Landing-page dashboard summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::check_score;
use crate::error::Result;
use crate::model::{PlanStatus, StudyPlanRecord, TestRecord};
use crate::scoring::percent;

/// Label used for plans that carry no subject.
pub const UNKNOWN_PLAN_SUBJECT: &str = "Unknown Subject";

/// How many items the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLimits {
    pub recent_tests: usize,
    pub upcoming_plans: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        Self {
            recent_tests: 5,
            upcoming_plans: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_study_plans: usize,
    pub completed_study_plans: usize,
    /// Every test, taken or not.
    pub total_mock_tests: usize,
    /// Mean latest score over tests that have one.
    pub average_score: f64,
    pub recent_tests: Vec<RecentTest>,
    pub upcoming_plans: Vec<UpcomingPlan>,
}

impl DashboardSummary {
    /// Share of study plans completed, 0 when there are none.
    pub fn completion_percent(&self) -> f64 {
        percent(self.completed_study_plans, self.total_study_plans)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentTest {
    pub id: String,
    pub title: String,
    pub score_percent: f64,
    pub date_taken: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingPlan {
    pub id: String,
    pub topic: String,
    pub subject_name: String,
    pub target_date: NaiveDate,
}

/// Summarize plans and tests for the dashboard.
///
/// `tests` must be ordered most recent first. Upcoming plans are the pending
/// plans with a target date, soonest first.
pub fn summarize(
    study_plans: &[StudyPlanRecord],
    tests: &[TestRecord],
    limits: DashboardLimits,
) -> Result<DashboardSummary> {
    let mut scored = Vec::new();
    for test in tests {
        if let Some(entry) = test.latest_score() {
            check_score(&test.id, entry.score_percent)?;
            scored.push((test, entry.score_percent));
        }
    }

    let average_score = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|(_, s)| s).sum::<f64>() / scored.len() as f64
    };

    let recent_tests = scored
        .iter()
        .take(limits.recent_tests)
        .map(|(test, score)| RecentTest {
            id: test.id.clone(),
            title: test.title.clone(),
            score_percent: *score,
            date_taken: test.history_date(),
        })
        .collect();

    let mut upcoming: Vec<(&StudyPlanRecord, NaiveDate)> = study_plans
        .iter()
        .filter(|p| p.status == PlanStatus::Pending)
        .filter_map(|p| p.target_date.map(|d| (p, d)))
        .collect();
    // stable: plans sharing a date keep their input order
    upcoming.sort_by_key(|(_, date)| *date);

    let upcoming_plans = upcoming
        .into_iter()
        .take(limits.upcoming_plans)
        .map(|(plan, target_date)| UpcomingPlan {
            id: plan.id.clone(),
            topic: plan.topic.clone(),
            subject_name: plan
                .subject
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLAN_SUBJECT.to_string()),
            target_date,
        })
        .collect();

    Ok(DashboardSummary {
        total_study_plans: study_plans.len(),
        completed_study_plans: study_plans
            .iter()
            .filter(|p| p.status == PlanStatus::Completed)
            .count(),
        total_mock_tests: tests.len(),
        average_score,
        recent_tests,
        upcoming_plans,
    })
}
