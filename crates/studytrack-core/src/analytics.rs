//! Study analytics aggregation.
//!
//! Recomputes every figure from scratch on each call: study-plan completion,
//! the scored test history, per-subject performance, the six-month monthly
//! trend, and overall statistics including the short-term improvement trend.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result};
use crate::model::{
    PlanStatus, Period, ScoreBand, StudyPlanRecord, TestRecord, TrendDirection,
};
use crate::scoring::percent;

/// Months covered by the monthly trend series.
pub const MONTHLY_WINDOW_MONTHS: u32 = 6;

/// Attempts on each side of the improvement-trend comparison.
pub const TREND_WINDOW: usize = 3;

/// Everything the analytics view renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub study_plan_progress: StudyPlanProgress,
    /// Scored tests, in the order supplied (most recent first).
    pub test_history: Vec<TestHistoryEntry>,
    /// One entry per subject, in first-seen order.
    pub subject_performance: Vec<SubjectPerformance>,
    /// One entry per month with attempts inside the window, in first-seen order.
    pub monthly_progress: Vec<MonthlyProgress>,
    pub overall_stats: OverallStats,
}

impl AnalyticsSnapshot {
    /// The first `limit` history entries.
    pub fn recent_history(&self, limit: usize) -> &[TestHistoryEntry] {
        &self.test_history[..limit.min(self.test_history.len())]
    }

    /// Performance figures for one subject (exact, case-sensitive match).
    pub fn subject(&self, subject: &str) -> Option<&SubjectPerformance> {
        self.subject_performance
            .iter()
            .find(|s| s.subject == subject)
    }
}

/// Study-plan completion counts.
///
/// Plans with a status other than Pending or Completed count toward `total`
/// only, so `completed + pending` may be less than `total`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanProgress {
    pub completed: usize,
    pub pending: usize,
    pub total: usize,
}

impl StudyPlanProgress {
    /// Share of plans completed, 0 when there are none.
    pub fn completion_percent(&self) -> f64 {
        percent(self.completed, self.total)
    }
}

/// One scored test in the history list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestHistoryEntry {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub score: f64,
    pub date: DateTime<Utc>,
}

impl TestHistoryEntry {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject: String,
    pub average_score: f64,
    pub test_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProgress {
    /// Short month and year, e.g. `Oct 2026`.
    pub month: String,
    pub tests_completed: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    /// Size of the whole history, independent of the monthly window.
    pub total_tests: usize,
    pub average_score: f64,
    pub best_score: f64,
    /// Mean of the three most recent scores minus the mean of the three
    /// before them. 0 when fewer than six scores exist.
    pub improvement_trend: f64,
}

impl OverallStats {
    /// The improvement trend, or `None` when there are too few attempts to
    /// compute one. Distinguishes "no data" from "no change".
    pub fn trend_signal(&self) -> Option<f64> {
        (self.total_tests >= 2 * TREND_WINDOW).then_some(self.improvement_trend)
    }

    pub fn trend_direction(&self) -> TrendDirection {
        TrendDirection::from_trend(self.improvement_trend)
    }
}

/// Build the analytics snapshot for a learner.
///
/// `tests` must be ordered most recent first, with each record's `scores`
/// ordered the same way. `now` anchors the monthly window.
pub fn aggregate(
    study_plans: &[StudyPlanRecord],
    tests: &[TestRecord],
    now: DateTime<Utc>,
) -> Result<AnalyticsSnapshot> {
    let study_plan_progress = study_plan_progress(study_plans);
    let test_history = test_history(tests)?;
    let subject_performance = subject_performance(&test_history);
    let monthly_progress = monthly_progress(&test_history, now);
    let overall_stats = overall_stats(&test_history);

    tracing::debug!(
        plans = study_plans.len(),
        tests = tests.len(),
        scored = test_history.len(),
        subjects = subject_performance.len(),
        months = monthly_progress.len(),
        "aggregated analytics"
    );

    Ok(AnalyticsSnapshot {
        study_plan_progress,
        test_history,
        subject_performance,
        monthly_progress,
        overall_stats,
    })
}

/// Count plans by status.
pub fn study_plan_progress(plans: &[StudyPlanRecord]) -> StudyPlanProgress {
    StudyPlanProgress {
        completed: plans
            .iter()
            .filter(|p| p.status == PlanStatus::Completed)
            .count(),
        pending: plans
            .iter()
            .filter(|p| p.status == PlanStatus::Pending)
            .count(),
        total: plans.len(),
    }
}

/// Extract the scored history: tests without a score are dropped, the rest
/// contribute their most recent score.
pub fn test_history(tests: &[TestRecord]) -> Result<Vec<TestHistoryEntry>> {
    tests
        .iter()
        .filter_map(|t| t.latest_score().map(|s| (t, s.score_percent)))
        .map(|(t, score)| {
            check_score(&t.id, score)?;
            Ok(TestHistoryEntry {
                id: t.id.clone(),
                title: t.title.clone(),
                subject: t.subject_label().to_string(),
                score,
                date: t.history_date(),
            })
        })
        .collect()
}

/// Reject scores that would corrupt averages.
pub(crate) fn check_score(test_id: &str, score: f64) -> Result<()> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err(InvalidInput::InvalidScore {
            test_id: test_id.to_string(),
            score,
        }
        .into())
    }
}

/// Average score and attempt count per subject label.
pub fn subject_performance(history: &[TestHistoryEntry]) -> Vec<SubjectPerformance> {
    group_in_order(history.iter().map(|e| (e.subject.as_str(), e.score)))
        .into_iter()
        .map(|(subject, scores)| SubjectPerformance {
            subject,
            average_score: mean(&scores),
            test_count: scores.len(),
        })
        .collect()
}

/// Monthly buckets over the trailing six calendar months.
pub fn monthly_progress(history: &[TestHistoryEntry], now: DateTime<Utc>) -> Vec<MonthlyProgress> {
    let cutoff = months_before(now, MONTHLY_WINDOW_MONTHS);

    let labelled: Vec<(String, f64)> = history
        .iter()
        .filter(|e| e.date >= cutoff)
        .map(|e| (month_label(e.date), e.score))
        .collect();

    group_in_order(labelled.iter().map(|(month, score)| (month.as_str(), *score)))
        .into_iter()
        .map(|(month, scores)| MonthlyProgress {
            month,
            tests_completed: scores.len(),
            average_score: mean(&scores),
        })
        .collect()
}

/// Totals, average, best score and improvement trend over the whole history.
pub fn overall_stats(history: &[TestHistoryEntry]) -> OverallStats {
    let scores: Vec<f64> = history.iter().map(|e| e.score).collect();
    OverallStats {
        total_tests: scores.len(),
        average_score: mean(&scores),
        best_score: scores.iter().copied().fold(0.0, f64::max),
        improvement_trend: improvement_trend(&scores),
    }
}

/// Recent-three mean minus previous-three mean, 0 with fewer than six scores.
pub fn improvement_trend(scores: &[f64]) -> f64 {
    if scores.len() < 2 * TREND_WINDOW {
        return 0.0;
    }
    let recent = &scores[..TREND_WINDOW];
    let previous = &scores[TREND_WINDOW..2 * TREND_WINDOW];
    mean(recent) - mean(previous)
}

/// Keep only tests whose history date falls inside `period`.
pub fn filter_by_period(tests: &[TestRecord], period: Period, now: DateTime<Utc>) -> Vec<TestRecord> {
    match period.months() {
        None => tests.to_vec(),
        Some(months) => {
            let cutoff = months_before(now, months);
            tests
                .iter()
                .filter(|t| t.history_date() >= cutoff)
                .cloned()
                .collect()
        }
    }
}

/// `now` moved back by whole calendar months, keeping the day of month.
///
/// A day past the end of the target month rolls over into the following
/// month, so Aug 31 minus six months is Mar 3 (Feb 31 overflowing by three).
pub fn months_before(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    let Some(clamped) = now.checked_sub_months(Months::new(months)) else {
        return DateTime::<Utc>::MIN_UTC;
    };
    let overflow = now.day().saturating_sub(clamped.day());
    clamped + Duration::days(i64::from(overflow))
}

/// English short month and year, e.g. `Oct 2026`.
pub fn month_label(date: DateTime<Utc>) -> String {
    date.format("%b %Y").to_string()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Group values by key, keeping keys in first-seen order.
fn group_in_order<'a>(items: impl Iterator<Item = (&'a str, f64)>) -> Vec<(String, Vec<f64>)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (key, value) in items {
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::model::ScoreEntry;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn plan(id: &str, status: &str) -> StudyPlanRecord {
        StudyPlanRecord {
            id: id.into(),
            topic: format!("Topic {id}"),
            subject: None,
            target_date: None,
            status: PlanStatus::from(status.to_string()),
        }
    }

    fn scored(id: &str, subject: &str, score: f64, taken: DateTime<Utc>) -> TestRecord {
        TestRecord {
            id: id.into(),
            title: format!("Test {id}"),
            subject: Some(subject.into()),
            created_at: taken,
            date_taken: Some(taken),
            scores: vec![ScoreEntry {
                score_percent: score,
                correct_answers: 0,
                total_questions: 0,
            }],
        }
    }

    fn entry(subject: &str, score: f64) -> TestHistoryEntry {
        TestHistoryEntry {
            id: format!("{subject}-{score}"),
            title: String::new(),
            subject: subject.into(),
            score,
            date: now(),
        }
    }

    #[test]
    fn unknown_statuses_count_toward_total_only() {
        let progress = study_plan_progress(&[
            plan("p1", "Completed"),
            plan("p2", "Pending"),
            plan("p3", "Archived"),
        ]);
        assert_eq!(
            progress,
            StudyPlanProgress {
                completed: 1,
                pending: 1,
                total: 3
            }
        );
        assert!((progress.completion_percent() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(StudyPlanProgress::default().completion_percent(), 0.0);
    }

    #[test]
    fn improvement_trend_compares_recent_three_to_previous_three() {
        let scores = [90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0];
        assert!((improvement_trend(&scores) - 30.0).abs() < 1e-9);

        let history: Vec<TestHistoryEntry> = scores.iter().map(|&s| entry("Math", s)).collect();
        let stats = overall_stats(&history);
        assert_eq!(stats.total_tests, 7);
        assert!((stats.improvement_trend - 30.0).abs() < 1e-9);
        assert_eq!(stats.trend_signal().map(|t| t.round()), Some(30.0));
        assert_eq!(stats.trend_direction(), TrendDirection::Up);
    }

    #[test]
    fn short_history_has_zero_trend() {
        let history: Vec<TestHistoryEntry> =
            [70.0, 20.0, 95.0].iter().map(|&s| entry("Math", s)).collect();
        let stats = overall_stats(&history);
        assert_eq!(stats.total_tests, 3);
        assert_eq!(stats.improvement_trend, 0.0);
        assert_eq!(stats.trend_signal(), None);
        assert_eq!(stats.best_score, 95.0);
    }

    #[test]
    fn per_subject_averages() {
        let history = vec![entry("Math", 80.0), entry("Math", 60.0), entry("SQL", 90.0)];
        let subjects = subject_performance(&history);
        assert_eq!(
            subjects,
            vec![
                SubjectPerformance {
                    subject: "Math".into(),
                    average_score: 70.0,
                    test_count: 2
                },
                SubjectPerformance {
                    subject: "SQL".into(),
                    average_score: 90.0,
                    test_count: 1
                },
            ]
        );
    }

    #[test]
    fn subject_labels_are_case_sensitive() {
        let history = vec![entry("Math", 80.0), entry("math", 60.0)];
        assert_eq!(subject_performance(&history).len(), 2);
    }

    #[test]
    fn empty_history_produces_neutral_snapshot() {
        let snapshot = aggregate(&[], &[], now()).unwrap();
        assert_eq!(snapshot.overall_stats, OverallStats::default());
        assert!(snapshot.test_history.is_empty());
        assert!(snapshot.subject_performance.is_empty());
        assert!(snapshot.monthly_progress.is_empty());
        assert_eq!(snapshot.study_plan_progress.total, 0);
    }

    #[test]
    fn unscored_tests_are_excluded_not_zeroed() {
        let mut unscored = scored("t2", "Math", 0.0, now());
        unscored.scores.clear();
        let tests = vec![scored("t1", "Math", 50.0, now()), unscored];

        let snapshot = aggregate(&[], &tests, now()).unwrap();
        assert_eq!(snapshot.overall_stats.total_tests, 1);
        assert_eq!(snapshot.overall_stats.average_score, 50.0);
    }

    #[test]
    fn only_first_score_of_a_test_is_used() {
        let mut retaken = scored("t1", "Math", 90.0, now());
        retaken.scores.push(ScoreEntry {
            score_percent: 10.0,
            correct_answers: 1,
            total_questions: 10,
        });
        let history = test_history(&[retaken]).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].score, 90.0);
    }

    #[test]
    fn history_falls_back_to_creation_date_and_unknown_subject() {
        let created = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let mut record = scored("t1", "Math", 70.0, created);
        record.date_taken = None;
        record.subject = None;
        let history = test_history(&[record]).unwrap();
        assert_eq!(history[0].date, created);
        assert_eq!(history[0].subject, "Unknown");
    }

    #[test]
    fn monthly_window_uses_calendar_months() {
        let boundary = Utc.with_ymd_and_hms(2026, 4, 19, 12, 0, 0).unwrap();
        let just_outside = Utc.with_ymd_and_hms(2026, 4, 19, 11, 59, 59).unwrap();
        let october = Utc.with_ymd_and_hms(2026, 10, 2, 9, 0, 0).unwrap();
        let tests = vec![
            scored("t1", "Math", 80.0, october),
            scored("t2", "Math", 60.0, october),
            scored("t3", "SQL", 40.0, boundary),
            scored("t4", "SQL", 20.0, just_outside),
        ];

        let snapshot = aggregate(&[], &tests, now()).unwrap();
        assert_eq!(
            snapshot.monthly_progress,
            vec![
                MonthlyProgress {
                    month: "Oct 2026".into(),
                    tests_completed: 2,
                    average_score: 70.0
                },
                MonthlyProgress {
                    month: "Apr 2026".into(),
                    tests_completed: 1,
                    average_score: 40.0
                },
            ]
        );
        // the window never limits the overall figures
        assert_eq!(snapshot.overall_stats.total_tests, 4);
        assert_eq!(snapshot.overall_stats.average_score, 50.0);
    }

    #[test]
    fn months_before_rolls_over_past_month_end() {
        let end_of_august = Utc.with_ymd_and_hms(2026, 8, 31, 0, 0, 0).unwrap();
        assert_eq!(
            months_before(end_of_august, 6),
            Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap()
        );
        // leap year: Feb 29 exists, so only two days overflow
        let end_of_august_2028 = Utc.with_ymd_and_hms(2028, 8, 31, 0, 0, 0).unwrap();
        assert_eq!(
            months_before(end_of_august_2028, 6),
            Utc.with_ymd_and_hms(2028, 3, 2, 0, 0, 0).unwrap()
        );
        let may_31 = Utc.with_ymd_and_hms(2026, 5, 31, 8, 0, 0).unwrap();
        assert_eq!(
            months_before(may_31, 1),
            Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(
            months_before(now(), 6),
            Utc.with_ymd_and_hms(2026, 4, 19, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn monthly_window_excludes_days_before_rolled_over_cutoff() {
        let end_of_august = Utc.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap();
        let march_1 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let march_4 = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();

        let snapshot = aggregate(&[], &[scored("t1", "Math", 70.0, march_1)], end_of_august).unwrap();
        assert!(snapshot.monthly_progress.is_empty());
        assert_eq!(snapshot.overall_stats.total_tests, 1);

        let snapshot = aggregate(&[], &[scored("t2", "Math", 70.0, march_4)], end_of_august).unwrap();
        assert_eq!(snapshot.monthly_progress.len(), 1);
        assert_eq!(snapshot.monthly_progress[0].month, "Mar 2026");

        let kept = filter_by_period(
            &[scored("t1", "Math", 70.0, march_1), scored("t2", "Math", 70.0, march_4)],
            Period::SixMonths,
            end_of_august,
        );
        let ids: Vec<&str> = kept.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2"]);
    }

    #[test]
    fn invalid_scores_are_rejected() {
        for bad in [f64::NAN, f64::INFINITY, -1.0, 100.5] {
            let err = aggregate(&[], &[scored("bad", "Math", bad, now())], now()).unwrap_err();
            assert!(matches!(
                err,
                CoreError::InvalidInput(InvalidInput::InvalidScore { ref test_id, .. }) if test_id == "bad"
            ));
        }
    }

    #[test]
    fn period_filter_limits_history() {
        let recent = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let tests = vec![
            scored("t1", "Math", 80.0, recent),
            scored("t2", "Math", 60.0, older),
        ];
        assert_eq!(filter_by_period(&tests, Period::All, now()).len(), 2);
        assert_eq!(filter_by_period(&tests, Period::ThreeMonths, now()).len(), 2);
        let last_month = filter_by_period(&tests, Period::OneMonth, now());
        assert_eq!(last_month.len(), 1);
        assert_eq!(last_month[0].id, "t1");
    }

    #[test]
    fn aggregate_is_repeatable() {
        let tests = vec![
            scored("t1", "Math", 80.0, now()),
            scored("t2", "SQL", 65.5, now()),
        ];
        let plans = vec![plan("p1", "Pending")];
        assert_eq!(
            aggregate(&plans, &tests, now()).unwrap(),
            aggregate(&plans, &tests, now()).unwrap()
        );
    }

    #[test]
    fn recent_history_is_capped() {
        let tests: Vec<TestRecord> = (0..12)
            .map(|i| scored(&format!("t{i}"), "Math", 50.0, now()))
            .collect();
        let snapshot = aggregate(&[], &tests, now()).unwrap();
        assert_eq!(snapshot.recent_history(10).len(), 10);
        assert_eq!(snapshot.recent_history(10)[0].id, "t0");
        assert_eq!(snapshot.recent_history(50).len(), 12);
        assert!(snapshot.subject("Math").is_some());
        assert!(snapshot.subject("math").is_none());
    }

    #[test]
    fn snapshot_serializes_in_camel_case() {
        let snapshot = aggregate(&[plan("p1", "Completed")], &[], now()).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"studyPlanProgress\""));
        assert!(json.contains("\"improvementTrend\""));
    }
}
