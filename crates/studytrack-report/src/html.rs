//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use studytrack_core::analytics::MonthlyProgress;
use studytrack_core::model::{ScoreBand, TrendDirection};
use studytrack_core::report::AnalyticsReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn band_class(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Excellent => "excellent",
        ScoreBand::Good => "good",
        ScoreBand::NeedsImprovement => "weak",
    }
}

/// Generate an HTML report, listing at most `recent_limit` history entries.
pub fn generate_html(report: &AnalyticsReport, recent_limit: usize) -> String {
    let snap = &report.snapshot;
    let stats = &snap.overall_stats;
    let plans = &snap.study_plan_progress;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>studytrack analytics: {}</title>\n",
        report.as_of.format("%Y-%m-%d")
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Analytics Dashboard</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Period: <strong>{}</strong> | as of {} | generated {}</p>\n",
        report.period,
        report.as_of.format("%Y-%m-%d %H:%M:%S UTC"),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Overview cards
    let trend_text = match stats.trend_signal() {
        Some(t) => format!("{:.1}% trend", t.abs()),
        None => "not enough tests for a trend".to_string(),
    };
    let trend_class = match stats.trend_direction() {
        TrendDirection::Up => "up",
        TrendDirection::Down => "down",
        TrendDirection::Flat => "flat",
    };
    html.push_str("<section class=\"cards\">\n");
    html.push_str(&format!(
        "<div class=\"card\"><p>Total Tests</p><p class=\"big\">{}</p><p class=\"small\">Tests completed</p></div>\n",
        stats.total_tests
    ));
    html.push_str(&format!(
        "<div class=\"card\"><p>Average Score</p><p class=\"big\">{:.1}%</p><p class=\"small trend-{}\">{}</p></div>\n",
        stats.average_score, trend_class, trend_text
    ));
    html.push_str(&format!(
        "<div class=\"card\"><p>Best Score</p><p class=\"big\">{:.1}%</p><p class=\"small\">Personal best</p></div>\n",
        stats.best_score
    ));
    html.push_str(&format!(
        "<div class=\"card\"><p>Study Progress</p><p class=\"big\">{:.0}%</p><p class=\"small\">{}/{} plans</p></div>\n",
        plans.completion_percent(),
        plans.completed,
        plans.total
    ));
    html.push_str("</section>\n");

    // Study plan progress
    html.push_str("<section class=\"plans\">\n");
    html.push_str("<h2>Study Plan Progress</h2>\n");
    html.push_str(&format!(
        "<progress max=\"100\" value=\"{:.0}\"></progress>\n",
        plans.completion_percent()
    ));
    html.push_str(&format!(
        "<p>Completed: <strong>{}</strong> | Pending: <strong>{}</strong></p>\n",
        plans.completed, plans.pending
    ));
    html.push_str("</section>\n");

    // Subject performance
    html.push_str("<section class=\"subjects\">\n");
    html.push_str("<h2>Subject Performance</h2>\n");
    if snap.subject_performance.is_empty() {
        html.push_str("<p class=\"empty\">No subject data available. Complete some tests to see subject performance.</p>\n");
    } else {
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>Subject</th><th>Average</th><th>Tests</th><th>Band</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for s in &snap.subject_performance {
            let band = ScoreBand::from_score(s.average_score);
            html.push_str(&format!(
                "<tr><td>{}</td><td>{:.1}%</td><td>{} test{}</td><td class=\"{}\">{}</td></tr>\n",
                html_escape(&s.subject),
                s.average_score,
                s.test_count,
                if s.test_count == 1 { "" } else { "s" },
                band_class(band),
                band
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Monthly trend
    html.push_str("<section class=\"monthly\">\n");
    html.push_str("<h2>Monthly Progress (last 6 months)</h2>\n");
    if snap.monthly_progress.is_empty() {
        html.push_str("<p class=\"empty\">No tests in the last 6 months.</p>\n");
    } else {
        html.push_str(&generate_bar_chart(&snap.monthly_progress));
    }
    html.push_str("</section>\n");

    // Recent history
    html.push_str("<section class=\"history\">\n");
    html.push_str("<h2>Recent Test History</h2>\n");
    let recent = snap.recent_history(recent_limit);
    if recent.is_empty() {
        html.push_str("<p class=\"empty\">No test history available. Take some mock tests to see your progress here.</p>\n");
    } else {
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>Test</th><th>Subject</th><th>Score</th><th>Date</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for t in recent {
            let band = t.band();
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td class=\"{}\">{:.1}% ({})</td><td>{}</td></tr>\n",
                html_escape(&t.title),
                html_escape(&t.subject),
                band_class(band),
                t.score,
                band,
                t.date.format("%Y-%m-%d")
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AnalyticsReport, recent_limit: usize, path: &Path) -> Result<()> {
    let html = generate_html(report, recent_limit);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(months: &[MonthlyProgress]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 120;

    let total_height = months.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 140,
        total_height
    );

    for (i, month) in months.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (month.average_score / 100.0 * max_width as f64) as usize;

        let color = match ScoreBand::from_score(month.average_score) {
            ScoreBand::Excellent => "#22c55e",
            ScoreBand::Good => "#eab308",
            ScoreBand::NeedsImprovement => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&month.month)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}% ({} test{})</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            month.average_score,
            month.tests_completed,
            if month.tests_completed == 1 { "" } else { "s" }
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #fef9c3; --excellent: #dcfce7; --weak: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #713f12; --excellent: #064e3b; --weak: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .small, .empty { color: #6b7280; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(12rem, 1fr)); gap: 1rem; }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; }
.big { font-size: 2rem; font-weight: bold; margin: 0.25rem 0; }
.trend-up { color: #16a34a; }
.trend-down { color: #dc2626; }
progress { width: 100%; height: 1rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.excellent { background: var(--excellent); }
.good { background: var(--good); }
.weak { background: var(--weak); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
