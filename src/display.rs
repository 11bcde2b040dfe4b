//! Terminal rendering of snapshots, reports and series.

use analytics::{AnalyticsError, HistogramBin, HistoryPoint, RecentPoint, StatisticsReport, Trend};
use chrono::Local;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use core_types::SessionState;
use engine::{DashboardSink, DashboardSnapshot, Recorded};
use risk::RiskLevel;

/// Width, in characters, of the longest bar in the text charts.
const BAR_WIDTH: usize = 40;

/// Minimum number of rounds the profit trend view needs.
const MIN_PROFIT_POINTS: usize = 2;

/// Minimum number of rounds the points chart needs.
const MIN_HISTORY_POINTS: usize = 2;

/// Minimum number of rounds the distribution view needs.
const MIN_DISTRIBUTION_POINTS: usize = 5;

/// How many rounds the points chart shows by default.
pub const HISTORY_WINDOW: usize = 50;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn signed(value: f64) -> String {
    format!("{value:+.2}")
}

fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    }
}

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::First => "·",
        Trend::Up => "▲",
        Trend::Down => "▼",
        Trend::Flat => "=",
    }
}

/// A bar proportional to `value / max`, at most `width` characters long.
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let length = ((value / max) * width as f64).round() as usize;
    "█".repeat(length.clamp(1, width))
}

pub fn print_recorded(recorded: &Recorded) {
    if recorded.outcome.result().is_win() {
        println!(
            "Point added: {} (round {}) | Profit: {}",
            recorded.outcome,
            recorded.round,
            signed(recorded.profit)
        );
    } else {
        println!(
            "Point added: {} (round {}) | Complete loss: {}",
            recorded.outcome,
            recorded.round,
            signed(recorded.profit)
        );
    }
}

/// The summary cards, the live prediction block and the recent points.
pub fn print_dashboard(snapshot: &DashboardSnapshot, min_points: usize) {
    let report = &snapshot.report;
    println!(
        "Crash Analyzer dashboard, updated {}",
        snapshot.taken_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );

    let mut cards = new_table();
    cards.set_header(vec![
        "Total Points",
        "Profit",
        "Win Rate",
        "Highest",
        "Lowest",
        "Volatility",
    ]);
    cards.add_row(vec![
        Cell::new(report.total_points),
        Cell::new(format!("{:.2}", report.profit)).fg(if report.profit >= 0.0 {
            Color::Green
        } else {
            Color::Red
        }),
        Cell::new(format!("{:.1}%", report.win_rate_pct)),
        Cell::new(format!("{:.2}x", report.max)),
        Cell::new(format!("{:.2}x", report.min)),
        Cell::new(format!("{:.3}", report.volatility)),
    ]);
    println!("{cards}");

    print_prediction(snapshot, min_points);
    print_recent(&report.recent);
}

/// The live prediction block: prediction, bet signal and risk.
pub fn print_prediction(snapshot: &DashboardSnapshot, min_points: usize) {
    let report = &snapshot.report;
    if report.prediction.is_none() {
        println!("Add at least {min_points} points for prediction...");
        return;
    }

    let risk = &snapshot.risk;
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Next round").add_attribute(Attribute::Bold),
        Cell::new(report.prediction_label()),
    ]);
    if let Some(signal) = report.signal {
        table.add_row(vec![Cell::new("Signal"), Cell::new(signal)]);
    }
    table.add_row(vec![
        Cell::new("Risk level"),
        Cell::new(risk.level).fg(risk_color(risk.level)),
    ]);
    table.add_row(vec![
        Cell::new("Volatility"),
        Cell::new(format!("{:.3}", risk.volatility)),
    ]);
    table.add_row(vec![
        Cell::new("Recommendation"),
        Cell::new(risk.recommendation),
    ]);
    println!("{table}");
}

/// The full statistical analysis report.
pub fn print_statistics(report: &StatisticsReport, min_points: usize) {
    if report.total_points < min_points {
        println!("Add at least {min_points} points for analysis");
        return;
    }

    let optional = |value: Option<f64>| match value {
        Some(v) => format!("{v:.3}"),
        None => "N/A".to_string(),
    };

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Basic Statistics", None),
        ("Total Points", Some(report.total_points.to_string())),
        ("Mean", Some(format!("{:.3}x", report.mean))),
        ("Median", Some(format!("{:.3}x", report.median))),
        ("Standard Deviation", Some(format!("{:.3}", report.volatility))),
        ("Variance", Some(format!("{:.3}", report.variance))),
        ("Range", Some(format!("{:.3}", report.range))),
        ("Performance Metrics", None),
        ("Win Rate", Some(format!("{:.1}%", report.win_rate_pct))),
        ("Profit per Round", Some(optional(report.profit_per_round))),
        ("Risk/Reward Ratio", Some(optional(report.risk_reward_ratio))),
        ("Distribution Analysis", None),
        ("Skewness", Some(format!("{:.3}", report.skewness))),
        ("Kurtosis", Some(format!("{:.3}", report.kurtosis))),
        ("Volatility Index", Some(format!("{:.3}", report.volatility))),
    ];
    for (label, value) in rows {
        match value {
            Some(value) => table.add_row(vec![Cell::new(label), Cell::new(value)]),
            None => table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(""),
            ]),
        };
    }
    println!("{table}");
}

pub fn print_recent(points: &[RecentPoint]) {
    if points.is_empty() {
        println!("No data added yet...");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["", "Round", "Point", "Profit"]);
    for point in points {
        table.add_row(vec![
            Cell::new(trend_marker(point.trend)),
            Cell::new(point.round),
            Cell::new(format!("{:.2}x", point.value)),
            Cell::new(signed(point.profit)).fg(if point.profit >= 0.0 {
                Color::Green
            } else {
                Color::Red
            }),
        ]);
    }
    println!("{table}");
}

/// Cumulative profit per round, with a bar for its magnitude.
fn print_profit_curve(curve: &[f64]) {
    let peak = curve.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    let mut table = new_table();
    table.set_header(vec!["Round", "Cumulative Profit", ""]);
    for (index, cumulative) in curve.iter().enumerate() {
        let color = if *cumulative >= 0.0 {
            Color::Green
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(signed(*cumulative)),
            Cell::new(bar(cumulative.abs(), peak, BAR_WIDTH)).fg(color),
        ]);
    }
    println!("{table}");
}

fn print_distribution(bins: &[HistogramBin]) {
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

    let mut table = new_table();
    table.set_header(vec!["Crash Point (x)", "Frequency", ""]);
    for bin in bins {
        table.add_row(vec![
            Cell::new(format!("{:.2} - {:.2}", bin.lower, bin.upper)),
            Cell::new(bin.count),
            Cell::new(bar(bin.count as f64, peak, BAR_WIDTH)).fg(Color::Cyan),
        ]);
    }
    println!("{table}");
}

/// The message shown instead of a view when the session is too short for it.
fn missing_points(state: &SessionState, min_points: usize, view: &str) -> Option<String> {
    (state.len() < min_points).then(|| format!("Add at least {min_points} points for {view}"))
}

/// The profit trend view, or a request for more data.
pub fn show_profit(state: &SessionState, stake: f64) {
    match missing_points(state, MIN_PROFIT_POINTS, "profit analysis") {
        Some(message) => println!("{message}"),
        None => print_profit_curve(&analytics::profit_curve(&state.history, stake)),
    }
}

/// The points chart over the last `count` rounds, or a request for more data.
pub fn show_history(state: &SessionState, count: usize) {
    match missing_points(state, MIN_HISTORY_POINTS, "the points chart") {
        Some(message) => println!("{message}"),
        None => print_history(&analytics::history_points(&state.history, count)),
    }
}

/// The distribution view, or a request for more data.
pub fn show_distribution(state: &SessionState, bins: usize) -> Result<(), AnalyticsError> {
    match missing_points(state, MIN_DISTRIBUTION_POINTS, "distribution") {
        Some(message) => println!("{message}"),
        None => print_distribution(&analytics::histogram(&state.values(), bins)?),
    }
    Ok(())
}

/// Crash point per round, with a bar for its size.
fn print_history(points: &[HistoryPoint]) {
    let peak = points.iter().fold(0.0_f64, |acc, p| acc.max(p.value));

    let mut table = new_table();
    table.set_header(vec!["Round", "Crash Point", ""]);
    for point in points {
        let color = if point.value > 1.0 {
            Color::Green
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(point.round),
            Cell::new(format!("{:.2}x", point.value)),
            Cell::new(bar(point.value, peak, BAR_WIDTH)).fg(color),
        ]);
    }
    println!("{table}");
}

/// Redraws the whole dashboard on every refresh.
pub struct TerminalSink {
    min_points: usize,
}

impl TerminalSink {
    pub fn new(min_points: usize) -> Self {
        Self { min_points }
    }
}

impl DashboardSink for TerminalSink {
    fn render(&mut self, snapshot: &DashboardSnapshot) {
        // Clear the screen and move the cursor home before redrawing.
        print!("\x1B[2J\x1B[H");
        print_dashboard(snapshot, self.min_points);
        println!("Enter a crash point, or: stats | profit | history | save | clear | quit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(10.0, 10.0, 4), "████");
        assert_eq!(bar(5.0, 10.0, 4), "██");
        // Small non-zero values stay visible.
        assert_eq!(bar(0.01, 10.0, 4), "█");
        assert_eq!(bar(0.0, 10.0, 4), "");
        assert_eq!(bar(3.0, 0.0, 4), "");
    }

    #[test]
    fn test_views_require_enough_points() {
        let mut state = SessionState::default();
        state.record(core_types::Outcome::new(2.0).unwrap(), 10.0);

        assert_eq!(
            missing_points(&state, MIN_PROFIT_POINTS, "profit analysis").as_deref(),
            Some("Add at least 2 points for profit analysis")
        );
        state.record(core_types::Outcome::new(0.5).unwrap(), 10.0);
        assert_eq!(missing_points(&state, MIN_PROFIT_POINTS, "profit analysis"), None);
        assert!(missing_points(&state, MIN_DISTRIBUTION_POINTS, "distribution").is_some());
    }

    #[test]
    fn test_distribution_rejects_oversized_bins() {
        let mut state = SessionState::default();
        for value in [1.0, 2.0, 3.0, 4.0, 5.0] {
            state.record(core_types::Outcome::new(value).unwrap(), 10.0);
        }
        assert!(matches!(
            show_distribution(&state, usize::MAX),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_signed_formatting() {
        assert_eq!(signed(15.0), "+15.00");
        assert_eq!(signed(-10.0), "-10.00");
    }
}
