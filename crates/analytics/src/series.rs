use core_types::Outcome;
use serde::{Deserialize, Serialize};

/// Direction of a round relative to the round before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// The very first round of the history has nothing to compare against.
    First,
    Up,
    Down,
    Flat,
}

/// A single row of the "recently added" view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPoint {
    /// 1-based position of the round in the full history.
    pub round: usize,
    pub value: f64,
    pub profit: f64,
    pub trend: Trend,
}

/// One bar of the points chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// 1-based position of the round in the full history.
    pub round: usize,
    pub value: f64,
}

/// The last `count` rounds in chronological order.
pub fn history_points(history: &[Outcome], count: usize) -> Vec<HistoryPoint> {
    let start = history.len().saturating_sub(count);
    history[start..]
        .iter()
        .enumerate()
        .map(|(offset, outcome)| HistoryPoint {
            round: start + offset + 1,
            value: outcome.value(),
        })
        .collect()
}

/// Cumulative fixed-stake profit after each round, in chronological order.
pub fn profit_curve(history: &[Outcome], stake: f64) -> Vec<f64> {
    history
        .iter()
        .scan(0.0, |cumulative, outcome| {
            *cumulative += outcome.profit(stake);
            Some(*cumulative)
        })
        .collect()
}

/// The last `count` rounds, newest first.
pub fn recent_points(history: &[Outcome], count: usize, stake: f64) -> Vec<RecentPoint> {
    let start = history.len().saturating_sub(count);
    (start..history.len())
        .rev()
        .map(|index| {
            let outcome = history[index];
            let trend = match index.checked_sub(1).map(|prev| history[prev].value()) {
                None => Trend::First,
                Some(previous) if outcome.value() > previous => Trend::Up,
                Some(previous) if outcome.value() < previous => Trend::Down,
                Some(_) => Trend::Flat,
            };
            RecentPoint {
                round: index + 1,
                value: outcome.value(),
                profit: outcome.profit(stake),
                trend,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(values: &[f64]) -> Vec<Outcome> {
        values.iter().map(|v| Outcome::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_profit_curve_accumulates() {
        let history = outcomes(&[2.0, 0.5, 3.0]);
        assert_eq!(profit_curve(&history, 10.0), vec![10.0, 0.0, 20.0]);
        assert!(profit_curve(&[], 10.0).is_empty());
    }

    #[test]
    fn test_history_points_keep_round_numbers() {
        let history = outcomes(&[1.1, 2.2, 3.3, 4.4]);

        let window = history_points(&history, 2);
        assert_eq!(
            window,
            vec![
                HistoryPoint { round: 3, value: 3.3 },
                HistoryPoint { round: 4, value: 4.4 },
            ]
        );
        assert_eq!(history_points(&history, 50).len(), 4);
        assert_eq!(history_points(&history, 50)[0].round, 1);
        assert!(history_points(&[], 50).is_empty());
    }

    #[test]
    fn test_recent_points_newest_first() {
        let history = outcomes(&[1.5, 2.5, 2.5, 0.9]);
        let recent = recent_points(&history, 3, 10.0);

        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].round, 4);
        assert_eq!(recent[0].trend, Trend::Down);
        assert_eq!(recent[0].profit, -10.0);
        assert_eq!(recent[1].round, 3);
        assert_eq!(recent[1].trend, Trend::Flat);
        assert_eq!(recent[2].round, 2);
        assert_eq!(recent[2].trend, Trend::Up);
        assert_eq!(recent[2].profit, 15.0);
    }

    #[test]
    fn test_recent_points_short_history() {
        let history = outcomes(&[1.2]);
        let recent = recent_points(&history, 10, 10.0);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].trend, Trend::First);
        assert!(recent_points(&[], 10, 10.0).is_empty());
    }
}
