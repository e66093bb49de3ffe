//! Summary statistics over per-episode returns

use serde::{Deserialize, Serialize};

/// Statistics for a sequence of episode returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ReturnStats {
    /// Compute statistics; an empty slice yields all zeros
    pub fn from_returns(returns: &[f64]) -> Self {
        if returns.is_empty() {
            return Self::default();
        }

        let sum: f64 = returns.iter().sum();
        let min = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            count: returns.len(),
            mean: sum / returns.len() as f64,
            min,
            max,
        }
    }
}

/// Trailing moving average with a window of at most `window` episodes
///
/// Element `i` averages `returns[i + 1 - w..=i]` where `w = min(window, i + 1)`.
pub fn moving_average(returns: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut averages = Vec::with_capacity(returns.len());
    let mut running = 0.0;

    for (i, &value) in returns.iter().enumerate() {
        running += value;
        if i >= window {
            running -= returns[i - window];
        }
        let len = (i + 1).min(window);
        averages.push(running / len as f64);
    }

    averages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_returns() {
        let stats = ReturnStats::from_returns(&[-101.0, 97.0, 98.0, -2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 23.0);
        assert_eq!(stats.min, -101.0);
        assert_eq!(stats.max, 98.0);
    }

    #[test]
    fn test_empty_returns() {
        assert_eq!(ReturnStats::from_returns(&[]), ReturnStats::default());
        assert!(moving_average(&[], 5).is_empty());
    }

    #[test]
    fn test_moving_average_warms_up() {
        let averages = moving_average(&[2.0, 4.0, 6.0, 8.0], 2);
        assert_eq!(averages, vec![2.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_moving_average_zero_window_is_identity() {
        assert_eq!(moving_average(&[1.0, -1.0], 0), vec![1.0, -1.0]);
    }
}
