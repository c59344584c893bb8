//! Simple Moving Average Module
//! Trailing-window means over the close column for the price panel overlays.

use serde::{Deserialize, Serialize};

/// Overlay line specification: window size, legend label and line color.
///
/// The stock pair is 20/50 (see [`SmaSpec::short_long_defaults`]); callers
/// can supply their own list to generalize the price-panel overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmaSpec {
    pub window: usize,
    pub label: String,
    pub color: [u8; 3],
}

impl SmaSpec {
    pub fn new(window: usize, color: [u8; 3]) -> Self {
        Self {
            window,
            label: format!("{window}-day SMA"),
            color,
        }
    }

    /// The default overlay pair: 20-day (blue) and 50-day (orange).
    pub fn short_long_defaults() -> Vec<SmaSpec> {
        vec![
            SmaSpec::new(20, crate::charts::style::BLUE),
            SmaSpec::new(50, crate::charts::style::ORANGE),
        ]
    }
}

/// A computed overlay: the line specification plus one value per input row.
#[derive(Debug, Clone)]
pub struct SmaOverlay {
    pub spec: SmaSpec,
    /// Same length as the input; `None` where fewer than `window` samples
    /// exist yet. Rendering skips undefined positions entirely.
    pub values: Vec<Option<f64>>,
}

impl SmaOverlay {
    pub fn compute(spec: SmaSpec, values: &[f64]) -> Self {
        let values = sma(values, spec.window);
        Self { spec, values }
    }
}

/// Trailing simple moving average. Position `i` is the mean of
/// `values[i + 1 - window ..= i]`; positions with insufficient history are
/// `None`. A zero window yields all `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_prefix_then_window_means() {
        let values: Vec<f64> = (1..=6).map(|v| v as f64).collect();
        let out = sma(&values, 3);
        assert_eq!(out.len(), 6);
        assert_eq!(&out[..2], &[None, None]);
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[3], Some(3.0));
        assert_eq!(out[5], Some(5.0));
    }

    #[test]
    fn window_of_one_is_identity() {
        let values = [4.0, 2.0, 8.0];
        assert_eq!(
            sma(&values, 1),
            vec![Some(4.0), Some(2.0), Some(8.0)]
        );
    }

    #[test]
    fn window_longer_than_input_is_all_undefined() {
        assert_eq!(sma(&[1.0, 2.0], 5), vec![None, None]);
        assert_eq!(sma(&[], 5), Vec::<Option<f64>>::new());
    }

    #[test]
    fn matches_naive_mean_on_long_input() {
        let values: Vec<f64> = (0..200).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let out = sma(&values, 20);
        for (i, v) in out.iter().enumerate() {
            if i < 19 {
                assert!(v.is_none());
            } else {
                let expected: f64 = values[i + 1 - 20..=i].iter().sum::<f64>() / 20.0;
                assert!((v.unwrap() - expected).abs() < 1e-9);
            }
        }
    }
}
