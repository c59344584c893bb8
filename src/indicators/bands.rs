//! Shading Rules Module
//! Conditional fill regions for the RSI and MACD panels, expressed as
//! per-point classification plus mask-driven polygon segmentation.

/// RSI shading band. Classification is mutually exclusive: the overbought
/// and oversold bands win over the midline bands, and a reading of exactly
/// 50 falls into no band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiBand {
    /// Strictly above 70, shaded against the 70 line.
    Overbought,
    /// Strictly below 30, shaded against the 30 line.
    Oversold,
    /// Above 50 up to and including 70, shaded against the midline.
    Bullish,
    /// Below 50 down to and including 30, shaded against the midline.
    Bearish,
}

impl RsiBand {
    pub const ALL: [RsiBand; 4] = [
        RsiBand::Overbought,
        RsiBand::Oversold,
        RsiBand::Bullish,
        RsiBand::Bearish,
    ];

    /// The horizontal reference the band is filled against.
    pub fn baseline(self) -> f64 {
        match self {
            RsiBand::Overbought => 70.0,
            RsiBand::Oversold => 30.0,
            RsiBand::Bullish | RsiBand::Bearish => 50.0,
        }
    }
}

/// Classify one RSI reading. NaN readings fall into no band.
pub fn classify_rsi(value: f64) -> Option<RsiBand> {
    if value > 70.0 {
        Some(RsiBand::Overbought)
    } else if value < 30.0 {
        Some(RsiBand::Oversold)
    } else if value > 50.0 {
        Some(RsiBand::Bullish)
    } else if value < 50.0 {
        Some(RsiBand::Bearish)
    } else {
        None
    }
}

/// MACD histogram: `macd - signal`, shaded against zero by sign.
pub fn macd_histogram(macd: &[f64], signal: &[f64]) -> Vec<f64> {
    macd.iter().zip(signal).map(|(m, s)| m - s).collect()
}

/// Split the region between two curves into filled polygons, one per
/// contiguous run of `mask`. Runs shorter than two points enclose no area
/// and are dropped. Callers encode undefined positions by clearing the mask,
/// so gaps in an overlay simply break the fill.
pub fn fill_between(
    xs: &[f64],
    upper: &[f64],
    lower: &[f64],
    mask: &[bool],
) -> Vec<Vec<(f64, f64)>> {
    let n = xs.len();
    let mut polygons = Vec::new();
    let mut i = 0;

    while i < n {
        if !mask[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && mask[i] {
            i += 1;
        }
        if i - start >= 2 {
            let mut points: Vec<(f64, f64)> =
                (start..i).map(|k| (xs[k], upper[k])).collect();
            points.extend((start..i).rev().map(|k| (xs[k], lower[k])));
            polygons.push(points);
        }
    }

    polygons
}
