//! Chart Style Module
//! Color palette and theme for the four panels.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

pub const GREEN: [u8; 3] = [0, 128, 0];
pub const RED: [u8; 3] = [255, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
pub const ORANGE: [u8; 3] = [255, 165, 0];
pub const PURPLE: [u8; 3] = [128, 0, 128];
pub const BLACK: [u8; 3] = [0, 0, 0];
pub const GRID: [u8; 3] = [160, 160, 160];

pub fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Panel colors and fill opacities. Serializable so callers can persist a
/// custom look; `Default` reproduces the stock green/red scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Rising candles, bullish SMA cross fill, positive MACD histogram.
    pub up: [u8; 3],
    /// Falling candles, bearish SMA cross fill, negative MACD histogram.
    pub down: [u8; 3],
    pub volume: [u8; 3],
    pub rsi_line: [u8; 3],
    pub overbought: [u8; 3],
    pub oversold: [u8; 3],
    pub above_mid: [u8; 3],
    pub below_mid: [u8; 3],
    pub macd_line: [u8; 3],
    pub signal_line: [u8; 3],
    /// Start/End/Change markers and the neutral RSI line.
    pub marker: [u8; 3],
    pub candle_alpha: f64,
    pub fill_alpha: f64,
    pub volume_alpha: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            up: GREEN,
            down: RED,
            volume: BLUE,
            rsi_line: PURPLE,
            overbought: RED,
            oversold: GREEN,
            above_mid: BLUE,
            below_mid: ORANGE,
            macd_line: BLUE,
            signal_line: ORANGE,
            marker: BLACK,
            candle_alpha: 0.6,
            fill_alpha: 0.3,
            volume_alpha: 0.3,
        }
    }
}
