//! Candleboard - Multi-Panel Stock Chart Composer
//!
//! Turns a pre-computed OHLCV + indicator table (a polars [`DataFrame`] with
//! `date`, `open`, `high`, `low`, `close`, `volume`, `rsi`, `macd` and
//! `signal` columns, case-insensitive) into a renderable four-panel figure:
//! candlesticks with SMA overlays, volume bars, RSI bands and MACD.
//!
//! The crate only composes; drawing happens on a caller-supplied plotters
//! backend, so display and export stay with the caller.
//!
//! ```no_run
//! use plotters::prelude::*;
//! use polars::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = df!(
//!     "date" => ["2024-01-02", "2024-01-03", "2024-01-04"],
//!     "open" => [101.0, 102.5, 101.8],
//!     "high" => [103.0, 103.1, 102.9],
//!     "low" => [100.2, 101.4, 100.9],
//!     "close" => [102.5, 101.8, 102.2],
//!     "volume" => [15_000.0, 17_200.0, 14_800.0],
//!     "rsi" => [55.0, 48.0, 52.0],
//!     "macd" => [0.4, 0.1, 0.2],
//!     "signal" => [0.3, 0.2, 0.2],
//! )?;
//!
//! let figure = candleboard::compose(&table, "ACME")?;
//! let root = BitMapBackend::new("acme.png", (1440, 720)).into_drawing_area();
//! figure.draw(&root)?;
//! root.present()?;
//! # Ok(())
//! # }
//! ```

pub mod charts;
pub mod data;
pub mod indicators;

pub use charts::{compose, ChartComposer, ChartFigure, Theme};
pub use data::{InputError, PriceSeries};
pub use indicators::{SmaOverlay, SmaSpec};
