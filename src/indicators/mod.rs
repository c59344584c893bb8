//! Indicators module - Derived overlays and shading rules

mod bands;
mod sma;

pub use bands::{classify_rsi, fill_between, macd_histogram, RsiBand};
pub use sma::{sma, SmaOverlay, SmaSpec};
