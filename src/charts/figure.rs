//! Chart Figure Module
//! Composes the normalized series and overlays into a drawable figure.

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::ops::Range;

use crate::charts::panels::{MacdPanel, Panel, PricePanel, RsiPanel, VolumePanel};
use crate::charts::style::Theme;
use crate::data::{InputError, PriceSeries};
use crate::indicators::{SmaOverlay, SmaSpec};

/// Builds [`ChartFigure`] values from input tables.
///
/// Carries the overlay specifications and theme; `Default` gives the stock
/// 20/50-day SMA pair with the green/red scheme.
#[derive(Debug, Clone)]
pub struct ChartComposer {
    overlays: Vec<SmaSpec>,
    theme: Theme,
}

impl Default for ChartComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartComposer {
    pub fn new() -> Self {
        Self {
            overlays: SmaSpec::short_long_defaults(),
            theme: Theme::default(),
        }
    }

    /// Replace the overlay lines. When at least two are given, the region
    /// between the first two is shaded by which one is on top.
    pub fn with_overlays(mut self, overlays: Vec<SmaSpec>) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Compose a figure from a price/indicator table.
    ///
    /// Validates the input eagerly (required columns, non-empty, parseable
    /// unique dates) and computes the SMA overlays; no rendering happens
    /// here. A one-row table composes fine: every overlay value is `None`
    /// and the Start/End markers coincide.
    pub fn compose(&self, table: &DataFrame, symbol: &str) -> Result<ChartFigure, InputError> {
        let series = PriceSeries::from_frame(table)?;
        let overlays: Vec<SmaOverlay> = self
            .overlays
            .iter()
            .map(|spec| SmaOverlay::compute(spec.clone(), &series.close))
            .collect();

        log::debug!(
            "composed figure for {symbol}: {} rows, {} overlay(s)",
            series.len(),
            overlays.len()
        );

        Ok(ChartFigure {
            symbol: symbol.to_string(),
            series,
            overlays,
            theme: self.theme.clone(),
        })
    }
}

/// Compose with the default 20/50-day overlays and theme.
pub fn compose(table: &DataFrame, symbol: &str) -> Result<ChartFigure, InputError> {
    ChartComposer::new().compose(table, symbol)
}

/// A fully composed four-panel figure: price + SMA overlays, volume, RSI
/// and MACD, stacked 3:1:1:1 over a shared date axis.
///
/// The figure owns its data; [`ChartFigure::draw`] renders onto any
/// caller-supplied backend and never presents or writes anything itself.
#[derive(Debug, Clone)]
pub struct ChartFigure {
    pub(crate) symbol: String,
    pub(crate) series: PriceSeries,
    pub(crate) overlays: Vec<SmaOverlay>,
    pub(crate) theme: Theme,
}

impl ChartFigure {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn overlays(&self) -> &[SmaOverlay] {
        &self.overlays
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Price panel vertical extent: 5% margin below the lowest low and
    /// above the highest high. NaN prices are skipped.
    pub fn price_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (&lo, &hi) in self.series.low.iter().zip(&self.series.high) {
            if lo.is_finite() {
                min = min.min(lo);
            }
            if hi.is_finite() {
                max = max.max(hi);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        (min * 0.95, max * 1.05)
    }

    /// Net close-to-close move over the whole series.
    pub fn change(&self) -> f64 {
        let close = &self.series.close;
        close[close.len() - 1] - close[0]
    }

    /// Shared x extent, padded half a candle slot on either side.
    pub fn x_range(&self) -> Range<f64> {
        let first = self.series.x[0];
        let last = self.series.x[self.series.len() - 1];
        first - 1.0..last + 1.0
    }

    /// Render all panels onto `root`. Presenting (and any export) is the
    /// caller's responsibility.
    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let panels: Vec<Box<dyn Panel<DB>>> = vec![
            Box::new(PricePanel),
            Box::new(VolumePanel),
            Box::new(RsiPanel),
            Box::new(MacdPanel),
        ];
        let total: u32 = panels.iter().map(|p| p.weight()).sum();
        let (_, height) = root.dim_in_pixel();

        let mut rest = root.clone();
        let last = panels.len() - 1;
        for (i, panel) in panels.iter().enumerate() {
            if i == last {
                panel.render(&rest, self, true)?;
            } else {
                let slot = height * panel.weight() / total;
                let (top, below) = rest.split_vertically(slot);
                panel.render(&top, self, false)?;
                rest = below;
            }
        }

        Ok(())
    }
}
