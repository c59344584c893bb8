//! Panel Rendering Module
//! Each panel renders one band of the shared-axis stack; the figure walks
//! them top to bottom and hands the date axis to the bottom one only.

use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::charts::figure::ChartFigure;
use crate::charts::style::{self, Theme};
use crate::indicators::{classify_rsi, fill_between, macd_histogram, RsiBand, SmaOverlay};

/// Width reserved for y-axis labels on every panel so the plots align.
const Y_LABEL_AREA: u32 = 60;
/// Height reserved for the date labels under the bottom panel.
const X_LABEL_AREA: u32 = 36;
const PANEL_MARGIN: u32 = 4;

/// One horizontal band of the figure. Weights set the 3:1:1:1 split.
pub(crate) trait Panel<DB: DrawingBackend> {
    fn weight(&self) -> u32;

    fn render(
        &self,
        area: &DrawingArea<DB, Shift>,
        fig: &ChartFigure,
        show_dates: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>;
}

fn date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn x_area(show_dates: bool) -> u32 {
    if show_dates {
        X_LABEL_AREA
    } else {
        0
    }
}

fn band_color(theme: &Theme, band: RsiBand) -> [u8; 3] {
    match band {
        RsiBand::Overbought => theme.overbought,
        RsiBand::Oversold => theme.oversold,
        RsiBand::Bullish => theme.above_mid,
        RsiBand::Bearish => theme.below_mid,
    }
}

/// Overlay values with undefined positions as NaN, for mask building.
fn overlay_curve(overlay: &SmaOverlay) -> Vec<f64> {
    overlay
        .values
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect()
}

pub(crate) struct PricePanel;

impl<DB: DrawingBackend> Panel<DB> for PricePanel {
    fn weight(&self) -> u32 {
        3
    }

    fn render(
        &self,
        area: &DrawingArea<DB, Shift>,
        fig: &ChartFigure,
        show_dates: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let s = &fig.series;
        let theme = &fig.theme;
        let n = s.len();
        let (y_min, y_max) = fig.price_range();

        let mut chart = ChartBuilder::on(area)
            .caption(&fig.symbol, ("sans-serif", 22).into_font())
            .margin(PANEL_MARGIN)
            .x_label_area_size(x_area(show_dates))
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(fig.x_range(), y_min..y_max)?;

        let fmt = |x: &f64| date_label(*x);
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&style::rgb(style::GRID).mix(0.15))
            .bold_line_style(&style::rgb(style::GRID).mix(0.4))
            .y_desc("Price")
            .y_labels(6);
        if show_dates {
            mesh.x_labels(8).x_label_formatter(&fmt);
        } else {
            mesh.x_labels(0);
        }
        mesh.draw()?;

        // Cross fill between the first two overlays, under everything else.
        if fig.overlays.len() >= 2 {
            let short = overlay_curve(&fig.overlays[0]);
            let long = overlay_curve(&fig.overlays[1]);
            let rules = [
                (theme.up, short.iter().zip(&long).map(|(a, b)| a > b).collect::<Vec<_>>()),
                (theme.down, short.iter().zip(&long).map(|(a, b)| a < b).collect::<Vec<_>>()),
            ];
            for (color, mask) in rules {
                for points in fill_between(&s.x, &short, &long, &mask) {
                    chart.draw_series(std::iter::once(Polygon::new(
                        points,
                        style::rgb(color).mix(theme.fill_alpha).filled(),
                    )))?;
                }
            }
        }

        // Candlesticks: body open->close, wick low->high.
        let (plot_w, _) = chart.plotting_area().dim_in_pixel();
        let candle_width = ((plot_w as f64 / n as f64) * 0.6).clamp(1.0, 20.0) as u32;
        chart.draw_series((0..n).map(|i| {
            CandleStick::new(
                s.x[i],
                s.open[i],
                s.high[i],
                s.low[i],
                s.close[i],
                style::rgb(theme.up).mix(theme.candle_alpha).filled(),
                style::rgb(theme.down).mix(theme.candle_alpha).filled(),
                candle_width,
            )
        }))?;

        for overlay in &fig.overlays {
            let color = style::rgb(overlay.spec.color);
            chart
                .draw_series(LineSeries::new(
                    s.x.iter()
                        .zip(&overlay.values)
                        .filter_map(|(&x, v)| v.map(|v| (x, v))),
                    color.stroke_width(2),
                ))?
                .label(&overlay.spec.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                });
        }

        // Start/End markers and the net change annotation.
        let (x0, x1) = (s.x[0], s.x[n - 1]);
        let (c0, c1) = (s.close[0], s.close[n - 1]);
        let marker = style::rgb(theme.marker);
        for level in [c0, c1] {
            chart.draw_series(DashedLineSeries::new(
                vec![(x0 - 1.0, level), (x1 + 1.0, level)],
                6,
                4,
                marker.mix(0.5).stroke_width(1),
            ))?;
        }
        let left = ("sans-serif", 13).into_font().color(&marker);
        let right = left.pos(Pos::new(HPos::Right, VPos::Center));
        chart.draw_series(std::iter::once(Text::new(
            format!("Start: {:.2}", c0),
            (x0, c0),
            left.clone(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("End: {:.2}", c1),
            (x1, c1),
            right.clone(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("Change: {:.2}", fig.change()),
            (x1, c1 * 1.02),
            right,
        )))?;

        if !fig.overlays.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.85))
                .border_style(&style::rgb(style::GRID))
                .draw()?;
        }

        Ok(())
    }
}

pub(crate) struct VolumePanel;

impl<DB: DrawingBackend> Panel<DB> for VolumePanel {
    fn weight(&self) -> u32 {
        1
    }

    fn render(
        &self,
        area: &DrawingArea<DB, Shift>,
        fig: &ChartFigure,
        show_dates: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let s = &fig.series;
        let theme = &fig.theme;

        let max_volume = s
            .volume
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let y_max = if max_volume > 0.0 { max_volume * 1.05 } else { 1.0 };

        let mut chart = ChartBuilder::on(area)
            .margin(PANEL_MARGIN)
            .x_label_area_size(x_area(show_dates))
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(fig.x_range(), 0.0..y_max)?;

        let fmt = |x: &f64| date_label(*x);
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&style::rgb(style::GRID).mix(0.15))
            .bold_line_style(&style::rgb(style::GRID).mix(0.4))
            .y_desc("Volume")
            .y_labels(4);
        if show_dates {
            mesh.x_labels(8).x_label_formatter(&fmt);
        } else {
            mesh.x_labels(0);
        }
        mesh.draw()?;

        chart.draw_series(
            (0..s.len())
                .filter(|&i| s.volume[i].is_finite())
                .map(|i| {
                    Rectangle::new(
                        [(s.x[i] - 0.5, 0.0), (s.x[i] + 0.5, s.volume[i])],
                        style::rgb(theme.volume).mix(theme.volume_alpha).filled(),
                    )
                }),
        )?;

        Ok(())
    }
}

pub(crate) struct RsiPanel;

impl<DB: DrawingBackend> Panel<DB> for RsiPanel {
    fn weight(&self) -> u32 {
        1
    }

    fn render(
        &self,
        area: &DrawingArea<DB, Shift>,
        fig: &ChartFigure,
        show_dates: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let s = &fig.series;
        let theme = &fig.theme;
        let n = s.len();

        let mut chart = ChartBuilder::on(area)
            .margin(PANEL_MARGIN)
            .x_label_area_size(x_area(show_dates))
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(fig.x_range(), 0.0..100.0)?;

        let fmt = |x: &f64| date_label(*x);
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&style::rgb(style::GRID).mix(0.15))
            .bold_line_style(&style::rgb(style::GRID).mix(0.4))
            .y_desc("RSI")
            .y_labels(4);
        if show_dates {
            mesh.x_labels(8).x_label_formatter(&fmt);
        } else {
            mesh.x_labels(0);
        }
        mesh.draw()?;

        // Shaded bands first so the curve and thresholds stay visible.
        for band in RsiBand::ALL {
            let mask: Vec<bool> = s.rsi.iter().map(|&v| classify_rsi(v) == Some(band)).collect();
            let baseline = vec![band.baseline(); n];
            for points in fill_between(&s.x, &s.rsi, &baseline, &mask) {
                chart.draw_series(std::iter::once(Polygon::new(
                    points,
                    style::rgb(band_color(theme, band))
                        .mix(theme.fill_alpha)
                        .filled(),
                )))?;
            }
        }

        let (x0, x1) = (fig.x_range().start, fig.x_range().end);
        let thresholds = [
            (70.0, theme.overbought, "Overbought"),
            (50.0, theme.marker, "Neutral"),
            (30.0, theme.oversold, "Oversold"),
        ];
        for (level, color, name) in thresholds {
            let color = style::rgb(color);
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x0, level), (x1, level)],
                    6,
                    4,
                    color.mix(0.6).stroke_width(1),
                ))?
                .label(name)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(1))
                });
        }

        let rsi_color = style::rgb(theme.rsi_line);
        chart
            .draw_series(LineSeries::new(
                s.x.iter().zip(&s.rsi).map(|(&x, &v)| (x, v)),
                rsi_color.stroke_width(2),
            ))?
            .label("RSI")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], rsi_color.stroke_width(2))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .border_style(&style::rgb(style::GRID))
            .draw()?;

        Ok(())
    }
}

pub(crate) struct MacdPanel;

impl<DB: DrawingBackend> Panel<DB> for MacdPanel {
    fn weight(&self) -> u32 {
        1
    }

    fn render(
        &self,
        area: &DrawingArea<DB, Shift>,
        fig: &ChartFigure,
        show_dates: bool,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let s = &fig.series;
        let theme = &fig.theme;
        let n = s.len();
        let hist = macd_histogram(&s.macd, &s.signal);

        let mut lo = 0.0_f64;
        let mut hi = 0.0_f64;
        for v in s.macd.iter().chain(&s.signal).chain(&hist) {
            if v.is_finite() {
                lo = lo.min(*v);
                hi = hi.max(*v);
            }
        }
        let pad = ((hi - lo) * 0.08).max(1e-3);
        let (y_min, y_max) = (lo - pad, hi + pad);

        let mut chart = ChartBuilder::on(area)
            .margin(PANEL_MARGIN)
            .x_label_area_size(x_area(show_dates))
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(fig.x_range(), y_min..y_max)?;

        let fmt = |x: &f64| date_label(*x);
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&style::rgb(style::GRID).mix(0.15))
            .bold_line_style(&style::rgb(style::GRID).mix(0.4))
            .y_desc("MACD")
            .y_labels(4);
        if show_dates {
            mesh.x_labels(8).x_label_formatter(&fmt);
        } else {
            mesh.x_labels(0);
        }
        mesh.draw()?;

        // Histogram shading against zero, by sign.
        let zero = vec![0.0; n];
        let rules = [
            (theme.up, hist.iter().map(|&v| v > 0.0).collect::<Vec<_>>()),
            (theme.down, hist.iter().map(|&v| v < 0.0).collect::<Vec<_>>()),
        ];
        for (color, mask) in rules {
            for points in fill_between(&s.x, &hist, &zero, &mask) {
                chart.draw_series(std::iter::once(Polygon::new(
                    points,
                    style::rgb(color).mix(theme.fill_alpha).filled(),
                )))?;
            }
        }

        let lines = [
            (&s.macd, theme.macd_line, "MACD"),
            (&s.signal, theme.signal_line, "Signal"),
        ];
        for (values, color, name) in lines {
            let color = style::rgb(color);
            chart
                .draw_series(LineSeries::new(
                    s.x.iter().zip(values.iter()).map(|(&x, &v)| (x, v)),
                    color.stroke_width(2),
                ))?
                .label(name)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .border_style(&style::rgb(style::GRID))
            .draw()?;

        Ok(())
    }
}
