//! End-to-end composition tests: normalization, derived overlays, the
//! figure's numeric facts, and a bitmap smoke render.

use anyhow::Result;
use candleboard::{compose, ChartComposer, InputError, SmaSpec};
use chrono::NaiveDate;
use plotters::prelude::*;
use polars::prelude::*;

/// Deterministic n-row table with mixed-case column names. RSI sweeps
/// through all four shading bands; MACD crosses its signal line.
fn sample_frame(n: usize) -> DataFrame {
    let mut dates = Vec::with_capacity(n);
    let mut open = Vec::with_capacity(n);
    let mut high = Vec::with_capacity(n);
    let mut low = Vec::with_capacity(n);
    let mut close = Vec::with_capacity(n);
    let mut volume = Vec::with_capacity(n);
    let mut rsi = Vec::with_capacity(n);
    let mut macd = Vec::with_capacity(n);
    let mut signal = Vec::with_capacity(n);

    let mut day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    for i in 0..n {
        let t = i as f64;
        let c = 100.0 + t * 0.3 + (t * 0.7).sin() * 2.0;
        dates.push(day.format("%Y-%m-%d").to_string());
        open.push(c - 0.5);
        high.push(c + 1.2);
        low.push(c - 1.4);
        close.push(c);
        volume.push(10_000.0 + t * 25.0);
        rsi.push(50.0 + 35.0 * (t * 0.25).sin());
        macd.push((t * 0.2).sin());
        signal.push((t * 0.2 - 0.5).sin() * 0.8);
        day = day.succ_opt().unwrap();
    }

    df!(
        "Date" => dates,
        "Open" => open,
        "High" => high,
        "Low" => low,
        "Close" => close,
        "Volume" => volume,
        "RSI" => rsi,
        "MACD" => macd,
        "Signal" => signal,
    )
    .unwrap()
}

#[test]
fn default_overlays_have_correct_undefined_prefixes() -> Result<()> {
    let n = 80;
    let fig = compose(&sample_frame(n), "ACME")?;
    let close = &fig.series().close;

    assert_eq!(fig.overlays().len(), 2);
    for (overlay, window) in fig.overlays().iter().zip([20usize, 50]) {
        assert_eq!(overlay.spec.window, window);
        assert_eq!(overlay.values.len(), n);
        assert!(overlay.values[..window - 1].iter().all(|v| v.is_none()));
        for i in window - 1..n {
            let expected: f64 =
                close[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
            let got = overlay.values[i].expect("defined past the window");
            assert!((got - expected).abs() < 1e-9);
        }
    }
    Ok(())
}

#[test]
fn price_range_is_exactly_padded_low_high() -> Result<()> {
    let df = sample_frame(60);
    let fig = compose(&df, "ACME")?;

    let lows: Vec<f64> = fig.series().low.clone();
    let highs: Vec<f64> = fig.series().high.clone();
    let min_low = lows.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_high = highs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let (lo, hi) = fig.price_range();
    assert_eq!(lo, min_low * 0.95);
    assert_eq!(hi, max_high * 1.05);
    Ok(())
}

#[test]
fn change_is_last_close_minus_first_close() -> Result<()> {
    let fig = compose(&sample_frame(60), "ACME")?;
    let close = &fig.series().close;
    let expected = close[close.len() - 1] - close[0];
    assert!((fig.change() - expected).abs() < 1e-12);
    Ok(())
}

#[test]
fn composition_is_deterministic() -> Result<()> {
    let df = sample_frame(70);
    let a = compose(&df, "ACME")?;
    let b = compose(&df, "ACME")?;

    assert_eq!(a.series().close, b.series().close);
    assert_eq!(a.series().x, b.series().x);
    for (oa, ob) in a.overlays().iter().zip(b.overlays()) {
        assert_eq!(oa.values, ob.values);
    }
    Ok(())
}

#[test]
fn missing_required_column_raises_and_yields_no_figure() {
    for dropped in ["Volume", "RSI", "Close", "Date"] {
        let df = sample_frame(30).drop(dropped).unwrap();
        let err = compose(&df, "ACME").unwrap_err();
        assert!(
            matches!(err, InputError::MissingColumns(_)),
            "dropping {dropped} gave {err}"
        );
    }
}

#[test]
fn empty_table_is_rejected() {
    let df = sample_frame(5).head(Some(0));
    assert!(matches!(
        compose(&df, "ACME"),
        Err(InputError::Empty)
    ));
}

#[test]
fn single_row_composes_with_coinciding_markers() -> Result<()> {
    let fig = compose(&sample_frame(1), "ACME")?;

    assert_eq!(fig.series().len(), 1);
    assert!(fig
        .overlays()
        .iter()
        .all(|o| o.values.iter().all(|v| v.is_none())));
    assert_eq!(fig.change(), 0.0);
    let (lo, hi) = fig.price_range();
    assert_eq!(lo, fig.series().low[0] * 0.95);
    assert_eq!(hi, fig.series().high[0] * 1.05);
    Ok(())
}

#[test]
fn custom_overlay_windows_are_honored() -> Result<()> {
    let composer = ChartComposer::new().with_overlays(vec![
        SmaSpec::new(5, [10, 20, 30]),
        SmaSpec::new(10, [40, 50, 60]),
        SmaSpec::new(30, [70, 80, 90]),
    ]);
    let fig = composer.compose(&sample_frame(40), "ACME")?;

    assert_eq!(fig.overlays().len(), 3);
    assert_eq!(fig.overlays()[0].spec.label, "5-day SMA");
    assert_eq!(
        fig.overlays()
            .iter()
            .map(|o| o.values.iter().filter(|v| v.is_none()).count())
            .collect::<Vec<_>>(),
        vec![4, 9, 29]
    );
    Ok(())
}

#[test]
fn non_finite_values_pass_through() -> Result<()> {
    let mut df = sample_frame(30);
    let mut close: Vec<f64> = df.column("Close")?.f64()?.into_no_null_iter().collect();
    close[10] = f64::NAN;
    df.replace("Close", Series::new("Close".into(), close))?;

    let fig = compose(&df, "ACME")?;
    assert!(fig.series().close[10].is_nan());
    Ok(())
}

#[test]
fn draw_produces_non_blank_bitmap() -> Result<()> {
    let fig = compose(&sample_frame(90), "ACME")?;

    let (w, h) = (960u32, 640u32);
    let mut buf = vec![0u8; (w * h * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        fig.draw(&root)?;
        root.present()?;
    }

    // The background fill alone would leave every pixel white.
    let non_white = buf
        .chunks(3)
        .filter(|px| px.iter().any(|&b| b != 255))
        .count();
    assert!(non_white > 1000, "only {non_white} drawn pixels");
    Ok(())
}

#[test]
fn draw_handles_a_single_row() -> Result<()> {
    let fig = compose(&sample_frame(1), "ACME")?;

    let (w, h) = (480u32, 320u32);
    let mut buf = vec![0u8; (w * h * 3) as usize];
    let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
    fig.draw(&root)?;
    root.present()?;
    Ok(())
}
