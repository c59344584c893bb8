//! Price Series Module
//! Normalizes a polars DataFrame into the column vectors the panels render.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;

/// Semantic columns every input table must carry (after lower-casing).
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "date", "open", "high", "low", "close", "volume", "rsi", "macd", "signal",
];

/// Days from 0001-01-01 (CE) to the Unix epoch; polars `Date` stores
/// days since the epoch while our x-axis uses days-from-CE.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Date string layouts accepted for string-typed date columns.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y-%m-%d %H:%M:%S"];

#[derive(Error, Debug)]
pub enum InputError {
    #[error("missing required column(s): {0}")]
    MissingColumns(String),
    #[error("input table has no rows")]
    Empty,
    #[error("unsupported date column type: {0}")]
    DateType(String),
    #[error("unparseable date value: {0:?}")]
    DateParse(String),
    #[error("duplicate trading date: {0}")]
    DuplicateDate(NaiveDate),
    #[error("table error: {0}")]
    Polars(#[from] PolarsError),
}

/// One row per trading date, columns pulled apart into parallel vectors.
///
/// Rows are ascending by date with no duplicates; `x` is the calendar date
/// encoded as days-from-CE, a monotone numeric coordinate for the shared
/// x-axis. Numeric anomalies (nulls become NaN) are kept as-is and left to
/// the rendering layer.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub dates: Vec<NaiveDate>,
    pub x: Vec<f64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl PriceSeries {
    /// Normalize an input table: lower-case column names, validate the
    /// required columns, parse dates, sort ascending and extract f64 vectors.
    pub fn from_frame(df: &DataFrame) -> Result<Self, InputError> {
        let mut df = df.clone();

        // Case-insensitive column acceptance: rename everything to lowercase.
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        for name in &names {
            let lower = name.to_lowercase();
            if lower != *name {
                df.rename(name, lower.into())?;
            }
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| df.column(c).is_err())
            .collect();
        if !missing.is_empty() {
            return Err(InputError::MissingColumns(missing.join(", ")));
        }
        if df.height() == 0 {
            return Err(InputError::Empty);
        }

        let dates = extract_dates(&df)?;
        let open = extract_f64(&df, "open")?;
        let high = extract_f64(&df, "high")?;
        let low = extract_f64(&df, "low")?;
        let close = extract_f64(&df, "close")?;
        let volume = extract_f64(&df, "volume")?;
        let rsi = extract_f64(&df, "rsi")?;
        let macd = extract_f64(&df, "macd")?;
        let signal = extract_f64(&df, "signal")?;

        // Sort everything by date; the renderer assumes ascending order.
        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);

        let dates: Vec<NaiveDate> = order.iter().map(|&i| dates[i]).collect();
        for pair in dates.windows(2) {
            if pair[0] == pair[1] {
                return Err(InputError::DuplicateDate(pair[0]));
            }
        }

        let permute = |v: &[f64]| -> Vec<f64> { order.iter().map(|&i| v[i]).collect() };
        let x: Vec<f64> = dates.iter().map(|d| d.num_days_from_ce() as f64).collect();

        let series = Self {
            x,
            open: permute(&open),
            high: permute(&high),
            low: permute(&low),
            close: permute(&close),
            volume: permute(&volume),
            rsi: permute(&rsi),
            macd: permute(&macd),
            signal: permute(&signal),
            dates,
        };

        let anomalies = series.count_non_finite();
        if anomalies > 0 {
            log::warn!(
                "{} non-finite value(s) in input; passing through to the renderer",
                anomalies
            );
        }

        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn count_non_finite(&self) -> usize {
        [
            &self.open,
            &self.high,
            &self.low,
            &self.close,
            &self.volume,
            &self.rsi,
            &self.macd,
            &self.signal,
        ]
        .iter()
        .flat_map(|col| col.iter())
        .filter(|v| !v.is_finite())
        .count()
    }
}

/// Pull a column out as f64 values; nulls become NaN (pass-through policy).
fn extract_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>, InputError> {
    let column = df.column(name)?;
    let cast = column.cast(&DataType::Float64)?;
    let ca = cast.f64()?;

    let mut values = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        values.push(ca.get(i).unwrap_or(f64::NAN));
    }
    Ok(values)
}

fn extract_dates(df: &DataFrame) -> Result<Vec<NaiveDate>, InputError> {
    let column = df.column("date")?;

    match column.dtype() {
        DataType::String => {
            let ca = column.str()?;
            let mut dates = Vec::with_capacity(df.height());
            for i in 0..df.height() {
                let raw = ca
                    .get(i)
                    .ok_or_else(|| InputError::DateParse("null".to_string()))?;
                dates.push(parse_date(raw)?);
            }
            Ok(dates)
        }
        DataType::Date | DataType::Datetime(_, _) => {
            // Physical representation of Date is days since the Unix epoch.
            let cast = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            let ca = cast.i32()?;
            let mut dates = Vec::with_capacity(df.height());
            for i in 0..df.height() {
                let days = ca
                    .get(i)
                    .ok_or_else(|| InputError::DateParse("null".to_string()))?;
                let date = NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
                    .ok_or_else(|| InputError::DateParse(days.to_string()))?;
                dates.push(date);
            }
            Ok(dates)
        }
        other => Err(InputError::DateType(other.to_string())),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.date());
        }
    }
    Err(InputError::DateParse(raw.to_string()))
}
