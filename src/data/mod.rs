//! Data module - Input table normalization

mod series;

pub use series::{InputError, PriceSeries, REQUIRED_COLUMNS};
