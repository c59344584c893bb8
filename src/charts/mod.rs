//! Charts module - Figure composition and panel rendering

mod figure;
mod panels;
pub mod style;

pub use figure::{compose, ChartComposer, ChartFigure};
pub use style::Theme;
