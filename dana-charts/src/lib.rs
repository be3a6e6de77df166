//! Chart controllers for the story's three charts.
//!
//! Each controller owns one chart (by canvas id) and the payload behind it,
//! and talks to Chart.js only through [`backend::ChartBackend`].

pub mod backend;
pub mod combo;
pub mod common;
pub mod multi_line;
pub mod sea_temperature;

#[cfg(test)]
mod mock;

pub use backend::ChartBackend;
pub use combo::ComboChart;
pub use common::{source_caption, StationOption};
pub use multi_line::MultiLineChart;
pub use sea_temperature::SeaTempChart;
