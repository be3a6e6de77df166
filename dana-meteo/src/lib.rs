pub mod centroid;
pub mod color_scale;
pub mod error;
pub mod feature;
pub mod geo;
mod lenient;
pub mod palette;
pub mod sea_temperature;
pub mod station;
pub mod variable;

pub use error::{MeteoError, Result};
