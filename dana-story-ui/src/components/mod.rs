//! Dioxus components for the DANA story.

mod chart_container;
mod chart_header;
pub mod compare_slider;
mod error_display;
mod loading_spinner;
mod map_panel;
mod station_buttons;
mod station_checkboxes;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use compare_slider::CompareSlider;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use map_panel::{InfoPanel, MapControls, MapLegend};
pub use station_buttons::StationButtons;
pub use station_checkboxes::StationCheckboxes;
