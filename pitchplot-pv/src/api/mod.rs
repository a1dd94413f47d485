//! HTTP API handlers for pitchplot-pv

pub mod health;
pub mod parse_image;
pub mod plot;
pub mod ui;

pub use health::health_routes;
pub use parse_image::parse_routes;
pub use plot::plot_routes;
pub use ui::ui_routes;
