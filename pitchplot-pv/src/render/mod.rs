//! Server-side plot rendering

pub mod svg;

pub use svg::movement_profile;
