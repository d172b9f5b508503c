//! Now Playing Overlay Core Library
//! Browser-source page server, CORS relay and host lifecycle

pub mod config;
pub mod lifecycle;
pub mod overlay;
