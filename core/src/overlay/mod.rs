//! Overlay module - page server and CORS relay

pub mod chunked;
pub mod encoding;
pub mod error;
pub mod handlers;
pub mod server;
pub mod upstream;

pub use encoding::{decode_target_url, encode_target_url, relay_url};
pub use error::RelayError;
pub use server::OverlayServer;
