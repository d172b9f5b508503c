pub mod encode;
pub mod start;
pub mod status;
