//! Data models

pub mod assessment;

pub use assessment::*;
