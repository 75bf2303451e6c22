//! HTTP handlers

pub mod health;
pub mod assess;
pub mod model;
pub mod pages;
