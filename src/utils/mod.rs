//! Utility helpers.

pub mod templates;
