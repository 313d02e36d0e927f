//! Application configuration.
//!
//! `settings` reads the environment; `constants` holds defaults, cache
//! prefixes, lock timings and the demo seed data.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
