//! Runtime settings loaded from the environment, plus the fixed limits
//! (token lifetime, rating bounds, rate-limit tiers) shared across layers.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
