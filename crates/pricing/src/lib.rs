//! `blackbox-pricing` — the subscription plan catalog and custom quotes.

pub mod plan;

pub use plan::{CUSTOM_UNIT_RATE, Plan, custom_quote, plans};
