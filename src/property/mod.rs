//! Attributes and the mutable per-run property state

mod state;

#[cfg(test)]
mod property_tests;

pub use state::*;
