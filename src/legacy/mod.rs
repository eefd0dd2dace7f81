//! Cross-run state and its persistence
//!
//! A [`Legacy`] survives restarts: how many lives were acknowledged, which
//! talents were unlocked for future draws, and which talent is carried into the
//! next draw. The engine only hands the value out; saving it is up to a
//! [`LegacyStore`].

mod state;
mod store;

pub use state::*;
pub use store::*;
