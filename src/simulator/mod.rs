//! Simulation module: the life state machine and its history records

mod engine;
mod record;


pub use engine::*;
pub use record::*;
