//! Event module: the event table, eligibility and per-event processing

mod processor;
pub mod selector;
mod table;


pub use processor::*;
pub use selector::*;
pub use table::*;
