//! End-of-life summary: per-attribute judgments and the total score

mod calculator;
mod judge;


pub use calculator::*;
pub use judge::*;
