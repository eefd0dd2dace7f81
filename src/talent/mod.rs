//! Talent module: catalog, selection and per-year triggers

mod catalog;
mod processor;
mod selection;


pub use catalog::*;
pub use processor::*;
pub use selection::*;
