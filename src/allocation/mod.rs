//! Attribute allocation: budgets, validation and random distribution

mod allocator;


pub use allocator::*;
