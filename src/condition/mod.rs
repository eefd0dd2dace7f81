//! Condition parsing and evaluation module
//!
//! Talents and events gate themselves with small predicates such as
//! `AGE>=18 & (TLT?[1001] | STR<300)`, evaluated against a [`PropertyState`].
//!
//! [`PropertyState`]: crate::property::PropertyState

mod ast;
pub mod cache;
mod evaluator;
pub mod parser;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use parser::*;
