//! Life Restart Engine - seedable life simulation core
//!
//! A talent catalog with conflict rules and a weighted draw, an attribute
//! allocator, a year-by-year life state machine driven by age-windowed events,
//! and an end-of-life summary. Everything random flows from a seedable
//! generator owned by each [`LifeEngine`], so a seed replays a life exactly.
//!
//! ```no_run
//! use life_restart_engine::{AttributeSet, LifeEngine};
//!
//! let mut engine = LifeEngine::builtin(Some(42))?;
//! let talents: Vec<i32> = engine.draw(3).iter().map(|t| t.id).collect();
//! let attributes = engine.random_allocate(&talents);
//! engine.restart(attributes, &talents)?;
//! while !engine.next()?.is_end {}
//! let summary = engine.summary()?;
//! println!("score {}", summary.total);
//! # Ok::<(), life_restart_engine::LifeRestartError>(())
//! ```
//!
//! With the `python` feature the crate builds the `life_restart_engine`
//! Python extension module.

pub mod allocation;
pub mod condition;
pub mod config;
pub mod error;
pub mod event;
pub mod legacy;
pub mod property;
pub mod simulator;
pub mod summary;
pub mod talent;

#[cfg(feature = "python")]
mod python;

pub use allocation::Allocator;
pub use config::{EngineConfig, GameData};
pub use error::{AllocationIssue, LifeRestartError, Result};
pub use legacy::{JsonFileStore, Legacy, LegacyStore, MemoryStore};
pub use property::{Attribute, AttributeSet};
pub use simulator::{ContentKind, LifeEngine, LifeRecord, LifeState, YearContent};
pub use summary::{summarize, PropertyJudge, Summary, SummaryKind};
pub use talent::{TalentCatalog, TalentSelection};
