//! Error types for the life restart engine

use crate::property::Attribute;
use std::fmt;
use thiserror::Error;

/// Why an attribute allocation was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationIssue {
    /// CHR + INT + STR + MNY is larger than the available budget
    BudgetExceeded { total: i32, budget: i32 },
    /// A single allocatable field is outside its declared range
    OutOfRange {
        attribute: Attribute,
        value: i32,
        min: i32,
        max: i32,
    },
}

impl fmt::Display for AllocationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationIssue::BudgetExceeded { total, budget } => {
                write!(f, "budget exceeded: {} of {} points used", total, budget)
            }
            AllocationIssue::OutOfRange {
                attribute,
                value,
                min,
                max,
            } => write!(
                f,
                "{} = {} is outside {}..={}",
                attribute.code(),
                value,
                min,
                max
            ),
        }
    }
}

/// Main error type for the life restart engine
#[derive(Error, Debug)]
pub enum LifeRestartError {
    #[error("Invalid allocation: {0}")]
    InvalidAllocation(AllocationIssue),

    #[error("Talent {candidate} conflicts with selected talent {selected}")]
    TalentConflict { selected: i32, candidate: i32 },

    #[error("Selection is full ({0} talents)")]
    SelectionFull(usize),

    #[error("Talent not found: {0}")]
    TalentNotFound(i32),

    #[error("Talent {0} was not selected in this run")]
    TalentNotSelected(i32),

    #[error("No active run: call restart first")]
    NoActiveRun,

    #[error("The current run has not ended yet")]
    RunInProgress,

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<serde_json::Error> for LifeRestartError {
    fn from(err: serde_json::Error) -> Self {
        LifeRestartError::DeserializationError(err.to_string())
    }
}

impl From<std::io::Error> for LifeRestartError {
    fn from(err: std::io::Error) -> Self {
        LifeRestartError::Persistence(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<LifeRestartError> for pyo3::PyErr {
    fn from(err: LifeRestartError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};

        let msg = err.to_string();
        match err {
            LifeRestartError::TalentNotFound(_) | LifeRestartError::TalentNotSelected(_) => {
                PyKeyError::new_err(msg)
            }
            LifeRestartError::InvalidAllocation(_)
            | LifeRestartError::TalentConflict { .. }
            | LifeRestartError::SelectionFull(_)
            | LifeRestartError::InvalidCondition(_)
            | LifeRestartError::DeserializationError(_) => PyValueError::new_err(msg),
            LifeRestartError::NoActiveRun
            | LifeRestartError::RunInProgress
            | LifeRestartError::Persistence(_) => PyRuntimeError::new_err(msg),
        }
    }
}

/// Result type alias for the life restart engine
pub type Result<T> = std::result::Result<T, LifeRestartError>;
