//! Python bindings (feature `python`)
//!
//! Game data and engine settings are cached once in Rust memory by
//! `init_config`; every `LifeSession` then owns an independent engine over the
//! shared data, and one-shot simulations run either inline or on a tokio
//! blocking thread.

use crate::config::{EngineConfig, GameData, TalentConfig};
use crate::error::LifeRestartError;
use crate::property::{Attribute, AttributeSet};
use crate::simulator::{ContentKind, LifeEngine, LifeRecord, LifeState};
use crate::summary::{summarize, Summary};
use crate::talent::TalentSelection;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Cached Configuration
// ============================================================================

/// Data set and settings shared by every session
#[derive(Clone)]
struct CachedConfig {
    data: Arc<GameData>,
    config: EngineConfig,
}

/// Global cached configuration
static CACHED_CONFIG: OnceCell<RwLock<CachedConfig>> = OnceCell::new();

fn cached_config() -> PyResult<CachedConfig> {
    CACHED_CONFIG
        .get()
        .map(|cached| cached.read().clone())
        .ok_or_else(|| PyRuntimeError::new_err("Config not initialized. Call init_config() first."))
}

fn engine_for(cached: CachedConfig, seed: Option<u64>) -> LifeEngine {
    match seed {
        Some(seed) => LifeEngine::with_seed(cached.data, cached.config, seed),
        None => LifeEngine::new(cached.data, cached.config),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Read {CHR, INT, STR, MNY} from a Python dict; SPR is fixed by the engine
fn attributes_from_map(properties: &HashMap<String, i32>) -> PyResult<AttributeSet> {
    let mut attributes = AttributeSet::default();
    for (code, value) in properties {
        let attribute = Attribute::from_code(code)
            .ok_or_else(|| PyValueError::new_err(format!("Unknown attribute {:?}", code)))?;
        *attributes.get_mut(attribute) = *value;
    }
    Ok(attributes)
}

fn attributes_to_dict<'py>(py: Python<'py>, attributes: &AttributeSet) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    for attribute in Attribute::ALL {
        dict.set_item(attribute.code(), attributes.get(attribute))?;
    }
    Ok(dict)
}

fn record_to_dict<'py>(py: Python<'py>, record: &LifeRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("age", record.age)?;
    dict.set_item("attributes", attributes_to_dict(py, &record.attributes)?)?;

    let content = PyList::empty(py);
    for entry in &record.content {
        let item = PyDict::new(py);
        item.set_item(
            "type",
            match entry.kind {
                ContentKind::Talent => "TLT",
                ContentKind::Event => "EVT",
            },
        )?;
        item.set_item("id", entry.id)?;
        item.set_item("description", &entry.description)?;
        item.set_item("grade", entry.grade)?;
        item.set_item("name", entry.name.as_deref())?;
        item.set_item("post_event", entry.post_event.as_deref())?;
        content.append(item)?;
    }
    dict.set_item("content", content)?;
    dict.set_item("is_end", record.is_end)?;
    Ok(dict)
}

fn summary_to_dict<'py>(py: Python<'py>, summary: &Summary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("total", summary.total)?;

    let judges = PyList::empty(py);
    for judge in &summary.judges {
        let item = PyDict::new(py);
        item.set_item("type", judge.kind.code())?;
        item.set_item("value", judge.value)?;
        item.set_item("grade", judge.grade)?;
        item.set_item("text", &judge.text)?;
        item.set_item("progress", judge.progress)?;
        judges.append(item)?;
    }
    dict.set_item("judges", judges)?;
    Ok(dict)
}

fn talent_to_dict<'py>(py: Python<'py>, talent: &TalentConfig) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", talent.id)?;
    dict.set_item("name", &talent.name)?;
    dict.set_item("description", &talent.description)?;
    dict.set_item("grade", talent.grade)?;
    Ok(dict)
}

// ============================================================================
// LifeReport PyClass
// ============================================================================

/// Finished life held in Rust memory; data is converted on access
#[pyclass]
pub struct LifeReport {
    records: Vec<LifeRecord>,
    summary: Summary,
}

impl LifeReport {
    fn new(records: Vec<LifeRecord>, summary: Summary) -> Self {
        Self { records, summary }
    }
}

#[pymethods]
impl LifeReport {
    /// Number of records, birth included
    #[getter]
    fn total_years(&self) -> usize {
        self.records.len()
    }

    #[getter]
    fn final_age(&self) -> i32 {
        self.records.last().map(|r| r.age).unwrap_or(0)
    }

    #[getter]
    fn total_score(&self) -> i32 {
        self.summary.total
    }

    #[getter]
    fn is_ended(&self) -> bool {
        self.records.last().map(|r| r.is_end).unwrap_or(false)
    }

    /// Year dict by index, or None
    fn get_year(&self, py: Python<'_>, index: usize) -> PyResult<Py<PyAny>> {
        match self.records.get(index) {
            Some(record) => Ok(record_to_dict(py, record)?.into()),
            None => Ok(py.None()),
        }
    }

    fn records(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for record in &self.records {
            list.append(record_to_dict(py, record)?)?;
        }
        Ok(list.into())
    }

    fn summary(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(summary_to_dict(py, &self.summary)?.into())
    }

    /// History as a JSON string
    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.records).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }
}

// ============================================================================
// LifeSession PyClass
// ============================================================================

/// One player's engine: draw, allocate, live year by year, extend
#[pyclass]
pub struct LifeSession {
    engine: LifeEngine,
    selection: TalentSelection,
}

#[pymethods]
impl LifeSession {
    #[new]
    #[pyo3(signature = (seed=None))]
    fn py_new(seed: Option<u64>) -> PyResult<Self> {
        let engine = engine_for(cached_config()?, seed);
        let selection = TalentSelection::from_config(engine.config());
        Ok(Self { engine, selection })
    }

    /// Draw talents; defaults to the configured draw size
    #[pyo3(signature = (count=None))]
    fn draw(&mut self, py: Python<'_>, count: Option<usize>) -> PyResult<Py<PyAny>> {
        let count = count.unwrap_or(self.engine.config().draw_count);
        let list = PyList::empty(py);
        for talent in self.engine.draw(count) {
            list.append(talent_to_dict(py, &talent)?)?;
        }
        Ok(list.into())
    }

    /// Every talent in the catalog, locked ones included
    fn all_talents(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for talent in self.engine.data().talents.all() {
            list.append(talent_to_dict(py, talent)?)?;
        }
        Ok(list.into())
    }

    /// Talents a draw may offer with the current legacy
    fn drawable_talents(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for talent in self.engine.drawable() {
            list.append(talent_to_dict(py, talent)?)?;
        }
        Ok(list.into())
    }

    /// First id in `selected` that conflicts with `candidate`, or None
    fn exclusive(&self, selected: Vec<i32>, candidate: i32) -> Option<i32> {
        self.engine.data().talents.exclusive(&selected, candidate)
    }

    /// Add a talent to the pending selection
    fn select(&mut self, talent_id: i32) -> PyResult<()> {
        Ok(self.selection.select(&self.engine.data().talents, talent_id)?)
    }

    /// Remove a talent from the pending selection; returns whether it was there
    fn deselect(&mut self, talent_id: i32) -> bool {
        self.selection.deselect(talent_id)
    }

    /// Flip a talent's membership; returns whether it is now selected
    fn toggle(&mut self, talent_id: i32) -> PyResult<bool> {
        Ok(self.selection.toggle(&self.engine.data().talents, talent_id)?)
    }

    #[getter]
    fn selected(&self) -> Vec<i32> {
        self.selection.ids().to_vec()
    }

    #[getter]
    fn selection_complete(&self) -> bool {
        self.selection.is_complete()
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn budget(&self, talent_ids: Vec<i32>) -> i32 {
        self.engine.budget(&talent_ids)
    }

    fn random_allocate(&mut self, py: Python<'_>, talent_ids: Vec<i32>) -> PyResult<Py<PyAny>> {
        let attributes = self.engine.random_allocate(&talent_ids);
        Ok(attributes_to_dict(py, &attributes)?.into())
    }

    /// Start a new life; returns the birth record. Without `talent_ids` the
    /// pending selection is used.
    #[pyo3(signature = (properties, talent_ids=None))]
    fn restart(
        &mut self,
        py: Python<'_>,
        properties: HashMap<String, i32>,
        talent_ids: Option<Vec<i32>>,
    ) -> PyResult<Py<PyAny>> {
        let attributes = attributes_from_map(&properties)?;
        let talent_ids = talent_ids.unwrap_or_else(|| self.selection.ids().to_vec());
        let record = self.engine.restart(attributes, &talent_ids)?;
        self.selection.clear();
        Ok(record_to_dict(py, &record)?.into())
    }

    fn next(&mut self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let record = self.engine.next()?;
        Ok(record_to_dict(py, &record)?.into())
    }

    fn last_record(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let attributes = self.engine.get_last_record()?;
        Ok(attributes_to_dict(py, &attributes)?.into())
    }

    fn records(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for record in self.engine.get_record()? {
            list.append(record_to_dict(py, record)?)?;
        }
        Ok(list.into())
    }

    fn summary(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let summary = self.engine.summary()?;
        Ok(summary_to_dict(py, &summary)?.into())
    }

    #[pyo3(signature = (talent_id=None))]
    fn talent_extend(&mut self, talent_id: Option<i32>) -> PyResult<bool> {
        Ok(self.engine.talent_extend(talent_id)?)
    }

    /// Lives completed and acknowledged
    #[getter]
    fn times(&self) -> u32 {
        self.engine.legacy().times
    }

    /// "not_started", "in_progress" or "ended"
    #[getter]
    fn state(&self) -> &'static str {
        match self.engine.state() {
            LifeState::NotStarted => "not_started",
            LifeState::InProgress => "in_progress",
            LifeState::Ended => "ended",
        }
    }

    /// Legacy as a JSON string, for the caller to persist
    fn legacy_json(&self) -> PyResult<String> {
        serde_json::to_string(self.engine.legacy()).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Restore a legacy saved with `legacy_json`
    fn load_legacy(&mut self, json: &str) -> PyResult<()> {
        let legacy = serde_json::from_str(json).map_err(LifeRestartError::from)?;
        self.engine.set_legacy(legacy);
        Ok(())
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Initialize the game configuration (call once at startup)
///
/// Loads the bundled data set and caches it together with the engine settings.
/// `config_json` overrides individual `EngineConfig` fields. Calling it again
/// replaces the cached configuration for sessions created afterwards.
#[pyfunction]
#[pyo3(signature = (config_json=None))]
fn init_config(config_json: Option<&str>) -> PyResult<()> {
    let config = match config_json {
        Some(json) => EngineConfig::from_json_str(json)?,
        None => EngineConfig::default(),
    };
    let cached = CachedConfig {
        data: GameData::builtin()?,
        config,
    };

    // If already initialized, update the config
    if let Some(existing) = CACHED_CONFIG.get() {
        *existing.write() = cached;
    } else {
        let _ = CACHED_CONFIG.set(RwLock::new(cached));
    }
    Ok(())
}

/// Check if config is initialized
#[pyfunction]
fn is_config_initialized() -> bool {
    CACHED_CONFIG.get().is_some()
}

fn run_full_life(
    cached: CachedConfig,
    talent_ids: &[i32],
    attributes: AttributeSet,
    seed: Option<u64>,
) -> Result<LifeReport, LifeRestartError> {
    let mut engine = engine_for(cached, seed);
    let records = engine.simulate(attributes, talent_ids)?;
    let summary = summarize(&records, &engine.data().judge)?;
    Ok(LifeReport::new(records, summary))
}

/// Simulate a complete life in one call
///
/// # Raises
/// RuntimeError if `init_config` was not called first, ValueError/KeyError
/// for invalid talents or allocations
#[pyfunction]
#[pyo3(signature = (talent_ids, properties, seed=None))]
fn simulate_full_life(
    talent_ids: Vec<i32>,
    properties: HashMap<String, i32>,
    seed: Option<u64>,
) -> PyResult<LifeReport> {
    let attributes = attributes_from_map(&properties)?;
    Ok(run_full_life(cached_config()?, &talent_ids, attributes, seed)?)
}

/// Simulate a complete life asynchronously
///
/// The simulation runs on a tokio blocking thread so the asyncio event loop
/// stays responsive.
///
/// # Example (Python)
/// ```python
/// report = await simulate_async([1001, 1014], {"CHR": 2500, "INT": 2500, "STR": 2500, "MNY": 2500})
/// print(report.final_age)
/// ```
#[pyfunction]
#[pyo3(signature = (talent_ids, properties, seed=None))]
fn simulate_async<'py>(
    py: Python<'py>,
    talent_ids: Vec<i32>,
    properties: HashMap<String, i32>,
    seed: Option<u64>,
) -> PyResult<Bound<'py, PyAny>> {
    // Resolve everything that touches Python before leaving the GIL
    let attributes = attributes_from_map(&properties)?;
    let cached = cached_config()?;

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let report = tokio::task::spawn_blocking(move || {
            run_full_life(cached, &talent_ids, attributes, seed)
        })
        .await
        .map_err(|e| PyRuntimeError::new_err(format!("Simulation task panicked: {}", e)))??;

        Ok(report)
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn life_restart_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_config, m)?)?;
    m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_full_life, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_async, m)?)?;
    m.add_class::<LifeSession>()?;
    m.add_class::<LifeReport>()?;
    Ok(())
}
