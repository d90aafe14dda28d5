//! Python FFI bindings via PyO3.
//!
//! Exposes both translators to Python with plain-dict readings and patterns, so the
//! community layer can call them the same way it calls any Python translator.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from mycelium_signal import WaterStressTranslator, BiodiversityTranslator
//!
//! water = WaterStressTranslator()
//! pattern = water.translate({
//!     "soil_moisture": 18.0,
//!     "ecosystem_type": "temperate_forest",
//!     "additional_indicators": {"leaf_water_potential": -1.8, "stream_flow": 0.3},
//! })
//! print(pattern["type"], pattern["pulse_count"], pattern["emotion"])  # tension 2 concern
//!
//! bio = BiodiversityTranslator()
//! pattern = bio.translate({"ecosystem_type": "wetland", "species_count": 40}, 1.7e9)
//! print(water.get_historical_trends())  # {'current_stress': 0.49, ..., 'trend': 'unknown', 'confidence': 0.0}
//! ```
//!
//! Both error kinds surface as `ValueError`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyLong};

use crate::biodiversity::{
    BiodiversityReading, BiodiversityTranslator as RustBiodiversity, RESERVED_KEYS,
};
use crate::error::TranslateError;
use crate::pattern::{FeedbackPattern, Magnitude, PulseCount};
use crate::profile::DiversityIndicator;
use crate::state::HistoricalTrends;
use crate::water::{WaterIndicators, WaterReading, WaterStressTranslator as RustWater};

fn to_py_err(e: TranslateError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ── Dict → reading ───────────────────────────────────────────────────────────

/// `None` for an absent key or an explicit Python `None`.
fn opt_item<'py, T: FromPyObject<'py>>(d: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>> {
    match d.get_item(key)? {
        Some(v) if !v.is_none() => Ok(Some(v.extract()?)),
        _ => Ok(None),
    }
}

/// `int` or `float`, but not `bool` (a Python `int` subclass).
fn is_number(v: &Bound<'_, PyAny>) -> bool {
    !v.is_instance_of::<PyBool>() && (v.is_instance_of::<PyLong>() || v.is_instance_of::<PyFloat>())
}

/// Numeric entries of `d` not named in `known`. Other value types are skipped.
fn numeric_extras(d: &Bound<'_, PyDict>, known: &[&str]) -> PyResult<hashbrown::HashMap<String, f32>> {
    let mut out = hashbrown::HashMap::new();
    for (k, v) in d.iter() {
        let key: String = k.extract()?;
        if known.contains(&key.as_str()) || !is_number(&v) {
            continue;
        }
        out.insert(key, v.extract::<f32>()?);
    }
    Ok(out)
}

const WATER_INDICATOR_KEYS: [&str; 5] = [
    "leaf_water_potential",
    "stream_flow",
    "water_table_depth",
    "normal_water_table_depth",
    "precipitation_deficit",
];

fn water_reading(d: &Bound<'_, PyDict>) -> PyResult<WaterReading> {
    let additional_indicators = match opt_item::<Bound<'_, PyDict>>(d, "additional_indicators")? {
        Some(ind) => Some(WaterIndicators {
            leaf_water_potential: opt_item(&ind, "leaf_water_potential")?,
            stream_flow: opt_item(&ind, "stream_flow")?,
            water_table_depth: opt_item(&ind, "water_table_depth")?,
            normal_water_table_depth: opt_item(&ind, "normal_water_table_depth")?,
            precipitation_deficit: opt_item(&ind, "precipitation_deficit")?,
            other: numeric_extras(&ind, &WATER_INDICATOR_KEYS)?,
        }),
        None => None,
    };
    Ok(WaterReading {
        soil_moisture: opt_item(d, "soil_moisture")?,
        ecosystem_type: opt_item(d, "ecosystem_type")?,
        additional_indicators,
    })
}

fn biodiversity_reading(d: &Bound<'_, PyDict>) -> PyResult<BiodiversityReading> {
    let mut reading = BiodiversityReading {
        ecosystem_type: opt_item(d, "ecosystem_type")?,
        acoustic_diversity: opt_item(d, "acoustic_diversity")?,
        ..BiodiversityReading::default()
    };
    for indicator in DiversityIndicator::ALL {
        if let Some(v) = opt_item::<f32>(d, indicator.as_str())? {
            reading = reading.with_indicator(indicator, v);
        }
    }
    let known = [
        "acoustic_diversity",
        "species_count",
        "bird_species",
        "insect_orders",
        "shannon_index",
    ];
    reading.other = numeric_extras(d, &known)?;
    reading.other.retain(|k, _| !RESERVED_KEYS.contains(&k.as_str()));
    Ok(reading)
}

// ── Pattern → dict ───────────────────────────────────────────────────────────

fn pattern_dict<'py>(py: Python<'py>, p: &FeedbackPattern) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new_bound(py);
    d.set_item("type", p.pattern_type.as_str())?;
    match p.magnitude {
        Magnitude::Intensity(v) => d.set_item("intensity", v)?,
        Magnitude::Complexity(v) => d.set_item("complexity", v)?,
    }
    d.set_item("rhythm", p.rhythm.as_str())?;
    match p.count {
        PulseCount::Pulses(n) => d.set_item("pulse_count", n)?,
        PulseCount::Layers(n) => d.set_item("layers", n)?,
    }
    d.set_item("duration", p.duration)?;
    if let Some(f) = p.frequency {
        d.set_item(p.frequency_key(), f.as_str())?;
    }
    d.set_item("location", p.location.as_str())?;
    d.set_item("description", &*p.description)?;
    d.set_item("emotion", p.emotion.as_str())?;
    if let Some(t) = p.trend {
        let td = PyDict::new_bound(py);
        td.set_item("direction", t.direction.as_str())?;
        td.set_item("magnitude", t.magnitude)?;
        d.set_item("trend", td)?;
    }
    Ok(d)
}

/// `level_key` names the severity: `current_stress` or `current_depletion`.
fn trends_dict<'py>(
    py: Python<'py>,
    h: &HistoricalTrends,
    level_key: &str,
) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new_bound(py);
    if let Some(level) = h.current_level {
        d.set_item(level_key, level)?;
    }
    if let Some(ts) = h.last_reading_time {
        d.set_item("last_reading_time", ts)?;
    }
    d.set_item("trend", h.trend.as_str())?;
    d.set_item("confidence", h.confidence)?;
    Ok(d)
}

// ── WaterStressTranslator ────────────────────────────────────────────────────

/// Soil moisture → water stress feedback pattern.
///
/// Keeps the previous stress level; use one instance per monitoring history.
#[pyclass(name = "WaterStressTranslator")]
pub struct PyWaterStressTranslator {
    inner: RustWater,
}

#[pymethods]
impl PyWaterStressTranslator {
    /// Create a translator with the built-in ecosystem profiles.
    #[new]
    pub fn new() -> Self {
        Self {
            inner: RustWater::new(),
        }
    }

    /// Translate one reading.
    ///
    /// Args:
    ///     sensor_data: dict with soil_moisture, ecosystem_type and optional additional_indicators
    ///     timestamp:   Unix seconds; defaults to now
    ///
    /// Raises:
    ///     ValueError: unknown ecosystem type or missing required data
    #[pyo3(signature = (sensor_data, timestamp=None))]
    pub fn translate<'py>(
        &mut self,
        py: Python<'py>,
        sensor_data: &Bound<'py, PyDict>,
        timestamp: Option<f64>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let reading = water_reading(sensor_data)?;
        let pattern = self.inner.translate(&reading, timestamp).map_err(to_py_err)?;
        pattern_dict(py, &pattern)
    }

    /// Trend placeholder: last stress level, trend "unknown", confidence 0.
    ///
    /// `timeframe` is accepted and ignored.
    #[pyo3(signature = (timeframe=None))]
    pub fn get_historical_trends<'py>(
        &self,
        py: Python<'py>,
        timeframe: Option<&str>,
    ) -> PyResult<Bound<'py, PyDict>> {
        trends_dict(py, &self.inner.get_historical_trends(timeframe), "current_stress")
    }

    /// Forget the previous reading.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Python repr string.
    pub fn __repr__(&self) -> &'static str {
        "WaterStressTranslator()"
    }
}

// ── BiodiversityTranslator ───────────────────────────────────────────────────

/// Species and acoustic metrics → biodiversity feedback pattern.
#[pyclass(name = "BiodiversityTranslator")]
pub struct PyBiodiversityTranslator {
    inner: RustBiodiversity,
}

#[pymethods]
impl PyBiodiversityTranslator {
    /// Create a translator with the built-in ecosystem profiles.
    #[new]
    pub fn new() -> Self {
        Self {
            inner: RustBiodiversity::new(),
        }
    }

    /// Translate one reading.
    ///
    /// Args:
    ///     sensor_data: dict with ecosystem_type and at least one metric
    ///     timestamp:   Unix seconds; defaults to now
    ///
    /// Raises:
    ///     ValueError: unknown ecosystem type or missing required data
    #[pyo3(signature = (sensor_data, timestamp=None))]
    pub fn translate<'py>(
        &mut self,
        py: Python<'py>,
        sensor_data: &Bound<'py, PyDict>,
        timestamp: Option<f64>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let reading = biodiversity_reading(sensor_data)?;
        let pattern = self.inner.translate(&reading, timestamp).map_err(to_py_err)?;
        pattern_dict(py, &pattern)
    }

    /// Trend placeholder: last depletion level, trend "unknown", confidence 0.
    ///
    /// `timeframe` is accepted and ignored.
    #[pyo3(signature = (timeframe=None))]
    pub fn get_historical_trends<'py>(
        &self,
        py: Python<'py>,
        timeframe: Option<&str>,
    ) -> PyResult<Bound<'py, PyDict>> {
        trends_dict(py, &self.inner.get_historical_trends(timeframe), "current_depletion")
    }

    /// Forget the previous reading.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Python repr string.
    pub fn __repr__(&self) -> &'static str {
        "BiodiversityTranslator()"
    }
}

// ── Module entry point ───────────────────────────────────────────────────────

/// Ecological signal translators: water stress and biodiversity.
#[pymodule]
pub fn mycelium_signal(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyWaterStressTranslator>()?;
    m.add_class::<PyBiodiversityTranslator>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
