//! # mycelium-signal
//!
//! Ecological signal translation: environmental sensor readings in, embodied feedback
//! patterns out.
//!
//! ---
//!
//! Two translators turn raw field data into patterns a haptic wearable can play:
//!
//! **Water stress**: soil moisture, scored against per-ecosystem thresholds and refined
//! by plant and watershed indicators, becomes a thirst-like *tension*, a waterlogged
//! *pressure*, a calm *affirmation*, or a *recovery* release.
//!
//! **Biodiversity**: species counts, Shannon index and acoustic diversity become a
//! full *harmony*, a *simplified harmony*, a sparse *monotony*, or an *expanding
//! harmony* when an ecosystem is coming back.
//!
//! Each translator remembers its previous severity, so consecutive readings carry a
//! trend and can trigger the recovery patterns.
//!
//! ## The pipeline
//!
//! ```text
//! Reading → validate → analyze → severity ∈ [0,1] → generate → FeedbackPattern (+ trend)
//!                         ↑                             ↑
//!                 EcosystemProfileTable          TranslatorState
//!                 AdjustmentChain (water)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`water`] | [`WaterStressTranslator`], [`WaterReading`] | Soil moisture → stress/saturation → water pattern |
//! | [`biodiversity`] | [`BiodiversityTranslator`], [`BiodiversityReading`] | Species metrics → depletion → harmony pattern |
//! | [`adjustment`] | [`AdjustmentChain`], [`StressAdjustment`] | Ordered secondary-indicator rules for water stress |
//! | [`profile`] | [`MoistureProfileTable`], [`DiversityProfileTable`] | Per-ecosystem thresholds with built-in defaults |
//! | [`pattern`] | [`FeedbackPattern`], [`Trend`] | The output vocabulary |
//! | [`state`] | [`TranslatorState`], [`HistoricalTrends`] | Previous reading and the trend stub |
//! | [`translator`] | [`EcologicalTranslator`], [`TranslatorSet`] | Domain addressing and dispatch |
//! | [`zone`] | [`Zone`] | Two-zone depletion curve shared by both translators |
//! | [`error`] | [`TranslateError`], [`ProfileError`] | Failure kinds |
//!
//! ## Example
//!
//! ```
//! use mycelium_signal::{PatternType, WaterReading, WaterStressTranslator};
//!
//! let mut translator = WaterStressTranslator::new();
//! let pattern = translator
//!     .translate(&WaterReading::new(18.0, "temperate_forest"), None)
//!     .unwrap();
//! assert_eq!(pattern.pattern_type, PatternType::Tension);
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` on readings, patterns, profiles and state.
//! - `python-ffi`: PyO3 bindings (see [`ffi`] when enabled).
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod adjustment;
pub mod biodiversity;
pub mod error;
pub mod pattern;
pub mod profile;
pub mod state;
pub mod translator;
pub mod water;
pub mod zone;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use adjustment::{AdjustmentChain, StressAdjustment};
pub use biodiversity::{BiodiversityFeedbackConfig, BiodiversityReading, BiodiversityTranslator};
pub use error::{ProfileError, TranslateError, UnknownDomain};
pub use pattern::{
    BodyLocation, Emotion, FeedbackPattern, Frequency, Magnitude, PatternType, PulseCount, Rhythm,
    Trend, TrendDirection,
};
pub use profile::{
    DiversityIndicator, DiversityProfileTable, DiversityThresholds, EcosystemProfileTable,
    IndicatorThresholds, MoistureProfileTable, MoistureThresholds, Thresholds,
};
pub use state::{HistoricalTrends, LastReading, TranslatorState, TrendAssessment};
pub use translator::{EcologicalDomain, EcologicalTranslator, SensorReading, TranslatorSet};
pub use water::{WaterAnalysis, WaterFeedbackConfig, WaterIndicators, WaterReading, WaterStressTranslator};
pub use zone::{LowEdge, Zone};
