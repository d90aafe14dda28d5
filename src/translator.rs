/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Domain addressing: one trait over both translators, and a set that routes
//! domain-tagged readings to the right one.
//!
//! ```text
//! SensorReading::Water        ─▶ TranslatorSet ─▶ WaterStressTranslator   ─▶ FeedbackPattern
//! SensorReading::Biodiversity ─▶               ─▶ BiodiversityTranslator ─▶ FeedbackPattern
//! ```
//!
//! A [`TranslatorSet`] is one history line. Independent monitoring sites need
//! independent sets.

use core::fmt;
use core::str::FromStr;

use crate::biodiversity::{BiodiversityReading, BiodiversityTranslator};
use crate::error::{TranslateError, UnknownDomain};
use crate::pattern::FeedbackPattern;
use crate::state::{HistoricalTrends, TranslatorState};
use crate::water::{WaterReading, WaterStressTranslator};

// ─── EcologicalDomain ───────────────────────────────────────────────────────

/// The ecological signal a translator interprets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EcologicalDomain {
    /// Soil moisture and plant water stress.
    WaterStress,
    /// Species richness and soundscape diversity.
    Biodiversity,
}

impl EcologicalDomain {
    /// Both domains.
    pub const ALL: [EcologicalDomain; 2] =
        [EcologicalDomain::WaterStress, EcologicalDomain::Biodiversity];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            EcologicalDomain::WaterStress => "water_stress",
            EcologicalDomain::Biodiversity => "biodiversity",
        }
    }
}

impl fmt::Display for EcologicalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EcologicalDomain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "water_stress" => Ok(EcologicalDomain::WaterStress),
            "biodiversity" => Ok(EcologicalDomain::Biodiversity),
            other => Err(UnknownDomain(other.to_owned())),
        }
    }
}

// ─── Trait ──────────────────────────────────────────────────────────────────

/// Common surface of the ecological translators.
pub trait EcologicalTranslator {
    /// Sensor payload accepted by `translate`.
    type Reading;

    /// Which domain this translator interprets.
    fn domain(&self) -> EcologicalDomain;

    /// Translate one reading and advance the history. Failures leave the history untouched.
    fn translate(
        &mut self,
        reading: &Self::Reading,
        timestamp: Option<f64>,
    ) -> Result<FeedbackPattern, TranslateError>;

    /// Placeholder trend report over the stored history.
    fn historical_trends(&self, timeframe: Option<&str>) -> HistoricalTrends;

    /// Current history.
    fn state(&self) -> &TranslatorState;

    /// Replace the history.
    fn restore_state(&mut self, state: TranslatorState);

    /// Forget the previous reading.
    fn reset(&mut self);
}

impl EcologicalTranslator for WaterStressTranslator {
    type Reading = WaterReading;

    fn domain(&self) -> EcologicalDomain {
        EcologicalDomain::WaterStress
    }

    fn translate(
        &mut self,
        reading: &WaterReading,
        timestamp: Option<f64>,
    ) -> Result<FeedbackPattern, TranslateError> {
        WaterStressTranslator::translate(self, reading, timestamp)
    }

    fn historical_trends(&self, timeframe: Option<&str>) -> HistoricalTrends {
        self.get_historical_trends(timeframe)
    }

    fn state(&self) -> &TranslatorState {
        WaterStressTranslator::state(self)
    }

    fn restore_state(&mut self, state: TranslatorState) {
        WaterStressTranslator::restore_state(self, state)
    }

    fn reset(&mut self) {
        WaterStressTranslator::reset(self)
    }
}

impl EcologicalTranslator for BiodiversityTranslator {
    type Reading = BiodiversityReading;

    fn domain(&self) -> EcologicalDomain {
        EcologicalDomain::Biodiversity
    }

    fn translate(
        &mut self,
        reading: &BiodiversityReading,
        timestamp: Option<f64>,
    ) -> Result<FeedbackPattern, TranslateError> {
        BiodiversityTranslator::translate(self, reading, timestamp)
    }

    fn historical_trends(&self, timeframe: Option<&str>) -> HistoricalTrends {
        self.get_historical_trends(timeframe)
    }

    fn state(&self) -> &TranslatorState {
        BiodiversityTranslator::state(self)
    }

    fn restore_state(&mut self, state: TranslatorState) {
        BiodiversityTranslator::restore_state(self, state)
    }

    fn reset(&mut self) {
        BiodiversityTranslator::reset(self)
    }
}

// ─── SensorReading ──────────────────────────────────────────────────────────

/// A reading tagged with its domain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "domain", content = "sensor_data", rename_all = "snake_case")
)]
pub enum SensorReading {
    /// Soil moisture reading.
    #[cfg_attr(feature = "serde", serde(rename = "water_stress"))]
    Water(WaterReading),
    /// Biodiversity survey.
    Biodiversity(BiodiversityReading),
}

impl SensorReading {
    /// The domain this reading belongs to.
    pub fn domain(&self) -> EcologicalDomain {
        match self {
            SensorReading::Water(_) => EcologicalDomain::WaterStress,
            SensorReading::Biodiversity(_) => EcologicalDomain::Biodiversity,
        }
    }
}

impl From<WaterReading> for SensorReading {
    fn from(r: WaterReading) -> Self {
        SensorReading::Water(r)
    }
}

impl From<BiodiversityReading> for SensorReading {
    fn from(r: BiodiversityReading) -> Self {
        SensorReading::Biodiversity(r)
    }
}

// ─── TranslatorSet ──────────────────────────────────────────────────────────

/// One translator per domain, sharing a single history line.
#[derive(Clone, Debug, Default)]
pub struct TranslatorSet {
    water: WaterStressTranslator,
    biodiversity: BiodiversityTranslator,
}

impl TranslatorSet {
    /// Both translators with built-in profiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set built from pre-configured translators.
    pub fn from_translators(water: WaterStressTranslator, biodiversity: BiodiversityTranslator) -> Self {
        Self {
            water,
            biodiversity,
        }
    }

    /// The water stress translator.
    pub fn water(&self) -> &WaterStressTranslator {
        &self.water
    }

    /// The water stress translator, mutably.
    pub fn water_mut(&mut self) -> &mut WaterStressTranslator {
        &mut self.water
    }

    /// The biodiversity translator.
    pub fn biodiversity(&self) -> &BiodiversityTranslator {
        &self.biodiversity
    }

    /// The biodiversity translator, mutably.
    pub fn biodiversity_mut(&mut self) -> &mut BiodiversityTranslator {
        &mut self.biodiversity
    }

    /// Translate `reading` with the `domain` translator.
    ///
    /// A reading tagged for a different domain fails with
    /// [`TranslateError::MissingSensorData`]: the requested domain's required
    /// fields are absent.
    pub fn translate(
        &mut self,
        domain: EcologicalDomain,
        reading: &SensorReading,
        timestamp: Option<f64>,
    ) -> Result<FeedbackPattern, TranslateError> {
        match (domain, reading) {
            (EcologicalDomain::WaterStress, SensorReading::Water(r)) => {
                self.water.translate(r, timestamp)
            }
            (EcologicalDomain::Biodiversity, SensorReading::Biodiversity(r)) => {
                self.biodiversity.translate(r, timestamp)
            }
            (requested, _) => {
                log::warn!(
                    "{} reading routed to {} translator",
                    reading.domain(),
                    requested
                );
                Err(TranslateError::MissingSensorData(match requested {
                    EcologicalDomain::WaterStress => "soil_moisture and ecosystem_type",
                    EcologicalDomain::Biodiversity => {
                        "ecosystem_type and at least one biodiversity metric"
                    }
                }))
            }
        }
    }

    /// Translate `reading` with the translator of its own domain.
    pub fn dispatch(
        &mut self,
        reading: &SensorReading,
        timestamp: Option<f64>,
    ) -> Result<FeedbackPattern, TranslateError> {
        self.translate(reading.domain(), reading, timestamp)
    }

    /// Placeholder trend report for one domain.
    pub fn get_historical_trends(
        &self,
        domain: EcologicalDomain,
        timeframe: Option<&str>,
    ) -> HistoricalTrends {
        match domain {
            EcologicalDomain::WaterStress => self.water.get_historical_trends(timeframe),
            EcologicalDomain::Biodiversity => self.biodiversity.get_historical_trends(timeframe),
        }
    }

    /// Forget the history of both translators.
    pub fn reset(&mut self) {
        self.water.reset();
        self.biodiversity.reset();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
