/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Water stress translation: soil moisture and plant stress → feedback pattern.
//!
//! # Pipeline
//!
//! ```text
//! WaterReading ─validate─▶ analyze ─▶ WaterAnalysis ─generate(prev)─▶ FeedbackPattern ─trend─▶ caller
//!                            │                                              ▲
//!                   MoistureThresholds                              TranslatorState
//!                   AdjustmentChain
//! ```
//!
//! # Scoring
//!
//! | Soil moisture | Result |
//! |---------------|--------|
//! | `> saturation_threshold` | saturated, `saturation = (m - sat)/(100 - sat)`, stress 0 |
//! | `<= stress_threshold` | `stress = (thr - m)/thr`, compressed above 0.7 |
//! | `< optimal_low` | `stress = (opt - m)/(opt - thr)` |
//! | otherwise | stress 0 |
//!
//! Secondary indicators then run through the [`AdjustmentChain`] unless the soil is
//! saturated.
//!
//! # Pattern selection (first match wins)
//!
//! 1. **recovery**: previous stress > 0.3, current < 0.3 and lower than before.
//! 2. **affirmation**: no stress, not saturated.
//! 3. **pressure**: saturated.
//! 4. **tension**: drought stress.

use std::borrow::Cow;

use hashbrown::HashMap;

use crate::adjustment::AdjustmentChain;
use crate::error::TranslateError;
use crate::pattern::{
    BodyLocation, Emotion, FeedbackPattern, Frequency, Magnitude, PatternType, PulseCount, Rhythm,
    Trend,
};
use crate::profile::MoistureProfileTable;
use crate::state::{now_unix_seconds, HistoricalTrends, TranslatorState};
use crate::zone::{clamp_unit, LowEdge, Zone};

/// Stress above which the severe-drought power law compresses the excess.
const SEVERE_STRESS_KNEE: f32 = 0.7;

/// Stress at which recovery is considered complete, and above which a previous
/// reading counts as stressed.
const RECOVERY_GATE: f32 = 0.3;

// ─── Reading ────────────────────────────────────────────────────────────────

/// Optional plant and watershed indicators accompanying a soil moisture reading.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaterIndicators {
    /// Leaf water potential in MPa (more negative = more stressed).
    pub leaf_water_potential: Option<f32>,
    /// Stream flow as a fraction of normal.
    pub stream_flow: Option<f32>,
    /// Current depth to the water table.
    pub water_table_depth: Option<f32>,
    /// Normal depth to the water table. Treated as 0 when absent.
    pub normal_water_table_depth: Option<f32>,
    /// Percent below normal precipitation.
    pub precipitation_deficit: Option<f32>,
    /// Any other indicators the sensor network reports. Carried, not scored.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub other: HashMap<String, f32>,
}

/// Sensor payload for one water stress translation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaterReading {
    /// Volumetric soil moisture, percent. Required.
    pub soil_moisture: Option<f32>,
    /// Ecosystem type name. Required.
    pub ecosystem_type: Option<String>,
    /// Secondary indicators.
    pub additional_indicators: Option<WaterIndicators>,
}

impl WaterReading {
    /// A reading with both required fields and no secondary indicators.
    pub fn new(soil_moisture: f32, ecosystem_type: impl Into<String>) -> Self {
        Self {
            soil_moisture: Some(soil_moisture),
            ecosystem_type: Some(ecosystem_type.into()),
            additional_indicators: None,
        }
    }

    /// Attach secondary indicators.
    pub fn with_indicators(mut self, indicators: WaterIndicators) -> Self {
        self.additional_indicators = Some(indicators);
        self
    }
}

// ─── Analysis ───────────────────────────────────────────────────────────────

/// Result of scoring one reading.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterAnalysis {
    /// Drought stress in [0.0, 1.0]. Always 0 when saturated.
    pub stress_level: f32,
    /// Waterlogging rather than drought.
    pub is_saturated: bool,
    /// Waterlogging severity in [0.0, 1.0].
    pub saturation_level: f32,
}

// ─── Config ─────────────────────────────────────────────────────────────────

/// Actuator calibration for water patterns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterFeedbackConfig {
    /// Maximum feedback intensity. Default 10.0.
    pub max_intensity: f32,
    /// Baseline intensity for subtle awareness. Default 2.0.
    pub base_intensity: f32,
    /// Single pulse duration in seconds. Default 0.8.
    pub pulse_duration: f32,
    /// Stress change that counts as a trend. Default 0.1.
    pub trend_threshold: f32,
}

impl Default for WaterFeedbackConfig {
    fn default() -> Self {
        Self {
            max_intensity: 10.0,
            base_intensity: 2.0,
            pulse_duration: 0.8,
            trend_threshold: 0.1,
        }
    }
}

// ─── Translator ─────────────────────────────────────────────────────────────

/// Stateful soil-moisture translator.
///
/// Holds the previous stress level for trend and recovery detection. Use one
/// instance per monitoring history; `translate` takes `&mut self`, so a shared
/// instance cannot be driven by two sessions at once.
#[derive(Clone, Debug)]
pub struct WaterStressTranslator {
    profiles: MoistureProfileTable,
    config: WaterFeedbackConfig,
    adjustments: AdjustmentChain,
    state: TranslatorState,
}

impl WaterStressTranslator {
    /// Translator with the built-in ecosystem profiles and default calibration.
    pub fn new() -> Self {
        Self::with_profiles(MoistureProfileTable::default())
    }

    /// Translator with caller-supplied ecosystem profiles.
    pub fn with_profiles(profiles: MoistureProfileTable) -> Self {
        Self {
            profiles,
            config: WaterFeedbackConfig::default(),
            adjustments: AdjustmentChain::standard(),
            state: TranslatorState::new(),
        }
    }

    /// Replace the actuator calibration.
    pub fn with_config(mut self, config: WaterFeedbackConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the secondary-indicator rule order.
    pub fn with_adjustments(mut self, adjustments: AdjustmentChain) -> Self {
        self.adjustments = adjustments;
        self
    }

    /// Configured ecosystem profiles.
    pub fn profiles(&self) -> &MoistureProfileTable {
        &self.profiles
    }

    /// Actuator calibration.
    pub fn config(&self) -> &WaterFeedbackConfig {
        &self.config
    }

    /// Current history.
    pub fn state(&self) -> &TranslatorState {
        &self.state
    }

    /// Replace the history, e.g. to replay a reading against a known previous state.
    pub fn restore_state(&mut self, state: TranslatorState) {
        self.state = state;
    }

    /// Forget the previous reading.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Score a soil moisture reading for `ecosystem_type`.
    ///
    /// Fails with [`TranslateError::UnknownEcosystemType`] if no profile is configured.
    pub fn analyze(
        &self,
        soil_moisture: f32,
        ecosystem_type: &str,
        additional_indicators: Option<&WaterIndicators>,
    ) -> Result<WaterAnalysis, TranslateError> {
        let t = self.profiles.lookup(ecosystem_type)?;

        if soil_moisture > t.saturation_threshold {
            let saturation_level = clamp_unit(
                (soil_moisture - t.saturation_threshold) / (100.0 - t.saturation_threshold),
            );
            return Ok(WaterAnalysis {
                stress_level: 0.0,
                is_saturated: true,
                saturation_level,
            });
        }

        let base = match Zone::classify(
            soil_moisture,
            t.stress_threshold,
            t.optimal_low,
            LowEdge::Inclusive,
        ) {
            Zone::Depleted(s) if s > SEVERE_STRESS_KNEE => {
                (SEVERE_STRESS_KNEE + (s - SEVERE_STRESS_KNEE).powf(0.7)).min(1.0)
            }
            Zone::Depleted(s) | Zone::Marginal(s) => s,
            Zone::Healthy => 0.0,
        };

        let stress_level = match additional_indicators {
            Some(ind) => self.adjustments.apply(base, ind),
            None => base,
        };

        Ok(WaterAnalysis {
            stress_level: clamp_unit(stress_level),
            is_saturated: false,
            saturation_level: 0.0,
        })
    }

    /// Map an analysis onto a feedback pattern.
    ///
    /// `previous_stress` is the stress of the preceding reading, if any; it only
    /// affects the recovery branch.
    pub fn generate(
        &self,
        stress_level: f32,
        is_saturated: bool,
        saturation_level: f32,
        previous_stress: Option<f32>,
    ) -> FeedbackPattern {
        let c = &self.config;
        let span = c.max_intensity - c.base_intensity;

        if let Some(prev) = previous_stress {
            if stress_level < prev && prev > RECOVERY_GATE && stress_level < RECOVERY_GATE {
                let recovery_ratio = ((prev - stress_level) / prev).min(1.0);
                return FeedbackPattern {
                    pattern_type: PatternType::Recovery,
                    magnitude: Magnitude::Intensity(c.base_intensity + span * recovery_ratio * 0.4),
                    rhythm: Rhythm::SlowRelease,
                    count: PulseCount::Pulses(3),
                    duration: c.pulse_duration * 2.0,
                    frequency: Some(Frequency::MediumLow),
                    location: BodyLocation::WholeBody,
                    description: Cow::Borrowed(
                        "A gentle release from tension to warmth, signaling ecosystem recovery",
                    ),
                    emotion: Emotion::Relief,
                    trend: None,
                };
            }
        }

        if stress_level == 0.0 && !is_saturated {
            return FeedbackPattern {
                pattern_type: PatternType::Affirmation,
                magnitude: Magnitude::Intensity(c.base_intensity * 0.5),
                rhythm: Rhythm::Steady,
                count: PulseCount::Pulses(1),
                duration: c.pulse_duration,
                frequency: Some(Frequency::Low),
                location: BodyLocation::WholeBody,
                description: Cow::Borrowed(
                    "A gentle, affirming warmth indicating healthy water balance",
                ),
                emotion: Emotion::Contentment,
                trend: None,
            };
        }

        if is_saturated {
            // super-linear: severe waterlogging feels disproportionately heavier
            let intensity = c.base_intensity + span * saturation_level.powf(1.5);
            return FeedbackPattern {
                pattern_type: PatternType::Pressure,
                magnitude: Magnitude::Intensity(intensity),
                rhythm: Rhythm::Wave,
                count: PulseCount::Pulses(2),
                duration: c.pulse_duration * 1.5,
                frequency: Some(Frequency::Low),
                location: BodyLocation::ChestAndLimbs,
                description: Cow::Borrowed(
                    "A slow, heavy pressure mimicking the feeling of waterlogged soil",
                ),
                emotion: Emotion::Heaviness,
                trend: None,
            };
        }

        let pulse_count = ((stress_level * 6.0) as u32).clamp(2, 5);
        FeedbackPattern {
            pattern_type: PatternType::Tension,
            magnitude: Magnitude::Intensity(c.base_intensity + span * stress_level.powf(1.5)),
            rhythm: if stress_level > SEVERE_STRESS_KNEE {
                Rhythm::Staccato
            } else {
                Rhythm::Intermittent
            },
            count: PulseCount::Pulses(pulse_count),
            duration: c.pulse_duration * (1.0 - stress_level * 0.5),
            frequency: Some(Frequency::MediumHigh),
            location: BodyLocation::ThroatAndChest,
            description: Cow::Borrowed(
                "A constricting sensation mimicking thirst, intensifying with drought severity",
            ),
            emotion: if stress_level < 0.5 {
                Emotion::Concern
            } else {
                Emotion::Urgency
            },
            trend: None,
        }
    }

    /// Translate one reading into a feedback pattern and advance the history.
    ///
    /// `timestamp` is Unix seconds; the current time is recorded when omitted.
    /// On error the history is left untouched.
    pub fn translate(
        &mut self,
        reading: &WaterReading,
        timestamp: Option<f64>,
    ) -> Result<FeedbackPattern, TranslateError> {
        let (soil_moisture, ecosystem_type) = match (
            reading.soil_moisture.filter(|m| m.is_finite()),
            reading.ecosystem_type.as_deref(),
        ) {
            (Some(m), Some(e)) => (m, e),
            _ => {
                log::warn!("water stress reading rejected: missing soil_moisture or ecosystem_type");
                return Err(TranslateError::MissingSensorData(
                    "soil_moisture and ecosystem_type",
                ));
            }
        };

        let previous_stress = self.state.previous_level();

        let analysis = self
            .analyze(
                soil_moisture,
                ecosystem_type,
                reading.additional_indicators.as_ref(),
            )
            .map_err(|e| {
                log::warn!("water stress reading rejected: {}", e);
                e
            })?;

        let pattern = self.generate(
            analysis.stress_level,
            analysis.is_saturated,
            analysis.saturation_level,
            previous_stress,
        );

        self.state.record(
            analysis.stress_level,
            timestamp.unwrap_or_else(now_unix_seconds),
            Some(soil_moisture),
        );

        let trend = Trend::between(previous_stress, analysis.stress_level, self.config.trend_threshold);
        log::debug!(
            "water_stress {}: moisture={} stress={:.3} saturated={} -> {}",
            ecosystem_type,
            soil_moisture,
            analysis.stress_level,
            analysis.is_saturated,
            pattern.pattern_type.as_str()
        );
        Ok(pattern.with_trend(trend))
    }

    /// Placeholder trend report: last stress level with zero confidence.
    ///
    /// `timeframe` is a free-form caller hint (`"week"`, `"30d"`, ...). It is
    /// accepted and ignored.
    pub fn get_historical_trends(&self, _timeframe: Option<&str>) -> HistoricalTrends {
        HistoricalTrends::from_state(&self.state)
    }
}

impl Default for WaterStressTranslator {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
