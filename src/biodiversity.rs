/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Biodiversity translation: species and acoustic metrics → feedback pattern.
//!
//! Each recognised indicator is scored on the two-zone depletion curve of
//! [`Zone`], weighted per indicator, and the scores are averaged:
//!
//! | Indicator | below `low_threshold` | below `optimal_low` |
//! |-----------|-----------------------|---------------------|
//! | `species_count` | ×1.2 | ×0.8 |
//! | `bird_species` | ×1.0 | ×0.7 |
//! | `insect_orders` | ×1.1 | ×0.8 |
//! | `shannon_index` | ×1.3 | ×0.9 |
//! | `acoustic_diversity` | `max(0, 1 - a)` | |
//!
//! A reading with no scoreable indicator gets the moderate default of 0.5.
//!
//! # Pattern selection (first match wins)
//!
//! 1. **expanding_harmony**: previous depletion > 0.3 and falling.
//! 2. **harmony**: depletion < 0.2.
//! 3. **simplified_harmony**: depletion < 0.5.
//! 4. **monotony**: otherwise.

use std::borrow::Cow;

use hashbrown::HashMap;
use heapless::Vec as HVec;

use crate::error::TranslateError;
use crate::pattern::{
    BodyLocation, Emotion, FeedbackPattern, Frequency, Magnitude, PatternType, PulseCount, Rhythm,
    Trend,
};
use crate::profile::{DiversityIndicator, DiversityProfileTable};
use crate::state::{now_unix_seconds, HistoricalTrends, TranslatorState};
use crate::zone::{clamp_unit, LowEdge, Zone};

/// Four threshold indicators plus acoustic diversity.
const MAX_SCORES: usize = DiversityIndicator::ALL.len() + 1;

/// Depletion assumed when no indicator can be scored.
pub const DEFAULT_DEPLETION: f32 = 0.5;

/// Payload keys that never count as metrics, even when they land in
/// [`BiodiversityReading::other`].
pub const RESERVED_KEYS: [&str; 2] = ["ecosystem_type", "timestamp"];

/// Previous depletion above which a falling reading counts as recovery.
const RECOVERY_GATE: f32 = 0.3;

/// `(below_threshold, near_threshold)` weights.
fn weights(indicator: DiversityIndicator) -> (f32, f32) {
    match indicator {
        DiversityIndicator::SpeciesCount => (1.2, 0.8),
        DiversityIndicator::BirdSpecies => (1.0, 0.7),
        DiversityIndicator::InsectOrders => (1.1, 0.8),
        DiversityIndicator::ShannonIndex => (1.3, 0.9),
    }
}

// ─── Reading ────────────────────────────────────────────────────────────────

/// Sensor payload for one biodiversity translation.
///
/// `ecosystem_type` and at least one metric are required. Non-finite values are
/// treated as absent.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BiodiversityReading {
    /// Ecosystem type name.
    pub ecosystem_type: Option<String>,
    /// Overall species count.
    pub species_count: Option<f32>,
    /// Bird species observed.
    pub bird_species: Option<f32>,
    /// Insect orders observed.
    pub insect_orders: Option<f32>,
    /// Shannon diversity index.
    pub shannon_index: Option<f32>,
    /// Soundscape diversity in [0.0, 1.0].
    pub acoustic_diversity: Option<f32>,
    /// Metrics without a scoring rule. They satisfy the "at least one metric"
    /// requirement but contribute no score.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub other: HashMap<String, f32>,
}

impl BiodiversityReading {
    /// An empty reading for `ecosystem_type`. Add metrics with the `with_*` builders.
    pub fn new(ecosystem_type: impl Into<String>) -> Self {
        Self {
            ecosystem_type: Some(ecosystem_type.into()),
            ..Self::default()
        }
    }

    /// Set one threshold indicator.
    pub fn with_indicator(mut self, indicator: DiversityIndicator, value: f32) -> Self {
        *self.slot(indicator) = Some(value);
        self
    }

    /// Set acoustic diversity.
    pub fn with_acoustic_diversity(mut self, value: f32) -> Self {
        self.acoustic_diversity = Some(value);
        self
    }

    /// Add a metric without a scoring rule.
    pub fn with_metric(mut self, name: impl Into<String>, value: f32) -> Self {
        self.other.insert(name.into(), value);
        self
    }

    /// The finite value of `indicator`, if present.
    pub fn indicator(&self, indicator: DiversityIndicator) -> Option<f32> {
        let v = match indicator {
            DiversityIndicator::SpeciesCount => self.species_count,
            DiversityIndicator::BirdSpecies => self.bird_species,
            DiversityIndicator::InsectOrders => self.insect_orders,
            DiversityIndicator::ShannonIndex => self.shannon_index,
        };
        v.filter(|x| x.is_finite())
    }

    /// `true` if any metric, scored or not, is present. [`RESERVED_KEYS`] are
    /// not metrics.
    pub fn has_metrics(&self) -> bool {
        DiversityIndicator::ALL
            .iter()
            .any(|&i| self.indicator(i).is_some())
            || self.acoustic_diversity.is_some_and(f32::is_finite)
            || self
                .other
                .iter()
                .any(|(k, v)| v.is_finite() && !RESERVED_KEYS.contains(&k.as_str()))
    }

    fn slot(&mut self, indicator: DiversityIndicator) -> &mut Option<f32> {
        match indicator {
            DiversityIndicator::SpeciesCount => &mut self.species_count,
            DiversityIndicator::BirdSpecies => &mut self.bird_species,
            DiversityIndicator::InsectOrders => &mut self.insect_orders,
            DiversityIndicator::ShannonIndex => &mut self.shannon_index,
        }
    }
}

// ─── Config ─────────────────────────────────────────────────────────────────

/// Actuator calibration for biodiversity patterns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiodiversityFeedbackConfig {
    /// Maximum pattern complexity. Default 10.0.
    pub max_complexity: f32,
    /// Baseline complexity. Default 3.0.
    pub base_complexity: f32,
    /// Depletion change that counts as a trend. Default 0.05.
    pub trend_threshold: f32,
}

impl Default for BiodiversityFeedbackConfig {
    fn default() -> Self {
        Self {
            max_complexity: 10.0,
            base_complexity: 3.0,
            trend_threshold: 0.05,
        }
    }
}

// ─── Translator ─────────────────────────────────────────────────────────────

/// Stateful biodiversity translator. One instance per monitoring history.
#[derive(Clone, Debug)]
pub struct BiodiversityTranslator {
    profiles: DiversityProfileTable,
    config: BiodiversityFeedbackConfig,
    state: TranslatorState,
}

impl BiodiversityTranslator {
    /// Translator with the built-in ecosystem profiles and default calibration.
    pub fn new() -> Self {
        Self::with_profiles(DiversityProfileTable::default())
    }

    /// Translator with caller-supplied ecosystem profiles.
    pub fn with_profiles(profiles: DiversityProfileTable) -> Self {
        Self {
            profiles,
            config: BiodiversityFeedbackConfig::default(),
            state: TranslatorState::new(),
        }
    }

    /// Replace the actuator calibration.
    pub fn with_config(mut self, config: BiodiversityFeedbackConfig) -> Self {
        self.config = config;
        self
    }

    /// Configured ecosystem profiles.
    pub fn profiles(&self) -> &DiversityProfileTable {
        &self.profiles
    }

    /// Actuator calibration.
    pub fn config(&self) -> &BiodiversityFeedbackConfig {
        &self.config
    }

    /// Current history.
    pub fn state(&self) -> &TranslatorState {
        &self.state
    }

    /// Replace the history.
    pub fn restore_state(&mut self, state: TranslatorState) {
        self.state = state;
    }

    /// Forget the previous reading.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Depletion level in [0.0, 1.0] for `data` scored against `ecosystem_type`.
    ///
    /// The `ecosystem_type` field of `data` is ignored here.
    pub fn analyze(
        &self,
        data: &BiodiversityReading,
        ecosystem_type: &str,
    ) -> Result<f32, TranslateError> {
        let t = self.profiles.lookup(ecosystem_type)?;

        let scores: HVec<f32, MAX_SCORES> = DiversityIndicator::ALL
            .iter()
            .filter_map(|&indicator| {
                let value = data.indicator(indicator)?;
                let th = t.get(indicator);
                let (below, near) = weights(indicator);
                Some(
                    Zone::classify(value, th.low_threshold, th.optimal_low, LowEdge::Exclusive)
                        .weighted(below, near),
                )
            })
            .chain(
                data.acoustic_diversity
                    .filter(|a| a.is_finite())
                    .map(|a| (1.0 - a).max(0.0)),
            )
            .collect();

        if scores.is_empty() {
            return Ok(DEFAULT_DEPLETION);
        }
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        Ok(clamp_unit(mean))
    }

    /// Map a depletion level onto a feedback pattern.
    pub fn generate(&self, depletion_level: f32, previous_depletion: Option<f32>) -> FeedbackPattern {
        let c = &self.config;
        let d = depletion_level;
        let health = 1.0 - d;

        if let Some(prev) = previous_depletion {
            if d < prev && prev > RECOVERY_GATE {
                return FeedbackPattern {
                    pattern_type: PatternType::ExpandingHarmony,
                    magnitude: Magnitude::Complexity(
                        c.base_complexity + (c.max_complexity - c.base_complexity) * health,
                    ),
                    rhythm: Rhythm::Building,
                    count: PulseCount::Layers(((health * 8.0) as u32).max(2)),
                    duration: 4.0,
                    frequency: None,
                    location: BodyLocation::WholeBody,
                    description: Cow::Borrowed(
                        "A gradually expanding sensation of harmony, like a forest awakening",
                    ),
                    emotion: Emotion::Hope,
                    trend: None,
                };
            }
        }

        if d < 0.2 {
            FeedbackPattern {
                pattern_type: PatternType::Harmony,
                magnitude: Magnitude::Complexity(c.max_complexity * 0.8),
                rhythm: Rhythm::Layered,
                count: PulseCount::Layers(((health * 10.0) as u32).max(3)),
                duration: 3.0,
                frequency: Some(Frequency::FullSpectrum),
                location: BodyLocation::WholeBody,
                description: Cow::Borrowed(
                    "A rich, expansive symphony of sensations, like standing in a vibrant ecosystem",
                ),
                emotion: Emotion::Wonder,
                trend: None,
            }
        } else if d < 0.5 {
            FeedbackPattern {
                pattern_type: PatternType::SimplifiedHarmony,
                magnitude: Magnitude::Complexity(c.max_complexity * 0.5),
                rhythm: Rhythm::Regular,
                count: PulseCount::Layers(((health * 6.0) as u32).max(2)),
                duration: 2.5,
                frequency: Some(Frequency::Limited),
                location: BodyLocation::TorsoAndArms,
                description: Cow::Borrowed(
                    "A pleasant but simplified pattern, like a garden with fewer species",
                ),
                emotion: Emotion::Contentment,
                trend: None,
            }
        } else {
            FeedbackPattern {
                pattern_type: PatternType::Monotony,
                magnitude: Magnitude::Complexity(
                    c.base_complexity + (c.max_complexity - c.base_complexity) * health,
                ),
                rhythm: Rhythm::Repetitive,
                count: PulseCount::Layers(((health * 3.0) as u32).max(1)),
                duration: 2.0,
                frequency: Some(Frequency::Narrow),
                location: BodyLocation::ArmsOnly,
                description: Cow::Borrowed(
                    "A sparse, monotonous pulse signaling ecological simplification",
                ),
                emotion: if d < 0.7 {
                    Emotion::Concern
                } else {
                    Emotion::Alarm
                },
                trend: None,
            }
        }
    }

    /// Translate one reading into a feedback pattern and advance the history.
    ///
    /// `timestamp` is Unix seconds; the current time is recorded when omitted.
    /// On error the history is left untouched.
    pub fn translate(
        &mut self,
        reading: &BiodiversityReading,
        timestamp: Option<f64>,
    ) -> Result<FeedbackPattern, TranslateError> {
        let ecosystem_type = match reading.ecosystem_type.as_deref() {
            Some(e) if reading.has_metrics() => e,
            _ => {
                log::warn!("biodiversity reading rejected: missing ecosystem_type or metrics");
                return Err(TranslateError::MissingSensorData(
                    "ecosystem_type and at least one biodiversity metric",
                ));
            }
        };

        let previous = self.state.previous_level();

        let depletion = self.analyze(reading, ecosystem_type).map_err(|e| {
            log::warn!("biodiversity reading rejected: {}", e);
            e
        })?;

        let pattern = self.generate(depletion, previous);
        self.state
            .record(depletion, timestamp.unwrap_or_else(now_unix_seconds), None);

        let trend = Trend::between(previous, depletion, self.config.trend_threshold);
        log::debug!(
            "biodiversity {}: depletion={:.3} -> {}",
            ecosystem_type,
            depletion,
            pattern.pattern_type.as_str()
        );
        Ok(pattern.with_trend(trend))
    }

    /// Placeholder trend report: last depletion level with zero confidence.
    pub fn get_historical_trends(&self, _timeframe: Option<&str>) -> HistoricalTrends {
        HistoricalTrends::from_state(&self.state)
    }
}

impl Default for BiodiversityTranslator {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::TrendDirection;

    use crate::profile::DiversityIndicator::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn sample() -> BiodiversityReading {
        BiodiversityReading::new("temperate_forest")
            .with_indicator(SpeciesCount, 28.0)
            .with_indicator(BirdSpecies, 18.0)
            .with_indicator(InsectOrders, 8.0)
            .with_indicator(ShannonIndex, 2.8)
            .with_acoustic_diversity(0.65)
    }

    #[test]
    fn test_sample_reading_scores_acoustic_only() {
        let t = BiodiversityTranslator::new();
        let d = t.analyze(&sample(), "temperate_forest").unwrap();
        assert!(close(d, 0.07), "depletion={}", d);
    }

    #[test]
    fn test_weighted_zones() {
        let t = BiodiversityTranslator::new();
        // grassland species low 8: (8 - 4)/8 × 1.2 = 0.6
        let r = BiodiversityReading::new("grassland").with_indicator(SpeciesCount, 4.0);
        assert!(close(t.analyze(&r, "grassland").unwrap(), 0.6));

        // plus birds between 6 and 10: (10 - 8)/4 × 0.7 = 0.35
        let r = r.with_indicator(BirdSpecies, 8.0);
        let d = t.analyze(&r, "grassland").unwrap();
        assert!(close(d, 0.475), "depletion={}", d);
    }

    #[test]
    fn test_low_threshold_is_exclusive() {
        let t = BiodiversityTranslator::new();
        // exactly at low 10: near-threshold branch, (20 - 10)/10 × 0.8
        let r = BiodiversityReading::new("temperate_forest").with_indicator(SpeciesCount, 10.0);
        assert!(close(t.analyze(&r, "temperate_forest").unwrap(), 0.8));
    }

    #[test]
    fn test_mean_is_clamped() {
        let t = BiodiversityTranslator::new();
        // 1.2 and 1.3 would average to 1.25
        let r = BiodiversityReading::new("desert_scrub")
            .with_indicator(SpeciesCount, 0.0)
            .with_indicator(ShannonIndex, 0.0);
        assert_eq!(t.analyze(&r, "desert_scrub").unwrap(), 1.0);
    }

    #[test]
    fn test_acoustic_above_one_scores_zero() {
        let t = BiodiversityTranslator::new();
        let r = BiodiversityReading::new("wetland").with_acoustic_diversity(1.4);
        assert_eq!(t.analyze(&r, "wetland").unwrap(), 0.0);
    }

    #[test]
    fn test_no_indicators_defaults_to_moderate() {
        let t = BiodiversityTranslator::new();
        let r = BiodiversityReading::new("wetland").with_metric("fungal_richness", 12.0);
        assert_eq!(t.analyze(&r, "wetland").unwrap(), DEFAULT_DEPLETION);
    }

    #[test]
    fn test_unknown_ecosystem() {
        let t = BiodiversityTranslator::new();
        assert_eq!(
            t.analyze(&sample(), "tundra").unwrap_err(),
            TranslateError::UnknownEcosystemType("tundra".into())
        );
    }

    #[test]
    fn test_generate_bands() {
        let t = BiodiversityTranslator::new();

        let p = t.generate(0.07, None);
        assert_eq!(p.pattern_type, PatternType::Harmony);
        assert_eq!(p.emotion, Emotion::Wonder);
        assert_eq!(p.count, PulseCount::Layers(9));
        assert_eq!(p.magnitude, Magnitude::Complexity(8.0));

        let p = t.generate(0.3, None);
        assert_eq!(p.pattern_type, PatternType::SimplifiedHarmony);
        assert_eq!(p.emotion, Emotion::Contentment);
        assert_eq!(p.count, PulseCount::Layers(4));

        let p = t.generate(0.6, None);
        assert_eq!(p.pattern_type, PatternType::Monotony);
        assert_eq!(p.emotion, Emotion::Concern);

        let p = t.generate(0.8, None);
        assert_eq!(p.emotion, Emotion::Alarm);
        assert_eq!(p.count, PulseCount::Layers(1));
        assert!(close(p.magnitude.value(), 3.0 + 7.0 * 0.2));
    }

    #[test]
    fn test_generate_expanding_harmony() {
        let t = BiodiversityTranslator::new();
        let p = t.generate(0.4, Some(0.6));
        assert_eq!(p.pattern_type, PatternType::ExpandingHarmony);
        assert_eq!(p.emotion, Emotion::Hope);
        assert_eq!(p.frequency, None);
        assert_eq!(p.count, PulseCount::Layers(4));
        assert!(close(p.magnitude.value(), 3.0 + 7.0 * 0.6));

        // previous not depleted enough
        let p = t.generate(0.1, Some(0.3));
        assert_eq!(p.pattern_type, PatternType::Harmony);
        // rising depletion
        let p = t.generate(0.7, Some(0.6));
        assert_eq!(p.pattern_type, PatternType::Monotony);
    }

    #[test]
    fn test_translate_requires_metrics() {
        let mut t = BiodiversityTranslator::new();
        let r = BiodiversityReading::new("wetland");
        assert!(matches!(
            t.translate(&r, Some(1.0)),
            Err(TranslateError::MissingSensorData(_))
        ));

        let r = BiodiversityReading {
            species_count: Some(30.0),
            ..Default::default()
        };
        assert!(matches!(
            t.translate(&r, Some(1.0)),
            Err(TranslateError::MissingSensorData(_))
        ));

        let r = BiodiversityReading::new("wetland").with_indicator(SpeciesCount, f32::NAN);
        assert!(t.translate(&r, Some(1.0)).is_err());
        assert!(t.state().is_empty());
    }

    #[test]
    fn test_timestamp_key_is_not_a_metric() {
        let mut t = BiodiversityTranslator::new();
        let r = BiodiversityReading::new("wetland").with_metric("timestamp", 1.7e9);
        assert!(!r.has_metrics());
        assert!(matches!(
            t.translate(&r, Some(1.0)),
            Err(TranslateError::MissingSensorData(_))
        ));
        assert!(t.state().is_empty());

        let r = r.with_metric("frog_calls", 12.0);
        assert!(r.has_metrics());
        assert!(t.translate(&r, Some(1.0)).is_ok());
    }

    #[test]
    fn test_translate_sample() {
        let mut t = BiodiversityTranslator::new();
        let p = t.translate(&sample(), Some(100.0)).unwrap();
        assert_eq!(p.pattern_type, PatternType::Harmony);
        assert_eq!(p.emotion, Emotion::Wonder);
        assert!(p.trend.is_none());
        let last = t.state().last().unwrap();
        assert!(close(last.level, 0.07));
        assert_eq!(last.raw_value, None);
    }

    #[test]
    fn test_translate_trend_threshold() {
        let mut t = BiodiversityTranslator::new();
        t.translate(&sample(), Some(1.0)).unwrap();

        // acoustic 0.6 → mean 0.08: change 0.01
        let r = sample().with_acoustic_diversity(0.6);
        assert!(t.translate(&r, Some(2.0)).unwrap().trend.is_none());

        // acoustic 0.2 → mean 0.16: change 0.08
        let r = sample().with_acoustic_diversity(0.2);
        let trend = t.translate(&r, Some(3.0)).unwrap().trend.unwrap();
        assert_eq!(trend.direction, TrendDirection::Worsening);
        assert!(close(trend.magnitude, 0.08), "magnitude={}", trend.magnitude);
    }

    #[test]
    fn test_translate_failure_leaves_state() {
        let mut t = BiodiversityTranslator::new();
        t.translate(&sample(), Some(1.0)).unwrap();
        let before = t.state().clone();
        let mut r = sample();
        r.ecosystem_type = Some("tundra".into());
        assert!(t.translate(&r, Some(2.0)).is_err());
        assert_eq!(t.state(), &before);
    }

    #[test]
    fn test_historical_trends_stub() {
        let mut t = BiodiversityTranslator::new();
        t.translate(&sample(), Some(9.0)).unwrap();
        let h = t.get_historical_trends(None);
        assert!(close(h.current_level.unwrap(), 0.07));
        let h = t.get_historical_trends(Some("season"));
        assert!(close(h.current_level.unwrap(), 0.07));
        assert_eq!(h.last_reading_time, Some(9.0));
        assert_eq!(h.confidence, 0.0);
    }
}
