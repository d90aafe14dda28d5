/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Feedback pattern vocabulary: the output of every translator.
//!
//! A [`FeedbackPattern`] is a plain value describing one haptic gesture for the
//! delivery layer: what kind of sensation, how strong, how it pulses, where on the
//! body, and what it is meant to feel like.
//!
//! | Field | Water patterns | Biodiversity patterns |
//! |-------|----------------|-----------------------|
//! | magnitude | [`Magnitude::Intensity`] | [`Magnitude::Complexity`] |
//! | count | [`PulseCount::Pulses`] | [`PulseCount::Layers`] |
//! | frequency | low / medium_low / medium_high | full_spectrum / limited / narrow |
//!
//! With the `serde` feature, a pattern serialises to the flat snake_case mapping the
//! delivery layer consumes (`{"type": "tension", "intensity": 4.7, "pulse_count": 2, ...}`).
//! The band is keyed `frequency` on water patterns and `frequency_range` on
//! biodiversity patterns.

use std::borrow::Cow;

// ─── Tag enums ──────────────────────────────────────────────────────────────

/// Kind of feedback pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PatternType {
    /// Water: release from drought tension.
    Recovery,
    /// Water: healthy balance.
    Affirmation,
    /// Water: waterlogged soil.
    Pressure,
    /// Water: drought stress.
    Tension,
    /// Biodiversity: depletion easing.
    ExpandingHarmony,
    /// Biodiversity: rich, healthy community.
    Harmony,
    /// Biodiversity: moderate diversity.
    SimplifiedHarmony,
    /// Biodiversity: depleted community.
    Monotony,
}

impl PatternType {
    /// Wire name of this pattern type.
    pub fn as_str(self) -> &'static str {
        match self {
            PatternType::Recovery => "recovery",
            PatternType::Affirmation => "affirmation",
            PatternType::Pressure => "pressure",
            PatternType::Tension => "tension",
            PatternType::ExpandingHarmony => "expanding_harmony",
            PatternType::Harmony => "harmony",
            PatternType::SimplifiedHarmony => "simplified_harmony",
            PatternType::Monotony => "monotony",
        }
    }
}

/// Pulse cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rhythm {
    /// Long, easing pulses.
    SlowRelease,
    /// Even, unhurried beat.
    Steady,
    /// Rolling swell and ebb.
    Wave,
    /// Short, sharp bursts.
    Staccato,
    /// Irregular gaps between pulses.
    Intermittent,
    /// Layers added one after another.
    Building,
    /// Overlapping simultaneous textures.
    Layered,
    /// Fixed, predictable beat.
    Regular,
    /// A single texture repeated.
    Repetitive,
}

impl Rhythm {
    /// Wire name of this rhythm.
    pub fn as_str(self) -> &'static str {
        match self {
            Rhythm::SlowRelease => "slow_release",
            Rhythm::Steady => "steady",
            Rhythm::Wave => "wave",
            Rhythm::Staccato => "staccato",
            Rhythm::Intermittent => "intermittent",
            Rhythm::Building => "building",
            Rhythm::Layered => "layered",
            Rhythm::Regular => "regular",
            Rhythm::Repetitive => "repetitive",
        }
    }
}

/// Vibration frequency band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Frequency {
    /// Low band.
    Low,
    /// Lower-middle band.
    MediumLow,
    /// Upper-middle band.
    MediumHigh,
    /// Every actuator band at once.
    FullSpectrum,
    /// A few adjacent bands.
    Limited,
    /// A single band.
    Narrow,
}

impl Frequency {
    /// Wire name of this band.
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Low => "low",
            Frequency::MediumLow => "medium_low",
            Frequency::MediumHigh => "medium_high",
            Frequency::FullSpectrum => "full_spectrum",
            Frequency::Limited => "limited",
            Frequency::Narrow => "narrow",
        }
    }
}

/// Where on the body the pattern is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyLocation {
    /// Every actuator.
    WholeBody,
    /// Chest plus arm and leg actuators.
    ChestAndLimbs,
    /// Collar and chest actuators.
    ThroatAndChest,
    /// Torso plus arm actuators.
    TorsoAndArms,
    /// Arm actuators only.
    ArmsOnly,
}

impl BodyLocation {
    /// Wire name of this location.
    pub fn as_str(self) -> &'static str {
        match self {
            BodyLocation::WholeBody => "whole_body",
            BodyLocation::ChestAndLimbs => "chest_and_limbs",
            BodyLocation::ThroatAndChest => "throat_and_chest",
            BodyLocation::TorsoAndArms => "torso_and_arms",
            BodyLocation::ArmsOnly => "arms_only",
        }
    }
}

/// Emotional register the pattern is designed to evoke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Emotion {
    /// Stress easing.
    Relief,
    /// Healthy, nothing to do.
    Contentment,
    /// Waterlogged, oppressive.
    Heaviness,
    /// Moderate worry.
    Concern,
    /// Severe drought.
    Urgency,
    /// Depletion recovering.
    Hope,
    /// Thriving community.
    Wonder,
    /// Severe depletion.
    Alarm,
}

impl Emotion {
    /// Wire name of this emotion.
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Relief => "relief",
            Emotion::Contentment => "contentment",
            Emotion::Heaviness => "heaviness",
            Emotion::Concern => "concern",
            Emotion::Urgency => "urgency",
            Emotion::Hope => "hope",
            Emotion::Wonder => "wonder",
            Emotion::Alarm => "alarm",
        }
    }
}

// ─── Magnitude / count ──────────────────────────────────────────────────────

/// Strength of the pattern. Water patterns carry intensity, biodiversity
/// patterns carry complexity; both are on the same 0–10 actuator scale.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Magnitude {
    /// Actuator drive strength.
    Intensity(f32),
    /// Number of simultaneously perceivable textures.
    Complexity(f32),
}

impl Magnitude {
    /// The raw value regardless of kind.
    pub fn value(self) -> f32 {
        match self {
            Magnitude::Intensity(v) | Magnitude::Complexity(v) => v,
        }
    }
}

/// Discrete repetition of the pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PulseCount {
    /// Sequential pulses (water).
    #[cfg_attr(feature = "serde", serde(rename = "pulse_count"))]
    Pulses(u32),
    /// Simultaneous sensation layers (biodiversity).
    #[cfg_attr(feature = "serde", serde(rename = "layers"))]
    Layers(u32),
}

impl PulseCount {
    /// The raw count regardless of kind.
    pub fn value(self) -> u32 {
        match self {
            PulseCount::Pulses(n) | PulseCount::Layers(n) => n,
        }
    }
}

// ─── Trend ──────────────────────────────────────────────────────────────────

/// Direction of change in severity since the previous reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrendDirection {
    /// Severity fell.
    Improving,
    /// Severity rose.
    Worsening,
}

impl TrendDirection {
    /// Wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Worsening => "worsening",
        }
    }
}

/// Significant change in severity between two consecutive readings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trend {
    /// Whether severity rose or fell.
    pub direction: TrendDirection,
    /// Absolute change in severity.
    pub magnitude: f32,
}

/// Deltas within this distance of the threshold count as equal to it.
///
/// Severities are `f32`, so a change of exactly the threshold (0.3 to 0.2 against
/// 0.1) lands a few ulps above it.
const THRESHOLD_TOLERANCE: f32 = 1e-6;

impl Trend {
    /// The trend from `previous` to `current`, if `|current - previous| > threshold`.
    ///
    /// Returns `None` when there is no previous reading, or when the change equals
    /// the threshold up to [`f32`] rounding.
    pub fn between(previous: Option<f32>, current: f32, threshold: f32) -> Option<Trend> {
        let delta = current - previous?;
        if delta.abs() - threshold > THRESHOLD_TOLERANCE {
            Some(Trend {
                direction: if delta < 0.0 {
                    TrendDirection::Improving
                } else {
                    TrendDirection::Worsening
                },
                magnitude: delta.abs(),
            })
        } else {
            None
        }
    }
}

// ─── FeedbackPattern ────────────────────────────────────────────────────────

/// One haptic feedback descriptor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "PatternWire", into = "PatternWire")
)]
pub struct FeedbackPattern {
    /// Kind of pattern.
    pub pattern_type: PatternType,
    /// Intensity (water) or complexity (biodiversity).
    pub magnitude: Magnitude,
    /// Pulse cadence.
    pub rhythm: Rhythm,
    /// Pulse count (water) or layer count (biodiversity).
    pub count: PulseCount,
    /// Pulse duration in seconds.
    pub duration: f32,
    /// Frequency band. Absent on `expanding_harmony`.
    pub frequency: Option<Frequency>,
    /// Body region.
    pub location: BodyLocation,
    /// Human-readable description for companion apps.
    pub description: Cow<'static, str>,
    /// Intended emotional register.
    pub emotion: Emotion,
    /// Change since the previous reading, when significant.
    pub trend: Option<Trend>,
}

impl FeedbackPattern {
    /// Attach (or clear) the trend annotation.
    pub fn with_trend(mut self, trend: Option<Trend>) -> Self {
        self.trend = trend;
        self
    }

    /// Wire key of the frequency band: `frequency_range` for layered
    /// (biodiversity) patterns, `frequency` for pulsed (water) ones.
    pub fn frequency_key(&self) -> &'static str {
        match self.count {
            PulseCount::Pulses(_) => "frequency",
            PulseCount::Layers(_) => "frequency_range",
        }
    }
}

// ─── Wire shape ─────────────────────────────────────────────────────────────

/// Flat serde mapping of a [`FeedbackPattern`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PatternWire {
    #[serde(rename = "type")]
    pattern_type: PatternType,
    #[serde(flatten)]
    magnitude: Magnitude,
    rhythm: Rhythm,
    #[serde(flatten)]
    count: PulseCount,
    duration: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency_range: Option<Frequency>,
    location: BodyLocation,
    description: Cow<'static, str>,
    emotion: Emotion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trend: Option<Trend>,
}

#[cfg(feature = "serde")]
impl From<FeedbackPattern> for PatternWire {
    fn from(p: FeedbackPattern) -> Self {
        let (frequency, frequency_range) = match p.count {
            PulseCount::Pulses(_) => (p.frequency, None),
            PulseCount::Layers(_) => (None, p.frequency),
        };
        PatternWire {
            pattern_type: p.pattern_type,
            magnitude: p.magnitude,
            rhythm: p.rhythm,
            count: p.count,
            duration: p.duration,
            frequency,
            frequency_range,
            location: p.location,
            description: p.description,
            emotion: p.emotion,
            trend: p.trend,
        }
    }
}

#[cfg(feature = "serde")]
impl From<PatternWire> for FeedbackPattern {
    fn from(w: PatternWire) -> Self {
        FeedbackPattern {
            pattern_type: w.pattern_type,
            magnitude: w.magnitude,
            rhythm: w.rhythm,
            count: w.count,
            duration: w.duration,
            frequency: w.frequency.or(w.frequency_range),
            location: w.location,
            description: w.description,
            emotion: w.emotion,
            trend: w.trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_absent_without_previous() {
        assert_eq!(Trend::between(None, 0.9, 0.1), None);
    }

    #[test]
    fn test_trend_threshold_is_strict() {
        assert_eq!(Trend::between(Some(0.5), 0.75, 0.25), None);
        assert_eq!(Trend::between(Some(0.5), 0.5, 0.0), None);
        let t = Trend::between(Some(0.5), 0.2, 0.1).unwrap();
        assert_eq!(t.direction, TrendDirection::Improving);
        assert!((t.magnitude - 0.3).abs() < 1e-6);
        let t = Trend::between(Some(0.2), 0.5, 0.1).unwrap();
        assert_eq!(t.direction, TrendDirection::Worsening);
    }

    #[test]
    fn test_trend_exact_threshold_after_rounding() {
        // (30 - 28.5) / 5 and (30 - 29) / 5 differ by 0.10000001 in f32
        let prev = (30.0_f32 - 28.5) / 5.0;
        let cur = (30.0_f32 - 29.0) / 5.0;
        assert!((prev - cur).abs() > 0.1_f32, "delta={}", prev - cur);
        assert_eq!(Trend::between(Some(prev), cur, 0.1), None);
        assert_eq!(Trend::between(Some(0.35), 0.30, 0.05), None);
        assert!(Trend::between(Some(prev), cur - 0.001, 0.1).is_some());
    }

    #[test]
    fn test_frequency_key_follows_count_kind() {
        let p = FeedbackPattern {
            pattern_type: PatternType::Harmony,
            magnitude: Magnitude::Complexity(8.0),
            rhythm: Rhythm::Layered,
            count: PulseCount::Layers(4),
            duration: 2.0,
            frequency: Some(Frequency::FullSpectrum),
            location: BodyLocation::WholeBody,
            description: Cow::Borrowed("rich"),
            emotion: Emotion::Wonder,
            trend: None,
        };
        assert_eq!(p.frequency_key(), "frequency_range");
        let p = FeedbackPattern { count: PulseCount::Pulses(2), ..p };
        assert_eq!(p.frequency_key(), "frequency");
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(PatternType::SimplifiedHarmony.as_str(), "simplified_harmony");
        assert_eq!(Rhythm::SlowRelease.as_str(), "slow_release");
        assert_eq!(Frequency::FullSpectrum.as_str(), "full_spectrum");
        assert_eq!(BodyLocation::ThroatAndChest.as_str(), "throat_and_chest");
        assert_eq!(Emotion::Heaviness.as_str(), "heaviness");
        assert_eq!(TrendDirection::Worsening.as_str(), "worsening");
    }

    #[test]
    fn test_magnitude_and_count_values() {
        assert_eq!(Magnitude::Intensity(4.5).value(), 4.5);
        assert_eq!(Magnitude::Complexity(8.0).value(), 8.0);
        assert_eq!(PulseCount::Pulses(3).value(), 3);
        assert_eq!(PulseCount::Layers(9).value(), 9);
    }
}
