/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Per-translator reading history.
//!
//! Each translator owns one [`TranslatorState`]: the severity of its most recent
//! successful translation, and when it happened. The state is read once at the
//! start of `translate` and overwritten once at the end.
//!
//! # Invariants
//!
//! - State reflects exactly the most recent *successful* `translate` call.
//! - [`TranslatorState::record`] is the only mutation, and translators call it only
//!   after validation and scoring have both succeeded.
//! - One state is one history line. Independent monitoring sessions (per community,
//!   per site) each need their own translator.

use chrono::Utc;

/// The most recent successful reading.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastReading {
    /// Severity in [0.0, 1.0] (stress for water, depletion for biodiversity).
    pub level: f32,
    /// Unix timestamp in seconds.
    pub timestamp: f64,
    /// The primary raw input, where the domain has one (soil moisture %).
    pub raw_value: Option<f32>,
}

/// Mutable history owned by one translator instance.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranslatorState {
    last: Option<LastReading>,
}

impl TranslatorState {
    /// A state with no history. The next translation carries no trend.
    pub fn new() -> Self {
        Self { last: None }
    }

    /// A state whose previous reading is `level` at `timestamp`.
    pub fn with_previous(level: f32, timestamp: f64) -> Self {
        Self {
            last: Some(LastReading {
                level,
                timestamp,
                raw_value: None,
            }),
        }
    }

    /// Previous severity, if any translation has succeeded.
    pub fn previous_level(&self) -> Option<f32> {
        self.last.map(|r| r.level)
    }

    /// The full previous reading.
    pub fn last(&self) -> Option<&LastReading> {
        self.last.as_ref()
    }

    /// `true` before the first successful translation.
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// Overwrite the history with a new reading.
    pub fn record(&mut self, level: f32, timestamp: f64, raw_value: Option<f32>) {
        self.last = Some(LastReading {
            level,
            timestamp,
            raw_value,
        });
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Current Unix time in seconds, used when a caller omits the timestamp.
pub fn now_unix_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

// ─── Historical trends ──────────────────────────────────────────────────────

/// Trend assessment over a timeframe.
///
/// Only `Unknown` exists until translators keep more than one reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrendAssessment {
    /// No time series is available to assess.
    Unknown,
}

impl TrendAssessment {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            TrendAssessment::Unknown => "unknown",
        }
    }
}

/// Result of `get_historical_trends`.
///
/// This is a deliberate placeholder: it reports the last known severity with zero
/// confidence. It is not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoricalTrends {
    /// Last known severity, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub current_level: Option<f32>,
    /// Timestamp of the last reading, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub last_reading_time: Option<f64>,
    /// Always [`TrendAssessment::Unknown`].
    pub trend: TrendAssessment,
    /// Confidence in `trend`. Always 0.
    pub confidence: f32,
}

impl HistoricalTrends {
    /// Build the placeholder report from a translator's state.
    pub fn from_state(state: &TranslatorState) -> Self {
        Self {
            current_level: state.previous_level(),
            last_reading_time: state.last().map(|r| r.timestamp),
            trend: TrendAssessment::Unknown,
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let s = TranslatorState::new();
        assert!(s.is_empty());
        assert_eq!(s.previous_level(), None);
    }

    #[test]
    fn test_record_overwrites() {
        let mut s = TranslatorState::new();
        s.record(0.4, 100.0, Some(22.0));
        s.record(0.2, 200.0, Some(27.0));
        let last = s.last().unwrap();
        assert_eq!(last.level, 0.2);
        assert_eq!(last.timestamp, 200.0);
        assert_eq!(last.raw_value, Some(27.0));
    }

    #[test]
    fn test_clear() {
        let mut s = TranslatorState::with_previous(0.5, 1.0);
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn test_historical_trends_without_history() {
        let h = HistoricalTrends::from_state(&TranslatorState::new());
        assert_eq!(h.current_level, None);
        assert_eq!(h.last_reading_time, None);
        assert_eq!(h.trend, TrendAssessment::Unknown);
        assert_eq!(h.confidence, 0.0);
    }

    #[test]
    fn test_historical_trends_reports_last_reading() {
        let h = HistoricalTrends::from_state(&TranslatorState::with_previous(0.35, 1_700_000_000.0));
        assert_eq!(h.current_level, Some(0.35));
        assert_eq!(h.last_reading_time, Some(1_700_000_000.0));
        assert_eq!(h.trend, TrendAssessment::Unknown);
        assert_eq!(h.confidence, 0.0);
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_unix_seconds() > 1_577_836_800.0);
    }
}
