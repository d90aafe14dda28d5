/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Two-zone depletion scoring shared by both translators.
//!
//! ```text
//!   value:   0 ──────── low ─────────── optimal_low ─────────── ...
//!   zone:      Depleted     Marginal            Healthy
//!   score:  (low-v)/low   (opt-v)/(opt-low)        0
//! ```
//!
//! The water translator treats a reading exactly at `low` as depleted
//! ([`LowEdge::Inclusive`]); the biodiversity translator does not
//! ([`LowEdge::Exclusive`]).

/// Which zone a reading falls into, with its raw (unweighted) depletion score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Zone {
    /// At or below the low threshold. Score in [0.0, 1.0].
    Depleted(f32),
    /// Between the low threshold and the bottom of the optimal range. Score in (0.0, 1.0).
    Marginal(f32),
    /// Within or above the optimal range.
    Healthy,
}

/// Whether a reading exactly at the low threshold counts as depleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowEdge {
    /// `value <= low` is depleted.
    Inclusive,
    /// `value < low` is depleted.
    Exclusive,
}

impl Zone {
    /// Classify `value` against `low < optimal_low`.
    pub fn classify(value: f32, low: f32, optimal_low: f32, edge: LowEdge) -> Zone {
        if value >= optimal_low {
            return Zone::Healthy;
        }
        let depleted = match edge {
            LowEdge::Inclusive => value <= low,
            LowEdge::Exclusive => value < low,
        };
        if depleted {
            Zone::Depleted(clamp_unit((low - value) / low))
        } else {
            Zone::Marginal((optimal_low - value) / (optimal_low - low))
        }
    }

    /// Weighted score: `below` weight in the depleted zone, `near` in the marginal zone.
    pub fn weighted(self, below: f32, near: f32) -> f32 {
        match self {
            Zone::Depleted(s) => s * below,
            Zone::Marginal(s) => s * near,
            Zone::Healthy => 0.0,
        }
    }
}

/// Clamp to [0.0, 1.0]. NaN maps to 0.0.
pub fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
