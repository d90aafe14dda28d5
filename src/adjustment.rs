/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Secondary-indicator adjustments for water stress.
//!
//! Plant and watershed indicators refine the soil-moisture stress score. Each
//! rule reads the output of the previous one and the result is capped at 1.0
//! immediately after every rule, so order changes results:
//!
//! ```text
//! 0.28 ─leaf −1.8─▶ 0.38 ─flow 0.3─▶ 0.494 ─deficit 25─▶ 0.494
//! 0.28 ─flow 0.3─▶ 0.364 ─leaf −1.8─▶ 0.464 ─deficit 25─▶ 0.464
//! ```
//!
//! | Rule | Fires when | Effect |
//! |------|-----------|--------|
//! | [`StressAdjustment::LeafWaterPotential`] | `< -2.0` MPa / `< -1.5` MPa | `+0.2` / `+0.1` |
//! | [`StressAdjustment::StreamFlow`] | `< 0.5` of normal flow | `×1.3` |
//! | [`StressAdjustment::WaterTableDepth`] | `> 1.5 × normal depth` (normal defaults to 0) | `+0.15` |
//! | [`StressAdjustment::PrecipitationDeficit`] | `> 30` % | `+deficit/100 × 0.2` |
//!
//! None of the rules run for saturated soil; the caller skips the chain entirely.

use heapless::Vec as HVec;

use crate::water::WaterIndicators;

/// Number of distinct adjustment rules.
pub const MAX_ADJUSTMENTS: usize = 4;

/// One secondary-indicator rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StressAdjustment {
    /// Plant water stress from leaf water potential (MPa).
    LeafWaterPotential,
    /// Watershed flow as a fraction of normal.
    StreamFlow,
    /// Groundwater depth relative to its normal depth.
    WaterTableDepth,
    /// Percent below normal precipitation.
    PrecipitationDeficit,
}

impl StressAdjustment {
    /// Indicator key this rule reads.
    pub fn as_str(self) -> &'static str {
        match self {
            StressAdjustment::LeafWaterPotential => "leaf_water_potential",
            StressAdjustment::StreamFlow => "stream_flow",
            StressAdjustment::WaterTableDepth => "water_table_depth",
            StressAdjustment::PrecipitationDeficit => "precipitation_deficit",
        }
    }

    /// Apply this rule to `stress`.
    ///
    /// Returns `None` when the indicator is absent or does not cross its threshold.
    pub fn apply(self, stress: f32, ind: &WaterIndicators) -> Option<f32> {
        let adjusted = match self {
            StressAdjustment::LeafWaterPotential => {
                let leaf = ind.leaf_water_potential?;
                if leaf < -2.0 {
                    stress + 0.2
                } else if leaf < -1.5 {
                    stress + 0.1
                } else {
                    return None;
                }
            }
            StressAdjustment::StreamFlow => {
                let flow = ind.stream_flow?;
                if flow >= 0.5 {
                    return None;
                }
                stress * 1.3
            }
            StressAdjustment::WaterTableDepth => {
                let depth = ind.water_table_depth?;
                let normal = ind.normal_water_table_depth.unwrap_or(0.0);
                if depth <= normal * 1.5 {
                    return None;
                }
                stress + 0.15
            }
            StressAdjustment::PrecipitationDeficit => {
                let deficit = ind.precipitation_deficit?;
                if deficit <= 30.0 {
                    return None;
                }
                stress + (deficit / 100.0) * 0.2
            }
        };
        Some(adjusted.min(1.0))
    }
}

/// Ordered list of adjustment rules, each rule at most once.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjustmentChain {
    rules: HVec<StressAdjustment, MAX_ADJUSTMENTS>,
}

impl AdjustmentChain {
    /// Leaf potential, stream flow, water table, precipitation deficit.
    pub fn standard() -> Self {
        Self::from_rules(&[
            StressAdjustment::LeafWaterPotential,
            StressAdjustment::StreamFlow,
            StressAdjustment::WaterTableDepth,
            StressAdjustment::PrecipitationDeficit,
        ])
    }

    /// A chain applying `rules` in the given order. Repeated rules keep their first position.
    pub fn from_rules(rules: &[StressAdjustment]) -> Self {
        let mut chain = HVec::new();
        for &rule in rules {
            // at most MAX_ADJUSTMENTS distinct rules exist, so push cannot overflow
            if !chain.contains(&rule) && chain.push(rule).is_err() {
                break;
            }
        }
        Self { rules: chain }
    }

    /// A chain that leaves the base score untouched.
    pub fn none() -> Self {
        Self { rules: HVec::new() }
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[StressAdjustment] {
        &self.rules
    }

    /// Run every rule left to right, starting from `base`.
    pub fn apply(&self, base: f32, indicators: &WaterIndicators) -> f32 {
        self.rules.iter().fold(base, |stress, &rule| match rule.apply(stress, indicators) {
            Some(adjusted) => {
                log::trace!(
                    "{} adjusted stress {:.3} -> {:.3}",
                    rule.as_str(),
                    stress,
                    adjusted
                );
                adjusted
            }
            None => stress,
        })
    }
}

impl Default for AdjustmentChain {
    fn default() -> Self {
        Self::standard()
    }
}
