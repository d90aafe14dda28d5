/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Ecosystem threshold profiles.
//!
//! An *ecosystem profile* is the set of healthy / stress / saturation thresholds for
//! one ecosystem type. Each translator owns an [`EcosystemProfileTable`] keyed by the
//! ecosystem type name, injected at construction so alternate profiles can be
//! supplied without code changes.
//!
//! # Invariants
//!
//! - Moisture: `0 < stress_threshold < optimal_low < optimal_high < saturation_threshold < 100`.
//! - Diversity (per indicator): `0 < low_threshold < optimal_low < optimal_high`.
//! - Tables only ever hold validated thresholds; [`EcosystemProfileTable::insert`]
//!   rejects anything else with [`ProfileError::InvalidThresholds`].

use hashbrown::HashMap;

use crate::error::{ProfileError, TranslateError};

// ─── Thresholds trait ───────────────────────────────────────────────────────

/// Threshold record that can check its own ordering invariant.
pub trait Thresholds: Clone + core::fmt::Debug {
    /// Validate the ordering invariant.
    ///
    /// On failure returns `(indicator, reason)`.
    fn validate(&self) -> Result<(), (&'static str, &'static str)>;
}

fn check_ordered(
    indicator: &'static str,
    low: f32,
    optimal_low: f32,
    optimal_high: f32,
) -> Result<(), (&'static str, &'static str)> {
    if !(low.is_finite() && optimal_low.is_finite() && optimal_high.is_finite()) {
        return Err((indicator, "thresholds must be finite"));
    }
    if low <= 0.0 {
        return Err((indicator, "low threshold must be positive"));
    }
    if low >= optimal_low {
        return Err((indicator, "low threshold must be below optimal_low"));
    }
    if optimal_low >= optimal_high {
        return Err((indicator, "optimal_low must be below optimal_high"));
    }
    Ok(())
}

// ─── Soil moisture ──────────────────────────────────────────────────────────

/// Soil moisture thresholds for one ecosystem type, in percent volumetric water content.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoistureThresholds {
    /// Lower bound of the optimal moisture range.
    pub optimal_low: f32,
    /// Upper bound of the optimal moisture range.
    pub optimal_high: f32,
    /// At or below this moisture, drought stress accelerates.
    pub stress_threshold: f32,
    /// Above this moisture, the soil is waterlogged.
    pub saturation_threshold: f32,
}

impl MoistureThresholds {
    /// Construct from an `(optimal_low, optimal_high)` range and the two outer thresholds.
    pub const fn new(optimal: (f32, f32), stress_threshold: f32, saturation_threshold: f32) -> Self {
        Self {
            optimal_low: optimal.0,
            optimal_high: optimal.1,
            stress_threshold,
            saturation_threshold,
        }
    }
}

impl Thresholds for MoistureThresholds {
    fn validate(&self) -> Result<(), (&'static str, &'static str)> {
        check_ordered(
            "soil_moisture",
            self.stress_threshold,
            self.optimal_low,
            self.optimal_high,
        )?;
        if !self.saturation_threshold.is_finite() || self.optimal_high >= self.saturation_threshold {
            return Err(("soil_moisture", "optimal_high must be below saturation_threshold"));
        }
        if self.saturation_threshold >= 100.0 {
            return Err(("soil_moisture", "saturation_threshold must be below 100"));
        }
        Ok(())
    }
}

// ─── Biodiversity ───────────────────────────────────────────────────────────

/// The four threshold-scored biodiversity indicators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiversityIndicator {
    /// Overall species count.
    SpeciesCount,
    /// Bird species observed.
    BirdSpecies,
    /// Insect orders observed.
    InsectOrders,
    /// Shannon diversity index.
    ShannonIndex,
}

impl DiversityIndicator {
    /// All indicators, in scoring order.
    pub const ALL: [DiversityIndicator; 4] = [
        DiversityIndicator::SpeciesCount,
        DiversityIndicator::BirdSpecies,
        DiversityIndicator::InsectOrders,
        DiversityIndicator::ShannonIndex,
    ];

    /// The reading key for this indicator.
    pub fn as_str(self) -> &'static str {
        match self {
            DiversityIndicator::SpeciesCount => "species_count",
            DiversityIndicator::BirdSpecies => "bird_species",
            DiversityIndicator::InsectOrders => "insect_orders",
            DiversityIndicator::ShannonIndex => "shannon_index",
        }
    }
}

/// Thresholds for a single biodiversity indicator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorThresholds {
    /// Lower bound of the optimal range.
    pub optimal_low: f32,
    /// Upper bound of the optimal range.
    pub optimal_high: f32,
    /// Below this value, depletion is scored at the heavier weight.
    pub low_threshold: f32,
}

impl IndicatorThresholds {
    /// Construct from an `(optimal_low, optimal_high)` range and the low threshold.
    pub const fn new(optimal: (f32, f32), low_threshold: f32) -> Self {
        Self {
            optimal_low: optimal.0,
            optimal_high: optimal.1,
            low_threshold,
        }
    }
}

/// Biodiversity thresholds for one ecosystem type.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiversityThresholds {
    /// Overall species count.
    pub species_count: IndicatorThresholds,
    /// Bird species.
    pub bird_species: IndicatorThresholds,
    /// Insect orders.
    pub insect_orders: IndicatorThresholds,
    /// Shannon diversity index.
    pub shannon_index: IndicatorThresholds,
}

impl DiversityThresholds {
    /// Thresholds for one indicator.
    pub fn get(&self, indicator: DiversityIndicator) -> &IndicatorThresholds {
        match indicator {
            DiversityIndicator::SpeciesCount => &self.species_count,
            DiversityIndicator::BirdSpecies => &self.bird_species,
            DiversityIndicator::InsectOrders => &self.insect_orders,
            DiversityIndicator::ShannonIndex => &self.shannon_index,
        }
    }
}

impl Thresholds for DiversityThresholds {
    fn validate(&self) -> Result<(), (&'static str, &'static str)> {
        for indicator in DiversityIndicator::ALL {
            let t = self.get(indicator);
            check_ordered(indicator.as_str(), t.low_threshold, t.optimal_low, t.optimal_high)?;
        }
        Ok(())
    }
}

// ─── Profile table ──────────────────────────────────────────────────────────

/// Immutable-after-construction map of ecosystem type → thresholds.
#[derive(Clone, Debug)]
pub struct EcosystemProfileTable<T: Thresholds> {
    profiles: HashMap<String, T>,
}

/// Soil moisture profiles, as owned by [`WaterStressTranslator`](crate::water::WaterStressTranslator).
pub type MoistureProfileTable = EcosystemProfileTable<MoistureThresholds>;

/// Biodiversity profiles, as owned by [`BiodiversityTranslator`](crate::biodiversity::BiodiversityTranslator).
pub type DiversityProfileTable = EcosystemProfileTable<DiversityThresholds>;

impl<T: Thresholds> EcosystemProfileTable<T> {
    /// An empty table. Every lookup fails until profiles are inserted.
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Build a table from a map, validating every entry.
    pub fn from_map(profiles: HashMap<String, T>) -> Result<Self, ProfileError> {
        let mut table = Self::empty();
        for (name, thresholds) in profiles {
            table.insert(name, thresholds)?;
        }
        Ok(table)
    }

    /// Register (or replace) the profile for `ecosystem`.
    ///
    /// Returns the previous profile if one was registered under the same name.
    pub fn insert(
        &mut self,
        ecosystem: impl Into<String>,
        thresholds: T,
    ) -> Result<Option<T>, ProfileError> {
        let ecosystem = ecosystem.into();
        if let Err((indicator, reason)) = thresholds.validate() {
            return Err(ProfileError::InvalidThresholds {
                ecosystem,
                indicator,
                reason,
            });
        }
        Ok(self.profiles.insert(ecosystem, thresholds))
    }

    /// Chainable insert for building tables inline.
    pub fn with(mut self, ecosystem: impl Into<String>, thresholds: T) -> Result<Self, ProfileError> {
        self.insert(ecosystem, thresholds)?;
        Ok(self)
    }

    /// Thresholds for `ecosystem`, if configured.
    pub fn get(&self, ecosystem: &str) -> Option<&T> {
        self.profiles.get(ecosystem)
    }

    /// Thresholds for `ecosystem`, or [`TranslateError::UnknownEcosystemType`].
    pub fn lookup(&self, ecosystem: &str) -> Result<&T, TranslateError> {
        self.get(ecosystem)
            .ok_or_else(|| TranslateError::UnknownEcosystemType(ecosystem.into()))
    }

    /// Whether a profile is configured for `ecosystem`.
    pub fn contains(&self, ecosystem: &str) -> bool {
        self.profiles.contains_key(ecosystem)
    }

    /// Configured ecosystem type names, in arbitrary order.
    pub fn ecosystem_types(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Number of configured ecosystem types.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// `true` if no ecosystem type is configured.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    // Built-in tables are known-valid; tests assert it.
    fn insert_builtin(&mut self, ecosystem: &str, thresholds: T) {
        self.profiles.insert(ecosystem.into(), thresholds);
    }
}

impl Default for MoistureProfileTable {
    fn default() -> Self {
        let mut t = Self::empty();
        t.insert_builtin("temperate_forest", MoistureThresholds::new((30.0, 45.0), 25.0, 55.0));
        t.insert_builtin("grassland", MoistureThresholds::new((20.0, 35.0), 15.0, 45.0));
        t.insert_builtin("desert_scrub", MoistureThresholds::new((8.0, 20.0), 5.0, 30.0));
        t.insert_builtin("wetland", MoistureThresholds::new((60.0, 85.0), 50.0, 95.0));
        t.insert_builtin("rainforest", MoistureThresholds::new((50.0, 70.0), 45.0, 80.0));
        t
    }
}

impl Default for DiversityProfileTable {
    fn default() -> Self {
        let i = IndicatorThresholds::new;
        let mut t = Self::empty();
        t.insert_builtin(
            "temperate_forest",
            DiversityThresholds {
                species_count: i((20.0, 50.0), 10.0),
                bird_species: i((15.0, 30.0), 8.0),
                insect_orders: i((8.0, 12.0), 5.0),
                shannon_index: i((2.5, 4.0), 2.0),
            },
        );
        t.insert_builtin(
            "grassland",
            DiversityThresholds {
                species_count: i((15.0, 40.0), 8.0),
                bird_species: i((10.0, 25.0), 6.0),
                insect_orders: i((7.0, 10.0), 4.0),
                shannon_index: i((2.0, 3.5), 1.5),
            },
        );
        t.insert_builtin(
            "wetland",
            DiversityThresholds {
                species_count: i((25.0, 60.0), 15.0),
                bird_species: i((20.0, 40.0), 12.0),
                insect_orders: i((8.0, 12.0), 5.0),
                shannon_index: i((2.8, 4.5), 2.2),
            },
        );
        t.insert_builtin(
            "desert_scrub",
            DiversityThresholds {
                species_count: i((10.0, 30.0), 5.0),
                bird_species: i((8.0, 20.0), 4.0),
                insect_orders: i((5.0, 8.0), 3.0),
                shannon_index: i((1.5, 3.0), 1.0),
            },
        );
        t
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for EcosystemProfileTable<T>
where
    T: Thresholds + serde::Serialize,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.profiles.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for EcosystemProfileTable<T>
where
    T: Thresholds + serde::Deserialize<'de>,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let profiles = HashMap::<String, T>::deserialize(deserializer)?;
        Self::from_map(profiles).map_err(serde::de::Error::custom)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
