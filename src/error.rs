/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Error types for translation and profile construction.
//!
//! The engine has exactly two runtime failure kinds, both raised before any
//! translator state is touched:
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`TranslateError::UnknownEcosystemType`] | the reading names an ecosystem with no configured profile |
//! | [`TranslateError::MissingSensorData`] | a required field of the reading is absent |
//!
//! [`ProfileError`] is a configuration-time error and never comes out of `translate`.
//! [`UnknownDomain`] comes from parsing an [`EcologicalDomain`](crate::EcologicalDomain) name.

use thiserror::Error;

/// Failure of a single `translate` / `analyze` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// No threshold profile is configured for this ecosystem type.
    #[error("unknown ecosystem type: {0}")]
    UnknownEcosystemType(String),

    /// A required field of the reading was absent.
    ///
    /// The payload names what was missing, e.g. `"soil_moisture and ecosystem_type"`.
    #[error("missing required sensor data: {0}")]
    MissingSensorData(&'static str),
}

/// A threshold profile that violates the ordering invariant
/// `low < optimal_low <= optimal_high < saturation`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The thresholds for `indicator` in `ecosystem` are out of order or non-finite.
    #[error("invalid thresholds for {ecosystem}/{indicator}: {reason}")]
    InvalidThresholds {
        /// Ecosystem type the profile was registered under.
        ecosystem: String,
        /// Indicator whose thresholds are invalid (`"soil_moisture"`, `"shannon_index"`, ...).
        indicator: &'static str,
        /// Which ordering constraint failed.
        reason: &'static str,
    },
}

/// A domain name that is neither `water_stress` nor `biodiversity`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ecological domain: {0}")]
pub struct UnknownDomain(pub String);
