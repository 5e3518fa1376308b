// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::ResolverError;
use serde::{Deserialize, Serialize};

/// Tuning knobs for [`BondsResolver`](crate::BondsResolver).
///
/// Every field has a default, so a TOML file only needs to name what it changes:
///
/// ```toml
/// max_density = 0.25
/// num_threads = 4
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Atoms per unit volume above which no bonds are resolved at all.
    pub max_density: f64,

    /// Inner edge of the bond window, as a multiple of the summed covalent radii.
    pub bond_scale_min: f64,

    /// Outer edge of the bond window, as a multiple of the summed covalent radii.
    pub bond_scale_max: f64,

    /// Atom displacements shorter than this do not trigger re-resolution.
    pub motion_threshold: f64,

    /// Full rescans of cells with more atoms than this are spread over the worker threads.
    pub parallel_min_atoms: usize,

    /// Worker threads for full rescans. With a single thread rescans stay on the caller.
    pub num_threads: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_density: 0.50,
            bond_scale_min: 0.50,
            bond_scale_max: 1.15,
            motion_threshold: 1.0e-3,
            parallel_min_atoms: 128,
            num_threads: num_cpus::get().saturating_sub(1).max(1),
        }
    }
}

impl ResolverConfig {
    /// Parses and validates a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ResolverError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ResolverError> {
        let non_negative = [
            ("max_density", self.max_density),
            ("bond_scale_min", self.bond_scale_min),
            ("bond_scale_max", self.bond_scale_max),
            ("motion_threshold", self.motion_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ResolverError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.bond_scale_min > self.bond_scale_max {
            return Err(ResolverError::InvalidConfig(format!(
                "bond_scale_min ({}) exceeds bond_scale_max ({})",
                self.bond_scale_min, self.bond_scale_max
            )));
        }
        if self.num_threads == 0 {
            return Err(ResolverError::InvalidConfig(
                "num_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Squared motion threshold, compared against squared displacements.
    pub(crate) fn motion_threshold_sq(&self) -> f64 {
        self.motion_threshold * self.motion_threshold
    }
}


// End of File
