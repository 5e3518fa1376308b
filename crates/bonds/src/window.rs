// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::ResolverConfig;

/// The covalent bond test: two atoms with covalent radii `r1` and `r2` at squared distance
/// `distance_sq` are bonded iff
/// `(bond_scale_min * (r1 + r2))² <= distance_sq <= (bond_scale_max * (r1 + r2))²`.
#[inline]
pub fn is_bonded(r1: f64, r2: f64, distance_sq: f64, config: &ResolverConfig) -> bool {
    let rcov = r1 + r2;
    let rrcov = rcov * rcov;
    let rrmin = config.bond_scale_min * config.bond_scale_min * rrcov;
    let rrmax = config.bond_scale_max * config.bond_scale_max * rrcov;
    rrmin <= distance_sq && distance_sq <= rrmax
}


// End of File
