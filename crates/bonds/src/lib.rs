// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # Bond resolution
//!
//! [`BondsResolver`] keeps the bond collection of a [`Cell`](cell::Cell) equal to the set of
//! atom pairs whose distance lies inside the covalent window
//!
//! ```text
//! bond_scale_min * (r1 + r2) <= d <= bond_scale_max * (r1 + r2)
//! ```
//!
//! and keeps it that way as atoms are added, removed, moved and renamed and as the lattice
//! changes. Single-atom changes are resolved on the spot against every other atom; lattice
//! changes queue a full rescan on the cell's task queue. Nothing is resolved while the atom
//! density exceeds [`ResolverConfig::max_density`].

mod config;
mod error;
mod resolver;
mod window;

pub use config::ResolverConfig;
pub use error::ResolverError;
pub use resolver::BondsResolver;
pub use window::is_bonded;

/// A module which is typically glob imported.
pub mod prelude {
    pub use super::{BondsResolver, ResolverConfig, ResolverError};
}

// End of File
