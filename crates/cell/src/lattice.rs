// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use ultraviolet::DVec3;

/// The three lattice vectors spanning a cell, in the same length unit as atom positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Lattice {
    pub a: DVec3,
    pub b: DVec3,
    pub c: DVec3,
}

impl Lattice {
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self { a, b, c }
    }

    /// A cube with edge length `len`, aligned with the coordinate axes.
    pub fn cubic(len: f64) -> Self {
        Self::orthorhombic(len, len, len)
    }

    /// An axis aligned box with the given edge lengths.
    pub fn orthorhombic(x: f64, y: f64, z: f64) -> Self {
        Self {
            a: DVec3::new(x, 0.0, 0.0),
            b: DVec3::new(0.0, y, 0.0),
            c: DVec3::new(0.0, 0.0, z),
        }
    }

    /// Signed cell volume `a · (b × c)`. Degenerate or left-handed lattices give a non-positive
    /// value, which callers treat as "no meaningful volume".
    pub fn volume(&self) -> f64 {
        self.a.dot(self.b.cross(self.c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes() {
        assert_eq!(Lattice::cubic(10.0).volume(), 1000.0);
        assert_eq!(Lattice::orthorhombic(1.0, 2.0, 3.0).volume(), 6.0);

        let skewed = Lattice::new(
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(0.0, 0.0, 3.0),
        );
        assert!((skewed.volume() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_and_left_handed_lattices_have_no_positive_volume() {
        let flat = Lattice::orthorhombic(1.0, 1.0, 0.0);
        assert_eq!(flat.volume(), 0.0);

        let mirrored = Lattice::new(
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        );
        assert!(mirrored.volume() < 0.0);
    }
}

// End of File
