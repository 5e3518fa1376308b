// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use common::AtomId;
use std::hash::{Hash, Hasher};

/// An undirected edge between two atoms.
///
/// Two bonds are the same edge when they join the same unordered pair of atoms, so
/// `Bond::new(a, b) == Bond::new(b, a)` and both hash alike.
#[derive(Copy, Clone, Debug)]
pub struct Bond {
    atom1: AtomId,
    atom2: AtomId,
}

impl Bond {
    pub fn new(atom1: AtomId, atom2: AtomId) -> Self {
        Self { atom1, atom2 }
    }

    #[inline]
    pub fn atom1(&self) -> AtomId {
        self.atom1
    }

    #[inline]
    pub fn atom2(&self) -> AtomId {
        self.atom2
    }

    pub fn links(&self, atom: AtomId) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// The endpoint opposite `atom`, if `atom` is an endpoint.
    pub fn other(&self, atom: AtomId) -> Option<AtomId> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }

    fn key(&self) -> (AtomId, AtomId) {
        if self.atom1 <= self.atom2 {
            (self.atom1, self.atom2)
        } else {
            (self.atom2, self.atom1)
        }
    }
}

impl PartialEq for Bond {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Bond {}

impl Hash for Bond {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}


// End of File
