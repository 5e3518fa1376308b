// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use common::{AtomId, ListenerId};
use periodic_table::Element;
use smallvec::SmallVec;
use ultraviolet::DVec3;

/// A point atom owned by a [`Cell`](crate::Cell).
///
/// Atoms are only mutated through the owning cell so that every change is announced to the
/// cell's listeners.
#[derive(Debug, Clone)]
pub struct Atom {
    id: AtomId,
    name: String,
    position: DVec3,
    radius: f64,
    // Set when the radius was given explicitly rather than looked up from the name.
    explicit_radius: bool,
    pub(crate) neighbors: SmallVec<[AtomId; 4]>,
    pub(crate) subscribers: SmallVec<[ListenerId; 2]>,
}

impl Atom {
    pub(crate) fn new(id: AtomId, name: &str, position: DVec3, radius: Option<f64>) -> Self {
        Self {
            id,
            name: name.to_owned(),
            position,
            radius: radius.unwrap_or_else(|| periodic_table::covalent_radius_of(name)),
            explicit_radius: radius.is_some(),
            neighbors: SmallVec::new(),
            subscribers: SmallVec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> AtomId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Covalent radius used by the bond distance window.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn element(&self) -> Option<Element> {
        Element::from_label(&self.name)
    }

    /// Atoms this one currently shares a bond with.
    pub fn neighbors(&self) -> &[AtomId] {
        &self.neighbors
    }

    pub(crate) fn set_position(&mut self, position: DVec3) -> DVec3 {
        std::mem::replace(&mut self.position, position)
    }

    /// Renames the atom, returning the old name. Unless the radius was pinned at creation, the
    /// radius follows the new name's element; names that denote no element keep the old radius.
    pub(crate) fn rename(&mut self, name: &str) -> String {
        if !self.explicit_radius {
            if let Some(element) = Element::from_label(name) {
                self.radius = element.covalent_radius();
            }
        }
        std::mem::replace(&mut self.name, name.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_comes_from_the_element_unless_given() {
        let carbon = Atom::new(AtomId(1), "C1", DVec3::zero(), None);
        assert_eq!(carbon.radius(), 0.76);
        assert_eq!(carbon.element(), Some(Element::Carbon));

        let pinned = Atom::new(AtomId(2), "C1", DVec3::zero(), Some(0.5));
        assert_eq!(pinned.radius(), 0.5);
    }

    #[test]
    fn renaming_follows_the_element() {
        let mut atom = Atom::new(AtomId(1), "C", DVec3::zero(), None);
        assert_eq!(atom.rename("Si"), "C");
        assert_eq!(atom.name(), "Si");
        assert_eq!(atom.radius(), 1.11);

        // Not an element: the radius stays put.
        atom.rename("42");
        assert_eq!(atom.radius(), 1.11);

        let mut pinned = Atom::new(AtomId(2), "C", DVec3::zero(), Some(0.5));
        pinned.rename("Si");
        assert_eq!(pinned.radius(), 0.5);
    }
}

// End of File
