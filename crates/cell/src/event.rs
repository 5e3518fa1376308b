// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::{Bond, Cell};
use common::{AtomId, CellId, ListenerId};
use ultraviolet::DVec3;

/// Changes to the cell as a whole.
#[derive(Clone, Debug, PartialEq)]
pub enum CellEvent {
    /// The lattice vectors were replaced.
    LatticeMoved,
    AtomAdded(AtomId),
    /// The atom is no longer a member of the cell by the time this is delivered.
    AtomRemoved(AtomId),
    BondAdded(Bond),
    BondRemoved(Bond),
}

/// Changes to a single atom. Delivered only to listeners subscribed to that atom.
#[derive(Clone, Debug, PartialEq)]
pub enum AtomEvent {
    /// Fired for every rename request, including ones that keep the name.
    Renamed { old_name: String, name: String },
    /// `delta` is the displacement from the previous position.
    Moved { delta: DVec3 },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventSource {
    Cell(CellId),
    Atom(AtomId),
}

/// Passed along with every notification.
#[derive(Copy, Clone, Debug)]
pub struct ListenerContext {
    /// The id under which the receiving listener is registered.
    pub listener: ListenerId,
    pub source: EventSource,
}

/// An observer of a [`Cell`].
///
/// Both methods default to doing nothing, so a listener only implements what it cares about.
/// Listeners receive the cell mutably and may issue commands on it; the notifications those
/// commands raise are delivered after the current one.
pub trait CellListener {
    fn on_cell_event(&mut self, _cell: &mut Cell, _ctx: &ListenerContext, _event: &CellEvent) {}

    fn on_atom_event(&mut self, _cell: &mut Cell, _ctx: &ListenerContext, _event: &AtomEvent) {}
}

// End of File
