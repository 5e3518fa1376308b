// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # Crystal cells
//!
//! A [`Cell`] owns an ordered collection of [`Atom`]s, an unordered collection of [`Bond`]s and
//! the [`Lattice`] vectors spanning it. The cell is a passive data holder: it validates and
//! applies commands, and tells registered [`CellListener`]s what changed.
//!
//! Notifications are delivered synchronously on the thread that issued the command, in
//! registration order. A command issued from inside a listener queues its own notification,
//! which is delivered once the current one has reached every listener. Work that should not run
//! on the notification path can be deferred with [`Cell::run_later`]; the owner drains it with
//! [`Cell::run_pending`].

mod atom;
mod bond;
mod cell;
mod error;
mod event;
mod lattice;

pub use atom::Atom;
pub use bond::Bond;
pub use cell::Cell;
pub use error::CellError;
pub use event::{AtomEvent, CellEvent, CellListener, EventSource, ListenerContext};
pub use lattice::Lattice;

pub use common::{AtomId, CellId, ListenerId};

/// A module which is typically glob imported.
pub mod prelude {
    pub use super::{
        Atom, AtomEvent, AtomId, Bond, Cell, CellError, CellEvent, CellListener, Lattice,
        ListenerContext, ListenerId,
    };
}

// End of File
