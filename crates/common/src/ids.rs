// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A stable handle naming one atom inside one cell.
///
/// Handles are issued by the owning cell from a counter that only moves forward, so an id is
/// never handed out twice by the same cell, even after the atom it named has been removed. Two
/// atoms with identical names and positions are still distinct atoms: identity lives in the
/// handle, not in the attributes.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct AtomId(pub u32);

impl AtomId {
    /// The first id a fresh cell hands out. Zero is never a valid atom id.
    pub const FIRST: Self = AtomId(1);

    pub fn next(self) -> Self {
        AtomId(self.0 + 1)
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a cell for the lifetime of the process. Every notification a cell fires carries
/// its `CellId` as the event source.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct CellId(u64);

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

impl CellId {
    pub fn fresh() -> Self {
        CellId(NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A registration handle returned when a listener is attached to a cell.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ListenerId(pub u32);


// End of File
