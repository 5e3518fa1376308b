// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod bounding_box;
pub mod ids;

pub use bounding_box::BoundingBox;
pub use ids::{AtomId, CellId, ListenerId};

// End of File
