// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use common::AtomId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CellError {
    #[error("atom {0} is not a member of this cell")]
    UnknownAtom(AtomId),

    #[error("atom position must be finite")]
    InvalidPosition,

    #[error("covalent radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
}

// End of File
