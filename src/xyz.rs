// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::ParseFloatError;
use std::path::Path;
use thiserror::Error;
use ultraviolet::DVec3;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid XYZ format: {0}")]
    Parse(String),

    #[error("Invalid floating point number: {0}")]
    FloatParse(#[from] ParseFloatError),
}

/// One atom line of an XYZ file: the label as written and the Cartesian position.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    pub label: String,
    pub position: DVec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyzFrame {
    pub comment: String,
    pub atoms: Vec<XyzAtom>,
}

pub fn load_xyz(file_path: &Path) -> Result<XyzFrame, XyzError> {
    let file = File::open(file_path)?;
    parse_xyz(BufReader::new(file))
}

/// Reads the first frame of an XYZ document. Columns past the coordinates (velocities, charges
/// and the like) are ignored.
pub fn parse_xyz<R: BufRead>(reader: R) -> Result<XyzFrame, XyzError> {
    let mut lines = reader.lines();

    // Read the first line (number of atoms)
    let num_atoms: usize = lines
        .next()
        .ok_or_else(|| XyzError::Parse("Missing number of atoms".to_string()))??
        .trim()
        .parse()
        .map_err(|_| XyzError::Parse("Invalid number of atoms".to_string()))?;

    // Read the second line (title/comment)
    let comment = lines
        .next()
        .ok_or_else(|| XyzError::Parse("Missing title/comment".to_string()))??
        .trim()
        .to_string();

    let mut atoms = Vec::with_capacity(num_atoms);
    for (index, line) in lines.enumerate() {
        if atoms.len() == num_atoms {
            break;
        }
        let line = line?;

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(XyzError::Parse(format!(
                "Invalid atom format on line {}: {}",
                index + 3,
                line
            )));
        }

        let x: f64 = parts[1].parse()?;
        let y: f64 = parts[2].parse()?;
        let z: f64 = parts[3].parse()?;

        atoms.push(XyzAtom {
            label: parts[0].to_string(),
            position: DVec3::new(x, y, z),
        });
    }

    if atoms.len() != num_atoms {
        return Err(XyzError::Parse(format!(
            "Expected {} atoms, but found {}",
            num_atoms,
            atoms.len()
        )));
    }

    Ok(XyzFrame { comment, atoms })
}


// End of File
