// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Loads a structure from an XYZ file into a cell, lets the bond resolver work out the bond
//! graph and prints it.

mod cli;
mod xyz;

use anyhow::{Context, Result};
use bonds::{BondsResolver, ResolverConfig};
use cell::{AtomId, Cell, Lattice};
use cli::{Command, Options};
use common::BoundingBox;
use std::collections::HashMap;
use std::io::{self, Write};

/// Padding added on every side of the atoms when the cell is taken from their bounding box.
const CELL_PADDING: f64 = 2.0;

/// Cell edges never shrink below this, so flat or linear structures still get a volume.
const MIN_CELL_EDGE: f64 = 1.0;

fn lattice_around(bbox: &BoundingBox) -> Lattice {
    let extent = bbox.extent();
    let edge = |len: f64| (len + 2.0 * CELL_PADDING).max(MIN_CELL_EDGE);
    Lattice::orthorhombic(edge(extent.x), edge(extent.y), edge(extent.z))
}

fn load_config(options: &Options) -> Result<ResolverConfig> {
    let Some(path) = &options.config else {
        return Ok(ResolverConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ResolverConfig::from_toml_str(&source)
        .with_context(|| format!("failed to load resolver settings from {}", path.display()))
}

fn run(options: Options) -> Result<()> {
    let config = load_config(&options)?;
    let frame = xyz::load_xyz(&options.input)
        .with_context(|| format!("failed to load {}", options.input.display()))?;
    log::info!(
        "loaded {} atoms from {}",
        frame.atoms.len(),
        options.input.display()
    );

    let lattice = match options.cell {
        Some([a, b, c]) => Lattice::orthorhombic(a, b, c),
        None => lattice_around(&BoundingBox::from_points(
            frame.atoms.iter().map(|atom| atom.position),
        )),
    };

    let mut cell = Cell::new(lattice);
    for atom in &frame.atoms {
        cell.add_atom(&atom.label, atom.position)
            .with_context(|| format!("cannot place atom {}", atom.label))?;
    }

    let resolver = BondsResolver::attach(&mut cell, config)?;
    if !resolver.is_able_to_resolve(&cell) {
        log::warn!(
            "atom density {:.3} is too high to resolve bonds",
            cell.num_atoms() as f64 / cell.volume()
        );
    }
    resolver.resolve(&mut cell);
    cell.run_pending();

    report(&cell, &mut io::stdout().lock())?;
    Ok(())
}

fn report<W: Write>(cell: &Cell, out: &mut W) -> io::Result<()> {
    let volume = cell.volume();
    writeln!(out, "atoms   {}", cell.num_atoms())?;
    writeln!(out, "volume  {:.3}", volume)?;
    writeln!(out, "density {:.5}", cell.num_atoms() as f64 / volume)?;
    writeln!(out, "bonds   {}", cell.num_bonds())?;

    // Atoms are numbered from 1 in file order, like the lines of the XYZ file.
    let index: HashMap<AtomId, usize> = cell
        .atom_ids()
        .enumerate()
        .map(|(i, id)| (id, i + 1))
        .collect();
    for bond in cell.bonds() {
        let (Some(atom1), Some(atom2)) = (cell.atom(bond.atom1()), cell.atom(bond.atom2())) else {
            continue;
        };
        let distance = (atom1.position() - atom2.position()).mag();
        writeln!(
            out,
            "{:>6} {:>6}  {:<4} {:<4} {:.4}",
            index[&bond.atom1()],
            index[&bond.atom2()],
            atom1.name(),
            atom2.name(),
            distance
        )?;
    }
    Ok(())
}

fn main() {
    logging::init(&["bondgraph", "bondgraph_bonds", "bondgraph_cell"]);

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    let options = match command {
        Command::Help => {
            println!("{}", cli::USAGE);
            return;
        }
        Command::Run(options) => options,
    };

    if let Err(err) = run(options) {
        eprintln!("Error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("because: {}", cause);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::DVec3;

    #[test]
    fn bounding_box_cell_is_padded() {
        let bbox = BoundingBox::from_points([DVec3::zero(), DVec3::new(3.0, 1.0, 0.0)]);
        let lattice = lattice_around(&bbox);
        assert_eq!(lattice, Lattice::orthorhombic(7.0, 5.0, 4.0));
    }

    #[test]
    fn resolves_and_reports_a_structure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "3\nwater\nO 0.0 0.0 0.0\nH 0.757 0.586 0.0\nH -0.757 0.586 0.0\n"
        )
        .unwrap();

        let frame = xyz::load_xyz(file.path()).unwrap();
        let mut cell = Cell::new(Lattice::cubic(10.0));
        for atom in &frame.atoms {
            cell.add_atom(&atom.label, atom.position).unwrap();
        }
        let resolver = BondsResolver::attach(&mut cell, ResolverConfig::default()).unwrap();
        resolver.resolve(&mut cell);
        cell.run_pending();

        // O-H is 0.957 and inside the window; H-H is 1.514 and too long.
        assert_eq!(cell.num_bonds(), 2);

        let mut out = Vec::new();
        report(&cell, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("atoms   3"));
        assert!(text.contains("bonds   2"));
        assert!(text.contains("0.9573"));
    }
}

// End of File
