// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Element identification and covalent radii.
//!
//! Atoms in a cell are labelled by free-form names such as `"Fe"`, `"O2"` or `"C_12"`. The
//! leading element symbol of such a label selects the [`Element`], whose covalent radius feeds
//! the bond distance window.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use std::mem;

/// The chemical elements, discriminated by atomic number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Element {
    Hydrogen = 1,
    Helium,
    Lithium,
    Beryllium,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Neon,
    Sodium,
    Magnesium,
    Aluminium,
    Silicon,
    Phosphorus,
    Sulfur,
    Chlorine,
    Argon,
    Potassium,
    Calcium,
    Scandium,
    Titanium,
    Vanadium,
    Chromium,
    Manganese,
    Iron,
    Cobalt,
    Nickel,
    Copper,
    Zinc,
    Gallium,
    Germanium,
    Arsenic,
    Selenium,
    Bromine,
    Krypton,
    Rubidium,
    Strontium,
    Yttrium,
    Zirconium,
    Niobium,
    Molybdenum,
    Technetium,
    Ruthenium,
    Rhodium,
    Palladium,
    Silver,
    Cadmium,
    Indium,
    Tin,
    Antimony,
    Tellurium,
    Iodine,
    Xenon,
    Cesium,
    Barium,
    Lanthanum,
    Cerium,
    Praseodymium,
    Neodymium,
    Promethium,
    Samarium,
    Europium,
    Gadolinium,
    Terbium,
    Dysprosium,
    Holmium,
    Erbium,
    Thulium,
    Ytterbium,
    Lutetium,
    Hafnium,
    Tantalum,
    Tungsten,
    Rhenium,
    Osmium,
    Iridium,
    Platinum,
    Gold,
    Mercury,
    Thallium,
    Lead,
    Bismuth,
    Polonium,
    Astatine,
    Radon,
    Francium,
    Radium,
    Actinium,
    Thorium,
    Protactinium,
    Uranium,
    Neptunium,
    Plutonium,
    Americium,
    Curium,
    Berkelium,
    Californium,
    Einsteinium,
    Fermium,
    Mendelevium,
    Nobelium,
    Lawrencium,
    Rutherfordium,
    Dubnium,
    Seaborgium,
    Bohrium,
    Hassium,
    Meitnerium,
    Darmstadtium,
    Roentgenium,
    Copernicium,
    Nihonium,
    Flerovium,
    Moscovium,
    Livermorium,
    Tennessine,
    Oganesson,
}

impl Element {
    pub const MIN: Self = Element::Hydrogen;
    pub const MAX: Self = Element::Oganesson;

    pub fn from_atomic_number(n: u8) -> Option<Self> {
        if n >= 1 && n <= Self::MAX as u8 {
            Some(unsafe { mem::transmute::<u8, Element>(n) })
        } else {
            None
        }
    }

    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[self as usize - 1]
    }

    /// Looks up an element by its exact symbol, e.g. `"Fe"`. Case sensitive.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .and_then(|index| Self::from_atomic_number(index as u8 + 1))
    }

    /// Extracts the element from an atom label. The label must start with an element symbol;
    /// anything after it (site numbers, suffixes) is ignored. Two-letter symbols win over
    /// one-letter ones, and the case of the label is normalised first, so `"FE1"`, `"fe"` and
    /// `"Fe_3"` all name iron while `"C12"` names carbon.
    pub fn from_label(label: &str) -> Option<Self> {
        let mut letters = label.trim().chars().take_while(|c| c.is_ascii_alphabetic());
        let first = letters.next()?.to_ascii_uppercase();
        if let Some(second) = letters.next() {
            let pair: String = [first, second.to_ascii_lowercase()].iter().collect();
            if let Some(element) = Self::from_symbol(&pair) {
                return Some(element);
            }
        }
        Self::from_symbol(first.encode_utf8(&mut [0; 4]))
    }

    /// Single-bond covalent radius in Ångström (Cordero et al., 2008). Elements past curium
    /// have no tabulated value and report [`DEFAULT_COVALENT_RADIUS`].
    pub fn covalent_radius(self) -> f64 {
        COVALENT_RADII
            .get(self as usize - 1)
            .copied()
            .unwrap_or(DEFAULT_COVALENT_RADIUS)
    }
}

/// Radius used for atoms whose label names no known element.
pub const DEFAULT_COVALENT_RADIUS: f64 = 1.50;

/// Covalent radius for an atom label, falling back to [`DEFAULT_COVALENT_RADIUS`].
pub fn covalent_radius_of(label: &str) -> f64 {
    Element::from_label(label)
        .map(Element::covalent_radius)
        .unwrap_or(DEFAULT_COVALENT_RADIUS)
}

const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

const COVALENT_RADII: [f64; 96] = [
    0.31, 0.28, 1.28, 0.96, 0.84, 0.76, 0.71, 0.66, 0.57, 0.58,
    1.66, 1.41, 1.21, 1.11, 1.07, 1.05, 1.02, 1.06, 2.03, 1.76,
    1.70, 1.60, 1.53, 1.39, 1.39, 1.32, 1.26, 1.24, 1.32, 1.22,
    1.22, 1.20, 1.19, 1.20, 1.20, 1.16, 2.20, 1.95, 1.90, 1.75,
    1.64, 1.54, 1.47, 1.46, 1.42, 1.39, 1.45, 1.44, 1.42, 1.39,
    1.39, 1.38, 1.39, 1.40, 2.44, 2.15, 2.07, 2.04, 2.03, 2.01,
    1.99, 1.98, 1.98, 1.96, 1.94, 1.92, 1.92, 1.89, 1.90, 1.87,
    1.87, 1.75, 1.70, 1.62, 1.51, 1.44, 1.41, 1.36, 1.36, 1.32,
    1.45, 1.46, 1.48, 1.40, 1.50, 1.50, 2.60, 2.21, 2.15, 2.06,
    2.00, 1.96, 1.90, 1.87, 1.80, 1.69,
];

const_assert_eq!(SYMBOLS.len(), Element::MAX as usize);
const_assert_eq!(COVALENT_RADII.len(), Element::Curium as usize);
const_assert_eq!(mem::size_of::<Element>(), 1);


// End of File
