//! Table of well-known elements and materials.
//!
//! Values follow the NIST compositions used by common transport codes:
//! element names are their symbols and material names carry the `G4_`
//! prefix.

use super::mixture::MaterialState;

/// A natural element with a standard atomic weight.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceElement {
    pub symbol: &'static str,
    pub z: u32,
    /// Standard atomic weight in g/mol.
    pub molar_mass: f64,
}

/// How a reference material is composed.
#[derive(Debug, Clone, Copy)]
pub enum ReferenceRecipe {
    /// `(element symbol, mass fraction)` pairs.
    MassFractions(&'static [(&'static str, f64)]),
    /// `(element symbol, atoms per molecule)` pairs.
    AtomCounts(&'static [(&'static str, u32)]),
}

/// A well-known material.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceMaterial {
    pub name: &'static str,
    /// Density in g/cm³.
    pub density: f64,
    pub state: MaterialState,
    /// Temperature in K, if not normal temperature.
    pub temperature: Option<f64>,
    /// Pressure in Pa, if not standard pressure.
    pub pressure: Option<f64>,
    pub recipe: ReferenceRecipe,
}

const ELEMENTS: &[ReferenceElement] = &[
    ReferenceElement {
        symbol: "H",
        z: 1,
        molar_mass: 1.007_94,
    },
    ReferenceElement {
        symbol: "C",
        z: 6,
        molar_mass: 12.010_7,
    },
    ReferenceElement {
        symbol: "N",
        z: 7,
        molar_mass: 14.006_7,
    },
    ReferenceElement {
        symbol: "O",
        z: 8,
        molar_mass: 15.999_4,
    },
    ReferenceElement {
        symbol: "Al",
        z: 13,
        molar_mass: 26.981_538_5,
    },
    ReferenceElement {
        symbol: "Si",
        z: 14,
        molar_mass: 28.085_5,
    },
    ReferenceElement {
        symbol: "Ar",
        z: 18,
        molar_mass: 39.948,
    },
    ReferenceElement {
        symbol: "Cr",
        z: 24,
        molar_mass: 51.996_1,
    },
    ReferenceElement {
        symbol: "Mn",
        z: 25,
        molar_mass: 54.938_045,
    },
    ReferenceElement {
        symbol: "Fe",
        z: 26,
        molar_mass: 55.845,
    },
    ReferenceElement {
        symbol: "Ni",
        z: 28,
        molar_mass: 58.693_4,
    },
];

const MATERIALS: &[ReferenceMaterial] = &[
    ReferenceMaterial {
        name: "G4_AIR",
        density: 0.001_204_79,
        state: MaterialState::Gas,
        temperature: None,
        pressure: None,
        recipe: ReferenceRecipe::MassFractions(&[
            ("C", 0.000_124),
            ("N", 0.755_268),
            ("O", 0.231_781),
            ("Ar", 0.012_827),
        ]),
    },
    ReferenceMaterial {
        name: "G4_WATER",
        density: 1.0,
        state: MaterialState::Liquid,
        temperature: None,
        pressure: None,
        recipe: ReferenceRecipe::AtomCounts(&[("H", 2), ("O", 1)]),
    },
    ReferenceMaterial {
        name: "G4_Galactic",
        density: 1e-25,
        state: MaterialState::Gas,
        temperature: Some(2.73),
        pressure: Some(3e-18),
        recipe: ReferenceRecipe::AtomCounts(&[("H", 1)]),
    },
    ReferenceMaterial {
        name: "G4_Fe",
        density: 7.874,
        state: MaterialState::Solid,
        temperature: None,
        pressure: None,
        recipe: ReferenceRecipe::AtomCounts(&[("Fe", 1)]),
    },
];

/// Lookup table of standard elements and materials.
///
/// A plain value owned by the catalog that consults it; tests and callers
/// may substitute their own table.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTable {
    elements: &'static [ReferenceElement],
    materials: &'static [ReferenceMaterial],
}

impl ReferenceTable {
    /// The built-in table.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            elements: ELEMENTS,
            materials: MATERIALS,
        }
    }

    /// A table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            elements: &[],
            materials: &[],
        }
    }

    /// Finds an element by symbol.
    #[must_use]
    pub fn element(&self, symbol: &str) -> Option<&ReferenceElement> {
        self.elements.iter().find(|e| e.symbol == symbol)
    }

    /// Finds a material by name.
    #[must_use]
    pub fn material(&self, name: &str) -> Option<&ReferenceMaterial> {
        self.materials.iter().find(|m| m.name == name)
    }
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::standard()
    }
}
