use crate::units::MolarMass;

use super::isotope::IsotopeId;

slotmap::new_key_type! {
    /// Unique identifier for an element in the material catalog.
    pub struct ElementId;
}

/// How the molar mass of an element is known.
#[derive(Debug, Clone)]
pub enum ElementComposition {
    /// Molar mass given directly.
    Fixed(MolarMass),
    /// Molar mass derived from isotope abundances.
    ///
    /// `molar_mass` stays `None` until the element is finalized; after that
    /// the isotope list is frozen.
    Isotopic {
        isotopes: Vec<(IsotopeId, f64)>,
        molar_mass: Option<MolarMass>,
    },
}

/// Data associated with a chemical element.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: String,
    pub symbol: String,
    /// Atomic number.
    pub z: u32,
    pub composition: ElementComposition,
}

impl ElementData {
    /// Returns the molar mass, or `None` for an unfinalized isotopic element.
    #[must_use]
    pub fn molar_mass(&self) -> Option<MolarMass> {
        match &self.composition {
            ElementComposition::Fixed(mass) => Some(*mass),
            ElementComposition::Isotopic { molar_mass, .. } => *molar_mass,
        }
    }

    /// Returns `true` once the element can be used in a material.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.molar_mass().is_some()
    }
}
