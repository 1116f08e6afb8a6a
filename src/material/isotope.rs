use crate::units::MolarMass;

slotmap::new_key_type! {
    /// Unique identifier for an isotope in the material catalog.
    pub struct IsotopeId;
}

/// Data associated with an isotope.
#[derive(Debug, Clone)]
pub struct IsotopeData {
    pub name: String,
    /// Atomic number.
    pub z: u32,
    /// Mass number (nucleon count).
    pub a: u32,
    pub molar_mass: MolarMass,
}
