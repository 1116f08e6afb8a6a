mod element;
mod isotope;
mod mixing;
mod mixture;
pub mod reference;

pub use element::{ElementComposition, ElementData, ElementId};
pub use isotope::{IsotopeData, IsotopeId};
pub use mixing::{compute_mixed_density, MixedDensity};
pub use mixture::{MaterialComponents, MaterialData, MaterialId, MaterialProperties, MaterialState};
pub use reference::ReferenceTable;

use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::{debug, info};

use crate::error::{EntityKind, LookupError, MaterialError, Result};
use crate::units::{Density, MolarMass, NumberDensity, Pressure, Temperature, AVOGADRO};

use reference::ReferenceRecipe;

/// Allowed deviation of a sum of fractions or abundances from 1.
pub const COMPOSITION_TOLERANCE: f64 = 1e-6;

/// Central arena that owns all isotopes, elements, and materials.
///
/// Every entity has a unique name within its kind. Materials may be built
/// from other materials, which must already be in the catalog, so the
/// material graph is acyclic by construction.
#[derive(Debug, Default)]
pub struct MaterialCatalog {
    isotopes: SlotMap<IsotopeId, IsotopeData>,
    elements: SlotMap<ElementId, ElementData>,
    materials: SlotMap<MaterialId, MaterialData>,
    isotope_names: HashMap<String, IsotopeId>,
    element_names: HashMap<String, ElementId>,
    material_names: HashMap<String, MaterialId>,
    reference: ReferenceTable,
}

impl MaterialCatalog {
    /// Creates an empty catalog backed by the standard reference table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty catalog backed by the given reference table.
    #[must_use]
    pub fn with_reference(reference: ReferenceTable) -> Self {
        Self {
            reference,
            ..Self::default()
        }
    }

    // --- Isotope operations ---

    /// Defines an isotope.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, `z` is zero, `a < z`, or the
    /// molar mass is not positive.
    pub fn define_isotope(
        &mut self,
        name: &str,
        z: u32,
        a: u32,
        molar_mass: MolarMass,
    ) -> Result<IsotopeId> {
        if self.isotope_names.contains_key(name) {
            return Err(LookupError::duplicate(EntityKind::Isotope, name).into());
        }
        if z == 0 || a < z {
            return Err(MaterialError::composition(
                name,
                format!("nucleus with Z = {z} and A = {a} is not physical"),
            )
            .into());
        }
        check_molar_mass(name, molar_mass)?;

        let id = self.isotopes.insert(IsotopeData {
            name: name.to_owned(),
            z,
            a,
            molar_mass,
        });
        self.isotope_names.insert(name.to_owned(), id);
        debug!(isotope = name, z, a, "defined isotope");
        Ok(id)
    }

    /// Returns a reference to the isotope data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the isotope is not in this catalog.
    pub fn isotope(&self, id: IsotopeId) -> std::result::Result<&IsotopeData, LookupError> {
        self.isotopes
            .get(id)
            .ok_or_else(|| LookupError::unknown(EntityKind::Isotope, format!("{id:?}")))
    }

    /// Looks up an isotope by name.
    #[must_use]
    pub fn isotope_by_name(&self, name: &str) -> Option<IsotopeId> {
        self.isotope_names.get(name).copied()
    }

    // --- Element operations ---

    /// Defines an element.
    ///
    /// With `molar_mass` the element is complete immediately. Without it,
    /// isotopes must be added with [`add_isotope`](Self::add_isotope) and
    /// the element completed with [`finalize_element`](Self::finalize_element)
    /// before a material can use it.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, `z` is zero, or the molar mass
    /// is not positive.
    pub fn define_element(
        &mut self,
        name: &str,
        symbol: &str,
        z: u32,
        molar_mass: Option<MolarMass>,
    ) -> Result<ElementId> {
        if self.element_names.contains_key(name) {
            return Err(LookupError::duplicate(EntityKind::Element, name).into());
        }
        if z == 0 {
            return Err(MaterialError::composition(name, "atomic number must be positive").into());
        }
        let composition = match molar_mass {
            Some(mass) => {
                check_molar_mass(name, mass)?;
                ElementComposition::Fixed(mass)
            }
            None => ElementComposition::Isotopic {
                isotopes: Vec::new(),
                molar_mass: None,
            },
        };

        let id = self.elements.insert(ElementData {
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            z,
            composition,
        });
        self.element_names.insert(name.to_owned(), id);
        debug!(element = name, symbol, z, "defined element");
        Ok(id)
    }

    /// Adds an isotope with the given relative abundance (by atom count) to
    /// an element defined without a molar mass.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is unknown, the element has a fixed
    /// molar mass or is already finalized, the isotope's Z differs from the
    /// element's, or the abundance is outside `(0, 1]`.
    pub fn add_isotope(
        &mut self,
        element: ElementId,
        isotope: IsotopeId,
        abundance: f64,
    ) -> Result<()> {
        let isotope_z = self.isotope(isotope)?.z;
        let isotope_name = self.isotope(isotope)?.name.clone();
        let data = self
            .elements
            .get_mut(element)
            .ok_or_else(|| LookupError::unknown(EntityKind::Element, format!("{element:?}")))?;

        if isotope_z != data.z {
            return Err(MaterialError::composition(
                &data.name,
                format!("isotope {isotope_name} has Z = {isotope_z}, element has Z = {}", data.z),
            )
            .into());
        }
        if !(abundance.is_finite() && abundance > 0.0 && abundance <= 1.0 + COMPOSITION_TOLERANCE)
        {
            return Err(MaterialError::composition(
                &data.name,
                format!("abundance {abundance} of {isotope_name} is outside (0, 1]"),
            )
            .into());
        }
        match &mut data.composition {
            ElementComposition::Isotopic {
                isotopes,
                molar_mass: None,
            } => {
                isotopes.push((isotope, abundance));
                Ok(())
            }
            ElementComposition::Isotopic { .. } => Err(MaterialError::composition(
                &data.name,
                "isotopes cannot be added after finalization",
            )
            .into()),
            ElementComposition::Fixed(_) => Err(MaterialError::composition(
                &data.name,
                "element was defined with a fixed molar mass",
            )
            .into()),
        }
    }

    /// Completes an isotopic element, deriving its molar mass as the
    /// abundance-weighted mean of its isotopes. Finalizing a complete
    /// element is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown, has no isotopes, or its
    /// abundances do not sum to 1 within [`COMPOSITION_TOLERANCE`].
    pub fn finalize_element(&mut self, element: ElementId) -> Result<MolarMass> {
        let data = self.element(element)?;
        let isotopes = match &data.composition {
            ElementComposition::Fixed(mass) => return Ok(*mass),
            ElementComposition::Isotopic {
                molar_mass: Some(mass),
                ..
            } => return Ok(*mass),
            ElementComposition::Isotopic {
                isotopes,
                molar_mass: None,
            } => isotopes.clone(),
        };
        if isotopes.is_empty() {
            return Err(MaterialError::composition(&data.name, "no isotopes were added").into());
        }
        check_sum(&data.name, "isotope abundances", isotopes.iter().map(|(_, a)| *a))?;

        let total: f64 = isotopes.iter().map(|(_, a)| a).sum();
        let mut weighted = 0.0;
        for (isotope, abundance) in &isotopes {
            weighted += abundance * self.isotope(*isotope)?.molar_mass.g_per_mol();
        }
        let mass = MolarMass::from_g_per_mol(weighted / total);

        if let Some(ElementData {
            composition: ElementComposition::Isotopic { molar_mass, .. },
            name,
            ..
        }) = self.elements.get_mut(element)
        {
            *molar_mass = Some(mass);
            debug!(element = %name, molar_mass = mass.g_per_mol(), "finalized element");
        }
        Ok(mass)
    }

    /// Returns a reference to the element data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not in this catalog.
    pub fn element(&self, id: ElementId) -> std::result::Result<&ElementData, LookupError> {
        self.elements
            .get(id)
            .ok_or_else(|| LookupError::unknown(EntityKind::Element, format!("{id:?}")))
    }

    /// Looks up an element by name.
    #[must_use]
    pub fn element_by_name(&self, name: &str) -> Option<ElementId> {
        self.element_names.get(name).copied()
    }

    /// Returns the molar mass of a complete element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown or not finalized.
    pub fn element_molar_mass(&self, id: ElementId) -> Result<MolarMass> {
        let data = self.element(id)?;
        data.molar_mass().ok_or_else(|| {
            MaterialError::composition(&data.name, "isotopic composition was not finalized").into()
        })
    }

    /// Returns the element with the given symbol as its name, building it
    /// from the reference table if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is neither defined nor in the table.
    pub fn find_or_build_element(&mut self, symbol: &str) -> Result<ElementId> {
        if let Some(id) = self.element_by_name(symbol) {
            return Ok(id);
        }
        let entry = *self
            .reference
            .element(symbol)
            .ok_or_else(|| LookupError::unknown(EntityKind::Element, symbol))?;
        self.define_element(
            entry.symbol,
            entry.symbol,
            entry.z,
            Some(MolarMass::from_g_per_mol(entry.molar_mass)),
        )
    }

    // --- Material operations ---

    /// Defines a material from elements and their mass fractions.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, an element is unknown or not
    /// finalized, the density is not positive, or the fractions are not
    /// positive or do not sum to 1 within [`COMPOSITION_TOLERANCE`].
    pub fn define_material_from_elements(
        &mut self,
        name: &str,
        properties: MaterialProperties,
        elements: &[(ElementId, f64)],
    ) -> Result<MaterialId> {
        self.check_new_material(name, &properties)?;
        for (element, _) in elements {
            self.element_molar_mass(*element)?;
        }
        check_sum(name, "element mass fractions", elements.iter().map(|(_, w)| *w))?;
        self.insert_material(
            name,
            properties,
            MaterialComponents::Elements(elements.to_vec()),
        )
    }

    /// Defines a material from elements and their atom counts per molecule,
    /// converting counts to mass fractions `w_i = n_i M_i / Σ n_j M_j`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, an element is unknown or not
    /// finalized, the density is not positive, or no atoms are given.
    pub fn define_material_from_atom_counts(
        &mut self,
        name: &str,
        properties: MaterialProperties,
        atoms: &[(ElementId, u32)],
    ) -> Result<MaterialId> {
        self.check_new_material(name, &properties)?;
        let mut masses = Vec::with_capacity(atoms.len());
        for (element, count) in atoms {
            let molar_mass = self.element_molar_mass(*element)?;
            if *count == 0 {
                return Err(MaterialError::composition(name, "atom counts must be positive").into());
            }
            masses.push(f64::from(*count) * molar_mass.g_per_mol());
        }
        let total: f64 = masses.iter().sum();
        if masses.is_empty() || total <= 0.0 {
            return Err(MaterialError::composition(name, "no atoms given").into());
        }
        let fractions: Vec<_> = atoms
            .iter()
            .zip(&masses)
            .map(|((element, _), mass)| (*element, mass / total))
            .collect();
        self.insert_material(name, properties, MaterialComponents::Elements(fractions))
    }

    /// Defines a mixture of previously defined materials by mass fraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, a sub-material is unknown, the
    /// density is not positive, or the fractions are not positive or do not
    /// sum to 1 within [`COMPOSITION_TOLERANCE`].
    pub fn define_material_from_materials(
        &mut self,
        name: &str,
        properties: MaterialProperties,
        materials: &[(MaterialId, f64)],
    ) -> Result<MaterialId> {
        self.check_new_material(name, &properties)?;
        for (material, _) in materials {
            self.material(*material)?;
        }
        check_sum(name, "material mass fractions", materials.iter().map(|(_, w)| *w))?;
        self.insert_material(
            name,
            properties,
            MaterialComponents::Materials(materials.to_vec()),
        )
    }

    /// Defines a material from per-element number densities; density and
    /// mass fractions follow from [`compute_mixed_density`].
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, an element is unknown or not
    /// finalized, or a number density is not positive.
    pub fn define_material_from_number_densities(
        &mut self,
        name: &str,
        state: MaterialState,
        species: &[(ElementId, NumberDensity)],
    ) -> Result<MaterialId> {
        if self.material_names.contains_key(name) {
            return Err(LookupError::duplicate(EntityKind::Material, name).into());
        }
        let mut molar_masses = Vec::with_capacity(species.len());
        for (element, _) in species {
            molar_masses.push(self.element_molar_mass(*element)?);
        }
        let densities: Vec<_> = species.iter().map(|(_, n)| *n).collect();
        let mixed = compute_mixed_density(&densities, &molar_masses).map_err(|e| match e {
            MaterialError::InvalidComposition { reason, .. } => {
                MaterialError::composition(name, reason)
            }
        })?;

        let fractions = species
            .iter()
            .zip(&mixed.mass_fractions)
            .map(|((element, _), w)| (*element, *w))
            .collect();
        let id = self.insert_material(
            name,
            MaterialProperties::new(mixed.density, state),
            MaterialComponents::Elements(fractions),
        )?;
        info!(
            material = name,
            density_g_per_cm3 = mixed.density.g_per_cm3(),
            atoms_per_cm3 = self.atoms_per_volume(id)?.value_per_cm3(),
            "derived material from number densities"
        );
        Ok(id)
    }

    /// Returns the material with the given name, building it from the
    /// reference table if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is neither defined nor in the table.
    pub fn find_or_build_material(&mut self, name: &str) -> Result<MaterialId> {
        if let Some(id) = self.material_by_name(name) {
            return Ok(id);
        }
        let entry = *self
            .reference
            .material(name)
            .ok_or_else(|| LookupError::unknown(EntityKind::Material, name))?;

        let mut properties =
            MaterialProperties::new(Density::from_g_per_cm3(entry.density), entry.state);
        properties.temperature = entry.temperature.map(Temperature::from_kelvin);
        properties.pressure = entry.pressure.map(Pressure::from_pascals);

        match entry.recipe {
            ReferenceRecipe::MassFractions(fractions) => {
                let mut elements = Vec::with_capacity(fractions.len());
                for (symbol, fraction) in fractions {
                    elements.push((self.find_or_build_element(symbol)?, *fraction));
                }
                self.define_material_from_elements(name, properties, &elements)
            }
            ReferenceRecipe::AtomCounts(counts) => {
                let mut atoms = Vec::with_capacity(counts.len());
                for (symbol, count) in counts {
                    atoms.push((self.find_or_build_element(symbol)?, *count));
                }
                self.define_material_from_atom_counts(name, properties, &atoms)
            }
        }
    }

    /// Returns a reference to the material data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the material is not in this catalog.
    pub fn material(&self, id: MaterialId) -> std::result::Result<&MaterialData, LookupError> {
        self.materials
            .get(id)
            .ok_or_else(|| LookupError::unknown(EntityKind::Material, format!("{id:?}")))
    }

    /// Looks up a material by name.
    #[must_use]
    pub fn material_by_name(&self, name: &str) -> Option<MaterialId> {
        self.material_names.get(name).copied()
    }

    /// Number of materials in the catalog.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Mass fraction of every element in a material, expanding sub-materials.
    ///
    /// Elements appearing through several paths are merged; order follows
    /// first appearance.
    ///
    /// # Errors
    ///
    /// Returns an error if the material or one of its constituents is unknown.
    pub fn element_mass_fractions(&self, id: MaterialId) -> Result<Vec<(ElementId, f64)>> {
        let mut merged: Vec<(ElementId, f64)> = Vec::new();
        self.accumulate_elements(id, 1.0, &mut merged)?;
        Ok(merged)
    }

    /// Total number of atoms per unit volume, `Σ ρ w_i N_A / M_i`.
    ///
    /// # Errors
    ///
    /// Returns an error if the material or one of its constituents is unknown.
    pub fn atoms_per_volume(&self, id: MaterialId) -> Result<NumberDensity> {
        let density = self.material(id)?.properties.density.g_per_cm3();
        let mut total = 0.0;
        for (element, fraction) in self.element_mass_fractions(id)? {
            let molar_mass = self.element_molar_mass(element)?.g_per_mol();
            total += density * fraction * AVOGADRO / molar_mass;
        }
        Ok(NumberDensity::per_cm3(total))
    }

    fn accumulate_elements(
        &self,
        id: MaterialId,
        weight: f64,
        merged: &mut Vec<(ElementId, f64)>,
    ) -> Result<()> {
        match &self.material(id)?.components {
            MaterialComponents::Elements(elements) => {
                for (element, fraction) in elements {
                    match merged.iter_mut().find(|(e, _)| e == element) {
                        Some((_, total)) => *total += weight * fraction,
                        None => merged.push((*element, weight * fraction)),
                    }
                }
            }
            MaterialComponents::Materials(materials) => {
                for (material, fraction) in materials {
                    self.accumulate_elements(*material, weight * fraction, merged)?;
                }
            }
        }
        Ok(())
    }

    fn check_new_material(&self, name: &str, properties: &MaterialProperties) -> Result<()> {
        if self.material_names.contains_key(name) {
            return Err(LookupError::duplicate(EntityKind::Material, name).into());
        }
        let density = properties.density.g_per_cm3();
        if !(density.is_finite() && density > 0.0) {
            return Err(MaterialError::composition(
                name,
                format!("density must be positive, got {}", properties.density),
            )
            .into());
        }
        Ok(())
    }

    fn insert_material(
        &mut self,
        name: &str,
        properties: MaterialProperties,
        components: MaterialComponents,
    ) -> Result<MaterialId> {
        let id = self.materials.insert(MaterialData {
            name: name.to_owned(),
            properties,
            components,
        });
        self.material_names.insert(name.to_owned(), id);
        debug!(
            material = name,
            density_g_per_cm3 = properties.density.g_per_cm3(),
            state = ?properties.state,
            "defined material"
        );
        Ok(id)
    }
}

fn check_molar_mass(name: &str, molar_mass: MolarMass) -> Result<()> {
    let value = molar_mass.g_per_mol();
    if !(value.is_finite() && value > 0.0) {
        return Err(MaterialError::composition(
            name,
            format!("molar mass must be positive, got {value} g/mol"),
        )
        .into());
    }
    Ok(())
}

/// Checks that fractions are positive and sum to 1 within tolerance.
fn check_sum(name: &str, what: &str, fractions: impl Iterator<Item = f64>) -> Result<()> {
    let mut sum = 0.0;
    let mut count = 0_usize;
    for fraction in fractions {
        if !(fraction.is_finite() && fraction > 0.0) {
            return Err(MaterialError::composition(
                name,
                format!("{what} must be positive, got {fraction}"),
            )
            .into());
        }
        sum += fraction;
        count += 1;
    }
    if count == 0 {
        return Err(MaterialError::composition(name, format!("no {what} given")).into());
    }
    if (sum - 1.0).abs() > COMPOSITION_TOLERANCE {
        return Err(MaterialError::composition(name, format!("{what} sum to {sum}, not 1")).into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ErrorKind;

    fn g_per_mol(v: f64) -> MolarMass {
        MolarMass::from_g_per_mol(v)
    }

    fn solid(density: f64) -> MaterialProperties {
        MaterialProperties::new(Density::from_g_per_cm3(density), MaterialState::Solid)
    }

    #[test]
    fn fractions_must_sum_to_one() {
        let mut catalog = MaterialCatalog::new();
        let h = catalog.find_or_build_element("H").unwrap();
        let c = catalog.find_or_build_element("C").unwrap();

        let ok = catalog.define_material_from_elements(
            "EJ276",
            solid(1.099),
            &[(h, 0.361), (c, 0.639)],
        );
        assert!(ok.is_ok());

        let err = catalog
            .define_material_from_elements("Short", solid(1.0), &[(h, 0.36), (c, 0.63)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidComposition);

        let within = catalog.define_material_from_elements(
            "Rounded",
            solid(1.0),
            &[(h, 0.361 + 5e-7), (c, 0.639)],
        );
        assert!(within.is_ok());
    }

    #[test]
    fn mixed_density_is_reproduced_by_material() {
        let mut catalog = MaterialCatalog::new();
        let h = catalog.find_or_build_element("H").unwrap();
        let c = catalog.find_or_build_element("C").unwrap();
        let n_h = NumberDensity::per_cm3(4.647e22);
        let n_c = NumberDensity::per_cm3(4.944e22);

        let mixed = compute_mixed_density(
            &[n_h, n_c],
            &[
                catalog.element_molar_mass(h).unwrap(),
                catalog.element_molar_mass(c).unwrap(),
            ],
        )
        .unwrap();
        let fractions = [(h, mixed.mass_fractions[0]), (c, mixed.mass_fractions[1])];
        let by_fraction = catalog
            .define_material_from_elements(
                "EJ276",
                MaterialProperties::new(mixed.density, MaterialState::Solid),
                &fractions,
            )
            .unwrap();
        let by_density = catalog
            .define_material_from_number_densities(
                "EJ276-derived",
                MaterialState::Solid,
                &[(h, n_h), (c, n_c)],
            )
            .unwrap();

        let d1 = catalog.material(by_fraction).unwrap().properties.density;
        let d2 = catalog.material(by_density).unwrap().properties.density;
        assert_relative_eq!(d1.g_per_cm3(), d2.g_per_cm3(), max_relative = 1e-12);
        assert_relative_eq!(
            catalog.atoms_per_volume(by_density).unwrap().value_per_cm3(),
            4.647e22 + 4.944e22,
            max_relative = 1e-9
        );
    }

    #[test]
    fn unknown_element_is_rejected() {
        let mut catalog = MaterialCatalog::new();
        let err = catalog
            .define_material_from_elements("Ghost", solid(1.0), &[(ElementId::default(), 1.0)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownReference);
        assert!(catalog.find_or_build_element("Xx").is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalog = MaterialCatalog::new();
        catalog.define_element("Carbon", "C", 6, Some(g_per_mol(12.011))).unwrap();
        let err = catalog
            .define_element("Carbon", "C", 6, Some(g_per_mol(12.011)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);

        let water = catalog.find_or_build_material("G4_WATER").unwrap();
        let o = catalog.find_or_build_element("O").unwrap();
        let err = catalog
            .define_material_from_elements("G4_WATER", solid(1.0), &[(o, 1.0)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(catalog.find_or_build_material("G4_WATER").unwrap(), water);
    }

    #[test]
    fn deuterium_from_isotope() {
        let mut catalog = MaterialCatalog::new();
        let d_iso = catalog.define_isotope("D_Iso", 1, 2, g_per_mol(2.014_102)).unwrap();
        let d = catalog.define_element("Deuterium", "D", 1, None).unwrap();

        assert_eq!(
            catalog.element_molar_mass(d).unwrap_err().kind(),
            ErrorKind::InvalidComposition
        );
        catalog.add_isotope(d, d_iso, 1.0).unwrap();
        let mass = catalog.finalize_element(d).unwrap();
        assert_relative_eq!(mass.g_per_mol(), 2.014_102);
        assert!(catalog.add_isotope(d, d_iso, 1.0).is_err());
    }

    #[test]
    fn abundances_must_sum_to_one() {
        let mut catalog = MaterialCatalog::new();
        let u235 = catalog.define_isotope("U235", 92, 235, g_per_mol(235.044)).unwrap();
        let u238 = catalog.define_isotope("U238", 92, 238, g_per_mol(238.051)).unwrap();
        let u = catalog.define_element("Uranium", "U", 92, None).unwrap();
        catalog.add_isotope(u, u235, 0.2).unwrap();
        catalog.add_isotope(u, u238, 0.7).unwrap();

        let err = catalog.finalize_element(u).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidComposition);

        let o = catalog.find_or_build_element("O").unwrap();
        assert!(catalog
            .define_material_from_atom_counts("UO2", solid(10.97), &[(u, 1), (o, 2)])
            .is_err());
    }

    #[test]
    fn isotope_must_match_element() {
        let mut catalog = MaterialCatalog::new();
        let d_iso = catalog.define_isotope("D_Iso", 1, 2, g_per_mol(2.014)).unwrap();
        let he = catalog.define_element("Helium", "He", 2, None).unwrap();
        assert!(catalog.add_isotope(he, d_iso, 1.0).is_err());

        let fixed = catalog.define_element("Hydrogen", "H", 1, Some(g_per_mol(1.008))).unwrap();
        assert!(catalog.add_isotope(fixed, d_iso, 1.0).is_err());
    }

    #[test]
    fn atom_counts_become_mass_fractions() {
        let mut catalog = MaterialCatalog::new();
        let water = catalog.find_or_build_material("G4_WATER").unwrap();
        let fractions = catalog.element_mass_fractions(water).unwrap();
        let h = catalog.element_by_name("H").unwrap();
        let (_, w_h) = fractions.iter().find(|(e, _)| *e == h).unwrap();
        let expected = 2.0 * 1.007_94 / (2.0 * 1.007_94 + 15.999_4);
        assert_relative_eq!(*w_h, expected, max_relative = 1e-12);
    }

    #[test]
    fn blend_of_sub_materials_flattens() {
        let mut catalog = MaterialCatalog::new();
        let c = catalog.find_or_build_element("C").unwrap();
        let h = catalog.find_or_build_element("H").unwrap();
        let d_iso = catalog.define_isotope("D_Iso", 1, 2, g_per_mol(2.014_102)).unwrap();
        let d = catalog.define_element("Deuterium", "D", 1, None).unwrap();
        catalog.add_isotope(d, d_iso, 1.0).unwrap();
        catalog.finalize_element(d).unwrap();

        let liquid = |density| {
            MaterialProperties::new(Density::from_g_per_cm3(density), MaterialState::Liquid)
        };
        let c6h6 = catalog
            .define_material_from_atom_counts("C6H6", liquid(0.877), &[(c, 6), (h, 6)])
            .unwrap();
        let c6d6 = catalog
            .define_material_from_atom_counts("C6D6", liquid(0.950), &[(c, 6), (d, 6)])
            .unwrap();
        let ej315 = catalog
            .define_material_from_materials(
                "EJ315",
                liquid(0.863),
                &[(c6d6, 141.0 / 142.0), (c6h6, 1.0 / 142.0)],
            )
            .unwrap();

        let fractions = catalog.element_mass_fractions(ej315).unwrap();
        assert_eq!(fractions.len(), 3);
        let sum: f64 = fractions.iter().map(|(_, w)| w).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);

        let err = catalog
            .define_material_from_materials("Bad", liquid(1.0), &[(c6d6, 0.5), (c6h6, 0.4)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidComposition);
    }

    #[test]
    fn conditions_default_to_normal() {
        let mut catalog = MaterialCatalog::new();
        let air = catalog.find_or_build_material("G4_AIR").unwrap();
        let props = catalog.material(air).unwrap().properties;
        assert_relative_eq!(props.temperature().kelvin(), 293.15);
        assert_relative_eq!(props.pressure().pascals(), 101_325.0);

        let vacuum = catalog.find_or_build_material("G4_Galactic").unwrap();
        let props = catalog.material(vacuum).unwrap().properties;
        assert_relative_eq!(props.temperature().kelvin(), 2.73);
    }

    #[test]
    fn empty_reference_table_builds_nothing() {
        let mut catalog = MaterialCatalog::with_reference(ReferenceTable::empty());
        assert_eq!(
            catalog.find_or_build_material("G4_AIR").unwrap_err().kind(),
            ErrorKind::UnknownReference
        );
    }

    #[test]
    fn non_positive_density_fails() {
        let mut catalog = MaterialCatalog::new();
        let fe = catalog.find_or_build_element("Fe").unwrap();
        let err = catalog
            .define_material_from_elements("Void", solid(0.0), &[(fe, 1.0)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidComposition);
    }
}
