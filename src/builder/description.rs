//! Declarative input to [`GeometryBuilder`](super::GeometryBuilder).
//!
//! Definitions refer to each other by name. Every list is processed in
//! order, so a definition may only refer to entries that precede it (or, for
//! elements and materials, to entries of the reference table).

use crate::material::{MaterialProperties, MaterialState};
use crate::math::Transform;
use crate::operations::creation::ConeEnd;
use crate::units::{Angle, Length, MolarMass, NumberDensity};
use crate::volume::VisAttributes;

/// Everything needed to build one geometry.
#[derive(Debug, Clone, Default)]
pub struct GeometryDescription {
    pub isotopes: Vec<IsotopeDef>,
    pub elements: Vec<ElementDef>,
    pub materials: Vec<MaterialDef>,
    pub solids: Vec<SolidDef>,
    pub volumes: Vec<VolumeDef>,
    pub placements: Vec<PlacementDef>,
}

#[derive(Debug, Clone)]
pub struct IsotopeDef {
    pub name: String,
    pub z: u32,
    pub a: u32,
    pub molar_mass: MolarMass,
}

#[derive(Debug, Clone)]
pub struct ElementDef {
    pub name: String,
    pub symbol: String,
    pub z: u32,
    pub source: ElementSource,
}

/// Where an element's molar mass comes from.
#[derive(Debug, Clone)]
pub enum ElementSource {
    MolarMass(MolarMass),
    /// `(isotope name, abundance)` pairs; the element is finalized after
    /// the last isotope is added.
    Isotopes(Vec<(String, f64)>),
}

#[derive(Debug, Clone)]
pub struct MaterialDef {
    pub name: String,
    pub recipe: MaterialRecipe,
}

/// How a material is composed. Element and material names that are not
/// defined in the description resolve through the reference table.
#[derive(Debug, Clone)]
pub enum MaterialRecipe {
    /// Built from the reference table entry of the same name.
    Reference,
    /// `(element name, mass fraction)` pairs.
    Elements {
        properties: MaterialProperties,
        fractions: Vec<(String, f64)>,
    },
    /// `(element name, atoms per molecule)` pairs.
    AtomCounts {
        properties: MaterialProperties,
        atoms: Vec<(String, u32)>,
    },
    /// `(material name, mass fraction)` pairs.
    Mixture {
        properties: MaterialProperties,
        fractions: Vec<(String, f64)>,
    },
    /// `(element name, number density)` pairs.
    NumberDensities {
        state: MaterialState,
        densities: Vec<(String, NumberDensity)>,
    },
}

#[derive(Debug, Clone)]
pub struct SolidDef {
    pub name: String,
    pub recipe: SolidRecipe,
}

#[derive(Debug, Clone)]
pub enum SolidRecipe {
    Box {
        half_x: Length,
        half_y: Length,
        half_z: Length,
    },
    Tube {
        inner_radius: Length,
        outer_radius: Length,
        half_length: Length,
        start: Angle,
        span: Angle,
    },
    Cone {
        low: ConeEnd,
        high: ConeEnd,
        half_length: Length,
        start: Angle,
        span: Angle,
    },
    Orb {
        radius: Length,
    },
    /// `b`, moved by `transform` into `a`'s frame, joined with `a`.
    Union {
        a: String,
        b: String,
        transform: Transform,
    },
    /// `b`, moved by `transform` into `a`'s frame, removed from `a`.
    Subtraction {
        a: String,
        b: String,
        transform: Transform,
    },
}

impl SolidRecipe {
    /// A full tube.
    #[must_use]
    pub fn tube(inner_radius: Length, outer_radius: Length, half_length: Length) -> Self {
        Self::Tube {
            inner_radius,
            outer_radius,
            half_length,
            start: Angle::ZERO,
            span: Angle::FULL_TURN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VolumeDef {
    pub name: String,
    pub solid: String,
    pub material: String,
    pub vis: Option<VisAttributes>,
}

#[derive(Debug, Clone)]
pub struct PlacementDef {
    pub name: String,
    pub volume: String,
    /// `None` for the world.
    pub parent: Option<String>,
    pub transform: Transform,
    pub copy_number: i32,
    pub check_overlaps: bool,
}

impl GeometryDescription {
    /// Creates an empty description.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines an isotope.
    pub fn isotope(&mut self, name: &str, z: u32, a: u32, molar_mass: MolarMass) -> &mut Self {
        self.isotopes.push(IsotopeDef {
            name: name.to_owned(),
            z,
            a,
            molar_mass,
        });
        self
    }

    /// Defines an element with a fixed molar mass or built from isotopes.
    pub fn element(
        &mut self,
        name: &str,
        symbol: &str,
        z: u32,
        source: ElementSource,
    ) -> &mut Self {
        self.elements.push(ElementDef {
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            z,
            source,
        });
        self
    }

    /// Defines a material.
    pub fn material(&mut self, name: &str, recipe: MaterialRecipe) -> &mut Self {
        self.materials.push(MaterialDef {
            name: name.to_owned(),
            recipe,
        });
        self
    }

    /// Defines a solid. Boolean operands must be defined earlier.
    pub fn solid(&mut self, name: &str, recipe: SolidRecipe) -> &mut Self {
        self.solids.push(SolidDef {
            name: name.to_owned(),
            recipe,
        });
        self
    }

    /// Binds a solid and a material into a logical volume.
    pub fn volume(&mut self, name: &str, solid: &str, material: &str) -> &mut Self {
        self.volumes.push(VolumeDef {
            name: name.to_owned(),
            solid: solid.to_owned(),
            material: material.to_owned(),
            vis: None,
        });
        self
    }

    /// Places the world volume.
    pub fn world(&mut self, name: &str, volume: &str, check_overlaps: bool) -> &mut Self {
        self.placements.push(PlacementDef {
            name: name.to_owned(),
            volume: volume.to_owned(),
            parent: None,
            transform: Transform::identity(),
            copy_number: 0,
            check_overlaps,
        });
        self
    }

    /// Places `volume` inside the placement named `parent`.
    pub fn place(
        &mut self,
        name: &str,
        volume: &str,
        parent: &str,
        transform: Transform,
        check_overlaps: bool,
    ) -> &mut Self {
        self.placements.push(PlacementDef {
            name: name.to_owned(),
            volume: volume.to_owned(),
            parent: Some(parent.to_owned()),
            transform,
            copy_number: 0,
            check_overlaps,
        });
        self
    }
}
