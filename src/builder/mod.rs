mod config;
mod description;

pub use config::{
    ApparatusConfig, BeamPipeConfig, DetectorConfig, EnvelopeConfig, IronFilterConfig,
    ReflectorConfig, WaterTankConfig, WorldConfig,
};
pub use description::{
    ElementDef, ElementSource, GeometryDescription, IsotopeDef, MaterialDef, MaterialRecipe,
    PlacementDef, SolidDef, SolidRecipe, VolumeDef,
};

use std::sync::Arc;

use tracing::info;

use crate::error::{BuildError, EntityKind, HierarchyError, LookupError, Result};
use crate::material::{ElementId, MaterialCatalog, MaterialId};
use crate::math::Point3;
use crate::operations::boolean::{Subtract, Union};
use crate::operations::creation::{MakeBox, MakeCone, MakeOrb, MakeTube};
use crate::solid::{SolidId, SolidStore};
use crate::volume::{
    LogicalVolumeData, OverlapReport, OverlapSettings, Place, PlacementId, VolumeHierarchy,
};

/// What to do when a placement overlaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Record the overlap in the report and keep building.
    #[default]
    Collect,
    /// Abort the build with [`HierarchyError::OverlapDetected`].
    Strict,
}

/// What a second call to [`GeometryBuilder::build`] does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Fail with [`BuildError::AlreadyBuilt`].
    #[default]
    Reject,
    /// Return the root of the geometry built by the first call.
    ReuseCached,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub overlap_policy: OverlapPolicy,
    pub rebuild: RebuildPolicy,
    pub overlap_settings: OverlapSettings,
}

/// A fully built, immutable geometry.
///
/// Shared as `Arc<Geometry>`; any number of threads may read it.
#[derive(Debug)]
pub struct Geometry {
    catalog: MaterialCatalog,
    solids: SolidStore,
    hierarchy: VolumeHierarchy,
    root: PlacementId,
}

impl Geometry {
    /// The world placement.
    #[must_use]
    pub fn root(&self) -> PlacementId {
        self.root
    }

    /// Materials used by the geometry.
    #[must_use]
    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// Solids used by the geometry.
    #[must_use]
    pub fn solids(&self) -> &SolidStore {
        &self.solids
    }

    /// The placed volume tree.
    #[must_use]
    pub fn hierarchy(&self) -> &VolumeHierarchy {
        &self.hierarchy
    }

    /// Overlaps found while placing volumes.
    #[must_use]
    pub fn report(&self) -> &OverlapReport {
        self.hierarchy.overlap_report()
    }

    /// Name of the deepest placement containing a world-frame point.
    ///
    /// # Errors
    ///
    /// Returns an error if a solid cannot be resolved.
    pub fn volume_name_at(&self, point: &Point3) -> Result<Option<&str>> {
        match self.hierarchy.locate(point, &self.solids)? {
            Some(id) => Ok(Some(self.hierarchy.placement(id)?.name.as_str())),
            None => Ok(None),
        }
    }
}

enum BuildState {
    Pending,
    Built(Arc<Geometry>),
    Failed,
}

/// Runs a [`GeometryDescription`] through the catalog, the solid store and
/// the volume hierarchy, once.
///
/// Stages run in order: isotopes, elements, materials, solids, logical
/// volumes, placements. The first fatal error aborts the build; a builder
/// whose build failed does not retry.
///
/// # Example
///
/// ```ignore
/// let mut builder = GeometryBuilder::from_config(&ApparatusConfig::default())?;
/// let world = builder.build()?;
/// let geometry = builder.geometry().unwrap();
/// assert!(geometry.report().is_empty());
/// ```
pub struct GeometryBuilder {
    description: GeometryDescription,
    options: BuildOptions,
    state: BuildState,
}

impl GeometryBuilder {
    /// Creates a builder with default options.
    #[must_use]
    pub fn new(description: GeometryDescription) -> Self {
        Self {
            description,
            options: BuildOptions::default(),
            state: BuildState::Pending,
        }
    }

    /// Builder for the reference apparatus described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ApparatusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.describe()).with_options(BuildOptions {
            overlap_settings: config.overlap,
            ..BuildOptions::default()
        }))
    }

    /// Replaces the build options.
    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the geometry and returns the world placement.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the build, or
    /// [`BuildError::AlreadyBuilt`] if this builder has already run (unless
    /// [`RebuildPolicy::ReuseCached`] is set and the first build succeeded).
    pub fn build(&mut self) -> Result<PlacementId> {
        match &self.state {
            BuildState::Built(geometry) if self.options.rebuild == RebuildPolicy::ReuseCached => {
                return Ok(geometry.root);
            }
            BuildState::Built(_) | BuildState::Failed => {
                return Err(BuildError::AlreadyBuilt.into());
            }
            BuildState::Pending => {}
        }

        self.state = BuildState::Failed;
        let geometry = construct(&self.description, &self.options)?;
        let root = geometry.root;
        self.state = BuildState::Built(Arc::new(geometry));
        Ok(root)
    }

    /// The built geometry, once [`build`](Self::build) has succeeded.
    #[must_use]
    pub fn geometry(&self) -> Option<Arc<Geometry>> {
        match &self.state {
            BuildState::Built(geometry) => Some(Arc::clone(geometry)),
            BuildState::Pending | BuildState::Failed => None,
        }
    }
}

fn construct(description: &GeometryDescription, options: &BuildOptions) -> Result<Geometry> {
    let mut catalog = MaterialCatalog::new();
    define_materials(&mut catalog, description)?;
    info!(materials = catalog.material_count(), "materials defined");

    let mut solids = SolidStore::new();
    define_solids(&mut solids, description)?;
    info!(solids = solids.len(), "solids defined");

    let mut hierarchy = VolumeHierarchy::with_overlap_settings(options.overlap_settings);
    for volume in &description.volumes {
        let solid = solids
            .solid_by_name(&volume.solid)
            .ok_or_else(|| LookupError::unknown(EntityKind::Solid, volume.solid.as_str()))?;
        let material = resolve_material(&mut catalog, &volume.material)?;
        let mut data = LogicalVolumeData::new(volume.name.as_str(), solid, material);
        data.vis = volume.vis;
        hierarchy.define_logical_volume(data, &solids, &catalog)?;
    }
    info!(volumes = description.volumes.len(), "logical volumes defined");

    place_volumes(&mut hierarchy, &solids, description, options.overlap_policy)?;
    hierarchy.validate()?;
    let root = hierarchy.root()?;
    info!(
        placements = hierarchy.len(),
        overlaps = hierarchy.overlap_report().overlaps.len(),
        skipped_checks = hierarchy.overlap_report().skipped,
        "geometry built"
    );

    Ok(Geometry {
        catalog,
        solids,
        hierarchy,
        root,
    })
}

fn define_materials(
    catalog: &mut MaterialCatalog,
    description: &GeometryDescription,
) -> Result<()> {
    for isotope in &description.isotopes {
        catalog.define_isotope(&isotope.name, isotope.z, isotope.a, isotope.molar_mass)?;
    }

    for element in &description.elements {
        match &element.source {
            ElementSource::MolarMass(mass) => {
                catalog.define_element(&element.name, &element.symbol, element.z, Some(*mass))?;
            }
            ElementSource::Isotopes(isotopes) => {
                let id = catalog.define_element(&element.name, &element.symbol, element.z, None)?;
                for (isotope, abundance) in isotopes {
                    let isotope_id = catalog
                        .isotope_by_name(isotope)
                        .ok_or_else(|| {
                            LookupError::unknown(EntityKind::Isotope, isotope.as_str())
                        })?;
                    catalog.add_isotope(id, isotope_id, *abundance)?;
                }
                catalog.finalize_element(id)?;
            }
        }
    }

    for material in &description.materials {
        let name = material.name.as_str();
        match &material.recipe {
            MaterialRecipe::Reference => {
                catalog.find_or_build_material(name)?;
            }
            MaterialRecipe::Elements {
                properties,
                fractions,
            } => {
                let elements = resolve_all(catalog, fractions, resolve_element)?;
                catalog.define_material_from_elements(name, *properties, &elements)?;
            }
            MaterialRecipe::AtomCounts { properties, atoms } => {
                let atoms = resolve_all(catalog, atoms, resolve_element)?;
                catalog.define_material_from_atom_counts(name, *properties, &atoms)?;
            }
            MaterialRecipe::Mixture {
                properties,
                fractions,
            } => {
                let materials = resolve_all(catalog, fractions, resolve_material)?;
                catalog.define_material_from_materials(name, *properties, &materials)?;
            }
            MaterialRecipe::NumberDensities { state, densities } => {
                let species = resolve_all(catalog, densities, resolve_element)?;
                catalog.define_material_from_number_densities(name, *state, &species)?;
            }
        }
    }
    Ok(())
}

fn define_solids(solids: &mut SolidStore, description: &GeometryDescription) -> Result<()> {
    let operand = |solids: &SolidStore, name: &str| -> Result<SolidId> {
        solids
            .solid_by_name(name)
            .ok_or_else(|| LookupError::unknown(EntityKind::Solid, name).into())
    };

    for solid in &description.solids {
        let name = solid.name.as_str();
        match &solid.recipe {
            SolidRecipe::Box {
                half_x,
                half_y,
                half_z,
            } => MakeBox::new(name, *half_x, *half_y, *half_z).execute(solids)?,
            SolidRecipe::Tube {
                inner_radius,
                outer_radius,
                half_length,
                start,
                span,
            } => MakeTube::new(name, *inner_radius, *outer_radius, *half_length, *start, *span)
                .execute(solids)?,
            SolidRecipe::Cone {
                low,
                high,
                half_length,
                start,
                span,
            } => MakeCone::new(name, *low, *high, *half_length, *start, *span).execute(solids)?,
            SolidRecipe::Orb { radius } => MakeOrb::new(name, *radius).execute(solids)?,
            SolidRecipe::Union { a, b, transform } => {
                let (a, b) = (operand(solids, a)?, operand(solids, b)?);
                Union::new(name, a, b, *transform).execute(solids)?
            }
            SolidRecipe::Subtraction { a, b, transform } => {
                let (a, b) = (operand(solids, a)?, operand(solids, b)?);
                Subtract::new(name, a, b, *transform).execute(solids)?
            }
        };
    }
    Ok(())
}

fn place_volumes(
    hierarchy: &mut VolumeHierarchy,
    solids: &SolidStore,
    description: &GeometryDescription,
    policy: OverlapPolicy,
) -> Result<()> {
    for placement in &description.placements {
        let volume = hierarchy.logical_volume_by_name(&placement.volume).ok_or_else(|| {
            LookupError::unknown(EntityKind::LogicalVolume, placement.volume.as_str())
        })?;
        let mut place = Place::new(placement.name.as_str(), volume)
            .with_transform(placement.transform)
            .with_copy_number(placement.copy_number)
            .with_overlap_check(placement.check_overlaps);
        if let Some(parent) = &placement.parent {
            let parent = hierarchy
                .placement_by_name(parent)
                .ok_or_else(|| LookupError::unknown(EntityKind::Placement, parent.as_str()))?;
            place = place.inside(parent);
        }

        let known = hierarchy.overlap_report().overlaps.len();
        place.execute(hierarchy, solids)?;
        if policy == OverlapPolicy::Strict {
            if let Some(overlap) = hierarchy.overlap_report().overlaps.get(known) {
                return Err(HierarchyError::OverlapDetected {
                    placement: overlap.placement_name.clone(),
                    other: overlap.other_name.clone(),
                }
                .into());
            }
        }
    }
    Ok(())
}

fn resolve_element(catalog: &mut MaterialCatalog, name: &str) -> Result<ElementId> {
    match catalog.element_by_name(name) {
        Some(id) => Ok(id),
        None => catalog.find_or_build_element(name),
    }
}

fn resolve_material(catalog: &mut MaterialCatalog, name: &str) -> Result<MaterialId> {
    match catalog.material_by_name(name) {
        Some(id) => Ok(id),
        None => catalog.find_or_build_material(name),
    }
}

/// Resolves the names of `(name, value)` pairs, keeping the values.
fn resolve_all<Id, T: Copy>(
    catalog: &mut MaterialCatalog,
    entries: &[(String, T)],
    resolve: fn(&mut MaterialCatalog, &str) -> Result<Id>,
) -> Result<Vec<(Id, T)>> {
    entries
        .iter()
        .map(|(name, value)| Ok((resolve(catalog, name)?, *value)))
        .collect()
}
