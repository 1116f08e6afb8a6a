mod navigation;
mod overlap;
mod place;

pub use overlap::{Overlap, OverlapKind, OverlapReport, OverlapSettings};
pub use place::Place;

use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};
use tracing::debug;

use crate::error::{EntityKind, LookupError, Result};
use crate::material::{MaterialCatalog, MaterialId};
use crate::math::Transform;
use crate::solid::{SolidId, SolidStore};

slotmap::new_key_type! {
    /// Unique identifier for a logical volume in a volume hierarchy.
    pub struct LogicalVolumeId;

    /// Unique identifier for a placement in a volume hierarchy.
    pub struct PlacementId;
}

/// An RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Colour {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GREY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// An opaque colour.
    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
}

/// Display hints for a renderer. Stored and exposed, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisAttributes {
    pub colour: Colour,
    pub visible: bool,
    pub force_aux_edge_visible: bool,
}

impl VisAttributes {
    /// Visible attributes with the given colour.
    #[must_use]
    pub fn new(colour: Colour) -> Self {
        Self {
            colour,
            visible: true,
            force_aux_edge_visible: false,
        }
    }
}

/// A named pairing of a solid with a material.
#[derive(Debug, Clone)]
pub struct LogicalVolumeData {
    pub name: String,
    pub solid: SolidId,
    pub material: MaterialId,
    pub vis: Option<VisAttributes>,
}

impl LogicalVolumeData {
    /// Creates a logical volume without visualization attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, solid: SolidId, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            solid,
            material,
            vis: None,
        }
    }

    /// Attaches visualization attributes.
    #[must_use]
    pub fn with_vis(mut self, vis: VisAttributes) -> Self {
        self.vis = Some(vis);
        self
    }
}

/// A logical volume positioned inside its parent's frame.
#[derive(Debug, Clone)]
pub struct PlacementData {
    pub name: String,
    pub logical_volume: LogicalVolumeId,
    /// `None` only for the world.
    pub parent: Option<PlacementId>,
    /// Maps the placement's local frame into its parent's frame.
    pub transform: Transform,
    pub copy_number: i32,
    pub check_overlaps: bool,
}

/// Logical volumes and the single-rooted tree of their placements.
///
/// Placements are added root first; a parent always exists before its
/// daughters, so the tree is acyclic by construction.
#[derive(Debug, Default)]
pub struct VolumeHierarchy {
    logical_volumes: SlotMap<LogicalVolumeId, LogicalVolumeData>,
    placements: SlotMap<PlacementId, PlacementData>,
    children: SecondaryMap<PlacementId, Vec<PlacementId>>,
    logical_volume_names: HashMap<String, LogicalVolumeId>,
    placement_names: HashMap<String, PlacementId>,
    root: Option<PlacementId>,
    overlap_settings: OverlapSettings,
    report: OverlapReport,
}

impl VolumeHierarchy {
    /// Creates an empty hierarchy with default overlap settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty hierarchy that checks overlaps with `settings`.
    ///
    /// The resolution is clamped to `1..=`[`OverlapSettings::MAX_RESOLUTION`].
    #[must_use]
    pub fn with_overlap_settings(overlap_settings: OverlapSettings) -> Self {
        Self {
            overlap_settings: OverlapSettings {
                resolution: overlap_settings
                    .resolution
                    .clamp(1, OverlapSettings::MAX_RESOLUTION),
                ..overlap_settings
            },
            ..Self::default()
        }
    }

    /// Defines a logical volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the solid or material is
    /// unknown.
    pub fn define_logical_volume(
        &mut self,
        data: LogicalVolumeData,
        solids: &SolidStore,
        catalog: &MaterialCatalog,
    ) -> Result<LogicalVolumeId> {
        if self.logical_volume_names.contains_key(&data.name) {
            return Err(LookupError::duplicate(EntityKind::LogicalVolume, data.name).into());
        }
        solids.solid(data.solid)?;
        catalog.material(data.material)?;

        let name = data.name.clone();
        let id = self.logical_volumes.insert(data);
        self.logical_volume_names.insert(name.clone(), id);
        debug!(logical_volume = %name, "defined logical volume");
        Ok(id)
    }

    /// Returns a reference to the logical volume, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the logical volume is not in this hierarchy.
    pub fn logical_volume(
        &self,
        id: LogicalVolumeId,
    ) -> std::result::Result<&LogicalVolumeData, LookupError> {
        self.logical_volumes
            .get(id)
            .ok_or_else(|| LookupError::unknown(EntityKind::LogicalVolume, format!("{id:?}")))
    }

    /// Looks up a logical volume by name.
    #[must_use]
    pub fn logical_volume_by_name(&self, name: &str) -> Option<LogicalVolumeId> {
        self.logical_volume_names.get(name).copied()
    }

    /// Returns a reference to the placement, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement is not in this hierarchy.
    pub fn placement(&self, id: PlacementId) -> std::result::Result<&PlacementData, LookupError> {
        self.placements
            .get(id)
            .ok_or_else(|| LookupError::unknown(EntityKind::Placement, format!("{id:?}")))
    }

    /// Looks up a placement by name.
    #[must_use]
    pub fn placement_by_name(&self, name: &str) -> Option<PlacementId> {
        self.placement_names.get(name).copied()
    }

    /// Iterates over all placements in insertion order.
    pub fn placements(&self) -> impl Iterator<Item = (PlacementId, &PlacementData)> {
        self.placements.iter()
    }

    /// Number of placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns `true` if nothing has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Overlaps found so far.
    #[must_use]
    pub fn overlap_report(&self) -> &OverlapReport {
        &self.report
    }

    /// Sampling parameters used by overlap checks.
    #[must_use]
    pub fn overlap_settings(&self) -> OverlapSettings {
        self.overlap_settings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use crate::material::{MaterialCatalog, MaterialId};

    pub(crate) fn air(catalog: &mut MaterialCatalog) -> MaterialId {
        catalog.find_or_build_material("G4_AIR").unwrap()
    }
}
