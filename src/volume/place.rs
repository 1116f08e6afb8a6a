use tracing::debug;

use crate::error::{EntityKind, HierarchyError, LookupError, Result};
use crate::math::Transform;
use crate::solid::SolidStore;

use super::overlap::check_placement;
use super::{LogicalVolumeId, PlacementData, PlacementId, VolumeHierarchy};

/// Places a logical volume into a hierarchy.
///
/// Without a parent the placement becomes the world; only one world may
/// exist. With `check_overlaps` set, the new placement is compared against
/// its mother and its earlier siblings. Overlaps are recorded in the
/// hierarchy's [`OverlapReport`](super::OverlapReport) and never fail the
/// placement.
///
/// # Example
///
/// ```ignore
/// let world = Place::new("World", world_lv).execute(&mut hierarchy, &solids)?;
/// let tank = Place::new("WaterTank", tank_lv)
///     .inside(world)
///     .with_transform(translation(Vector3::new(0.0, 0.0, -350.0)))
///     .with_overlap_check(true)
///     .execute(&mut hierarchy, &solids)?;
/// ```
pub struct Place {
    name: String,
    logical_volume: LogicalVolumeId,
    parent: Option<PlacementId>,
    transform: Transform,
    copy_number: i32,
    check_overlaps: bool,
}

impl Place {
    /// Creates a root placement with the identity transform.
    #[must_use]
    pub fn new(name: impl Into<String>, logical_volume: LogicalVolumeId) -> Self {
        Self {
            name: name.into(),
            logical_volume,
            parent: None,
            transform: Transform::identity(),
            copy_number: 0,
            check_overlaps: false,
        }
    }

    /// Places this volume inside `parent` instead of at the root.
    #[must_use]
    pub fn inside(mut self, parent: PlacementId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the transform from this placement's frame into its parent's.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the copy number; it does not have to be unique.
    #[must_use]
    pub fn with_copy_number(mut self, copy_number: i32) -> Self {
        self.copy_number = copy_number;
        self
    }

    /// Checks the placement against its mother and earlier siblings.
    #[must_use]
    pub fn with_overlap_check(mut self, check_overlaps: bool) -> Self {
        self.check_overlaps = check_overlaps;
        self
    }

    /// Executes the placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, the logical volume or parent is
    /// unknown, a second world is placed, or an overlap check cannot resolve
    /// a solid.
    pub fn execute(
        self,
        hierarchy: &mut VolumeHierarchy,
        solids: &SolidStore,
    ) -> Result<PlacementId> {
        if hierarchy.placement_names.contains_key(&self.name) {
            return Err(LookupError::duplicate(EntityKind::Placement, self.name).into());
        }
        hierarchy.logical_volume(self.logical_volume)?;
        match (self.parent, hierarchy.root) {
            (None, Some(root)) => {
                return Err(HierarchyError::MultipleRoots {
                    existing: hierarchy.placement(root)?.name.clone(),
                    attempted: self.name,
                }
                .into());
            }
            (Some(parent), _) => {
                hierarchy.placement(parent)?;
            }
            (None, None) => {}
        }

        let name = self.name.clone();
        let check_overlaps = self.check_overlaps;
        let id = hierarchy.placements.insert(PlacementData {
            name: self.name,
            logical_volume: self.logical_volume,
            parent: self.parent,
            transform: self.transform,
            copy_number: self.copy_number,
            check_overlaps,
        });
        hierarchy.placement_names.insert(name.clone(), id);
        hierarchy.children.insert(id, Vec::new());

        match self.parent {
            None => hierarchy.root = Some(id),
            Some(parent) => {
                if check_overlaps {
                    let siblings = hierarchy.children(parent).to_vec();
                    let found = check_placement(hierarchy, solids, id, &siblings)?;
                    hierarchy.report.overlaps.extend(found.overlaps);
                    hierarchy.report.skipped += found.skipped;
                }
                if let Some(children) = hierarchy.children.get_mut(parent) {
                    children.push(id);
                }
            }
        }
        debug!(placement = %name, "placed volume");
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::material::MaterialCatalog;
    use crate::math::{translation, Vector3};
    use crate::operations::creation::{MakeBox, MakeTube};
    use crate::units::Length;
    use crate::volume::test_support::air;
    use crate::volume::{LogicalVolumeData, OverlapKind, OverlapSettings};

    fn cm(value: f64) -> Length {
        Length::from_cm(value)
    }

    struct Fixture {
        solids: SolidStore,
        catalog: MaterialCatalog,
        hierarchy: VolumeHierarchy,
        world: PlacementId,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_settings(OverlapSettings::default())
        }

        fn with_settings(settings: OverlapSettings) -> Self {
            let mut solids = SolidStore::new();
            let mut catalog = MaterialCatalog::new();
            let mut hierarchy = VolumeHierarchy::with_overlap_settings(settings);
            let material = air(&mut catalog);
            let world_box = MakeBox::new("World", cm(100.0), cm(100.0), cm(100.0))
                .execute(&mut solids)
                .unwrap();
            let world_lv = hierarchy
                .define_logical_volume(
                    LogicalVolumeData::new("World", world_box, material),
                    &solids,
                    &catalog,
                )
                .unwrap();
            let world = Place::new("World", world_lv)
                .execute(&mut hierarchy, &solids)
                .unwrap();
            Self {
                solids,
                catalog,
                hierarchy,
                world,
            }
        }

        fn volume(&mut self, name: &str, solid: crate::solid::SolidId) -> LogicalVolumeId {
            let material = air(&mut self.catalog);
            self.hierarchy
                .define_logical_volume(
                    LogicalVolumeData::new(name, solid, material),
                    &self.solids,
                    &self.catalog,
                )
                .unwrap()
        }

        fn place(&mut self, name: &str, lv: LogicalVolumeId, z: f64) -> PlacementId {
            Place::new(name, lv)
                .inside(self.world)
                .with_transform(translation(Vector3::new(0.0, 0.0, z)))
                .with_overlap_check(true)
                .execute(&mut self.hierarchy, &self.solids)
                .unwrap()
        }
    }

    #[test]
    fn second_root_is_rejected() {
        let mut f = Fixture::new();
        let lv = f.hierarchy.logical_volume_by_name("World").unwrap();
        let err = Place::new("OtherWorld", lv)
            .execute(&mut f.hierarchy, &f.solids)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MultipleRoots);
        assert_eq!(f.hierarchy.len(), 1);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut f = Fixture::new();
        let lv = f.hierarchy.logical_volume_by_name("World").unwrap();
        let err = Place::new("Orphan", lv)
            .inside(PlacementId::default())
            .execute(&mut f.hierarchy, &f.solids)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownReference);
    }

    #[test]
    fn placement_names_are_unique() {
        let mut f = Fixture::new();
        let cube = MakeBox::new("Cube", cm(1.0), cm(1.0), cm(1.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Cube", cube);
        f.place("Cube", lv, 0.0);
        let err = Place::new("Cube", lv)
            .inside(f.world)
            .execute(&mut f.hierarchy, &f.solids)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
    }

    #[test]
    fn identical_placements_overlap() {
        let mut f = Fixture::new();
        let cube = MakeBox::new("Cube", cm(5.0), cm(5.0), cm(5.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Cube", cube);
        let first = f.place("CubeA", lv, 100.0);
        let second = f.place("CubeB", lv, 100.0);

        let report = f.hierarchy.overlap_report();
        assert_eq!(report.pairs(), vec![("CubeB", "CubeA")]);
        assert_eq!(report.overlaps[0].placement, second);
        assert_eq!(
            report.overlaps[0].kind,
            OverlapKind::Sibling { other: first }
        );
    }

    #[test]
    fn separated_placements_do_not_overlap() {
        let mut f = Fixture::new();
        let cube = MakeBox::new("Cube", cm(5.0), cm(5.0), cm(5.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Cube", cube);
        f.place("CubeA", lv, -200.0);
        f.place("CubeB", lv, 200.0);
        assert!(f.hierarchy.overlap_report().is_empty());
    }

    #[test]
    fn thin_slab_overlap_is_found() {
        let mut f = Fixture::new();
        let block = MakeBox::new("Block", cm(10.0), cm(10.0), cm(10.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Block", block);
        f.place("Lower", lv, 0.0);
        // Shares a 5 mm slab with the lower block.
        f.place("Upper", lv, 195.0);

        let report = f.hierarchy.overlap_report();
        assert_eq!(report.pairs(), vec![("Upper", "Lower")]);
        let witness = report.overlaps[0].witness;
        assert!(witness.z > 95.0 && witness.z < 100.0);
    }

    #[test]
    fn stacked_blocks_touch_without_overlap() {
        let mut f = Fixture::new();
        let block = MakeBox::new("Block", cm(10.0), cm(10.0), cm(10.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Block", block);
        f.place("Lower", lv, 0.0);
        f.place("Upper", lv, 200.0);
        assert!(f.hierarchy.overlap_report().is_empty());
    }

    #[test]
    fn concentric_tubes_share_only_a_boundary() {
        let mut f = Fixture::new();
        let pipe = MakeTube::full("Pipe", cm(2.5), cm(2.6), cm(50.0))
            .execute(&mut f.solids)
            .unwrap();
        let core = MakeTube::full("Core", Length::ZERO, cm(2.5), cm(50.0))
            .execute(&mut f.solids)
            .unwrap();
        let pipe_lv = f.volume("Pipe", pipe);
        let core_lv = f.volume("Core", core);
        f.place("Pipe", pipe_lv, 0.0);
        f.place("Core", core_lv, 0.0);
        assert!(f.hierarchy.overlap_report().is_empty());
    }

    #[test]
    fn daughter_outside_mother_protrudes() {
        let mut f = Fixture::new();
        let cube = MakeBox::new("Cube", cm(5.0), cm(5.0), cm(5.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Cube", cube);
        f.place("Edge", lv, 990.0);

        let report = f.hierarchy.overlap_report();
        assert_eq!(report.pairs(), vec![("Edge", "World")]);
        assert!(matches!(
            report.overlaps[0].kind,
            OverlapKind::Protrusion { .. }
        ));
        assert!(report.overlaps[0].witness.z > 1000.0);
    }

    #[test]
    fn unchecked_placement_is_not_reported() {
        let mut f = Fixture::new();
        let cube = MakeBox::new("Cube", cm(5.0), cm(5.0), cm(5.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Cube", cube);
        f.place("CubeA", lv, 0.0);
        Place::new("CubeB", lv)
            .inside(f.world)
            .execute(&mut f.hierarchy, &f.solids)
            .unwrap();
        assert!(f.hierarchy.overlap_report().is_empty());
    }

    #[test]
    fn sibling_checks_are_bounded() {
        let mut f = Fixture::with_settings(OverlapSettings {
            resolution: 2,
            max_siblings: 1,
        });
        let cube = MakeBox::new("Cube", cm(1.0), cm(1.0), cm(1.0))
            .execute(&mut f.solids)
            .unwrap();
        let lv = f.volume("Cube", cube);
        f.place("A", lv, -100.0);
        f.place("B", lv, 0.0);
        f.place("C", lv, 100.0);

        let report = f.hierarchy.overlap_report();
        assert!(report.is_empty());
        assert_eq!(report.skipped, 1);
    }
}
