//! Overlap detection between placed volumes.
//!
//! A new daughter is compared against its mother (protrusion) and against
//! each sibling already placed under the same mother. Every comparison works
//! in the mother's frame:
//!
//! 1. The daughter's and sibling's local bounding boxes are transformed into
//!    the mother's frame; disjoint boxes cannot overlap.
//! 2. Otherwise a grid of cell centres over the intersection of the two
//!    boxes is classified in both solids. A point inside both witnesses an
//!    overlap, however thin the shared region is along any axis.
//! 3. Failing that, interior samples of each solid are classified against
//!    the other, which catches overlaps the common box grid steps over.
//!
//! Every witness lies strictly inside both solids, so solids that only share
//! a boundary never report an overlap.
//!
//! Placing `k` daughters under one mother costs `O(k²)` comparisons, each
//! `O(r³)` classifications for resolution `r`. [`OverlapSettings::max_siblings`]
//! bounds the comparisons per placement; siblings past the bound are counted
//! in [`OverlapReport::skipped`] instead of being checked.

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;
use crate::math::{Point3, Transform};
use crate::operations::boolean::{classify_point_in_solid, PointClassification};
use crate::operations::query::{BoundingBox, SampleInterior};
use crate::solid::{SolidId, SolidStore};

use super::{PlacementId, VolumeHierarchy};

/// Sampling parameters for overlap checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverlapSettings {
    /// Cells per axis when sampling a solid's interior or a shared bounding
    /// box. Must lie in `1..=`[`OverlapSettings::MAX_RESOLUTION`].
    pub resolution: u32,
    /// Maximum number of siblings compared against one new placement.
    pub max_siblings: usize,
}

impl OverlapSettings {
    /// Largest accepted resolution; one comparison classifies `O(r³)` points.
    pub const MAX_RESOLUTION: u32 = 256;
}

impl Default for OverlapSettings {
    fn default() -> Self {
        Self {
            resolution: 8,
            max_siblings: 256,
        }
    }
}

/// What a placement overlaps with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// Interiors of two daughters of the same mother intersect.
    Sibling { other: PlacementId },
    /// Part of the daughter lies outside its mother.
    Protrusion { mother: PlacementId },
}

/// A detected overlap.
#[derive(Debug, Clone)]
pub struct Overlap {
    pub placement: PlacementId,
    pub placement_name: String,
    /// Name of the sibling, or of the mother for a protrusion.
    pub other_name: String,
    pub kind: OverlapKind,
    /// A point, in the mother's frame, that demonstrates the overlap.
    pub witness: Point3,
}

/// Overlaps collected while placing volumes.
#[derive(Debug, Clone, Default)]
pub struct OverlapReport {
    pub overlaps: Vec<Overlap>,
    /// Sibling comparisons skipped because of [`OverlapSettings::max_siblings`].
    pub skipped: usize,
}

impl OverlapReport {
    /// Returns `true` if no overlap was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlaps.is_empty()
    }

    /// Conflicting `(placement, other)` name pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.overlaps
            .iter()
            .map(|o| (o.placement_name.as_str(), o.other_name.as_str()))
            .collect()
    }
}

/// A placed solid, seen from its mother's frame.
struct Placed {
    solid: SolidId,
    transform: Transform,
}

impl Placed {
    /// Interior samples mapped into the mother's frame.
    fn samples(&self, solids: &SolidStore, resolution: u32) -> Result<Vec<Point3>> {
        let local = SampleInterior::new(self.solid, resolution).execute(solids)?;
        Ok(local
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect())
    }

    fn classify(&self, point: &Point3, solids: &SolidStore) -> Result<PointClassification> {
        let local = self.transform.inverse_transform_point(point);
        classify_point_in_solid(&local, self.solid, solids)
    }

    /// First point (mother frame) with the wanted classification in this solid.
    fn first_classified(
        &self,
        points: &[Point3],
        wanted: PointClassification,
        solids: &SolidStore,
    ) -> Result<Option<Point3>> {
        for point in points {
            if self.classify(point, solids)? == wanted {
                return Ok(Some(*point));
            }
        }
        Ok(None)
    }

    /// First point (mother frame) strictly inside both solids.
    fn first_shared(
        &self,
        other: &Self,
        points: &[Point3],
        solids: &SolidStore,
    ) -> Result<Option<Point3>> {
        for point in points {
            if self.classify(point, solids)? == PointClassification::Inside
                && other.classify(point, solids)? == PointClassification::Inside
            {
                return Ok(Some(*point));
            }
        }
        Ok(None)
    }
}

/// Checks a freshly inserted placement against its mother and its siblings.
///
/// `siblings` are the mother's daughters placed before this one.
pub(super) fn check_placement(
    hierarchy: &VolumeHierarchy,
    solids: &SolidStore,
    id: PlacementId,
    siblings: &[PlacementId],
) -> Result<OverlapReport> {
    let mut report = OverlapReport::default();
    let placement = hierarchy.placement(id)?;
    let Some(mother_id) = placement.parent else {
        return Ok(report);
    };
    let mother = hierarchy.placement(mother_id)?;
    let settings = hierarchy.overlap_settings;

    let daughter = Placed {
        solid: hierarchy.logical_volume(placement.logical_volume)?.solid,
        transform: placement.transform,
    };
    let samples = daughter.samples(solids, settings.resolution)?;

    let mother_frame = Placed {
        solid: hierarchy.logical_volume(mother.logical_volume)?.solid,
        transform: Transform::identity(),
    };
    if let Some(witness) =
        mother_frame.first_classified(&samples, PointClassification::Outside, solids)?
    {
        warn!(
            placement = %placement.name,
            mother = %mother.name,
            x = witness.x,
            y = witness.y,
            z = witness.z,
            "placement protrudes from its mother"
        );
        report.overlaps.push(Overlap {
            placement: id,
            placement_name: placement.name.clone(),
            other_name: mother.name.clone(),
            kind: OverlapKind::Protrusion { mother: mother_id },
            witness,
        });
    }

    let bounds = BoundingBox::new(daughter.solid)
        .execute(solids)?
        .transformed(&daughter.transform);

    if siblings.len() > settings.max_siblings {
        report.skipped = siblings.len() - settings.max_siblings;
        warn!(
            placement = %placement.name,
            skipped = report.skipped,
            "sibling overlap checks skipped"
        );
    }
    for &sibling_id in siblings.iter().take(settings.max_siblings) {
        let sibling = hierarchy.placement(sibling_id)?;
        let other = Placed {
            solid: hierarchy.logical_volume(sibling.logical_volume)?.solid,
            transform: sibling.transform,
        };
        let other_bounds = BoundingBox::new(other.solid)
            .execute(solids)?
            .transformed(&other.transform);
        let Some(common) = bounds.intersection(&other_bounds) else {
            continue;
        };

        let grid = common.cell_centres(settings.resolution);
        let mut witness = daughter.first_shared(&other, &grid, solids)?;
        if witness.is_none() {
            witness = other.first_classified(&samples, PointClassification::Inside, solids)?;
        }
        if witness.is_none() {
            let other_samples = other.samples(solids, settings.resolution)?;
            witness =
                daughter.first_classified(&other_samples, PointClassification::Inside, solids)?;
        }
        if let Some(witness) = witness {
            warn!(
                placement = %placement.name,
                other = %sibling.name,
                x = witness.x,
                y = witness.y,
                z = witness.z,
                "overlap detected"
            );
            report.overlaps.push(Overlap {
                placement: id,
                placement_name: placement.name.clone(),
                other_name: sibling.name.clone(),
                kind: OverlapKind::Sibling { other: sibling_id },
                witness,
            });
        }
    }
    Ok(report)
}
