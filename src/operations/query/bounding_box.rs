use std::f64::consts::FRAC_PI_2;

use crate::error::Result;
use crate::math::{Point3, Transform, TOLERANCE};
use crate::solid::{PhiSegment, SolidId, SolidShape, SolidStore};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a bounding box from its corners.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all the given points.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(&p),
            max: acc.max.sup(&p),
        }))
    }

    /// The eight corners of the box.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounding box of this box after a rigid transform.
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        let corners = self.corners().map(|c| transform.transform_point(&c));
        let mut result = Self::new(corners[0], corners[0]);
        for c in &corners[1..] {
            result.min = result.min.inf(c);
            result.max = result.max.sup(c);
        }
        result
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Returns `true` if `other` lies within this box (up to tolerance).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        (0..3).all(|i| {
            other.min[i] >= self.min[i] - TOLERANCE && other.max[i] <= self.max[i] + TOLERANCE
        })
    }

    /// Intersection of two boxes if it has a non-zero extent on every axis.
    ///
    /// Boxes that only touch along a face, edge or corner do not intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.min.sup(&other.min);
        let max = self.max.inf(&other.max);
        (0..3)
            .all(|i| max[i] - min[i] > TOLERANCE)
            .then_some(Self { min, max })
    }

    /// Centres of an `n × n × n` grid of equal cells filling the box.
    ///
    /// Every centre lies strictly inside a box with non-zero extent.
    #[must_use]
    pub fn cell_centres(&self, n: u32) -> Vec<Point3> {
        let n = n.max(1);
        let step = (self.max - self.min) / f64::from(n);
        let centre = |i: u32| f64::from(i) + 0.5;
        let mut points = Vec::with_capacity((n as usize).pow(3));
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    points.push(Point3::new(
                        self.min.x + centre(i) * step.x,
                        self.min.y + centre(j) * step.y,
                        self.min.z + centre(k) * step.z,
                    ));
                }
            }
        }
        points
    }
}

/// Computes the axis-aligned bounding box of a solid in its local frame.
///
/// Unions bound both operands; subtractions are bounded by their minuend.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its operands is not in the
    /// store.
    pub fn execute(&self, store: &SolidStore) -> Result<Aabb> {
        let solid = store.solid(self.solid)?;
        let aabb = match &solid.shape {
            SolidShape::Box(shape) => Aabb::new(
                Point3::new(-shape.half_x, -shape.half_y, -shape.half_z),
                Point3::new(shape.half_x, shape.half_y, shape.half_z),
            ),
            SolidShape::Tube(shape) => sector_bounds(
                shape.inner_radius,
                shape.outer_radius,
                shape.half_length,
                &shape.phi,
            ),
            SolidShape::Cone(shape) => sector_bounds(
                shape.inner_radius_low.min(shape.inner_radius_high),
                shape.outer_radius_low.max(shape.outer_radius_high),
                shape.half_length,
                &shape.phi,
            ),
            SolidShape::Orb(shape) => Aabb::new(
                Point3::new(-shape.radius, -shape.radius, -shape.radius),
                Point3::new(shape.radius, shape.radius, shape.radius),
            ),
            SolidShape::Union(node) => {
                let a = BoundingBox::new(node.a).execute(store)?;
                let b = BoundingBox::new(node.b).execute(store)?;
                a.union(&b.transformed(&node.transform))
            }
            SolidShape::Subtraction(node) => BoundingBox::new(node.a).execute(store)?,
        };
        Ok(aabb)
    }
}

/// Bounds an annular sector extruded along z.
///
/// The xy extent is spanned by the four corner points of the sector and by
/// every axis crossing of the outer arc within the phi range.
fn sector_bounds(inner: f64, outer: f64, half_length: f64, phi: &PhiSegment) -> Aabb {
    let z = half_length;
    if phi.is_full() {
        return Aabb::new(
            Point3::new(-outer, -outer, -z),
            Point3::new(outer, outer, z),
        );
    }

    let end = phi.start + phi.span;
    let mut candidates = vec![
        (inner * phi.start.cos(), inner * phi.start.sin()),
        (outer * phi.start.cos(), outer * phi.start.sin()),
        (inner * end.cos(), inner * end.sin()),
        (outer * end.cos(), outer * end.sin()),
    ];
    for quadrant in 0..4_u8 {
        let angle = f64::from(quadrant) * FRAC_PI_2;
        if phi.contains(angle) {
            candidates.push((outer * angle.cos(), outer * angle.sin()));
        }
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (x, y) in candidates {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Aabb::new(Point3::new(min_x, min_y, -z), Point3::new(max_x, max_y, z))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::{rotation_z, transform, Vector3};
    use crate::operations::creation::{MakeBox, MakeTube};
    use crate::units::{Angle, Length};

    #[test]
    fn full_tube_bounds() {
        let mut store = SolidStore::new();
        let tube = MakeTube::full(
            "Tube",
            Length::from_cm(2.5),
            Length::from_cm(2.6),
            Length::from_cm(10.0),
        )
        .execute(&mut store)
        .unwrap();
        let aabb = BoundingBox::new(tube).execute(&store).unwrap();
        assert_abs_diff_eq!(aabb.min, Point3::new(-26.0, -26.0, -100.0), epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.max, Point3::new(26.0, 26.0, 100.0), epsilon = 1e-9);
    }

    #[test]
    fn quarter_tube_bounds_are_tight() {
        let mut store = SolidStore::new();
        let tube = MakeTube::new(
            "Quarter",
            Length::from_mm(1.0),
            Length::from_mm(2.0),
            Length::from_mm(1.0),
            Angle::ZERO,
            Angle::from_degrees(90.0),
        )
        .execute(&mut store)
        .unwrap();
        let aabb = BoundingBox::new(tube).execute(&store).unwrap();
        assert_abs_diff_eq!(aabb.min, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-9);
        assert_abs_diff_eq!(aabb.max, Point3::new(2.0, 2.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn rotated_box_grows() {
        let mut store = SolidStore::new();
        let h = Length::from_mm(1.0);
        let cube = MakeBox::new("Cube", h, h, h).execute(&mut store).unwrap();
        let aabb = BoundingBox::new(cube).execute(&store).unwrap();
        let turned = aabb.transformed(&transform(
            rotation_z(Angle::from_degrees(45.0)),
            Vector3::zeros(),
        ));
        assert_abs_diff_eq!(turned.max.x, std::f64::consts::SQRT_2, epsilon = 1e-12);
        assert!(turned.contains(&aabb));
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0));
        assert!(a.intersection(&b).is_none());
        let overlap = a.intersection(&c).unwrap();
        assert_abs_diff_eq!(overlap.min, Point3::new(0.5, 0.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn cell_centres_fill_a_thin_box() {
        let slab = Aabb::new(Point3::new(-100.0, -100.0, 95.0), Point3::new(100.0, 100.0, 100.0));
        let centres = slab.cell_centres(4);
        assert_eq!(centres.len(), 64);
        assert_abs_diff_eq!(centres[0], Point3::new(-75.0, -75.0, 95.625), epsilon = 1e-12);
        assert!(centres
            .iter()
            .all(|p| (0..3).all(|i| p[i] > slab.min[i] && p[i] < slab.max[i])));
    }
}
