use std::f64::consts::PI;

use crate::error::Result;
use crate::math::Point3;
use crate::operations::boolean::{classify_point_in_solid, PointClassification};
use crate::solid::{PhiSegment, SolidId, SolidShape, SolidStore};

/// Generates a deterministic set of points strictly inside a solid, in the
/// solid's local frame.
///
/// Primitives are sampled at cell centres of a regular grid in their natural
/// coordinates (cartesian for boxes, cylindrical for tubes and cones,
/// spherical for orbs), so thin shells are sampled as densely as thick ones.
/// A union samples both operands; a subtraction keeps the samples of its
/// minuend that survive the cut. Points that land on a boundary are dropped.
pub struct SampleInterior {
    solid: SolidId,
    resolution: u32,
}

impl SampleInterior {
    /// Creates a new `SampleInterior` query with `resolution` cells per
    /// coordinate (at least one).
    #[must_use]
    pub fn new(solid: SolidId, resolution: u32) -> Self {
        Self {
            solid,
            resolution: resolution.max(1),
        }
    }

    /// Executes the query, returning the interior samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid or one of its operands is not in the
    /// store.
    pub fn execute(&self, store: &SolidStore) -> Result<Vec<Point3>> {
        let solid = store.solid(self.solid)?;
        let n = self.resolution;
        let candidates = match &solid.shape {
            SolidShape::Box(shape) => {
                let mut points = Vec::new();
                for x in cells(-shape.half_x, shape.half_x, n) {
                    for y in cells(-shape.half_y, shape.half_y, n) {
                        for z in cells(-shape.half_z, shape.half_z, n) {
                            points.push(Point3::new(x, y, z));
                        }
                    }
                }
                points
            }
            SolidShape::Tube(shape) => {
                let mut points = Vec::new();
                for z in cells(-shape.half_length, shape.half_length, n) {
                    ring_samples(
                        &mut points,
                        z,
                        shape.inner_radius,
                        shape.outer_radius,
                        &shape.phi,
                        n,
                    );
                }
                points
            }
            SolidShape::Cone(shape) => {
                let mut points = Vec::new();
                for z in cells(-shape.half_length, shape.half_length, n) {
                    let (inner, outer) = shape.radii_at(z);
                    ring_samples(&mut points, z, inner.max(0.0), outer, &shape.phi, n);
                }
                points
            }
            SolidShape::Orb(shape) => {
                let mut points = Vec::new();
                for r in cells(0.0, shape.radius, n) {
                    for theta in cells(0.0, PI, n) {
                        for phi in cells(0.0, PhiSegment::FULL.span, n.saturating_mul(2)) {
                            points.push(Point3::new(
                                r * theta.sin() * phi.cos(),
                                r * theta.sin() * phi.sin(),
                                r * theta.cos(),
                            ));
                        }
                    }
                }
                points
            }
            SolidShape::Union(node) => {
                let mut points = SampleInterior::new(node.a, n).execute(store)?;
                let b_points = SampleInterior::new(node.b, n).execute(store)?;
                points.extend(b_points.iter().map(|p| node.transform.transform_point(p)));
                points
            }
            SolidShape::Subtraction(node) => SampleInterior::new(node.a, n).execute(store)?,
        };

        let mut inside = Vec::with_capacity(candidates.len());
        for point in candidates {
            if classify_point_in_solid(&point, self.solid, store)? == PointClassification::Inside {
                inside.push(point);
            }
        }
        Ok(inside)
    }
}

/// Centres of `n` equal cells spanning `[lo, hi]`.
fn cells(lo: f64, hi: f64, n: u32) -> impl Iterator<Item = f64> {
    let step = (hi - lo) / f64::from(n);
    (0..n).map(move |i| lo + (f64::from(i) + 0.5) * step)
}

fn ring_samples(
    points: &mut Vec<Point3>,
    z: f64,
    inner: f64,
    outer: f64,
    phi: &PhiSegment,
    n: u32,
) {
    for r in cells(inner, outer, n) {
        for angle in cells(phi.start, phi.start + phi.span, n.saturating_mul(2)) {
            points.push(Point3::new(r * angle.cos(), r * angle.sin(), z));
        }
    }
}
