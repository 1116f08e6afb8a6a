use crate::error::Result;
use crate::math::{Point3, TOLERANCE};
use crate::solid::{BoxShape, ConeShape, OrbShape, SolidId, SolidShape, SolidStore, TubeShape};

use super::select::{combine, BooleanOp};

/// Classification of a point relative to a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    Outside,
    OnBoundary,
}

impl PointClassification {
    /// Classifies from the smallest signed margin over all bounding
    /// constraints of a primitive (positive inside).
    fn from_margin(margin: f64) -> Self {
        if margin > TOLERANCE {
            Self::Inside
        } else if margin < -TOLERANCE {
            Self::Outside
        } else {
            Self::OnBoundary
        }
    }
}

/// Classifies a point, given in the solid's local frame, as inside, outside,
/// or on the boundary of a solid.
///
/// Primitives are classified analytically with tolerance [`TOLERANCE`];
/// composites transform the point into operand B's frame and combine both
/// results with [`combine`].
///
/// # Errors
///
/// Returns an error if the solid or one of its operands is not in the store.
pub fn classify_point_in_solid(
    point: &Point3,
    solid_id: SolidId,
    store: &SolidStore,
) -> Result<PointClassification> {
    let solid = store.solid(solid_id)?;
    let classification = match &solid.shape {
        SolidShape::Box(shape) => PointClassification::from_margin(box_margin(shape, point)),
        SolidShape::Tube(shape) => PointClassification::from_margin(tube_margin(shape, point)),
        SolidShape::Cone(shape) => PointClassification::from_margin(cone_margin(shape, point)),
        SolidShape::Orb(shape) => PointClassification::from_margin(orb_margin(shape, point)),
        SolidShape::Union(node) | SolidShape::Subtraction(node) => {
            let op = if matches!(solid.shape, SolidShape::Union(_)) {
                BooleanOp::Union
            } else {
                BooleanOp::Subtract
            };
            let in_a = classify_point_in_solid(point, node.a, store)?;
            // A point outside A cannot be inside a subtraction.
            if op == BooleanOp::Subtract && in_a == PointClassification::Outside {
                return Ok(PointClassification::Outside);
            }
            let local_b = node.transform.inverse_transform_point(point);
            let in_b = classify_point_in_solid(&local_b, node.b, store)?;
            combine(op, in_a, in_b)
        }
    };
    Ok(classification)
}

fn box_margin(shape: &BoxShape, p: &Point3) -> f64 {
    (shape.half_x - p.x.abs())
        .min(shape.half_y - p.y.abs())
        .min(shape.half_z - p.z.abs())
}

fn tube_margin(shape: &TubeShape, p: &Point3) -> f64 {
    let r = p.x.hypot(p.y);
    let mut margin = (shape.half_length - p.z.abs()).min(shape.outer_radius - r);
    if shape.inner_radius > 0.0 {
        margin = margin.min(r - shape.inner_radius);
    }
    margin.min(shape.phi.margin(r, p.y.atan2(p.x)))
}

fn cone_margin(shape: &ConeShape, p: &Point3) -> f64 {
    let r = p.x.hypot(p.y);
    let (inner, outer) = shape.radii_at(p.z);
    let mut margin = (shape.half_length - p.z.abs()).min(outer - r);
    if shape.is_hollow() {
        margin = margin.min(r - inner);
    }
    margin.min(shape.phi.margin(r, p.y.atan2(p.x)))
}

fn orb_margin(shape: &OrbShape, p: &Point3) -> f64 {
    shape.radius - p.coords.norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{ConeEnd, MakeCone, MakeOrb, MakeTube};
    use crate::units::{Angle, Length};

    fn cm(v: f64) -> Length {
        Length::from_cm(v)
    }

    fn classify(store: &SolidStore, id: SolidId, x: f64, y: f64, z: f64) -> PointClassification {
        classify_point_in_solid(&Point3::new(x, y, z), id, store).unwrap()
    }

    #[test]
    fn hollow_tube_regions() {
        let mut store = SolidStore::new();
        let pipe = MakeTube::full("Pipe", cm(2.5), cm(2.6), cm(10.0))
            .execute(&mut store)
            .unwrap();

        assert_eq!(classify(&store, pipe, 25.5, 0.0, 0.0), PointClassification::Inside);
        assert_eq!(classify(&store, pipe, 0.0, 0.0, 0.0), PointClassification::Outside);
        assert_eq!(classify(&store, pipe, 0.0, 25.0, 0.0), PointClassification::OnBoundary);
        assert_eq!(classify(&store, pipe, 0.0, 26.0, 0.0), PointClassification::OnBoundary);
        assert_eq!(classify(&store, pipe, 25.5, 0.0, 100.0), PointClassification::OnBoundary);
        assert_eq!(classify(&store, pipe, 25.5, 0.0, 101.0), PointClassification::Outside);
    }

    #[test]
    fn half_tube_excludes_other_half() {
        let mut store = SolidStore::new();
        let half = MakeTube::new(
            "Half",
            cm(0.0),
            cm(1.0),
            cm(1.0),
            Angle::ZERO,
            Angle::from_degrees(180.0),
        )
        .execute(&mut store)
        .unwrap();

        assert_eq!(classify(&store, half, 0.0, 5.0, 0.0), PointClassification::Inside);
        assert_eq!(classify(&store, half, 0.0, -5.0, 0.0), PointClassification::Outside);
        assert_eq!(classify(&store, half, 5.0, 0.0, 0.0), PointClassification::OnBoundary);
    }

    #[test]
    fn cone_radius_follows_height() {
        let mut store = SolidStore::new();
        let cone = MakeCone::new(
            "Cone",
            ConeEnd::new(cm(0.0), cm(1.0)),
            ConeEnd::new(cm(0.0), cm(3.0)),
            cm(1.0),
            Angle::ZERO,
            Angle::FULL_TURN,
        )
        .execute(&mut store)
        .unwrap();

        assert_eq!(classify(&store, cone, 15.0, 0.0, -9.0), PointClassification::Outside);
        assert_eq!(classify(&store, cone, 15.0, 0.0, 9.0), PointClassification::Inside);
    }

    #[test]
    fn orb_surface_is_boundary() {
        let mut store = SolidStore::new();
        let orb = MakeOrb::new("Orb", cm(1.0)).execute(&mut store).unwrap();
        assert_eq!(classify(&store, orb, 0.0, 0.0, 10.0), PointClassification::OnBoundary);
        assert_eq!(classify(&store, orb, 6.0, 6.0, 6.0), PointClassification::Outside);
    }
}
