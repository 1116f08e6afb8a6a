use tracing::debug;

use crate::error::Result;
use crate::solid::{SolidData, SolidId, SolidShape, SolidStore, TubeShape};
use crate::units::{Angle, Length};

use super::{non_negative, ordered_radii, phi_segment, positive};

/// Creates a tube solid: a cylinder, optionally hollow and limited in phi,
/// centred on the origin with its axis along z.
pub struct MakeTube {
    name: String,
    inner_radius: Length,
    outer_radius: Length,
    half_length: Length,
    start_angle: Angle,
    span_angle: Angle,
}

impl MakeTube {
    /// Creates a new `MakeTube` operation.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        inner_radius: Length,
        outer_radius: Length,
        half_length: Length,
        start_angle: Angle,
        span_angle: Angle,
    ) -> Self {
        Self {
            name: name.into(),
            inner_radius,
            outer_radius,
            half_length,
            start_angle,
            span_angle,
        }
    }

    /// Creates a full-circle tube.
    #[must_use]
    pub fn full(
        name: impl Into<String>,
        inner_radius: Length,
        outer_radius: Length,
        half_length: Length,
    ) -> Self {
        Self::new(
            name,
            inner_radius,
            outer_radius,
            half_length,
            Angle::ZERO,
            Angle::FULL_TURN,
        )
    }

    /// Executes the operation, creating the tube in the solid store.
    ///
    /// # Errors
    ///
    /// Returns an error if the inner radius is negative, the outer radius
    /// does not exceed the inner radius, the half length is not positive,
    /// the span is outside `(0, 360]` degrees, or the name is taken.
    pub fn execute(&self, store: &mut SolidStore) -> Result<SolidId> {
        let inner_radius = non_negative(&self.name, "inner radius", self.inner_radius)?;
        let outer_radius = positive(&self.name, "outer radius", self.outer_radius)?;
        ordered_radii(&self.name, inner_radius, outer_radius)?;
        let shape = TubeShape {
            inner_radius,
            outer_radius,
            half_length: positive(&self.name, "half length", self.half_length)?,
            phi: phi_segment(&self.name, self.start_angle, self.span_angle)?,
        };
        debug!(solid = %self.name, ?shape, "defined tube");
        let id = store.add_solid(SolidData {
            name: self.name.clone(),
            shape: SolidShape::Tube(shape),
        })?;
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn cm(v: f64) -> Length {
        Length::from_cm(v)
    }

    #[test]
    fn pipe_wall_is_valid() {
        let mut store = SolidStore::new();
        let id = MakeTube::full("SteelPipe", cm(2.5), cm(2.6), cm(188.5))
            .execute(&mut store)
            .unwrap();
        let SolidShape::Tube(tube) = store.solid(id).unwrap().shape else {
            panic!("expected a tube");
        };
        assert!(tube.phi.is_full());
        assert!((tube.inner_radius - 25.0).abs() < 1e-9);
    }

    #[test]
    fn inner_radius_equal_to_outer_fails() {
        let mut store = SolidStore::new();
        let err = MakeTube::full("Degenerate", cm(2.6), cm(2.6), cm(1.0))
            .execute(&mut store)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
    }

    #[test]
    fn inner_radius_larger_than_outer_fails() {
        let mut store = SolidStore::new();
        let result = MakeTube::full("Inverted", cm(3.0), cm(2.0), cm(1.0)).execute(&mut store);
        assert!(result.is_err());
    }

    #[test]
    fn span_outside_range_fails() {
        let mut store = SolidStore::new();
        for span in [0.0, -90.0, 361.0] {
            let result = MakeTube::new(
                "Wedge",
                cm(0.0),
                cm(1.0),
                cm(1.0),
                Angle::ZERO,
                Angle::from_degrees(span),
            )
            .execute(&mut store);
            assert!(result.is_err(), "span {span} accepted");
        }
    }

    #[test]
    fn quarter_span_is_kept() {
        let mut store = SolidStore::new();
        let id = MakeTube::new(
            "Quarter",
            cm(0.0),
            cm(1.0),
            cm(1.0),
            Angle::from_degrees(-45.0),
            Angle::from_degrees(90.0),
        )
        .execute(&mut store)
        .unwrap();
        let SolidShape::Tube(tube) = store.solid(id).unwrap().shape else {
            panic!("expected a tube");
        };
        assert!(!tube.phi.is_full());
        assert!((tube.phi.start.to_degrees() - 315.0).abs() < 1e-9);
    }
}
