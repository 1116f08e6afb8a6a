use tracing::debug;

use crate::error::Result;
use crate::solid::{ConeShape, SolidData, SolidId, SolidShape, SolidStore};
use crate::units::{Angle, Length};

use super::{non_negative, ordered_radii, phi_segment, positive};

/// Radii of one end of a cone.
#[derive(Debug, Clone, Copy)]
pub struct ConeEnd {
    pub inner_radius: Length,
    pub outer_radius: Length,
}

impl ConeEnd {
    /// Radii of one end of a cone.
    #[must_use]
    pub fn new(inner_radius: Length, outer_radius: Length) -> Self {
        Self {
            inner_radius,
            outer_radius,
        }
    }
}

/// Creates a conical section with its axis along z, optionally hollow and
/// limited in phi.
pub struct MakeCone {
    name: String,
    low: ConeEnd,
    high: ConeEnd,
    half_length: Length,
    start_angle: Angle,
    span_angle: Angle,
}

impl MakeCone {
    /// Creates a new `MakeCone` operation. `low` gives the radii at `-z`,
    /// `high` the radii at `+z`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        low: ConeEnd,
        high: ConeEnd,
        half_length: Length,
        start_angle: Angle,
        span_angle: Angle,
    ) -> Self {
        Self {
            name: name.into(),
            low,
            high,
            half_length,
            start_angle,
            span_angle,
        }
    }

    /// Executes the operation, creating the cone in the solid store.
    ///
    /// # Errors
    ///
    /// Returns an error if any end has inconsistent radii, the half length
    /// is not positive, the span is outside `(0, 360]` degrees, or the name
    /// is taken.
    pub fn execute(&self, store: &mut SolidStore) -> Result<SolidId> {
        let inner_low = non_negative(&self.name, "inner radius at -z", self.low.inner_radius)?;
        let outer_low = positive(&self.name, "outer radius at -z", self.low.outer_radius)?;
        ordered_radii(&self.name, inner_low, outer_low)?;
        let inner_high = non_negative(&self.name, "inner radius at +z", self.high.inner_radius)?;
        let outer_high = positive(&self.name, "outer radius at +z", self.high.outer_radius)?;
        ordered_radii(&self.name, inner_high, outer_high)?;

        let shape = ConeShape {
            inner_radius_low: inner_low,
            outer_radius_low: outer_low,
            inner_radius_high: inner_high,
            outer_radius_high: outer_high,
            half_length: positive(&self.name, "half length", self.half_length)?,
            phi: phi_segment(&self.name, self.start_angle, self.span_angle)?,
        };
        debug!(solid = %self.name, ?shape, "defined cone");
        let id = store.add_solid(SolidData {
            name: self.name.clone(),
            shape: SolidShape::Cone(shape),
        })?;
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cm(v: f64) -> Length {
        Length::from_cm(v)
    }

    #[test]
    fn frustum_radii_interpolate() {
        let mut store = SolidStore::new();
        let id = MakeCone::new(
            "Funnel",
            ConeEnd::new(cm(0.0), cm(2.0)),
            ConeEnd::new(cm(1.0), cm(4.0)),
            cm(5.0),
            Angle::ZERO,
            Angle::FULL_TURN,
        )
        .execute(&mut store)
        .unwrap();
        let SolidShape::Cone(cone) = store.solid(id).unwrap().shape else {
            panic!("expected a cone");
        };
        let (inner, outer) = cone.radii_at(0.0);
        assert!((inner - 5.0).abs() < 1e-9);
        assert!((outer - 30.0).abs() < 1e-9);
        assert!(cone.is_hollow());
    }

    #[test]
    fn inconsistent_end_fails() {
        let mut store = SolidStore::new();
        let result = MakeCone::new(
            "Broken",
            ConeEnd::new(cm(0.0), cm(2.0)),
            ConeEnd::new(cm(3.0), cm(2.0)),
            cm(5.0),
            Angle::ZERO,
            Angle::FULL_TURN,
        )
        .execute(&mut store);
        assert!(result.is_err());
    }
}
