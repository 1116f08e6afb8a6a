mod make_box;
mod make_cone;
mod make_orb;
mod make_tube;

pub use make_box::MakeBox;
pub use make_cone::{ConeEnd, MakeCone};
pub use make_orb::MakeOrb;
pub use make_tube::MakeTube;

use std::f64::consts::TAU;

use crate::error::GeometryError;
use crate::math::{ANGLE_TOLERANCE, TOLERANCE};
use crate::solid::PhiSegment;
use crate::units::{Angle, Length};

/// Checks that a dimension is finite and strictly positive.
fn positive(solid: &str, parameter: &str, value: Length) -> Result<f64, GeometryError> {
    let mm = value.mm();
    if !mm.is_finite() || mm < TOLERANCE {
        return Err(GeometryError::invalid(
            solid,
            format!("{parameter} must be positive, got {value}"),
        ));
    }
    Ok(mm)
}

/// Checks that a radius is finite and not negative.
fn non_negative(solid: &str, parameter: &str, value: Length) -> Result<f64, GeometryError> {
    let mm = value.mm();
    if !mm.is_finite() || mm < 0.0 {
        return Err(GeometryError::invalid(
            solid,
            format!("{parameter} must not be negative, got {value}"),
        ));
    }
    Ok(mm)
}

/// Checks that `inner < outer` for a pair of radii.
fn ordered_radii(solid: &str, inner: f64, outer: f64) -> Result<(), GeometryError> {
    if inner >= outer - TOLERANCE {
        return Err(GeometryError::invalid(
            solid,
            format!("inner radius {inner} mm must be smaller than outer radius {outer} mm"),
        ));
    }
    Ok(())
}

/// Validates a phi range; the span must lie in `(0, 360]` degrees.
fn phi_segment(solid: &str, start: Angle, span: Angle) -> Result<PhiSegment, GeometryError> {
    let (start, span) = (start.radians(), span.radians());
    if !start.is_finite() || !span.is_finite() || span <= 0.0 || span > TAU + ANGLE_TOLERANCE {
        return Err(GeometryError::invalid(
            solid,
            format!(
                "span angle must lie in (0, 360] degrees, got {}",
                span.to_degrees()
            ),
        ));
    }
    Ok(PhiSegment::new(start, span))
}
