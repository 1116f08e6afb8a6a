use std::f64::consts::TAU;

use crate::math::{Transform, ANGLE_TOLERANCE};

use super::SolidId;

/// The shape of a solid: a primitive or a boolean composite.
///
/// All primitives are centred on their local origin; round primitives use
/// the local z axis as their axis. Lengths are in mm, angles in radians.
#[derive(Debug, Clone)]
pub enum SolidShape {
    Box(BoxShape),
    Tube(TubeShape),
    Cone(ConeShape),
    Orb(OrbShape),
    /// A ∪ B.
    Union(BooleanNode),
    /// A \ B.
    Subtraction(BooleanNode),
}

impl SolidShape {
    /// Returns the operands of a composite, or `None` for a primitive.
    #[must_use]
    pub fn operands(&self) -> Option<&BooleanNode> {
        match self {
            Self::Union(node) | Self::Subtraction(node) => Some(node),
            Self::Box(_) | Self::Tube(_) | Self::Cone(_) | Self::Orb(_) => None,
        }
    }
}

/// An axis-aligned box given by its half extents.
#[derive(Debug, Clone, Copy)]
pub struct BoxShape {
    pub half_x: f64,
    pub half_y: f64,
    pub half_z: f64,
}

/// A cylindrical section, possibly hollow and limited in phi.
#[derive(Debug, Clone, Copy)]
pub struct TubeShape {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub half_length: f64,
    pub phi: PhiSegment,
}

/// A conical section with independent radii at `-z` and `+z`.
#[derive(Debug, Clone, Copy)]
pub struct ConeShape {
    /// Inner radius at `-half_length`.
    pub inner_radius_low: f64,
    /// Outer radius at `-half_length`.
    pub outer_radius_low: f64,
    /// Inner radius at `+half_length`.
    pub inner_radius_high: f64,
    /// Outer radius at `+half_length`.
    pub outer_radius_high: f64,
    pub half_length: f64,
    pub phi: PhiSegment,
}

impl ConeShape {
    /// Inner and outer radius at height `z` (extrapolated outside the cone).
    #[must_use]
    pub fn radii_at(&self, z: f64) -> (f64, f64) {
        let t = (z + self.half_length) / (2.0 * self.half_length);
        let inner = self.inner_radius_low + (self.inner_radius_high - self.inner_radius_low) * t;
        let outer = self.outer_radius_low + (self.outer_radius_high - self.outer_radius_low) * t;
        (inner, outer)
    }

    /// Returns `true` if the cone has a bore anywhere along its length.
    #[must_use]
    pub fn is_hollow(&self) -> bool {
        self.inner_radius_low > 0.0 || self.inner_radius_high > 0.0
    }
}

/// A full sphere.
#[derive(Debug, Clone, Copy)]
pub struct OrbShape {
    pub radius: f64,
}

/// Operands of a boolean composite.
///
/// `transform` positions operand B in the local frame of operand A, which is
/// also the local frame of the composite.
#[derive(Debug, Clone)]
pub struct BooleanNode {
    pub a: SolidId,
    pub b: SolidId,
    pub transform: Transform,
}

/// An angular range `[start, start + span]` around the z axis.
#[derive(Debug, Clone, Copy)]
pub struct PhiSegment {
    /// Start angle, normalized to `[0, 2π)`.
    pub start: f64,
    /// Angular span in `(0, 2π]`.
    pub span: f64,
}

impl PhiSegment {
    /// The full circle.
    pub const FULL: Self = Self {
        start: 0.0,
        span: TAU,
    };

    /// Creates a segment, normalizing the start angle.
    ///
    /// The caller has already checked that `span` lies in `(0, 2π]`.
    #[must_use]
    pub fn new(start: f64, span: f64) -> Self {
        if span >= TAU - ANGLE_TOLERANCE {
            return Self::FULL;
        }
        Self {
            start: start.rem_euclid(TAU),
            span,
        }
    }

    /// Returns `true` if the segment covers the whole circle.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.span >= TAU - ANGLE_TOLERANCE
    }

    /// Returns `true` if the angle lies within the segment.
    #[must_use]
    pub fn contains(&self, phi: f64) -> bool {
        self.is_full() || self.offset(phi) <= self.span + ANGLE_TOLERANCE
    }

    /// Signed distance from a point at `(radius, phi)` to the wedge walls,
    /// positive inside the wedge.
    ///
    /// Uses arc length as the distance measure, which has the right sign and
    /// vanishes on the walls.
    #[must_use]
    pub fn margin(&self, radius: f64, phi: f64) -> f64 {
        if self.is_full() {
            return f64::INFINITY;
        }
        let rel = self.offset(phi);
        if rel <= self.span {
            radius * rel.min(self.span - rel)
        } else {
            -radius * (rel - self.span).min(TAU - rel)
        }
    }

    /// Angle measured from `start`, in `[0, 2π)`.
    fn offset(&self, phi: f64) -> f64 {
        (phi - self.start).rem_euclid(TAU)
    }
}
