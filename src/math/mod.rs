use crate::units::Angle;

/// 3D point type (mm).
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type (mm).
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rotation part of a rigid transform.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Rigid transform mapping a child frame into its parent frame.
pub type Transform = nalgebra::Isometry3<f64>;

/// Global length tolerance (mm) for containment and boundary tests.
pub const TOLERANCE: f64 = 1e-9;

/// Angular tolerance (rad) for span and phi comparisons.
pub const ANGLE_TOLERANCE: f64 = 1e-12;

/// Builds a rigid transform from a rotation and a translation.
#[must_use]
pub fn transform(rotation: Rotation, translation: Vector3) -> Transform {
    Transform::from_parts(nalgebra::Translation3::from(translation), rotation)
}

/// Builds a pure translation.
#[must_use]
pub fn translation(translation: Vector3) -> Transform {
    transform(Rotation::identity(), translation)
}

/// Rotation about the x axis.
#[must_use]
pub fn rotation_x(angle: Angle) -> Rotation {
    Rotation::from_axis_angle(&Vector3::x_axis(), angle.radians())
}

/// Rotation about the y axis.
#[must_use]
pub fn rotation_y(angle: Angle) -> Rotation {
    Rotation::from_axis_angle(&Vector3::y_axis(), angle.radians())
}

/// Rotation about the z axis.
#[must_use]
pub fn rotation_z(angle: Angle) -> Rotation {
    Rotation::from_axis_angle(&Vector3::z_axis(), angle.radians())
}
