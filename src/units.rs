//! Unit-tagged scalar quantities.
//!
//! Raw numbers enter the crate once, through the named constructors below, and
//! are stored in a single canonical unit per quantity:
//!
//! | Quantity        | Canonical unit |
//! |-----------------|----------------|
//! | `Length`        | mm             |
//! | `Angle`         | rad            |
//! | `Density`       | g/cm³          |
//! | `MolarMass`     | g/mol          |
//! | `NumberDensity` | 1/cm³          |
//! | `Temperature`   | K              |
//! | `Pressure`      | Pa             |

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::math::Vector3;

/// Avogadro constant in 1/mol.
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Normal temperature (20 °C).
pub const NORMAL_TEMPERATURE: Temperature = Temperature(293.15);

/// Standard atmospheric pressure.
pub const STANDARD_PRESSURE: Pressure = Pressure(101_325.0);

/// A length, stored in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Length(f64);

impl Length {
    /// Zero length.
    pub const ZERO: Self = Self(0.0);

    #[must_use]
    pub const fn from_mm(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn from_cm(value: f64) -> Self {
        Self(value * 10.0)
    }

    #[must_use]
    pub fn from_m(value: f64) -> Self {
        Self(value * 1000.0)
    }

    /// Returns the length in millimetres.
    #[must_use]
    pub const fn mm(self) -> f64 {
        self.0
    }

    /// Returns the length in centimetres.
    #[must_use]
    pub fn cm(self) -> f64 {
        self.0 / 10.0
    }
}

impl Add for Length {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Length {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Length {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.0)
    }
}

/// Builds a position vector (in mm) from three lengths.
#[must_use]
pub fn vector(x: Length, y: Length, z: Length) -> Vector3 {
    Vector3::new(x.mm(), y.mm(), z.mm())
}

/// A plane angle, stored in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    /// Zero angle.
    pub const ZERO: Self = Self(0.0);

    /// A full turn.
    pub const FULL_TURN: Self = Self(std::f64::consts::TAU);

    #[must_use]
    pub const fn from_radians(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn from_degrees(value: f64) -> Self {
        Self(value.to_radians())
    }

    #[must_use]
    pub const fn radians(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }
}

/// A mass density, stored in g/cm³.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Density(f64);

impl Density {
    #[must_use]
    pub const fn from_g_per_cm3(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn from_kg_per_m3(value: f64) -> Self {
        Self(value / 1000.0)
    }

    #[must_use]
    pub const fn g_per_cm3(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} g/cm3", self.0)
    }
}

/// A molar mass, stored in g/mol.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct MolarMass(f64);

impl MolarMass {
    #[must_use]
    pub const fn from_g_per_mol(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn g_per_mol(self) -> f64 {
        self.0
    }
}

/// A particle number density, stored in 1/cm³.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct NumberDensity(f64);

impl NumberDensity {
    #[must_use]
    pub const fn per_cm3(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value_per_cm3(self) -> f64 {
        self.0
    }
}

impl fmt::Display for NumberDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:e} /cm3", self.0)
    }
}

/// An absolute temperature, stored in kelvin.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Temperature(f64);

impl Temperature {
    #[must_use]
    pub const fn from_kelvin(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn kelvin(self) -> f64 {
        self.0
    }
}

/// A pressure, stored in pascals.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Pressure(f64);

impl Pressure {
    #[must_use]
    pub const fn from_pascals(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn from_atmospheres(value: f64) -> Self {
        Self(value * STANDARD_PRESSURE.0)
    }

    #[must_use]
    pub const fn pascals(self) -> f64 {
        self.0
    }
}
