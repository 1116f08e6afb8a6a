//! Static material and geometry construction for detector simulation.
//!
//! The crate builds, once, a hierarchy of placed volumes for an external
//! transport engine to read:
//!
//! - [`material`]: isotopes, elements, and materials with mass-fraction and
//!   number-density mixing.
//! - [`solid`] and [`operations`]: primitive and boolean solids with
//!   classification, bounds, and interior sampling.
//! - [`volume`]: logical volumes, the placement tree, overlap checks, and
//!   navigation.
//! - [`builder`]: one-shot construction from a description or a TOML
//!   configuration.

pub mod builder;
pub mod error;
pub mod material;
pub mod math;
pub mod operations;
pub mod solid;
pub mod units;
pub mod volume;

pub use builder::{ApparatusConfig, BuildOptions, Geometry, GeometryBuilder, GeometryDescription};
pub use error::{ApparatusError, ErrorKind, Result};
