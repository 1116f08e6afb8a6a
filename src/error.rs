use std::fmt;

use thiserror::Error;

/// Top-level error type for apparatus construction.
#[derive(Debug, Error)]
pub enum ApparatusError {
    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApparatusError {
    /// Returns the flat category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Material(MaterialError::InvalidComposition { .. }) => {
                ErrorKind::InvalidComposition
            }
            Self::Geometry(GeometryError::InvalidGeometry { .. }) => ErrorKind::InvalidGeometry,
            Self::Lookup(LookupError::UnknownReference { .. }) => ErrorKind::UnknownReference,
            Self::Lookup(LookupError::DuplicateName { .. }) => ErrorKind::DuplicateName,
            Self::Hierarchy(HierarchyError::MultipleRoots { .. }) => ErrorKind::MultipleRoots,
            Self::Hierarchy(HierarchyError::OverlapDetected { .. }) => ErrorKind::OverlapDetected,
            Self::Hierarchy(HierarchyError::MissingRoot | HierarchyError::Inconsistent(_)) => {
                ErrorKind::InvalidHierarchy
            }
            Self::Build(BuildError::AlreadyBuilt) => ErrorKind::AlreadyBuilt,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Flat classification of [`ApparatusError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidComposition,
    UnknownReference,
    InvalidGeometry,
    DuplicateName,
    MultipleRoots,
    InvalidHierarchy,
    AlreadyBuilt,
    OverlapDetected,
    Config,
}

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Isotope,
    Element,
    Material,
    Solid,
    LogicalVolume,
    Placement,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Isotope => "isotope",
            Self::Element => "element",
            Self::Material => "material",
            Self::Solid => "solid",
            Self::LogicalVolume => "logical volume",
            Self::Placement => "placement",
        };
        f.write_str(name)
    }
}

/// Errors related to isotope, element, and material definitions.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("invalid composition of {name}: {reason}")]
    InvalidComposition { name: String, reason: String },
}

/// Errors related to solid definitions.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid geometry for solid {name}: {reason}")]
    InvalidGeometry { name: String, reason: String },
}

/// Errors related to name and id resolution.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unknown {kind} reference: {name}")]
    UnknownReference { kind: EntityKind, name: String },

    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: EntityKind, name: String },
}

/// Errors related to the placement tree.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("placement {attempted} cannot be a second root, {existing} is already the world")]
    MultipleRoots { existing: String, attempted: String },

    #[error("no root placement has been defined")]
    MissingRoot,

    #[error("placement {placement} overlaps {other}")]
    OverlapDetected { placement: String, other: String },

    #[error("inconsistent hierarchy: {0}")]
    Inconsistent(String),
}

/// Errors related to the build lifecycle.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("geometry has already been built")]
    AlreadyBuilt,
}

/// Errors related to loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl MaterialError {
    pub(crate) fn composition(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidComposition {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

impl GeometryError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

impl LookupError {
    pub(crate) fn unknown(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::UnknownReference {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn duplicate(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

/// Convenience type alias for results using [`ApparatusError`].
pub type Result<T> = std::result::Result<T, ApparatusError>;
