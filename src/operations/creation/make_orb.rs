use tracing::debug;

use crate::error::Result;
use crate::solid::{OrbShape, SolidData, SolidId, SolidShape, SolidStore};
use crate::units::Length;

use super::positive;

/// Creates a full sphere centred on the origin.
pub struct MakeOrb {
    name: String,
    radius: Length,
}

impl MakeOrb {
    /// Creates a new `MakeOrb` operation.
    #[must_use]
    pub fn new(name: impl Into<String>, radius: Length) -> Self {
        Self {
            name: name.into(),
            radius,
        }
    }

    /// Executes the operation, creating the orb in the solid store.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the name is taken.
    pub fn execute(&self, store: &mut SolidStore) -> Result<SolidId> {
        let shape = OrbShape {
            radius: positive(&self.name, "radius", self.radius)?,
        };
        debug!(solid = %self.name, radius = shape.radius, "defined orb");
        let id = store.add_solid(SolidData {
            name: self.name.clone(),
            shape: SolidShape::Orb(shape),
        })?;
        Ok(id)
    }
}
