use tracing::debug;

use crate::error::Result;
use crate::solid::{BoxShape, SolidData, SolidId, SolidShape, SolidStore};
use crate::units::Length;

use super::positive;

/// Creates a box solid from its half extents.
pub struct MakeBox {
    name: String,
    half_x: Length,
    half_y: Length,
    half_z: Length,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(name: impl Into<String>, half_x: Length, half_y: Length, half_z: Length) -> Self {
        Self {
            name: name.into(),
            half_x,
            half_y,
            half_z,
        }
    }

    /// Executes the operation, creating the box in the solid store.
    ///
    /// # Errors
    ///
    /// Returns an error if any half extent is not strictly positive or the
    /// name is already taken.
    pub fn execute(&self, store: &mut SolidStore) -> Result<SolidId> {
        let shape = BoxShape {
            half_x: positive(&self.name, "half x", self.half_x)?,
            half_y: positive(&self.name, "half y", self.half_y)?,
            half_z: positive(&self.name, "half z", self.half_z)?,
        };
        debug!(solid = %self.name, ?shape, "defined box");
        let id = store.add_solid(SolidData {
            name: self.name.clone(),
            shape: SolidShape::Box(shape),
        })?;
        Ok(id)
    }
}
