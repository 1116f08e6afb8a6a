use crate::error::Result;
use crate::math::Transform;
use crate::solid::{SolidId, SolidStore};

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean union of two solids.
pub struct Union {
    name: String,
    solid_a: SolidId,
    solid_b: SolidId,
    transform_b: Transform,
}

impl Union {
    /// Creates a new `Union` operation; `transform_b` places B in A's frame.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        solid_a: SolidId,
        solid_b: SolidId,
        transform_b: Transform,
    ) -> Self {
        Self {
            name: name.into(),
            solid_a,
            solid_b,
            transform_b,
        }
    }

    /// Executes the union, creating the composite in the solid store.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is not in the store or the name is
    /// already taken.
    pub fn execute(&self, store: &mut SolidStore) -> Result<SolidId> {
        boolean_execute(
            store,
            &self.name,
            self.solid_a,
            self.solid_b,
            self.transform_b,
            BooleanOp::Union,
        )
    }
}
