mod shape;

pub use shape::{BooleanNode, BoxShape, ConeShape, OrbShape, PhiSegment, SolidShape, TubeShape};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::{EntityKind, LookupError};

slotmap::new_key_type! {
    /// Unique identifier for a solid in the solid store.
    pub struct SolidId;
}

/// Data associated with a solid: its name and its shape.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// Unique name of the solid.
    pub name: String,
    /// Primitive parameters or boolean operands.
    pub shape: SolidShape,
}

/// Central arena that owns all solids.
///
/// Composite solids reference their operands by [`SolidId`]; an operand must
/// already be in the store when the composite is inserted, so the CSG graph
/// is acyclic by construction.
#[derive(Debug, Default)]
pub struct SolidStore {
    solids: SlotMap<SolidId, SolidData>,
    by_name: HashMap<String, SolidId>,
}

impl SolidStore {
    /// Creates a new, empty solid store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a solid and returns its ID.
    ///
    /// Callers validate the shape first; the store only enforces unique names.
    pub(crate) fn add_solid(&mut self, data: SolidData) -> Result<SolidId, LookupError> {
        if self.by_name.contains_key(&data.name) {
            return Err(LookupError::duplicate(EntityKind::Solid, data.name));
        }
        let name = data.name.clone();
        let id = self.solids.insert(data);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in this store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, LookupError> {
        self.solids
            .get(id)
            .ok_or_else(|| LookupError::unknown(EntityKind::Solid, format!("{id:?}")))
    }

    /// Returns `true` if the solid is in this store.
    #[must_use]
    pub fn contains(&self, id: SolidId) -> bool {
        self.solids.contains_key(id)
    }

    /// Looks up a solid by name.
    #[must_use]
    pub fn solid_by_name(&self, name: &str) -> Option<SolidId> {
        self.by_name.get(name).copied()
    }

    /// Number of solids in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Returns `true` if the store holds no solids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Iterates over all solids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SolidId, &SolidData)> {
        self.solids.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LookupError;

    fn orb(name: &str) -> SolidData {
        SolidData {
            name: name.into(),
            shape: SolidShape::Orb(OrbShape { radius: 1.0 }),
        }
    }

    #[test]
    fn duplicate_solid_name_is_rejected() {
        let mut store = SolidStore::new();
        store.add_solid(orb("Ball")).unwrap();
        let err = store.add_solid(orb("Ball")).unwrap_err();
        assert!(matches!(
            err,
            LookupError::DuplicateName {
                kind: EntityKind::Solid,
                ..
            }
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn null_id_is_unknown() {
        let store = SolidStore::new();
        assert!(store.solid(SolidId::default()).is_err());
        assert!(!store.contains(SolidId::default()));
    }
}
