use crate::error::{HierarchyError, Result};
use crate::math::{Point3, Transform};
use crate::operations::boolean::{classify_point_in_solid, PointClassification};
use crate::solid::SolidStore;

use super::{PlacementId, VolumeHierarchy};

impl VolumeHierarchy {
    /// Returns the world placement.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::MissingRoot`] if nothing has been placed.
    pub fn root(&self) -> Result<PlacementId> {
        self.root.ok_or_else(|| HierarchyError::MissingRoot.into())
    }

    /// Daughters of a placement in placement order; empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: PlacementId) -> &[PlacementId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ancestors of a placement, nearest first, ending with the world.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement or one of its ancestors is unknown,
    /// or if the parent chain does not end.
    pub fn ancestors(&self, id: PlacementId) -> Result<Vec<PlacementId>> {
        let mut ancestors = Vec::new();
        let mut current = self.placement(id)?.parent;
        while let Some(parent) = current {
            if ancestors.len() >= self.placements.len() {
                return Err(HierarchyError::Inconsistent(format!(
                    "parent chain of {} does not reach the world",
                    self.placement(id)?.name
                ))
                .into());
            }
            ancestors.push(parent);
            current = self.placement(parent)?.parent;
        }
        Ok(ancestors)
    }

    /// Transform from a placement's local frame into the world frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement or one of its ancestors is unknown.
    pub fn global_transform(&self, id: PlacementId) -> Result<Transform> {
        let mut global = self.placement(id)?.transform;
        for ancestor in self.ancestors(id)? {
            global = self.placement(ancestor)?.transform * global;
        }
        Ok(global)
    }

    /// Finds the deepest placement containing a world-frame point.
    ///
    /// Points on a boundary count as contained. Returns `None` for points
    /// outside the world.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no world or a solid cannot be resolved.
    pub fn locate(&self, point: &Point3, solids: &SolidStore) -> Result<Option<PlacementId>> {
        let root = self.root()?;
        let root_data = self.placement(root)?;
        let mut local = root_data.transform.inverse_transform_point(point);
        if !self.contains_local(root, &local, solids)? {
            return Ok(None);
        }

        let mut current = root;
        'descend: loop {
            for &child in self.children(current) {
                let child_local = self.placement(child)?.transform.inverse_transform_point(&local);
                if self.contains_local(child, &child_local, solids)? {
                    current = child;
                    local = child_local;
                    continue 'descend;
                }
            }
            return Ok(Some(current));
        }
    }

    /// Checks that the tree has exactly one root, every parent resolves, and
    /// the parent and child links agree.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::MissingRoot`], [`HierarchyError::MultipleRoots`]
    /// or [`HierarchyError::Inconsistent`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let root = self.root()?;
        for (id, placement) in &self.placements {
            match placement.parent {
                None if id != root => {
                    return Err(HierarchyError::MultipleRoots {
                        existing: self.placement(root)?.name.clone(),
                        attempted: placement.name.clone(),
                    }
                    .into());
                }
                None => {}
                Some(parent) => {
                    if !self.placements.contains_key(parent) {
                        return Err(HierarchyError::Inconsistent(format!(
                            "parent of {} does not exist",
                            placement.name
                        ))
                        .into());
                    }
                    if !self.children(parent).contains(&id) {
                        return Err(HierarchyError::Inconsistent(format!(
                            "{} is missing from its parent's daughters",
                            placement.name
                        ))
                        .into());
                    }
                }
            }
            if self.ancestors(id)?.last().is_some_and(|&top| top != root) {
                return Err(HierarchyError::Inconsistent(format!(
                    "{} is not connected to the world",
                    placement.name
                ))
                .into());
            }
        }
        Ok(())
    }

    fn contains_local(&self, id: PlacementId, local: &Point3, solids: &SolidStore) -> Result<bool> {
        let solid = self.logical_volume(self.placement(id)?.logical_volume)?.solid;
        Ok(classify_point_in_solid(local, solid, solids)? != PointClassification::Outside)
    }
}
