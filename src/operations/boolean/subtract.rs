use crate::error::Result;
use crate::math::Transform;
use crate::solid::{SolidId, SolidStore};

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean subtraction of one solid from another.
pub struct Subtract {
    name: String,
    solid_a: SolidId,
    solid_b: SolidId,
    transform_b: Transform,
}

impl Subtract {
    /// Creates a new `Subtract` operation (A - B); `transform_b` places B in
    /// A's frame.
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

    /// Executes the subtraction, creating the composite in the solid store.
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
            BooleanOp::Subtract,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::{translation, Point3, Vector3};
    use crate::operations::boolean::{classify_point_in_solid, PointClassification};
    use crate::operations::creation::{MakeBox, MakeTube};
    use crate::operations::query::BoundingBox;
    use crate::units::Length;

    fn cm(v: f64) -> Length {
        Length::from_cm(v)
    }

    fn bored_block(store: &mut SolidStore) -> SolidId {
        let block = MakeBox::new("Block", cm(10.0), cm(10.0), cm(20.0))
            .execute(store)
            .unwrap();
        let bore = MakeTube::full("Bore", cm(0.0), cm(2.6), cm(30.0))
            .execute(store)
            .unwrap();
        Subtract::new("BoredBlock", block, bore, translation(Vector3::new(0.0, 0.0, 15.0)))
            .execute(store)
            .unwrap()
    }

    #[test]
    fn subtraction_bounds_within_minuend() {
        let mut store = SolidStore::new();
        let solid = bored_block(&mut store);
        let block = store.solid_by_name("Block").unwrap();

        let bounds = BoundingBox::new(solid).execute(&store).unwrap();
        let bounds_a = BoundingBox::new(block).execute(&store).unwrap();
        assert!(bounds_a.contains(&bounds));
    }

    #[test]
    fn bore_is_removed() {
        let mut store = SolidStore::new();
        let solid = bored_block(&mut store);

        let on_axis = Point3::new(0.0, 0.0, 0.0);
        let in_wall = Point3::new(50.0, 0.0, 0.0);
        let bore_wall = Point3::new(26.0, 0.0, 0.0);
        assert_eq!(
            classify_point_in_solid(&on_axis, solid, &store).unwrap(),
            PointClassification::Outside
        );
        assert_eq!(
            classify_point_in_solid(&in_wall, solid, &store).unwrap(),
            PointClassification::Inside
        );
        assert_eq!(
            classify_point_in_solid(&bore_wall, solid, &store).unwrap(),
            PointClassification::OnBoundary
        );
    }

    #[test]
    fn operand_from_other_store_is_unknown() {
        let mut other = SolidStore::new();
        let foreign = MakeBox::new("Foreign", cm(1.0), cm(1.0), cm(1.0))
            .execute(&mut other)
            .unwrap();
        let mut store = SolidStore::new();
        let err = Subtract::new("Cut", foreign, foreign, Transform::identity())
            .execute(&mut store)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownReference);
    }
}
