use tracing::debug;

use crate::error::{EntityKind, LookupError, Result};
use crate::math::Transform;
use crate::solid::{BooleanNode, SolidData, SolidId, SolidShape, SolidStore};

use super::select::BooleanOp;

/// Records a boolean composite of two solids already in the store.
///
/// Both operands are resolved here, so a composite can never refer to a
/// solid defined after it.
pub fn boolean_execute(
    store: &mut SolidStore,
    name: &str,
    solid_a: SolidId,
    solid_b: SolidId,
    transform_b: Transform,
    op: BooleanOp,
) -> Result<SolidId> {
    let name_a = operand_name(store, name, solid_a)?;
    let name_b = operand_name(store, name, solid_b)?;

    let node = BooleanNode {
        a: solid_a,
        b: solid_b,
        transform: transform_b,
    };
    let shape = match op {
        BooleanOp::Union => SolidShape::Union(node),
        BooleanOp::Subtract => SolidShape::Subtraction(node),
    };
    debug!(solid = %name, ?op, a = %name_a, b = %name_b, "defined composite");

    let id = store.add_solid(SolidData {
        name: name.to_owned(),
        shape,
    })?;
    Ok(id)
}

fn operand_name(store: &SolidStore, composite: &str, id: SolidId) -> Result<String> {
    match store.solid(id) {
        Ok(data) => Ok(data.name.clone()),
        Err(_) => Err(LookupError::unknown(
            EntityKind::Solid,
            format!("operand {id:?} of {composite}"),
        )
        .into()),
    }
}
