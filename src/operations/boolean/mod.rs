mod classify;
mod engine;
mod select;
mod subtract;
mod union;

pub use classify::{classify_point_in_solid, PointClassification};
pub use select::{combine, BooleanOp};
pub use subtract::Subtract;
pub use union::Union;
