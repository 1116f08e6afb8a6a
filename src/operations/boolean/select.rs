use super::classify::PointClassification;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Subtract,
}

/// Combines the classifications of a point against both operands into the
/// classification against the composite.
///
/// | vs A       | vs B       | Union      | Subtract(A-B) |
/// |------------|------------|------------|---------------|
/// | INSIDE     | any        | inside     | see B         |
/// | any        | INSIDE     | inside     | outside       |
/// | OUTSIDE    | OUTSIDE    | outside    | outside       |
/// | OUTSIDE    | BOUNDARY   | boundary   | outside       |
/// | BOUNDARY   | OUTSIDE    | boundary   | boundary      |
/// | BOUNDARY   | BOUNDARY   | boundary   | boundary      |
/// | INSIDE     | OUTSIDE    | inside     | inside        |
/// | INSIDE     | BOUNDARY   | inside     | boundary      |
///
/// Two operands touching along a shared face classify that face as boundary
/// of the union; this only under-reports overlaps, never invents them.
#[must_use]
pub fn combine(
    op: BooleanOp,
    a: PointClassification,
    b: PointClassification,
) -> PointClassification {
    use PointClassification::{Inside, OnBoundary, Outside};

    match op {
        BooleanOp::Union => match (a, b) {
            (Inside, _) | (_, Inside) => Inside,
            (OnBoundary, _) | (_, OnBoundary) => OnBoundary,
            (Outside, Outside) => Outside,
        },
        BooleanOp::Subtract => match (a, b) {
            (Outside, _) | (_, Inside) => Outside,
            (Inside, Outside) => Inside,
            (Inside | OnBoundary, OnBoundary) | (OnBoundary, Outside) => OnBoundary,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PointClassification::{Inside, OnBoundary, Outside};

    #[test]
    fn union_table() {
        assert_eq!(combine(BooleanOp::Union, Inside, Outside), Inside);
        assert_eq!(combine(BooleanOp::Union, Outside, Inside), Inside);
        assert_eq!(combine(BooleanOp::Union, Outside, OnBoundary), OnBoundary);
        assert_eq!(combine(BooleanOp::Union, Outside, Outside), Outside);
    }

    #[test]
    fn subtract_table() {
        assert_eq!(combine(BooleanOp::Subtract, Inside, Outside), Inside);
        assert_eq!(combine(BooleanOp::Subtract, Inside, Inside), Outside);
        assert_eq!(combine(BooleanOp::Subtract, Inside, OnBoundary), OnBoundary);
        assert_eq!(combine(BooleanOp::Subtract, OnBoundary, Outside), OnBoundary);
        assert_eq!(combine(BooleanOp::Subtract, Outside, Outside), Outside);
        assert_eq!(combine(BooleanOp::Subtract, OnBoundary, Inside), Outside);
    }
}
