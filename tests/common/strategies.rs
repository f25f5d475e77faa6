use proptest::prelude::*;

/// One arithmetic step in a generated chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add(i64),
    Mul(i64),
    /// Nullary step: drops the carried value and produces a fresh one
    Reset(i64),
    /// Side step: the carried value passes through untouched
    Pass,
}

impl ArithmeticOp {
    /// Direct, engine-free application of the op
    pub fn apply(self, value: i64) -> i64 {
        match self {
            ArithmeticOp::Add(n) => value.wrapping_add(n),
            ArithmeticOp::Mul(n) => value.wrapping_mul(n),
            ArithmeticOp::Reset(n) => n,
            ArithmeticOp::Pass => value,
        }
    }
}

/// Strategy for a single arithmetic op
pub fn arithmetic_op_strategy() -> impl Strategy<Value = ArithmeticOp> {
    prop_oneof![
        4 => (-1_000i64..1_000).prop_map(ArithmeticOp::Add),
        3 => (-50i64..50).prop_map(ArithmeticOp::Mul),
        1 => (-1_000i64..1_000).prop_map(ArithmeticOp::Reset),
        1 => Just(ArithmeticOp::Pass),
    ]
}

/// Strategy for a seed value and a sequence of ops applied to it
pub fn arithmetic_chain_strategy() -> impl Strategy<Value = (i64, Vec<ArithmeticOp>)> {
    (
        -10_000i64..10_000,
        prop::collection::vec(arithmetic_op_strategy(), 0..32),
    )
}

/// Strategy for side-step labels fanned out by `post_bulk`
pub fn bulk_labels_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 1..12)
}
