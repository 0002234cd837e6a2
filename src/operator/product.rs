use crate::error::OptResult;
use crate::operator::{binary_inputs, LogicalOperatorTrait};
use crate::stat::Statistics;

/// Cartesian product of two inputs.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct Product;

impl Product {
    pub fn new() -> Self {
        Self
    }
}

impl LogicalOperatorTrait for Product {
    fn derive_statistics(&self, inputs: &[&Statistics]) -> OptResult<Statistics> {
        let (left, right) = binary_inputs(inputs, "PRODUCT")?;

        Ok(
            Statistics::new(left.tuple_count().saturating_mul(right.tuple_count()).max(1))
                .with_attributes(left.attributes().iter().cloned())
                .with_attributes(right.attributes().iter().cloned()),
        )
    }
}
