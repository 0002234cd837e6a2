//! Relational operators and their cardinality formulas.

use anyhow::ensure;
use enum_dispatch::enum_dispatch;

use crate::error::{OptError, OptResult};
use crate::stat::Statistics;

mod join;
pub use join::*;
mod logical;
pub use logical::*;
mod predicate;
pub use predicate::*;
mod product;
pub use product::*;
mod projection;
pub use projection::*;
mod select;
pub use select::*;
mod table_scan;
pub use table_scan::*;

/// Behaviour shared by every logical operator.
#[enum_dispatch]
pub trait LogicalOperatorTrait {
    /// Derives this operator's output statistics from the statistics of its inputs.
    ///
    /// Inputs must already be estimated. Implementations never look below their direct inputs.
    fn derive_statistics(&self, inputs: &[&Statistics]) -> OptResult<Statistics>;
}

fn unary_input<'a>(inputs: &[&'a Statistics], operator: &str) -> OptResult<&'a Statistics> {
    ensure!(
        inputs.len() == 1,
        OptError::InvalidPlan(format!(
            "{} expects 1 input, got {}",
            operator,
            inputs.len()
        ))
    );
    Ok(inputs[0])
}

fn binary_inputs<'a>(
    inputs: &[&'a Statistics],
    operator: &str,
) -> OptResult<(&'a Statistics, &'a Statistics)> {
    ensure!(
        inputs.len() == 2,
        OptError::InvalidPlan(format!(
            "{} expects 2 inputs, got {}",
            operator,
            inputs.len()
        ))
    );
    Ok((inputs[0], inputs[1]))
}

/// Integer division of a tuple count, truncating. Both divisor and result are clamped to at
/// least 1.
fn divide(tuple_count: u64, divisor: u64) -> u64 {
    (tuple_count / divisor.max(1)).max(1)
}
