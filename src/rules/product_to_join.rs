//! Product to join conversion.
//!
//! ```text
//! Before: Select(a=b, Product(L, R))
//! After:  Join(L, R, a=b)
//! ```
//!
//! Inputs are converted before their parent, so nested patterns collapse from the leaves up.
//! Selects comparing an attribute with a literal are never converted.

use crate::error::OptResult;
use crate::operator::LogicalOperator;
use crate::optimizer::OptimizerContext;
use crate::plan::{Plan, PlanNodeRef};
use crate::rules::Rule;

#[derive(Clone, Debug, Default)]
pub struct ProductToJoinRule;

impl Rule for ProductToJoinRule {
    fn apply(&self, plan: &Plan, context: &mut OptimizerContext) -> OptResult<Plan> {
        convert(&plan.root(), context).map(Plan::new)
    }
}

fn convert(node: &PlanNodeRef, context: &mut OptimizerContext) -> OptResult<PlanNodeRef> {
    match node.operator() {
        LogicalOperator::LogicalScan(scan) => context.scan(scan),
        LogicalOperator::LogicalSelect(select) => {
            let input = node.input_at(0)?;
            match input.operator() {
                LogicalOperator::LogicalProduct(_) if select.predicate().is_equals_attribute() => {
                    let left = convert(input.input_at(0)?, context)?;
                    let right = convert(input.input_at(1)?, context)?;
                    context.join(left, right, select.predicate().clone())
                }
                _ => {
                    let input = convert(input, context)?;
                    context.select(input, select.predicate().clone())
                }
            }
        }
        LogicalOperator::LogicalProjection(projection) => {
            let input = convert(node.input_at(0)?, context)?;
            context.projection(input, projection.attributes().to_vec())
        }
        LogicalOperator::LogicalProduct(_) => {
            let left = convert(node.input_at(0)?, context)?;
            let right = convert(node.input_at(1)?, context)?;
            context.product(left, right)
        }
        LogicalOperator::LogicalJoin(join) => {
            let left = convert(node.input_at(0)?, context)?;
            let right = convert(node.input_at(1)?, context)?;
            context.join(left, right, join.predicate().clone())
        }
    }
}
