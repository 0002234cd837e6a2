//! Rewrite rules run by the heuristic optimizer.
//!
//! Every rule consumes a whole plan and produces a new, equivalent plan. Rules never modify nodes
//! of their input; new nodes are built through the [`OptimizerContext`] so they are estimated as
//! soon as they exist.

use enum_dispatch::enum_dispatch;
use strum_macros::Display;

use crate::error::OptResult;
use crate::optimizer::OptimizerContext;
use crate::plan::Plan;

mod join_reorder;
pub use join_reorder::*;
mod product_to_join;
pub use product_to_join::*;
mod projection_pushdown;
pub use projection_pushdown::*;
mod selection_pushdown;
pub use selection_pushdown::*;
pub mod util;

#[enum_dispatch]
pub trait Rule {
    /// Rewrites `plan` into an equivalent plan.
    fn apply(&self, plan: &Plan, context: &mut OptimizerContext) -> OptResult<Plan>;
}

#[enum_dispatch(Rule)]
#[derive(Clone, Debug, Display)]
pub enum RuleImpl {
    SelectionPushdown(SelectionPushdownRule),
    JoinReorder(JoinReorderRule),
    ProductToJoin(ProductToJoinRule),
    ProjectionPushdown(ProjectionPushdownRule),
}

/// The standard rule batch, in the order it has to run.
pub fn default_rules() -> Vec<RuleImpl> {
    vec![
        SelectionPushdownRule.into(),
        JoinReorderRule.into(),
        ProductToJoinRule.into(),
        ProjectionPushdownRule.into(),
    ]
}
