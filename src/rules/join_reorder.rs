//! Greedy join ordering.
//!
//! Orders the scans of a plan by their effective size, smallest first, and rebuilds the left deep
//! cascade in that order. The effective size of a scan is the tuple count of the equality filter
//! directly applied to it, or of the scan itself when it is not filtered. This rule expects selects
//! to have been pushed down already.

use itertools::Itertools;
use log::debug;

use crate::error::OptResult;
use crate::operator::LogicalOperator;
use crate::optimizer::OptimizerContext;
use crate::plan::{Plan, PlanNodeRef};
use crate::rules::selection_pushdown::push_selects_down;
use crate::rules::util::find_scans;
use crate::rules::Rule;

#[derive(Clone, Debug, Default)]
pub struct JoinReorderRule;

impl Rule for JoinReorderRule {
    fn apply(&self, plan: &Plan, context: &mut OptimizerContext) -> OptResult<Plan> {
        let root = plan.root();

        let mut sizes = vec![];
        collect_effective_sizes(&root, &mut sizes);

        // Stable, ties keep discovery order.
        let order: Vec<PlanNodeRef> = sizes
            .into_iter()
            .sorted_by_key(|(_, size)| *size)
            .map(|(scan, _)| scan)
            .collect();
        debug!(
            "Join order: {}",
            order.iter().map(|scan| scan.operator()).join(", ")
        );

        push_selects_down(&root, &order, context).map(Plan::new)
    }
}

/// Collects `(scan, effective size)` for every scan below `node`, left to right.
fn collect_effective_sizes(node: &PlanNodeRef, sizes: &mut Vec<(PlanNodeRef, u64)>) {
    match node.operator() {
        LogicalOperator::LogicalScan(_) => sizes.push((node.clone(), node.stat().tuple_count())),
        LogicalOperator::LogicalSelect(select) if select.predicate().is_equals_value() => {
            match find_scans(node).as_slice() {
                [scan] => sizes.push((scan.clone(), node.stat().tuple_count())),
                _ => node
                    .inputs()
                    .iter()
                    .for_each(|input| collect_effective_sizes(input, sizes)),
            }
        }
        _ => node
            .inputs()
            .iter()
            .for_each(|input| collect_effective_sizes(input, sizes)),
    }
}
