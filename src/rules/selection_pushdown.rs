//! Selection pushdown.
//!
//! Rebuilds the plan as a left deep cascade of products over its scans and attaches every select
//! at the lowest point where all attributes it references are available:
//!
//! ```text
//! Before: Project(Select(b1=c1, Select(a1="x", Product(Product(A, B), C))))
//! After:  Project(Select(b1=c1, Product(Product(Select(a1="x", A), B), C)))
//! ```
//!
//! Projections at the top of the plan are stacked again on top of the cascade. Projections nested
//! inside a product branch are dropped, and a final projection restores the plan's output.

use log::trace;

use crate::error::{OptError, OptResult};
use crate::operator::{LogicalOperator, Predicate};
use crate::optimizer::OptimizerContext;
use crate::plan::{Plan, PlanNodeRef};
use crate::rules::util::{find_predicates, find_scans, find_top_projections};
use crate::rules::Rule;

#[derive(Clone, Debug, Default)]
pub struct SelectionPushdownRule;

impl Rule for SelectionPushdownRule {
    fn apply(&self, plan: &Plan, context: &mut OptimizerContext) -> OptResult<Plan> {
        let root = plan.root();
        let scans = find_scans(&root);
        push_selects_down(&root, &scans, context).map(Plan::new)
    }
}

/// Rebuilds the tree under `root` as a left deep product cascade over `scan_order`, attaching
/// every select of the tree as low as possible and the projections on top of `root` above it.
/// Joins are split into a product and a select on their predicate. When the result would not
/// produce the output schema of `root`, a projection onto that schema is added.
///
/// Selects that become attachable at the same point keep the order in which they were found.
pub(crate) fn push_selects_down(
    root: &PlanNodeRef,
    scan_order: &[PlanNodeRef],
    context: &mut OptimizerContext,
) -> OptResult<PlanNodeRef> {
    let mut pending = find_predicates(root);
    let projections = find_top_projections(root);

    let (first, rest) = scan_order
        .split_first()
        .ok_or_else(|| OptError::InvalidPlan("plan has no scan".to_string()))?;

    let first = copy_scan(first, context)?;
    let mut current = attach_selects(first, &mut pending, context)?;
    for scan in rest {
        let right = copy_scan(scan, context)?;
        let right = attach_selects(right, &mut pending, context)?;
        let product = context.product(current, right)?;
        current = attach_selects(product, &mut pending, context)?;
    }

    if let Some(predicate) = pending.first() {
        return Err(unattachable(&current, predicate));
    }

    // Innermost projection first, so stacked projections keep their nesting.
    for attributes in projections.into_iter().rev() {
        current = context.projection(current, attributes)?;
    }

    // Projections inside a product branch are dropped, which may widen the output.
    if !current.stat().schema().eq(root.stat().schema()) {
        let schema = root.stat().schema().cloned().collect();
        current = context.projection(current, schema)?;
    }

    Ok(current)
}

fn copy_scan(node: &PlanNodeRef, context: &mut OptimizerContext) -> OptResult<PlanNodeRef> {
    match node.operator().as_logical_scan() {
        Some(scan) => context.scan(scan),
        None => Err(OptError::InvalidPlan(format!("{} is not a scan", node.operator())).into()),
    }
}

/// Stacks every pending predicate whose attributes `node` produces on top of `node`, removing
/// them from `pending`.
fn attach_selects(
    node: PlanNodeRef,
    pending: &mut Vec<Predicate>,
    context: &mut OptimizerContext,
) -> OptResult<PlanNodeRef> {
    let mut current = node;
    let mut remaining = Vec::with_capacity(pending.len());

    for predicate in pending.drain(..) {
        if predicate
            .attributes()
            .iter()
            .all(|a| current.stat().contains(a))
        {
            let predicate = orient(&current, predicate);
            trace!("Attaching {} above {}", predicate, current.operator());
            current = context.select(current, predicate)?;
        } else {
            remaining.push(predicate);
        }
    }

    *pending = remaining;
    Ok(current)
}

/// Swaps an attribute comparison sitting on a product so its left attribute comes from the left
/// input.
fn orient(node: &PlanNodeRef, predicate: Predicate) -> Predicate {
    let (left, right) = match (node.operator(), node.inputs()) {
        (LogicalOperator::LogicalProduct(_), [left, right]) => (left.stat(), right.stat()),
        _ => return predicate,
    };

    match predicate.right_attribute() {
        Some(right_attribute)
            if predicate.is_equals_attribute()
                && !(left.contains(predicate.left_attribute()) && right.contains(right_attribute))
                && right.contains(predicate.left_attribute())
                && left.contains(right_attribute) =>
        {
            predicate.swap()
        }
        _ => predicate,
    }
}

fn unattachable(node: &PlanNodeRef, predicate: &Predicate) -> anyhow::Error {
    match predicate
        .attributes()
        .into_iter()
        .find(|a| !node.stat().contains(a))
    {
        Some(attribute) => OptError::SchemaViolation {
            attribute: attribute.clone(),
            operator: format!("SELECT[{}]", predicate),
        }
        .into(),
        None => OptError::InvalidPlan(format!("select {} could not be placed", predicate)).into(),
    }
}
