//! Searches over plan trees.

use enumset::EnumSet;

use crate::catalog::Attribute;
use crate::operator::{LogicalOperator, OperatorKind, Predicate};
use crate::plan::PlanNodeRef;

/// Nodes of the given kinds below and including `root`, in pre-order, left input first.
pub fn find_nodes(root: &PlanNodeRef, kinds: EnumSet<OperatorKind>) -> Vec<PlanNodeRef> {
    fn collect(node: &PlanNodeRef, kinds: EnumSet<OperatorKind>, found: &mut Vec<PlanNodeRef>) {
        if kinds.contains(node.operator().kind()) {
            found.push(node.clone());
        }
        for input in node.inputs() {
            collect(input, kinds, found);
        }
    }

    let mut found = vec![];
    collect(root, kinds, &mut found);
    found
}

/// Scan nodes from left to right.
pub fn find_scans(root: &PlanNodeRef) -> Vec<PlanNodeRef> {
    find_nodes(root, EnumSet::only(OperatorKind::Scan))
}

/// Predicates of all select and join nodes, outermost first.
pub fn find_predicates(root: &PlanNodeRef) -> Vec<Predicate> {
    find_nodes(root, OperatorKind::Select | OperatorKind::Join)
        .iter()
        .filter_map(|n| match n.operator() {
            LogicalOperator::LogicalSelect(select) => Some(select.predicate().clone()),
            LogicalOperator::LogicalJoin(join) => Some(join.predicate().clone()),
            _ => None,
        })
        .collect()
}

/// Attribute lists of the projections on top of the plan, outermost first.
///
/// Only the chain of projections and selects starting at `root` is searched; projections below
/// the first scan, product or join are not returned.
pub fn find_top_projections(root: &PlanNodeRef) -> Vec<Vec<Attribute>> {
    let mut projections = vec![];
    let mut node = root;
    loop {
        match node.operator() {
            LogicalOperator::LogicalProjection(projection) => {
                projections.push(projection.attributes().to_vec())
            }
            LogicalOperator::LogicalSelect(_) => {}
            _ => break,
        }
        match node.inputs().first() {
            Some(input) => node = input,
            None => break,
        }
    }
    projections
}
