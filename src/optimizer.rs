use std::rc::Rc;

use crate::catalog::Attribute;
use crate::error::OptResult;
use crate::heuristic::HepOptimizer;
use crate::operator::LogicalOperator::{
    LogicalJoin, LogicalProduct, LogicalProjection, LogicalScan, LogicalSelect,
};
use crate::operator::{Join, LogicalOperator, Predicate, Product, Projection, Select, TableScan};
use crate::plan::{Plan, PlanNode, PlanNodeIdGen, PlanNodeRef};
use crate::rules::default_rules;

/// An optimizer turns a plan into an equivalent, cheaper plan.
pub trait Optimizer {
    fn find_best_plan(self) -> OptResult<Plan>;
}

/// State of one optimization run.
///
/// Rules build every new node through the context, which assigns fresh ids and estimates the
/// node. Nothing here outlives a single run.
#[derive(Debug, Default)]
pub struct OptimizerContext {
    id_gen: PlanNodeIdGen,
}

impl OptimizerContext {
    /// Context for optimizing `plan`, issuing ids that do not clash with the plan's own.
    pub fn for_plan(plan: &Plan) -> Self {
        Self {
            id_gen: PlanNodeIdGen::after(plan.max_node_id()),
        }
    }

    pub fn new_node<I>(&mut self, operator: LogicalOperator, inputs: I) -> OptResult<PlanNodeRef>
    where
        I: IntoIterator<Item = PlanNodeRef>,
    {
        Ok(Rc::new(PlanNode::new(self.id_gen.next()?, operator, inputs)?))
    }

    /// Copy of a scan node under a fresh id.
    pub fn scan(&mut self, scan: &TableScan) -> OptResult<PlanNodeRef> {
        self.new_node(LogicalScan(scan.clone()), [])
    }

    pub fn select(&mut self, input: PlanNodeRef, predicate: Predicate) -> OptResult<PlanNodeRef> {
        self.new_node(LogicalSelect(Select::new(predicate)), [input])
    }

    pub fn projection(
        &mut self,
        input: PlanNodeRef,
        attributes: Vec<Attribute>,
    ) -> OptResult<PlanNodeRef> {
        self.new_node(LogicalProjection(Projection::new(attributes)), [input])
    }

    pub fn product(&mut self, left: PlanNodeRef, right: PlanNodeRef) -> OptResult<PlanNodeRef> {
        self.new_node(LogicalProduct(Product::new()), [left, right])
    }

    pub fn join(
        &mut self,
        left: PlanNodeRef,
        right: PlanNodeRef,
        predicate: Predicate,
    ) -> OptResult<PlanNodeRef> {
        self.new_node(LogicalJoin(Join::new(predicate)), [left, right])
    }
}

/// Optimizes `plan` with the default rule batch: selection pushdown, join reordering,
/// product to join conversion and projection pushdown, in that order.
///
/// The input plan is left untouched; on error no partial result is returned.
pub fn optimise(plan: &Plan) -> OptResult<Plan> {
    let context = OptimizerContext::for_plan(plan);
    HepOptimizer::new(default_rules(), Plan::new(plan.root()), context).find_best_plan()
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::error::OptError;
    use crate::plan::{LogicalPlanBuilder, PlanNodeId};

    use super::*;

    #[test]
    fn test_fresh_ids_follow_plan() {
        let mut catalog = Catalog::new();
        catalog.create_relation("A", 10, vec![("a1".into(), 5)]);
        let plan = LogicalPlanBuilder::new(&catalog)
            .scan("A")
            .unwrap()
            .select(Predicate::equals_value("a1", "1"))
            .unwrap()
            .build()
            .unwrap();

        let mut context = OptimizerContext::for_plan(&plan);
        let scan = plan.root().input_at(0).unwrap().clone();
        let copy = context
            .scan(scan.operator().as_logical_scan().unwrap())
            .unwrap();
        assert_eq!(plan.max_node_id() + 1, copy.id());
    }

    #[test]
    fn test_optimise_with_largest_node_id() {
        let mut catalog = Catalog::new();
        let relation = catalog.create_relation("A", 10, vec![("a1".into(), 5)]);
        let scan = PlanNode::new(PlanNodeId::MAX, LogicalScan(TableScan::new(relation)), vec![]);
        let plan = Plan::new(Rc::new(scan.unwrap()));

        let err = optimise(&plan).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptError>(),
            Some(OptError::InvalidPlan(_))
        ));
    }
}
