use smallvec::SmallVec;

use crate::error::OptResult;
use crate::operator::{LogicalOperator, LogicalOperatorTrait};
use crate::plan::PlanNodeRef;
use crate::stat::Statistics;

/// Cardinality estimator.
///
/// Estimates the output statistics of a single operator from the statistics already attached to
/// its inputs. It never recurses, so a tree has to be estimated bottom up, which is exactly the
/// order in which plan nodes get built.
///
/// All divisions truncate. Distinct value counts are clamped to at least 1 before being used as a
/// divisor, and derived tuple counts are clamped to at least 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct Estimator;

impl Estimator {
    pub fn estimate(
        &self,
        operator: &LogicalOperator,
        inputs: &[PlanNodeRef],
    ) -> OptResult<Statistics> {
        let input_stats: SmallVec<[&Statistics; 2]> = inputs.iter().map(|i| i.stat()).collect();
        operator.derive_statistics(&input_stats)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::catalog::{Attribute, Catalog};
    use crate::error::OptError;
    use crate::operator::LogicalOperator::{
        LogicalJoin, LogicalProduct, LogicalProjection, LogicalScan, LogicalSelect,
    };
    use crate::operator::{Join, Predicate, Product, Projection, Select, TableScan};
    use crate::plan::{PlanNode, PlanNodeIdGen, PlanNodeRef};

    use super::*;

    struct Fixture {
        catalog: Catalog,
        id_gen: PlanNodeIdGen,
    }

    impl Fixture {
        fn new() -> Self {
            let mut catalog = Catalog::new();
            catalog.create_relation("A", 1000, vec![("a1".into(), 50), ("a2".into(), 10)]);
            catalog.create_relation("B", 200, vec![("b1".into(), 20), ("b2".into(), 0)]);
            Self {
                catalog,
                id_gen: PlanNodeIdGen::new(),
            }
        }

        fn node(&mut self, operator: LogicalOperator, inputs: Vec<PlanNodeRef>) -> PlanNodeRef {
            Rc::new(PlanNode::new(self.id_gen.next().unwrap(), operator, inputs).unwrap())
        }

        fn scan(&mut self, name: &str) -> PlanNodeRef {
            let relation = self.catalog.relation(name).unwrap();
            self.node(LogicalScan(TableScan::new(relation)), vec![])
        }
    }

    fn distinct(node: &PlanNodeRef, attribute: &str) -> u64 {
        node.stat()
            .attribute(&Attribute::new(attribute))
            .unwrap()
            .distinct_count()
    }

    #[test]
    fn test_scan() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        assert_eq!(1000, a.stat().tuple_count());
        assert_eq!(f.catalog.relation("A").unwrap().stat(), a.stat());
    }

    #[test]
    fn test_scan_clamps_zero_distinct_count() {
        let mut f = Fixture::new();
        let b = f.scan("B");
        assert_eq!(1, distinct(&b, "b2"));
        assert_eq!(0, f.catalog.relation("B").unwrap().stat().attributes()[1].distinct_count());

        let project = f.node(LogicalProjection(Projection::new(["b2"])), vec![b]);
        assert_eq!(1, distinct(&project, "b2"));
    }

    #[test]
    fn test_projection_keeps_input_counts() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let select = f.node(
            LogicalSelect(Select::new(Predicate::equals_value("a1", "x"))),
            vec![a],
        );
        let project = f.node(
            LogicalProjection(Projection::new(["a1"])),
            vec![select],
        );

        assert_eq!(20, project.stat().tuple_count());
        assert_eq!(1, project.stat().attributes().len());
        assert_eq!(1, distinct(&project, "a1"));
    }

    #[test]
    fn test_select_equals_value() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let select = f.node(
            LogicalSelect(Select::new(Predicate::equals_value("a2", "x"))),
            vec![a],
        );

        assert_eq!(100, select.stat().tuple_count());
        assert_eq!(1, distinct(&select, "a2"));
        assert_eq!(50, distinct(&select, "a1"));
    }

    #[test]
    fn test_select_equals_value_with_zero_distinct_count() {
        let mut f = Fixture::new();
        let b = f.scan("B");
        let select = f.node(
            LogicalSelect(Select::new(Predicate::equals_value("b2", "x"))),
            vec![b],
        );

        assert_eq!(200, select.stat().tuple_count());
    }

    #[test]
    fn test_select_equals_attribute_updates_left_only() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let select = f.node(
            LogicalSelect(Select::new(Predicate::equals_attribute("a2", "a1"))),
            vec![a],
        );

        assert_eq!(1000 / 50, select.stat().tuple_count());
        assert_eq!(10, distinct(&select, "a2"));
        // The right attribute keeps its count.
        assert_eq!(50, distinct(&select, "a1"));
    }

    #[test]
    fn test_product() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let b = f.scan("B");
        let product = f.node(LogicalProduct(Product::new()), vec![a, b]);

        assert_eq!(200_000, product.stat().tuple_count());
        assert_eq!(
            vec!["a1", "a2", "b1", "b2"],
            product
                .stat()
                .schema()
                .map(|a| a.name())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_join() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let b = f.scan("B");
        let join = f.node(
            LogicalJoin(Join::new(Predicate::equals_attribute("a1", "b1"))),
            vec![a, b],
        );

        assert_eq!(4000, join.stat().tuple_count());
        assert_eq!(20, distinct(&join, "a1"));
        assert_eq!(20, distinct(&join, "b1"));
        assert_eq!(10, distinct(&join, "a2"));
    }

    #[test]
    fn test_join_with_reversed_predicate() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let b = f.scan("B");
        let join = f.node(
            LogicalJoin(Join::new(Predicate::equals_attribute("b1", "a1"))),
            vec![a, b],
        );

        assert_eq!(4000, join.stat().tuple_count());
        assert_eq!(20, distinct(&join, "a1"));
    }

    #[test]
    fn test_join_on_missing_attribute() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let b = f.scan("B");
        let err = PlanNode::new(
            100,
            LogicalJoin(Join::new(Predicate::equals_attribute("a1", "c1"))),
            vec![a, b],
        )
        .unwrap_err();

        assert_eq!(
            Some(&OptError::SchemaViolation {
                attribute: "c1".into(),
                operator: "JOIN[a1=c1]".to_string(),
            }),
            err.downcast_ref::<OptError>()
        );
    }

    #[test]
    fn test_wrong_arity() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let err = PlanNode::new(100, LogicalProduct(Product::new()), vec![a]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptError>(),
            Some(OptError::InvalidPlan(_))
        ));
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let mut f = Fixture::new();
        let a = f.scan("A");
        let b = f.scan("B");
        let operator = LogicalJoin(Join::new(Predicate::equals_attribute("a1", "b1")));
        let join = f.node(operator.clone(), vec![a, b]);

        let first = Estimator.estimate(&operator, join.inputs()).unwrap();
        let second = Estimator.estimate(&operator, join.inputs()).unwrap();
        assert_eq!(first, second);
        assert_eq!(join.stat(), &first);
    }
}
