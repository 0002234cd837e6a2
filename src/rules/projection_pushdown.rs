//! Projection pushdown.
//!
//! Walks the plan top down carrying the set of attributes required above the current node. Below
//! a join, every input producing attributes nobody needs is narrowed by a new projection:
//!
//! ```text
//! Before: Project([a1], Join(a1=b1, A(a1, a2), B(b1, b2)))
//! After:  Project([a1], Join(a1=b1, Project([a1], A), Project([b1], B)))
//! ```
//!
//! The required set starts from the root's output schema, so the plan output never changes.

use std::collections::HashSet;

use crate::catalog::Attribute;
use crate::error::OptResult;
use crate::operator::LogicalOperator;
use crate::optimizer::OptimizerContext;
use crate::plan::{Plan, PlanNodeRef};
use crate::rules::Rule;

#[derive(Clone, Debug, Default)]
pub struct ProjectionPushdownRule;

impl Rule for ProjectionPushdownRule {
    fn apply(&self, plan: &Plan, context: &mut OptimizerContext) -> OptResult<Plan> {
        let root = plan.root();
        let required = root.stat().schema().cloned().collect();
        push_projections_down(&root, required, context).map(Plan::new)
    }
}

fn push_projections_down(
    node: &PlanNodeRef,
    mut required: HashSet<Attribute>,
    context: &mut OptimizerContext,
) -> OptResult<PlanNodeRef> {
    match node.operator() {
        LogicalOperator::LogicalScan(scan) => context.scan(scan),
        LogicalOperator::LogicalProjection(projection) => {
            required.extend(projection.attributes().iter().cloned());
            let input = push_projections_down(node.input_at(0)?, required, context)?;
            context.projection(input, projection.attributes().to_vec())
        }
        LogicalOperator::LogicalSelect(select) => {
            // The select itself still has to see its attributes.
            required.extend(select.predicate().attributes().into_iter().cloned());
            let input = push_projections_down(node.input_at(0)?, required, context)?;
            context.select(input, select.predicate().clone())
        }
        LogicalOperator::LogicalProduct(_) => {
            let left = push_projections_down(node.input_at(0)?, required.clone(), context)?;
            let right = push_projections_down(node.input_at(1)?, required, context)?;
            context.product(left, right)
        }
        LogicalOperator::LogicalJoin(join) => {
            required.extend(join.predicate().attributes().into_iter().cloned());

            let left = push_projections_down(node.input_at(0)?, required.clone(), context)?;
            let left = narrow(left, &required, context)?;
            let right = push_projections_down(node.input_at(1)?, required.clone(), context)?;
            let right = narrow(right, &required, context)?;

            context.join(left, right, join.predicate().clone())
        }
    }
}

/// Puts a projection on `input` keeping only required attributes, unless it already produces
/// nothing else.
fn narrow(
    input: PlanNodeRef,
    required: &HashSet<Attribute>,
    context: &mut OptimizerContext,
) -> OptResult<PlanNodeRef> {
    let kept: Vec<Attribute> = input
        .stat()
        .schema()
        .filter(|a| required.contains(a))
        .cloned()
        .collect();

    if kept.len() == input.stat().attributes().len() {
        Ok(input)
    } else {
        context.projection(input, kept)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::operator::Predicate;
    use crate::plan::LogicalPlanBuilder;

    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.create_relation("A", 1000, vec![("a1".into(), 50), ("a2".into(), 10)]);
        catalog.create_relation("B", 200, vec![("b1".into(), 20), ("b2".into(), 5)]);
        catalog.create_relation("C", 30, vec![("c1".into(), 30), ("c2".into(), 3)]);
        catalog
    }

    fn push(plan: &Plan) -> Plan {
        let mut context = OptimizerContext::for_plan(plan);
        ProjectionPushdownRule.apply(plan, &mut context).unwrap()
    }

    #[test]
    fn test_narrow_join_inputs() {
        let catalog = catalog();
        let mut builder = LogicalPlanBuilder::new(&catalog);
        let b = builder.scan("B").unwrap().build().unwrap().root();
        let plan = builder
            .scan("A")
            .unwrap()
            .join(Predicate::equals_attribute("a1", "b1"), b)
            .unwrap()
            .projection(["a1"])
            .unwrap()
            .build()
            .unwrap();

        let pushed = push(&plan);
        assert_eq!(
            "PROJECT[a1](JOIN[a1=b1](PROJECT[a1](SCAN[A]),PROJECT[b1](SCAN[B])))",
            pushed.to_string()
        );
        assert_eq!(plan.stat(), pushed.stat());
    }

    #[test]
    fn test_no_projection_keeps_output() {
        let catalog = catalog();
        let mut builder = LogicalPlanBuilder::new(&catalog);
        let b = builder.scan("B").unwrap().build().unwrap().root();
        let plan = builder
            .scan("A")
            .unwrap()
            .join(Predicate::equals_attribute("a1", "b1"), b)
            .unwrap()
            .build()
            .unwrap();

        let pushed = push(&plan);
        assert_eq!("JOIN[a1=b1](SCAN[A],SCAN[B])", pushed.to_string());
        assert_eq!(plan, pushed);
    }

    #[test]
    fn test_nested_joins_and_selects() {
        let catalog = catalog();
        let mut builder = LogicalPlanBuilder::new(&catalog);
        let c = builder.scan("C").unwrap().build().unwrap().root();
        let b = builder.scan("B").unwrap().build().unwrap().root();
        let plan = builder
            .scan("A")
            .unwrap()
            .select(Predicate::equals_value("a2", "x"))
            .unwrap()
            .join(Predicate::equals_attribute("a1", "b1"), b)
            .unwrap()
            .join(Predicate::equals_attribute("b1", "c1"), c)
            .unwrap()
            .select(Predicate::equals_attribute("b2", "c2"))
            .unwrap()
            .projection(["a1"])
            .unwrap()
            .build()
            .unwrap();

        let pushed = push(&plan);
        assert_eq!(
            concat!(
                "PROJECT[a1](SELECT[b2=c2](JOIN[b1=c1](",
                "JOIN[a1=b1](PROJECT[a1](SELECT[a2=\"x\"](SCAN[A])),SCAN[B]),SCAN[C])))"
            ),
            pushed.to_string()
        );
        assert_eq!(plan.output_attributes(), pushed.output_attributes());
    }
}
