//! Text renderings of plans.
//!
//! [`Plan`] displays as a single line, e.g. `PROJECT[a1](JOIN[a1=b1](SCAN[A],SCAN[B]))`.
//! [`explain_table`] lists every node with its estimated statistics.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use prettytable::format::{LinePosition, LineSeparator, TableFormat};
use prettytable::{format, Table};

use crate::plan::{Plan, PlanNode, PlanNodeRef};

lazy_static! {
    static ref EXPLAIN_FORMAT: TableFormat = format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separators(
            &[LinePosition::Top, LinePosition::Title, LinePosition::Bottom],
            LineSeparator::new('-', '+', '+', '+'),
        )
        .padding(1, 1)
        .build();
}

impl Display for PlanNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.operator())?;
        if !self.inputs().is_empty() {
            write!(f, "({})", self.inputs().iter().join(","))?;
        }
        Ok(())
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root())
    }
}

/// One row per node, pre-order, operators indented by depth.
pub fn explain_table(plan: &Plan) -> Table {
    fn add_rows(table: &mut Table, node: &PlanNodeRef, depth: usize) {
        let stat = node.stat();
        let attributes = stat
            .attributes()
            .iter()
            .map(|a| format!("{}:{}", a.attribute(), a.distinct_count()))
            .join(", ");
        table.add_row(row![
            node.id(),
            format!("{}{}", "  ".repeat(depth), node.operator()),
            stat.tuple_count(),
            attributes
        ]);

        for input in node.inputs() {
            add_rows(table, input, depth + 1);
        }
    }

    let mut table = Table::new();
    table.set_format(*EXPLAIN_FORMAT);
    table.set_titles(row!["id", "operator", "tuples", "attributes"]);
    add_rows(&mut table, &plan.root(), 0);
    table
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::operator::Predicate;
    use crate::plan::LogicalPlanBuilder;

    use super::*;

    #[test]
    fn test_explain() {
        let mut catalog = Catalog::new();
        catalog.create_relation("A", 1000, vec![("a1".into(), 50)]);
        catalog.create_relation("B", 200, vec![("b1".into(), 20)]);

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

        assert_eq!(
            "PROJECT[a1](JOIN[a1=b1](SCAN[A],SCAN[B]))",
            plan.to_string()
        );

        let table = explain_table(&plan);
        assert_eq!(4, table.len());
        let rendered = table.to_string();
        assert!(rendered.contains("PROJECT[a1]"));
        assert!(rendered.contains("    SCAN[B]"));
        assert!(rendered.contains("a1:20, b1:20"));
    }
}
