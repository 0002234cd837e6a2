use std::rc::Rc;

use anyhow::ensure;

use crate::catalog::NamedRelation;
use crate::error::{OptError, OptResult};
use crate::operator::LogicalOperatorTrait;
use crate::stat::{AttributeStatistics, Statistics};

/// Leaf operator reading a base relation.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TableScan {
    relation: Rc<NamedRelation>,
}

impl TableScan {
    pub fn new(relation: Rc<NamedRelation>) -> Self {
        Self { relation }
    }

    pub fn relation(&self) -> &Rc<NamedRelation> {
        &self.relation
    }

    pub fn table_name(&self) -> &str {
        self.relation.name()
    }
}

impl LogicalOperatorTrait for TableScan {
    fn derive_statistics(&self, inputs: &[&Statistics]) -> OptResult<Statistics> {
        ensure!(
            inputs.is_empty(),
            OptError::InvalidPlan(format!("scan of {} must not have inputs", self.table_name()))
        );

        let base = self.relation.stat();
        // Catalog counts of zero are raised to 1.
        let attributes = base
            .attributes()
            .iter()
            .map(|a| AttributeStatistics::new(a.attribute().clone(), a.distinct_count().max(1)));
        Ok(Statistics::new(base.tuple_count().max(1)).with_attributes(attributes))
    }
}
