use crate::error::OptResult;
use crate::operator::{divide, unary_input, LogicalOperatorTrait, Predicate, PredicateKind};
use crate::stat::Statistics;

/// Filters its input by a predicate.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Select {
    predicate: Predicate,
}

impl Select {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub(crate) fn display_name(&self) -> String {
        format!("SELECT[{}]", self.predicate)
    }
}

impl LogicalOperatorTrait for Select {
    fn derive_statistics(&self, inputs: &[&Statistics]) -> OptResult<Statistics> {
        let input = unary_input(inputs, "SELECT")?;
        let name = self.display_name();

        match self.predicate.kind()? {
            PredicateKind::EqualsValue { attribute, .. } => {
                let distinct = input.distinct_count(attribute, &name)?;
                let mut output = input.clone();
                output.set_tuple_count(divide(input.tuple_count(), distinct));
                output.set_distinct_count(attribute, 1);
                Ok(output)
            }
            PredicateKind::EqualsAttribute { left, right } => {
                let left_distinct = input.distinct_count(left, &name)?;
                let right_distinct = input.distinct_count(right, &name)?;
                let mut output = input.clone();
                let divisor = left_distinct.max(right_distinct);
                output.set_tuple_count(divide(input.tuple_count(), divisor));
                // Only the left attribute takes the reduced count.
                output.set_distinct_count(left, left_distinct.min(right_distinct));
                Ok(output)
            }
        }
    }
}
