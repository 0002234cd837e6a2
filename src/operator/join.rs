use crate::catalog::Attribute;
use crate::error::{OptError, OptResult};
use crate::operator::{binary_inputs, divide, LogicalOperatorTrait, Predicate, PredicateKind};
use crate::stat::Statistics;

/// Inner equi-join of two inputs.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Join {
    predicate: Predicate,
}

impl Join {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub(crate) fn display_name(&self) -> String {
        format!("JOIN[{}]", self.predicate)
    }

    /// Returns the join attributes as `(left input attribute, right input attribute)`.
    ///
    /// A predicate written against the opposite orientation is resolved by side.
    pub fn join_attributes<'a>(
        &'a self,
        left: &Statistics,
        right: &Statistics,
    ) -> OptResult<(&'a Attribute, &'a Attribute)> {
        let (a, b) = match self.predicate.kind()? {
            PredicateKind::EqualsAttribute { left, right } => (left, right),
            PredicateKind::EqualsValue { .. } => {
                return Err(OptError::UnsupportedPredicate(format!(
                    "{} is not a join condition",
                    self.predicate
                ))
                .into())
            }
        };

        if left.contains(a) && right.contains(b) {
            Ok((a, b))
        } else if left.contains(b) && right.contains(a) {
            Ok((b, a))
        } else {
            let missing = if left.contains(a) || right.contains(a) { b } else { a };
            Err(OptError::SchemaViolation {
                attribute: missing.clone(),
                operator: self.display_name(),
            }
            .into())
        }
    }
}

impl LogicalOperatorTrait for Join {
    fn derive_statistics(&self, inputs: &[&Statistics]) -> OptResult<Statistics> {
        let (left, right) = binary_inputs(inputs, "JOIN")?;
        let name = self.display_name();
        let (left_attribute, right_attribute) = self.join_attributes(left, right)?;

        let left_distinct = left.distinct_count(left_attribute, &name)?;
        let right_distinct = right.distinct_count(right_attribute, &name)?;
        let distinct = left_distinct.min(right_distinct);

        let mut left_output = left.clone();
        left_output.set_distinct_count(left_attribute, distinct);
        let mut right_output = right.clone();
        right_output.set_distinct_count(right_attribute, distinct);

        let tuple_count = divide(
            left.tuple_count().saturating_mul(right.tuple_count()),
            left_distinct.max(right_distinct),
        );

        Ok(Statistics::new(tuple_count)
            .with_attributes(left_output.attributes().iter().cloned())
            .with_attributes(right_output.attributes().iter().cloned()))
    }
}
