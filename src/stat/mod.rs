//! Output descriptors of plan nodes.
//!
//! A [`Statistics`] describes the relation produced by one plan node: its estimated tuple count
//! and, for every attribute of its output schema in order, the estimated number of distinct
//! values.

mod estimator;
pub use estimator::*;

use crate::catalog::Attribute;
use crate::error::{OptError, OptResult};

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AttributeStatistics {
    attribute: Attribute,
    distinct_count: u64,
}

impl AttributeStatistics {
    pub fn new(attribute: Attribute, distinct_count: u64) -> Self {
        Self {
            attribute,
            distinct_count,
        }
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    /// Distinct value count as stored, without clamping.
    pub fn distinct_count(&self) -> u64 {
        self.distinct_count
    }
}

#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct Statistics {
    tuple_count: u64,
    attributes: Vec<AttributeStatistics>,
}

impl Statistics {
    pub fn new(tuple_count: u64) -> Self {
        Self {
            tuple_count,
            attributes: vec![],
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute, distinct_count: u64) -> Self {
        self.attributes
            .push(AttributeStatistics::new(attribute, distinct_count));
        self
    }

    pub fn with_attributes<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = AttributeStatistics>,
    {
        self.attributes.extend(attributes);
        self
    }

    pub fn tuple_count(&self) -> u64 {
        self.tuple_count
    }

    pub fn attributes(&self) -> &[AttributeStatistics] {
        &self.attributes
    }

    /// Output schema in order.
    pub fn schema(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().map(|a| &a.attribute)
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.attribute(attribute).is_some()
    }

    pub fn attribute(&self, attribute: &Attribute) -> Option<&AttributeStatistics> {
        self.attributes.iter().find(|a| &a.attribute == attribute)
    }

    /// Distinct value count of `attribute`, clamped to at least 1 so it is always a valid divisor.
    ///
    /// `operator` names the operator asking, for error reporting.
    pub fn distinct_count(&self, attribute: &Attribute, operator: &str) -> OptResult<u64> {
        self.attribute(attribute)
            .map(|a| a.distinct_count.max(1))
            .ok_or_else(|| {
                OptError::SchemaViolation {
                    attribute: attribute.clone(),
                    operator: operator.to_string(),
                }
                .into()
            })
    }

    pub(crate) fn set_tuple_count(&mut self, tuple_count: u64) {
        self.tuple_count = tuple_count;
    }

    /// Replaces the distinct value count of every entry named `attribute`.
    pub(crate) fn set_distinct_count(&mut self, attribute: &Attribute, distinct_count: u64) {
        self.attributes
            .iter_mut()
            .filter(|a| &a.attribute == attribute)
            .for_each(|a| a.distinct_count = distinct_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_count_is_clamped() {
        let stat = Statistics::new(10)
            .with_attribute("x".into(), 0)
            .with_attribute("y".into(), 4);

        assert_eq!(1, stat.distinct_count(&"x".into(), "test").unwrap());
        assert_eq!(4, stat.distinct_count(&"y".into(), "test").unwrap());
        assert_eq!(0, stat.attribute(&"x".into()).unwrap().distinct_count());
    }

    #[test]
    fn test_distinct_count_of_missing_attribute() {
        let stat = Statistics::new(10).with_attribute("x".into(), 3);
        let err = stat.distinct_count(&"z".into(), "SELECT").unwrap_err();
        assert_eq!(
            Some(&OptError::SchemaViolation {
                attribute: "z".into(),
                operator: "SELECT".to_string(),
            }),
            err.downcast_ref::<OptError>()
        );
    }
}
