use itertools::Itertools;

use crate::catalog::Attribute;
use crate::error::{OptError, OptResult};
use crate::operator::{unary_input, LogicalOperatorTrait};
use crate::stat::Statistics;

/// Narrows its input to an ordered list of attributes. Duplicate rows are not eliminated.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Projection {
    attributes: Vec<Attribute>,
}

impl Projection {
    pub fn new<I>(attributes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Attribute>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub(crate) fn display_name(&self) -> String {
        format!("PROJECT[{}]", self.attributes.iter().join(","))
    }
}

impl LogicalOperatorTrait for Projection {
    fn derive_statistics(&self, inputs: &[&Statistics]) -> OptResult<Statistics> {
        let input = unary_input(inputs, "PROJECT")?;

        let attributes = self
            .attributes
            .iter()
            .map(|attribute| {
                input.attribute(attribute).cloned().ok_or_else(|| {
                    OptError::SchemaViolation {
                        attribute: attribute.clone(),
                        operator: self.display_name(),
                    }
                    .into()
                })
            })
            .collect::<OptResult<Vec<_>>>()?;

        Ok(Statistics::new(input.tuple_count()).with_attributes(attributes))
    }
}
