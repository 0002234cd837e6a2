//! Base relations and their statistics.
//!
//! The catalog is only consulted while building the initial plan: every scan captures a shared
//! reference to its [`NamedRelation`], so the optimizer never needs to look anything up.

use std::collections::HashMap;
use std::rc::Rc;

use derive_more::{Display, From};

use crate::error::{OptError, OptResult};
use crate::stat::Statistics;

/// A named attribute. Attributes are identified by name only.
#[derive(Clone, Debug, Display, From, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Attribute(String);

impl Attribute {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Attribute {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A base relation: its name, schema and initial statistics.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct NamedRelation {
    name: String,
    stat: Statistics,
}

impl NamedRelation {
    pub fn new<S: Into<String>>(name: S, stat: Statistics) -> Self {
        Self {
            name: name.into(),
            stat,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stat(&self) -> &Statistics {
        &self.stat
    }
}

/// In memory catalog keyed by relation name.
#[derive(Debug, Default)]
pub struct Catalog {
    relations: HashMap<String, Rc<NamedRelation>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a relation with `tuple_count` tuples and the given `(attribute, distinct values)`
    /// pairs, replacing any relation with the same name.
    pub fn create_relation<S, A>(
        &mut self,
        name: S,
        tuple_count: u64,
        attributes: A,
    ) -> Rc<NamedRelation>
    where
        S: Into<String>,
        A: IntoIterator<Item = (Attribute, u64)>,
    {
        let stat = attributes.into_iter().fold(
            Statistics::new(tuple_count),
            |stat, (attribute, distinct_count)| stat.with_attribute(attribute, distinct_count),
        );
        let relation = Rc::new(NamedRelation::new(name, stat));
        self.relations
            .insert(relation.name().to_string(), relation.clone());
        relation
    }

    pub fn relation(&self, name: &str) -> OptResult<Rc<NamedRelation>> {
        self.relations
            .get(name)
            .cloned()
            .ok_or_else(|| OptError::UnknownRelation(name.to_string()).into())
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
