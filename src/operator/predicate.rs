use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;
use smallvec::{smallvec, SmallVec};
use strum_macros::{Display as StrumDisplay, EnumString};

use crate::catalog::Attribute;
use crate::error::{OptError, OptResult};

/// Comparison operator of a predicate.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, StrumDisplay, EnumString)]
pub enum CompareOp {
    #[strum(serialize = "=")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    LtEq,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    GtEq,
}

/// Right hand side of a predicate.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner)]
pub enum Operand {
    Attribute(Attribute),
    Value(String),
}

/// A comparison between an attribute and either another attribute or a literal.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Predicate {
    left: Attribute,
    op: CompareOp,
    right: Operand,
}

/// The predicate shapes the optimizer understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PredicateKind<'a> {
    /// `attribute = value`
    EqualsValue {
        attribute: &'a Attribute,
        value: &'a str,
    },
    /// `left = right`
    EqualsAttribute {
        left: &'a Attribute,
        right: &'a Attribute,
    },
}

impl Predicate {
    pub fn new(left: Attribute, op: CompareOp, right: Operand) -> Self {
        Self { left, op, right }
    }

    pub fn equals_value<A: Into<Attribute>, V: Into<String>>(attribute: A, value: V) -> Self {
        Self::new(attribute.into(), CompareOp::Eq, Operand::Value(value.into()))
    }

    pub fn equals_attribute<L: Into<Attribute>, R: Into<Attribute>>(left: L, right: R) -> Self {
        Self::new(left.into(), CompareOp::Eq, Operand::Attribute(right.into()))
    }

    pub fn left_attribute(&self) -> &Attribute {
        &self.left
    }

    pub fn right_attribute(&self) -> Option<&Attribute> {
        self.right.as_attribute()
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn right(&self) -> &Operand {
        &self.right
    }

    /// Classifies the predicate, failing for anything but an equality.
    pub fn kind(&self) -> OptResult<PredicateKind<'_>> {
        if self.op != CompareOp::Eq {
            return Err(OptError::UnsupportedPredicate(self.to_string()).into());
        }

        Ok(match &self.right {
            Operand::Attribute(right) => PredicateKind::EqualsAttribute {
                left: &self.left,
                right,
            },
            Operand::Value(value) => PredicateKind::EqualsValue {
                attribute: &self.left,
                value,
            },
        })
    }

    pub fn is_equals_value(&self) -> bool {
        matches!(self.kind(), Ok(PredicateKind::EqualsValue { .. }))
    }

    pub fn is_equals_attribute(&self) -> bool {
        matches!(self.kind(), Ok(PredicateKind::EqualsAttribute { .. }))
    }

    /// Attributes referenced by this predicate, left first.
    pub fn attributes(&self) -> SmallVec<[&Attribute; 2]> {
        match &self.right {
            Operand::Attribute(right) => smallvec![&self.left, right],
            Operand::Value(_) => smallvec![&self.left],
        }
    }

    /// Exchanges both sides of an attribute comparison. Literal comparisons are returned as is.
    pub fn swap(&self) -> Self {
        match &self.right {
            Operand::Attribute(right) => {
                let op = match self.op {
                    CompareOp::Lt => CompareOp::Gt,
                    CompareOp::LtEq => CompareOp::GtEq,
                    CompareOp::Gt => CompareOp::Lt,
                    CompareOp::GtEq => CompareOp::LtEq,
                    op => op,
                };
                Self::new(right.clone(), op, Operand::Attribute(self.left.clone()))
            }
            Operand::Value(_) => self.clone(),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.right {
            Operand::Attribute(right) => write!(f, "{}{}{}", self.left, self.op, right),
            Operand::Value(value) => write!(f, "{}{}\"{}\"", self.left, self.op, value),
        }
    }
}
