use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;
use enum_dispatch::enum_dispatch;
use enumset::EnumSetType;
use strum_macros::Display as StrumDisplay;

use crate::operator::{Join, Product, Projection, Select, TableScan};

/// Logical relational operator.
#[enum_dispatch(LogicalOperatorTrait)]
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner)]
pub enum LogicalOperator {
    LogicalScan(TableScan),
    LogicalSelect(Select),
    LogicalProjection(Projection),
    LogicalProduct(Product),
    LogicalJoin(Join),
}

/// Kind of a [`LogicalOperator`], usable in sets.
#[derive(EnumSetType, Debug, StrumDisplay)]
pub enum OperatorKind {
    Scan,
    Select,
    Projection,
    Product,
    Join,
}

impl LogicalOperator {
    pub fn kind(&self) -> OperatorKind {
        match self {
            LogicalOperator::LogicalScan(_) => OperatorKind::Scan,
            LogicalOperator::LogicalSelect(_) => OperatorKind::Select,
            LogicalOperator::LogicalProjection(_) => OperatorKind::Projection,
            LogicalOperator::LogicalProduct(_) => OperatorKind::Product,
            LogicalOperator::LogicalJoin(_) => OperatorKind::Join,
        }
    }
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOperator::LogicalScan(scan) => write!(f, "SCAN[{}]", scan.table_name()),
            LogicalOperator::LogicalSelect(select) => f.write_str(&select.display_name()),
            LogicalOperator::LogicalProjection(projection) => {
                f.write_str(&projection.display_name())
            }
            LogicalOperator::LogicalProduct(_) => f.write_str("PRODUCT"),
            LogicalOperator::LogicalJoin(join) => f.write_str(&join.display_name()),
        }
    }
}
