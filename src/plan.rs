use std::collections::HashSet;
use std::mem::swap;
use std::rc::Rc;

use anyhow::ensure;
use log::trace;
use smallvec::SmallVec;

use crate::catalog::{Attribute, Catalog};
use crate::error::{OptError, OptResult};
use crate::operator::LogicalOperator::{
    LogicalJoin, LogicalProduct, LogicalProjection, LogicalScan, LogicalSelect,
};
use crate::operator::{
    Join, LogicalOperator, Predicate, Product, Projection, Select, TableScan,
};
use crate::stat::{Estimator, Statistics};

pub type PlanNodeId = u32;

pub type PlanNodeRef = Rc<PlanNode>;

pub type PlanNodeInputs = SmallVec<[PlanNodeRef; 2]>;

/// One node in a plan.
///
/// Nodes are immutable once built and always carry their estimated output statistics: a rewrite
/// builds new nodes instead of modifying existing ones.
#[derive(Debug)]
pub struct PlanNode {
    id: PlanNodeId,
    operator: LogicalOperator,
    inputs: PlanNodeInputs,
    stat: Statistics,
}

/// The `eq` should ignore `id`.
impl PartialEq for PlanNode {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.inputs == other.inputs && self.stat == other.stat
    }
}

/// A query plan.
///
/// A query plan is a single root tree of logical operators.
#[derive(PartialEq, Debug)]
pub struct Plan {
    root: PlanNodeRef,
}

/// Breath first iterator of a plan.
struct BFSPlanNodeIter {
    visited: HashSet<PlanNodeId>,
    cur_level: Vec<PlanNodeRef>,
    next_level: Vec<PlanNodeRef>,
}

impl Iterator for BFSPlanNodeIter {
    type Item = PlanNodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur_level.is_empty() {
            swap(&mut self.cur_level, &mut self.next_level);
        }

        if let Some(p) = self.cur_level.pop() {
            for input in &p.inputs {
                if !self.visited.contains(&input.id) {
                    self.next_level.push(input.clone());
                    self.visited.insert(input.id);
                }
            }

            Some(p)
        } else {
            None
        }
    }
}

impl Plan {
    pub fn new(root: PlanNodeRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> PlanNodeRef {
        self.root.clone()
    }

    pub fn stat(&self) -> &Statistics {
        self.root.stat()
    }

    pub fn bfs_iterator(&self) -> impl Iterator<Item = PlanNodeRef> {
        let mut visited = HashSet::new();
        visited.insert(self.root.id);

        BFSPlanNodeIter {
            cur_level: vec![self.root.clone()],
            next_level: vec![],
            visited,
        }
    }

    /// Largest node id used in this plan.
    pub fn max_node_id(&self) -> PlanNodeId {
        self.bfs_iterator().map(|n| n.id).max().unwrap_or_default()
    }

    /// Output attributes of the plan as a set.
    pub fn output_attributes(&self) -> HashSet<Attribute> {
        self.stat().schema().cloned().collect()
    }
}

impl PlanNode {
    /// Creates a node, estimating its statistics from its already estimated inputs.
    pub fn new<I>(id: PlanNodeId, operator: LogicalOperator, inputs: I) -> OptResult<Self>
    where
        I: IntoIterator<Item = PlanNodeRef>,
    {
        PlanNodeBuilder::new(id, &operator).add_inputs(inputs).build()
    }

    pub fn operator(&self) -> &LogicalOperator {
        &self.operator
    }

    pub fn id(&self) -> PlanNodeId {
        self.id
    }

    pub fn inputs(&self) -> &[PlanNodeRef] {
        &self.inputs
    }

    pub fn stat(&self) -> &Statistics {
        &self.stat
    }

    /// Input at `idx`, failing for a malformed node.
    pub fn input_at(&self, idx: usize) -> OptResult<&PlanNodeRef> {
        self.inputs.get(idx).ok_or_else(|| {
            OptError::InvalidPlan(format!(
                "{} has no input at position {}",
                self.operator, idx
            ))
            .into()
        })
    }
}

pub struct PlanNodeBuilder {
    id: PlanNodeId,
    operator: LogicalOperator,
    inputs: PlanNodeInputs,
}

impl PlanNodeBuilder {
    pub fn new(id: PlanNodeId, operator: &LogicalOperator) -> Self {
        Self {
            id,
            operator: operator.clone(),
            inputs: SmallVec::new(),
        }
    }

    pub fn add_inputs<I>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = PlanNodeRef>,
    {
        self.inputs.extend(inputs);
        self
    }

    /// Estimates the node and builds it.
    pub fn build(self) -> OptResult<PlanNode> {
        let stat = Estimator.estimate(&self.operator, &self.inputs)?;
        trace!(
            "Built plan node {} {} with {} tuples",
            self.id,
            self.operator,
            stat.tuple_count()
        );

        Ok(PlanNode {
            id: self.id,
            operator: self.operator,
            inputs: self.inputs,
            stat,
        })
    }
}

/// Generates plan node ids, unique within one generator.
///
/// Fails once the id space is exhausted instead of wrapping around.
#[derive(Debug)]
pub struct PlanNodeIdGen {
    next: Option<PlanNodeId>,
}

impl Default for PlanNodeIdGen {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl PlanNodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose first id is `first`.
    pub fn starting_at(first: PlanNodeId) -> Self {
        Self { next: Some(first) }
    }

    /// Generator whose ids all come after `last`.
    pub fn after(last: PlanNodeId) -> Self {
        Self {
            next: last.checked_add(1),
        }
    }

    pub fn next(&mut self) -> OptResult<PlanNodeId> {
        let id = self
            .next
            .ok_or_else(|| OptError::InvalidPlan("plan node ids exhausted".to_string()))?;
        self.next = id.checked_add(1);
        Ok(id)
    }
}

/// Builds a plan bottom up against a catalog.
///
/// Each call wraps the current root in a new operator. Multi input operators take their right
/// input as an already built node, see [`LogicalPlanBuilder::build`].
pub struct LogicalPlanBuilder<'a> {
    catalog: &'a Catalog,
    root: Option<PlanNodeRef>,
    id_gen: PlanNodeIdGen,
}

impl<'a> LogicalPlanBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            root: None,
            id_gen: PlanNodeIdGen::new(),
        }
    }

    fn reset_root(
        &mut self,
        operator: LogicalOperator,
        inputs: Vec<PlanNodeRef>,
    ) -> OptResult<&mut Self> {
        let plan_node = PlanNode::new(self.id_gen.next()?, operator, inputs)?;
        self.root = Some(Rc::new(plan_node));
        Ok(self)
    }

    fn current_root(&self) -> OptResult<PlanNodeRef> {
        self.root
            .clone()
            .ok_or_else(|| OptError::InvalidPlan("operator has no input".to_string()).into())
    }

    pub fn scan(&mut self, table_name: &str) -> OptResult<&mut Self> {
        ensure!(
            self.root.is_none(),
            OptError::InvalidPlan(format!("scan of {} would discard current plan", table_name))
        );
        let relation = self.catalog.relation(table_name)?;
        self.reset_root(LogicalScan(TableScan::new(relation)), vec![])
    }

    pub fn select(&mut self, predicate: Predicate) -> OptResult<&mut Self> {
        let input = self.current_root()?;
        self.reset_root(LogicalSelect(Select::new(predicate)), vec![input])
    }

    pub fn projection<I>(&mut self, attributes: I) -> OptResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<Attribute>,
    {
        let input = self.current_root()?;
        self.reset_root(
            LogicalProjection(Projection::new(attributes)),
            vec![input],
        )
    }

    pub fn product(&mut self, right: PlanNodeRef) -> OptResult<&mut Self> {
        let left = self.current_root()?;
        self.reset_root(LogicalProduct(Product::new()), vec![left, right])
    }

    pub fn join(&mut self, predicate: Predicate, right: PlanNodeRef) -> OptResult<&mut Self> {
        let left = self.current_root()?;
        self.reset_root(LogicalJoin(Join::new(predicate)), vec![left, right])
    }

    /// Consume current plan, but not reset state, e.g. plan node id.
    ///
    /// This is useful for building multi child plan, e.g. join.
    pub fn build(&mut self) -> OptResult<Plan> {
        let root = self.current_root()?;
        self.root = None;
        Ok(Plan::new(root))
    }
}
