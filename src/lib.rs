//! ## Background
//!
//! The query optimizer accepts a logical query plan, a tree of relational algebra operators (scan,
//! select, project, product and join), and outputs an equivalent plan which is cheaper to execute.
//! Every operator is annotated with an estimate of its output: the number of tuples, and the number
//! of distinct values of each attribute. Estimates start from catalog statistics of the base
//! relations and are derived bottom up, operator by operator.
//!
//! ## Design
//!
//! ### Cardinality Estimation
//!
//! Estimation is local: an operator's statistics are a function of the statistics of its direct
//! inputs only. Plan nodes are immutable and estimated when built, so a rewrite never leaves stale
//! estimates behind.
//!
//! ### Heuristic Optimizer
//!
//! Heuristic optimizer is a rule base optimizer. It runs a batch of rewrite rules one after
//! another, and the default batch is:
//!
//! 1. Selection pushdown, moving every select right above the scans producing its attributes.
//! 2. Join reordering, building the product cascade from the smallest (filtered) relation up.
//! 3. Product to join conversion, merging attribute comparisons with the product below them.
//! 4. Projection pushdown, dropping attributes below joins as soon as nothing needs them.
//!
//! ## Reference
//!
//! 1. Selinger, P. Griffiths, et al. "Access path selection in a relational database management
//! system." Readings in Artificial Intelligence and Databases. Morgan Kaufmann, 1989. 511-522.

#[macro_use]
extern crate prettytable;
#[macro_use]
extern crate lazy_static;

pub mod catalog;
pub mod error;
pub mod explain;
pub mod heuristic;
pub mod operator;
pub mod optimizer;
pub mod plan;
pub mod rules;
pub mod stat;

pub use optimizer::optimise;
