//! Implementation of heuristic optimizer.
//!
//! Heuristic optimizer optimizes query plan by applying a batch of rewrite rules to query plan, one
//! after another. Each rule rewrites the whole plan, and the output of one rule is the input of the
//! next one.

mod optimizer;
pub use optimizer::*;
