use anyhow::ensure;
use itertools::Itertools;
use log::debug;

use crate::error::{OptError, OptResult};
use crate::optimizer::{Optimizer, OptimizerContext};
use crate::plan::Plan;
use crate::rules::{Rule, RuleImpl};

pub struct HepOptimizer {
    rules: Vec<RuleImpl>,
    plan: Plan,
    context: OptimizerContext,
}

impl Optimizer for HepOptimizer {
    fn find_best_plan(mut self) -> OptResult<Plan> {
        let output = self.plan.output_attributes();
        let mut plan = self.plan;

        for rule in &self.rules {
            debug!("Applying rule {} to plan {}", rule, plan);
            let new_plan = rule.apply(&plan, &mut self.context)?;

            let new_output = new_plan.output_attributes();
            ensure!(
                new_output == output,
                OptError::InvalidPlan(format!(
                    "rule {} changed plan output from [{}] to [{}]",
                    rule,
                    output.iter().sorted().join(","),
                    new_output.iter().sorted().join(",")
                ))
            );

            debug!("Plan after applying rule {} is {}", rule, new_plan);
            plan = new_plan;
        }

        Ok(plan)
    }
}

impl HepOptimizer {
    pub fn new(rules: Vec<RuleImpl>, plan: Plan, context: OptimizerContext) -> Self {
        Self {
            rules,
            plan,
            context,
        }
    }

    pub fn rules(&self) -> &[RuleImpl] {
        &self.rules
    }
}
