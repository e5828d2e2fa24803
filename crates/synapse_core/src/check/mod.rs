//! Rule-based validation of a note network.
//!
//! # Responsibility
//! - Hold an explicit, ordered list of check rules.
//! - Run rules against one failure accumulator and report the outcome.
//!
//! # Invariants
//! - Rules run in registration order.
//! - A rule returning `CheckFlow::Abort` stops the run; later rules are
//!   skipped and the abort never surfaces as an error.
//! - Lookup and I/O errors raised by a rule propagate unchanged.

pub mod rules;

use crate::graph::error::NetworkResult;
use crate::graph::network::Network;
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Whether the validation run continues after a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFlow {
    Continue,
    /// Later rules depend on conditions this rule found broken.
    Abort,
}

/// Rule body: appends human-readable failures to the accumulator.
pub type RuleFn = fn(&Network, &mut Vec<String>) -> NetworkResult<CheckFlow>;

/// Named check rule.
#[derive(Clone, Copy)]
pub struct CheckRule {
    pub name: &'static str,
    pub run: RuleFn,
}

impl Debug for CheckRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRule").field("name", &self.name).finish()
    }
}

impl CheckRule {
    pub const fn new(name: &'static str, run: RuleFn) -> Self {
        Self { name, run }
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Failure messages in rule order.
    pub failures: Vec<String>,
    /// Number of rules that ran, including an aborting rule.
    pub rules_run: usize,
    /// Name of the rule that stopped the run, if any.
    pub aborted_by: Option<&'static str>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registration error for validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    DuplicateRule(&'static str),
}

impl Display for ValidatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRule(name) => write!(f, "check rule already registered: {name}"),
        }
    }
}

impl Error for ValidatorError {}

/// Ordered rule set run against a network.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<CheckRule>,
}

impl Validator {
    /// Creates an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with the six standard vault rules.
    pub fn standard() -> Self {
        Self {
            rules: rules::standard_rules(),
        }
    }

    /// Appends `rule` after the already registered rules.
    ///
    /// # Errors
    /// - `DuplicateRule` when a rule with the same name is registered.
    pub fn register(&mut self, rule: CheckRule) -> Result<(), ValidatorError> {
        if self.rules.iter().any(|existing| existing.name == rule.name) {
            return Err(ValidatorError::DuplicateRule(rule.name));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[CheckRule] {
        &self.rules
    }

    /// Runs every rule in order until one aborts.
    pub fn run(&self, network: &Network) -> NetworkResult<CheckReport> {
        let mut failures = Vec::new();
        let mut rules_run = 0;
        let mut aborted_by = None;

        for rule in &self.rules {
            let before = failures.len();
            let flow = (rule.run)(network, &mut failures)?;
            rules_run += 1;
            debug!(
                "event=check_rule module=check status=ok rule={} new_failures={}",
                rule.name,
                failures.len() - before
            );
            if flow == CheckFlow::Abort {
                aborted_by = Some(rule.name);
                break;
            }
        }

        info!(
            "event=check module=check status=ok rules_run={rules_run} failures={} aborted={}",
            failures.len(),
            aborted_by.is_some()
        );
        Ok(CheckReport {
            failures,
            rules_run,
            aborted_by,
        })
    }
}
