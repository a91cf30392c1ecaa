//! Builder API for creating argument rules.

use crate::validation::rules::{ArgumentCheck, ArgumentRules};
use crate::validation::violations::ArgumentViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating argument rules
pub struct ArgumentRulesBuilder<A> {
    checks: Vec<ArgumentCheck<A>>,
}

impl<A: 'static> ArgumentRulesBuilder<A> {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&A) -> Validation<(), NonEmptyVec<ArgumentViolation>> + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&A) -> bool + 'static,
    {
        let check = move |args: &A| {
            if predicate(args) {
                Validation::success(())
            } else {
                Validation::fail(ArgumentViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.checks.push(Box::new(check));
        self
    }

    /// Build the argument rules
    pub fn build(self) -> ArgumentRules<A> {
        ArgumentRules {
            checks: self.checks,
        }
    }
}

impl ArgumentRulesBuilder<serde_json::Value> {
    /// Require an object payload carrying `field`
    pub fn require_field(self, field: &str) -> Self {
        let field = field.to_string();
        self.require(move |args: &serde_json::Value| {
            if args.get(&field).is_some() {
                Validation::success(())
            } else {
                Validation::fail(ArgumentViolation::MissingField {
                    field: field.clone(),
                })
            }
        })
    }

    /// Require exactly `expected` positional arguments.
    ///
    /// Arrays count their elements, `null` counts as no arguments and any
    /// other value as a single argument.
    pub fn require_len(self, expected: usize) -> Self {
        self.require(move |args: &serde_json::Value| {
            let found = match args {
                serde_json::Value::Array(items) => items.len(),
                serde_json::Value::Null => 0,
                _ => 1,
            };
            if found == expected {
                Validation::success(())
            } else {
                Validation::fail(ArgumentViolation::ArityMismatch { expected, found })
            }
        })
    }
}

impl<A: 'static> Default for ArgumentRulesBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}
