//! Argument rules evaluated before a state is entered.

use crate::validation::violations::ArgumentViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for argument check functions
pub type ArgumentCheck<A> = Box<dyn Fn(&A) -> Validation<(), NonEmptyVec<ArgumentViolation>>>;

/// Shape rules for the payload a state is entered with.
/// Uses Validation to accumulate ALL violations.
pub struct ArgumentRules<A> {
    pub(crate) checks: Vec<ArgumentCheck<A>>,
}

impl<A> ArgumentRules<A> {
    /// Check a payload against every rule.
    /// Returns Validation::Success(()) if all checks pass.
    /// Returns Validation::Failure with ALL violations if any fail.
    pub fn validate(&self, args: &A) -> Validation<(), NonEmptyVec<ArgumentViolation>> {
        if self.checks.is_empty() {
            return Validation::success(());
        }
        let checks: Vec<Validation<(), NonEmptyVec<ArgumentViolation>>> =
            self.checks.iter().map(|check| check(args)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Check a payload, collecting violations into a plain list.
    pub fn violations(&self, args: &A) -> Vec<ArgumentViolation> {
        match self.validate(args) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
