//! Fluent assertions over execution results
//!
//! ```ignore
//! assert_that(&results)
//!     .has_number_of_started_tests(2)
//!     .has_single_failed_test()
//!     .with_exception_instance_of("AssertionFailedError")
//!     .with_message("expected 4 but was 5");
//! ```
//!
//! Every claim is checked immediately. A violated claim panics with an
//! [`AssertionFailure`] message at the caller's location, which is how Rust
//! tests report failures.

mod report;
mod results;
mod throwable;

pub use report::{ReportEntriesAssert, ReportEntryAssert};
pub use results::{ExecutionResultsAssert, SkippedAssert};
pub use throwable::ThrowableAssert;

use std::fmt;
use thiserror::Error;

use crate::models::{ExecutionResults, Throwable};

/// Start an assertion chain
pub fn assert_that(results: &ExecutionResults) -> ExecutionResultsAssert<'_> {
    ExecutionResultsAssert::new(results)
}

/// A violated expectation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub claim: String,
    pub expected: String,
    pub actual: String,
    pub details: Vec<String>,
}

impl AssertionFailure {
    pub fn new(
        claim: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self {
            claim: claim.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    /// Describe a throwable: type, message and cause chain
    pub fn with_throwable(self, throwable: &Throwable) -> Self {
        let mut failure = self.with_detail(format!("throwable: {throwable}"));
        let causes: Vec<String> = throwable.chain().skip(1).map(ToString::to_string).collect();
        if !causes.is_empty() {
            failure = failure.with_detail(format!("cause chain: {}", causes.join(" -> ")));
        }
        failure
    }

    /// Panic with this failure, reporting the caller's location
    #[track_caller]
    pub fn raise(self) -> ! {
        panic!("{self}")
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expected {} to be <{}> but was <{}>",
            self.claim, self.expected, self.actual
        )?;
        for detail in &self.details {
            write!(f, "\n  - {detail}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message() {
        let failure = AssertionFailure::new("number of started tests", 1, 2)
            .with_detail("unit: [class:A]/[method:a()]");
        assert_eq!(
            failure.to_string(),
            "Expected number of started tests to be <1> but was <2>\n  - unit: [class:A]/[method:a()]"
        );
    }

    #[test]
    fn test_failure_describes_cause_chain() {
        let throwable = Throwable::new("Outer", "top").with_cause(Throwable::new("Inner", "root"));
        let failure = AssertionFailure::new("message", "x", "top").with_throwable(&throwable);
        let text = failure.to_string();
        assert!(text.contains("throwable: Outer: top"));
        assert!(text.contains("cause chain: Inner: root"));
    }

    #[test]
    #[should_panic(expected = "Expected claim to be <a> but was <b>")]
    fn test_raise_panics() {
        AssertionFailure::new("claim", "a", "b").raise();
    }
}
