//! Runtime context handed to a test body

use serde_json::Value;
use std::error::Error;

use crate::models::{ReportEntry, Throwable, ABORTED_TYPE};

/// Why a test body stopped early
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestInterruption {
    /// The test ran and its expectations did not hold
    Failed(Throwable),
    /// A precondition did not hold, the test is neither passed nor failed
    Aborted(Throwable),
}

impl From<Throwable> for TestInterruption {
    fn from(throwable: Throwable) -> Self {
        TestInterruption::Failed(throwable)
    }
}

impl<E: Error> From<E> for TestInterruption {
    fn from(error: E) -> Self {
        TestInterruption::Failed(Throwable::from_error(&error))
    }
}

/// What a test body returns
pub type TestOutcome = Result<(), TestInterruption>;

/// Abort the running test unless `condition` holds
pub fn assume_true(condition: bool, message: impl Into<String>) -> TestOutcome {
    if condition {
        Ok(())
    } else {
        Err(TestInterruption::Aborted(Throwable::new(
            ABORTED_TYPE,
            format!("Assumption failed: {}", message.into()),
        )))
    }
}

/// Fail the running test with an assertion throwable
pub fn fail(message: impl Into<String>) -> TestOutcome {
    Err(TestInterruption::Failed(Throwable::new(
        "AssertionFailedError",
        message.into(),
    )))
}

/// Per-unit state visible to a test body
#[derive(Debug, Default)]
pub struct TestContext {
    display_name: String,
    arguments: Vec<Value>,
    report_entries: Vec<ReportEntry>,
}

impl TestContext {
    pub(crate) fn new(display_name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            display_name: display_name.into(),
            arguments,
            report_entries: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Arguments of the current invocation, empty for plain tests
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index)
    }

    /// Publish a key-value report entry for this unit
    pub fn publish_entry(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.report_entries.push(ReportEntry::new(key, value));
    }

    /// Publish a value under the default `value` key
    pub fn publish_value(&mut self, value: impl Into<String>) {
        self.publish_entry("value", value);
    }

    pub(crate) fn into_report_entries(self) -> Vec<ReportEntry> {
        self.report_entries
    }
}
