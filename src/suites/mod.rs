//! Sample test suites
//!
//! A small catalog of test classes used by the `testkit` binary and by the
//! kit's own tests.
//!
//! ## Classes
//!
//! ### Basic
//! - `DummyClass`: one passing test
//! - `SecondDummyClass`: one passing test
//! - `DummyPropertyClass`: parameterized tests, one of them overloaded
//!
//! ### Outcomes
//! - `FailingClass`: failures in declaration order, including a panic
//! - `AbortedClass`: a failed assumption
//! - `DisabledClass`: a disabled test next to a passing one
//! - `ReportingClass`: report entries
//!
//! ### Lifecycle
//! - `BrokenSetupClass`: class setup fails, no test starts
//! - `BrokenTeardownClass`: class teardown fails after its tests ran

mod basic;
mod lifecycle;
mod outcomes;

pub use basic::{dummy_class, dummy_property_class, second_dummy_class};
pub use lifecycle::{broken_setup_class, broken_teardown_class};
pub use outcomes::{aborted_class, disabled_class, failing_class, reporting_class};

use crate::catalog::{TestCatalog, TestClass};

/// Every sample class, in listing order
pub fn all_classes() -> Vec<TestClass> {
    vec![
        dummy_class(),
        second_dummy_class(),
        dummy_property_class(),
        failing_class(),
        aborted_class(),
        disabled_class(),
        reporting_class(),
        broken_setup_class(),
        broken_teardown_class(),
    ]
}

/// Catalog holding every sample class
pub fn catalog() -> TestCatalog {
    all_classes()
        .into_iter()
        .fold(TestCatalog::new(), TestCatalog::with_class)
}
