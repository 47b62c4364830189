//! engine-testkit - run test classes in isolation and assert on the outcome
//!
//! The kit resolves selectors (a class, several classes, a method, or a
//! method with parameter types) against an execution engine, runs the
//! resulting units and folds the reported events into an immutable
//! [`ExecutionResults`] snapshot. The [`assertions`] module makes fluent
//! claims about that snapshot.
//!
//! ```ignore
//! use engine_testkit::prelude::*;
//!
//! let catalog = TestCatalog::new().with_class(
//!     TestClass::new("Calculator")
//!         .test("adds", |_| Ok(()))
//!         .test("divides", |_| fail("expected 2 but was 3")),
//! );
//!
//! let results = TestKit::new(catalog).execute_test_class("Calculator")?;
//! assert_that(&results)
//!     .has_number_of_started_tests(2)
//!     .has_single_failed_test()
//!     .with_message("expected 2 but was 3");
//! ```

pub mod assertions;
pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod kit;
pub mod models;
pub mod output;
pub mod results;
pub mod selector;
pub mod suites;
pub mod utils;

pub use error::{KitError, KitResult};
pub use kit::TestKit;
pub use models::ExecutionResults;

/// Common imports for writing and checking test classes
pub mod prelude {
    pub use crate::assertions::assert_that;
    pub use crate::catalog::{
        assume_true, fail, TestCatalog, TestClass, TestContext, TestMethod, TestOutcome,
    };
    pub use crate::executor::EngineConfig;
    pub use crate::kit::TestKit;
    pub use crate::models::{ExecutionResults, Throwable};
    pub use crate::selector::{ParameterTypes, TypeName};
}
