//! Sample classes with failing lifecycle hooks

use crate::catalog::TestClass;
use crate::models::Throwable;

pub fn broken_setup_class() -> TestClass {
    TestClass::new("BrokenSetupClass")
        .with_description("Class setup fails before any test")
        .before_all(|| Err(Throwable::new("SetupError", "database unavailable")))
        .test("never_runs", |_| Ok(()))
}

pub fn broken_teardown_class() -> TestClass {
    TestClass::new("BrokenTeardownClass")
        .with_description("Class teardown fails after its test passed")
        .test("runs", |_| Ok(()))
        .after_all(|| Err(Throwable::new("TeardownError", "cleanup failed")))
}
