//! Sample classes with failing, aborted, skipped and reporting tests

use crate::catalog::{assume_true, fail, TestClass, TestMethod};
use crate::models::Throwable;

#[derive(Debug, thiserror::Error)]
#[error("lookup of '{key}' failed")]
struct LookupError {
    key: String,
    #[source]
    source: std::io::Error,
}

/// Tests fail in declaration order: `fails_first` before `fails_second`
pub fn failing_class() -> TestClass {
    TestClass::new("FailingClass")
        .with_description("One passing test and four failing ones")
        .test("passes", |_| Ok(()))
        .test("fails_first", |_| fail("expected 4 but was 5"))
        .test("fails_second", |_| {
            Err(Throwable::new("IllegalStateError", "state was closed")
                .with_cause(Throwable::new("IoError", "pipe broken"))
                .into())
        })
        .test("panics", |_| panic!("index out of bounds"))
        .test("lookup", |_| {
            let error = LookupError {
                key: "user".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such entry"),
            };
            Err(error.into())
        })
}

pub fn aborted_class() -> TestClass {
    TestClass::new("AbortedClass")
        .with_description("A test whose assumption does not hold")
        .test("needs_network", |_| {
            assume_true(false, "network is unavailable")?;
            fail("unreachable")
        })
}

pub fn disabled_class() -> TestClass {
    TestClass::new("DisabledClass")
        .with_description("A disabled test next to a passing one")
        .with_method(TestMethod::test("later", |_| fail("must not run")).disabled("not implemented yet"))
        .test("now", |_| Ok(()))
}

pub fn reporting_class() -> TestClass {
    TestClass::new("ReportingClass")
        .with_description("Tests that publish report entries")
        .test("single_value", |ctx| {
            ctx.publish_value("done");
            Ok(())
        })
        .test("key_values", |ctx| {
            ctx.publish_entry("user", "alice");
            ctx.publish_entry("attempts", "3");
            fail("published before failing")
        })
}
