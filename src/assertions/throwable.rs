//! Claims about a captured throwable

use super::AssertionFailure;
use crate::models::{Throwable, UnitId};

/// Claims about the throwable of one failed, aborted or container unit
#[derive(Clone, Copy, Debug)]
pub struct ThrowableAssert<'a> {
    subject: &'static str,
    unit_id: &'a UnitId,
    throwable: &'a Throwable,
}

impl<'a> ThrowableAssert<'a> {
    pub(crate) fn new(subject: &'static str, unit_id: &'a UnitId, throwable: &'a Throwable) -> Self {
        Self {
            subject,
            unit_id,
            throwable,
        }
    }

    pub fn unit_id(&self) -> &'a UnitId {
        self.unit_id
    }

    pub fn throwable(&self) -> &'a Throwable {
        self.throwable
    }

    #[track_caller]
    fn fail(&self, claim: &str, expected: &str, actual: &str) -> ! {
        AssertionFailure::new(format!("{} of {}", claim, self.subject), expected, actual)
            .with_detail(format!("unit: {}", self.unit_id))
            .with_throwable(self.throwable)
            .raise()
    }

    fn message(&self) -> &'a str {
        self.throwable.message().unwrap_or("")
    }

    #[track_caller]
    pub fn with_exception_instance_of(self, type_name: &str) -> Self {
        if !self.throwable.is_instance_of(type_name) {
            self.fail("exception type", type_name, &self.throwable.type_name);
        }
        self
    }

    #[track_caller]
    pub fn with_message(self, expected: &str) -> Self {
        if self.throwable.message() != Some(expected) {
            self.fail("exception message", expected, self.message());
        }
        self
    }

    #[track_caller]
    pub fn with_message_containing(self, fragment: &str) -> Self {
        if !self.message().contains(fragment) {
            self.fail(
                "exception message",
                &format!("containing '{fragment}'"),
                self.message(),
            );
        }
        self
    }

    #[track_caller]
    pub fn with_message_starting_with(self, prefix: &str) -> Self {
        if !self.message().starts_with(prefix) {
            self.fail(
                "exception message",
                &format!("starting with '{prefix}'"),
                self.message(),
            );
        }
        self
    }

    #[track_caller]
    pub fn with_message_ending_with(self, suffix: &str) -> Self {
        if !self.message().ends_with(suffix) {
            self.fail(
                "exception message",
                &format!("ending with '{suffix}'"),
                self.message(),
            );
        }
        self
    }

    #[track_caller]
    pub fn with_cause_instance_of(self, type_name: &str) -> Self {
        match self.throwable.cause.as_deref() {
            Some(cause) if cause.is_instance_of(type_name) => self,
            Some(cause) => self.fail("cause type", type_name, &cause.type_name),
            None => self.fail("cause type", type_name, "<no cause>"),
        }
    }

    #[track_caller]
    pub fn with_cause_message(self, expected: &str) -> Self {
        let actual = self.throwable.cause.as_deref().and_then(Throwable::message);
        if actual != Some(expected) {
            self.fail("cause message", expected, actual.unwrap_or("<none>"));
        }
        self
    }

    /// Types of the causes below the throwable, outermost first
    #[track_caller]
    pub fn has_cause_chain(self, expected: &[&str]) -> Self {
        let causes: Vec<&Throwable> = self.throwable.chain().skip(1).collect();
        let matches = causes.len() == expected.len()
            && causes
                .iter()
                .zip(expected)
                .all(|(cause, wanted)| cause.is_instance_of(wanted));
        if !matches {
            let actual: Vec<&str> = causes.iter().map(|c| c.type_name.as_str()).collect();
            self.fail(
                "cause chain",
                &expected.join(" -> "),
                &actual.join(" -> "),
            );
        }
        self
    }

    #[track_caller]
    pub fn has_no_cause(self) -> Self {
        if let Some(cause) = self.throwable.cause.as_deref() {
            self.fail("cause", "<no cause>", &cause.to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::MethodSignature;

    fn layered() -> Throwable {
        Throwable::new("ServiceError", "request failed: timeout").with_cause(
            Throwable::new("IoError", "connection reset").with_cause(Throwable::of_type("Os")),
        )
    }

    #[test]
    fn test_throwable_claims_pass() {
        let unit = UnitId::method("A", MethodSignature::new("a", Vec::new()));
        let throwable = layered();
        ThrowableAssert::new("failed test", &unit, &throwable)
            .with_exception_instance_of("ServiceError")
            .with_message("request failed: timeout")
            .with_message_containing("failed")
            .with_message_starting_with("request")
            .with_message_ending_with("timeout")
            .with_cause_instance_of("IoError")
            .with_cause_message("connection reset")
            .has_cause_chain(&["IoError", "Os"]);
    }

    #[test]
    #[should_panic(expected = "Expected exception type of failed test to be <IoError> but was <ServiceError>")]
    fn test_wrong_type() {
        let unit = UnitId::method("A", MethodSignature::new("a", Vec::new()));
        let throwable = layered();
        ThrowableAssert::new("failed test", &unit, &throwable).with_exception_instance_of("IoError");
    }

    #[test]
    #[should_panic(expected = "cause chain: IoError: connection reset -> Os")]
    fn test_failure_lists_cause_chain() {
        let unit = UnitId::method("A", MethodSignature::new("a", Vec::new()));
        let throwable = layered();
        ThrowableAssert::new("failed test", &unit, &throwable).has_no_cause();
    }

    #[test]
    #[should_panic(expected = "<IoError -> Os>")]
    fn test_cause_chain_mismatch() {
        let unit = UnitId::method("A", MethodSignature::new("a", Vec::new()));
        let throwable = layered();
        ThrowableAssert::new("failed test", &unit, &throwable).has_cause_chain(&["IoError"]);
    }

    #[test]
    #[should_panic(expected = "to be <std::io::Error> but was <core::fmt::Error>")]
    fn test_qualified_type_rejects_same_simple_name() {
        let unit = UnitId::method("A", MethodSignature::new("a", Vec::new()));
        let throwable = Throwable::from_error(&std::fmt::Error);
        ThrowableAssert::new("failed test", &unit, &throwable)
            .with_exception_instance_of("std::io::Error");
    }
}
