//! Count and selection claims on `ExecutionResults`

use super::report::{ReportEntriesAssert, ReportEntryAssert};
use super::throwable::ThrowableAssert;
use super::AssertionFailure;
use crate::models::{ExecutionResults, SkippedUnit, UnitFailure};

/// Entry point of an assertion chain
#[derive(Clone, Copy, Debug)]
pub struct ExecutionResultsAssert<'a> {
    results: &'a ExecutionResults,
}

impl<'a> ExecutionResultsAssert<'a> {
    pub fn new(results: &'a ExecutionResults) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &'a ExecutionResults {
        self.results
    }

    #[track_caller]
    fn check_count(self, claim: &str, expected: usize, actual: usize, details: Vec<String>) -> Self {
        if expected != actual {
            AssertionFailure::new(claim, expected, actual)
                .with_details(details)
                .raise();
        }
        self
    }

    fn outcome_details(&self) -> Vec<String> {
        self.results
            .outcomes()
            .iter()
            .map(|o| format!("{} {}", o.status, o.unit_id))
            .collect()
    }

    fn failure_details(failures: &[UnitFailure]) -> Vec<String> {
        failures
            .iter()
            .map(|f| format!("{}: {}", f.unit_id, f.throwable))
            .collect()
    }

    #[track_caller]
    pub fn has_number_of_started_tests(self, expected: usize) -> Self {
        let details = self.outcome_details();
        self.check_count(
            "number of started tests",
            expected,
            self.results.number_of_started_tests(),
            details,
        )
    }

    #[track_caller]
    pub fn has_single_started_test(self) -> Self {
        self.has_number_of_started_tests(1)
    }

    #[track_caller]
    pub fn has_number_of_succeeded_tests(self, expected: usize) -> Self {
        let details = self.outcome_details();
        self.check_count(
            "number of succeeded tests",
            expected,
            self.results.number_of_succeeded_tests(),
            details,
        )
    }

    #[track_caller]
    pub fn has_single_succeeded_test(self) -> Self {
        self.has_number_of_succeeded_tests(1)
    }

    #[track_caller]
    pub fn has_number_of_failed_tests(self, expected: usize) -> Self {
        self.check_count(
            "number of failed tests",
            expected,
            self.results.number_of_failed_tests(),
            Self::failure_details(self.results.failures()),
        )
    }

    #[track_caller]
    pub fn has_number_of_aborted_tests(self, expected: usize) -> Self {
        self.check_count(
            "number of aborted tests",
            expected,
            self.results.number_of_aborted_tests(),
            Self::failure_details(self.results.aborted()),
        )
    }

    #[track_caller]
    pub fn has_number_of_skipped_tests(self, expected: usize) -> Self {
        let details = self
            .results
            .skipped()
            .iter()
            .map(|s| format!("{} ({})", s.unit_id, s.reason.as_deref().unwrap_or("no reason")))
            .collect();
        self.check_count(
            "number of skipped tests",
            expected,
            self.results.number_of_skipped_tests(),
            details,
        )
    }

    #[track_caller]
    pub fn has_number_of_started_containers(self, expected: usize) -> Self {
        self.check_count(
            "number of started containers",
            expected,
            self.results.number_of_started_containers(),
            Vec::new(),
        )
    }

    #[track_caller]
    pub fn has_number_of_failed_containers(self, expected: usize) -> Self {
        self.check_count(
            "number of failed containers",
            expected,
            self.results.number_of_failed_containers(),
            Self::failure_details(self.results.container_failures()),
        )
    }

    /// No test failed or aborted and no container failed
    #[track_caller]
    pub fn has_no_failures(self) -> Self {
        self.has_number_of_failed_tests(0)
            .has_number_of_aborted_tests(0)
            .has_number_of_failed_containers(0)
    }

    #[track_caller]
    fn single<'f>(
        failures: &'f [UnitFailure],
        claim: &'static str,
        subject: &'static str,
    ) -> ThrowableAssert<'f> {
        match failures {
            [only] => ThrowableAssert::new(subject, &only.unit_id, &only.throwable),
            _ => AssertionFailure::new(claim, 1, failures.len())
                .with_details(Self::failure_details(failures))
                .raise(),
        }
    }

    #[track_caller]
    pub fn has_single_failed_test(self) -> ThrowableAssert<'a> {
        Self::single(
            self.results.failures(),
            "number of failed tests",
            "failed test",
        )
    }

    #[track_caller]
    pub fn has_single_aborted_test(self) -> ThrowableAssert<'a> {
        Self::single(
            self.results.aborted(),
            "number of aborted tests",
            "aborted test",
        )
    }

    #[track_caller]
    pub fn has_single_failed_container(self) -> ThrowableAssert<'a> {
        Self::single(
            self.results.container_failures(),
            "number of failed containers",
            "failed container",
        )
    }

    /// The earliest failed test, whatever the total
    #[track_caller]
    pub fn first_failure(self) -> ThrowableAssert<'a> {
        match self.results.failures().first() {
            Some(first) => ThrowableAssert::new("first failed test", &first.unit_id, &first.throwable),
            None => AssertionFailure::new("a failed test", "present", "absent")
                .with_details(self.outcome_details())
                .raise(),
        }
    }

    #[track_caller]
    pub fn has_single_skipped_test(self) -> SkippedAssert<'a> {
        match self.results.skipped() {
            [only] => SkippedAssert { skipped: only },
            skipped => AssertionFailure::new("number of skipped tests", 1, skipped.len()).raise(),
        }
    }

    #[track_caller]
    pub fn has_no_report_entries(self) -> Self {
        let details = self
            .results
            .all_report_entries()
            .map(ToString::to_string)
            .collect();
        self.check_count(
            "number of report entries",
            0,
            self.results.number_of_report_entries(),
            details,
        )
    }

    #[track_caller]
    pub fn has_single_report_entry(self) -> ReportEntryAssert<'a> {
        let grouped = self.results.report_entries();
        match grouped {
            [only] if only.entries.len() == 1 => {
                ReportEntryAssert::new(&only.unit_id, &only.entries[0])
            }
            _ => AssertionFailure::new(
                "number of report entries",
                1,
                self.results.number_of_report_entries(),
            )
            .with_details(self.results.all_report_entries().map(ToString::to_string))
            .raise(),
        }
    }

    #[track_caller]
    pub fn has_number_of_report_entries(self, expected: usize) -> ReportEntriesAssert<'a> {
        let entries: Vec<_> = self.results.all_report_entries().collect();
        if entries.len() != expected {
            AssertionFailure::new("number of report entries", expected, entries.len())
                .with_details(entries.iter().map(ToString::to_string))
                .raise();
        }
        ReportEntriesAssert::new(entries)
    }
}

/// Claims about one skipped test
#[derive(Clone, Copy, Debug)]
pub struct SkippedAssert<'a> {
    skipped: &'a SkippedUnit,
}

impl<'a> SkippedAssert<'a> {
    #[track_caller]
    pub fn with_reason(self, expected: &str) -> Self {
        let actual = self.skipped.reason.as_deref();
        if actual != Some(expected) {
            AssertionFailure::new("skip reason", expected, actual.unwrap_or("<none>"))
                .with_detail(format!("unit: {}", self.skipped.unit_id))
                .raise();
        }
        self
    }

    pub fn skipped(&self) -> &'a SkippedUnit {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use crate::assertions::assert_that;
    use crate::models::{ExecutionEvent, ExecutionResults, Throwable, UnitId};
    use crate::results::aggregate;
    use crate::selector::MethodSignature;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn unit(name: &str) -> UnitId {
        UnitId::method("Sample", MethodSignature::new(name, Vec::new()))
    }

    fn mixed_results() -> ExecutionResults {
        aggregate(vec![
            ExecutionEvent::started(unit("ok")),
            ExecutionEvent::succeeded(unit("ok")).with_report_entry("key", "value"),
            ExecutionEvent::started(unit("bad")),
            ExecutionEvent::failed(unit("bad"), Throwable::new("AssertionFailedError", "2 != 3")),
            ExecutionEvent::skipped(unit("later"), Some("not yet".to_string())),
        ])
    }

    fn panic_message(f: impl FnOnce()) -> String {
        let payload = catch_unwind(AssertUnwindSafe(f)).expect_err("assertion should fail");
        payload
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default()
    }

    #[test]
    fn test_passing_chain() {
        let results = mixed_results();
        assert_that(&results)
            .has_number_of_started_tests(2)
            .has_single_succeeded_test()
            .has_number_of_failed_tests(1)
            .has_number_of_aborted_tests(0)
            .has_number_of_skipped_tests(1)
            .has_number_of_failed_containers(0);

        assert_that(&results)
            .has_single_skipped_test()
            .with_reason("not yet");
        assert_that(&results)
            .has_single_report_entry()
            .with_key_and_value("key", "value");
    }

    #[test]
    fn test_count_mismatch_names_units() {
        let results = mixed_results();
        let message = panic_message(|| {
            assert_that(&results).has_number_of_failed_tests(0);
        });
        assert!(message.contains("Expected number of failed tests to be <0> but was <1>"));
        assert!(message.contains("[class:Sample]/[method:bad()]"));
        assert!(message.contains("2 != 3"));
    }

    #[test]
    fn test_chain_stops_at_first_violation() {
        let results = mixed_results();
        let message = panic_message(|| {
            assert_that(&results)
                .has_number_of_started_tests(5)
                .has_number_of_failed_tests(7);
        });
        assert!(message.contains("started tests"));
        assert!(!message.contains("failed tests"));
    }

    #[test]
    #[should_panic(expected = "Expected a failed test to be <present> but was <absent>")]
    fn test_first_failure_on_empty() {
        assert_that(&ExecutionResults::default()).first_failure();
    }

    #[test]
    #[should_panic(expected = "number of failed containers")]
    fn test_has_no_failures_checks_containers() {
        let container = UnitId::container("Sample");
        let results = aggregate(vec![
            ExecutionEvent::started(container.clone()),
            ExecutionEvent::failed(container, Throwable::new("SetupError", "boom")),
        ]);
        assert_that(&results).has_no_failures();
    }

    #[test]
    #[should_panic(expected = "Expected skip reason to be <other> but was <not yet>")]
    fn test_skip_reason_mismatch() {
        assert_that(&mixed_results())
            .has_single_skipped_test()
            .with_reason("other");
    }

    #[test]
    #[should_panic(expected = "number of report entries to be <0> but was <1>")]
    fn test_has_no_report_entries() {
        assert_that(&mixed_results()).has_no_report_entries();
    }
}
