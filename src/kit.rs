//! Test kit facade
//!
//! Builds selectors, resolves them against an engine, runs the plan and
//! returns the aggregated [`ExecutionResults`].
//!
//! ```ignore
//! let kit = TestKit::new(suites::catalog());
//! let results = kit.execute_test_class("DummyClass")?;
//! assert_that(&results).has_single_succeeded_test();
//! ```

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::catalog::TestCatalog;
use crate::error::{KitError, KitResult};
use crate::executor::{EngineConfig, ExecutionEngine, InProcessEngine};
use crate::models::ExecutionResults;
use crate::results::EventCollector;
use crate::selector::{
    for_class, for_classes, for_method, for_method_with_parameter_types, ClassName, MethodName,
    ParameterTypes, Selector,
};

/// Runs test classes and methods in isolation and records what happened
#[derive(Clone, Debug)]
pub struct TestKit<E: ExecutionEngine = InProcessEngine> {
    engine: E,
}

impl TestKit<InProcessEngine> {
    /// Kit over a catalog, running classes one after another
    pub fn new(catalog: TestCatalog) -> Self {
        Self::with_engine(InProcessEngine::new(catalog))
    }

    pub fn with_config(catalog: TestCatalog, config: EngineConfig) -> Self {
        Self::with_engine(InProcessEngine::new(catalog).with_config(config))
    }
}

impl<E: ExecutionEngine> TestKit<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run every test of one class
    pub fn execute_test_class(&self, class: impl Into<ClassName>) -> KitResult<ExecutionResults> {
        let selector = for_class(class)?;
        self.execute(&[selector])
    }

    /// Run every test of each class, classes in the given order
    pub fn execute_test_classes<I, C>(&self, classes: I) -> KitResult<ExecutionResults>
    where
        I: IntoIterator<Item = C>,
        C: Into<ClassName>,
    {
        let selectors = for_classes(classes)?;
        self.execute(&selectors)
    }

    /// Run the single method with this name
    pub fn execute_test_method(
        &self,
        class: impl Into<ClassName>,
        method: impl Into<MethodName>,
    ) -> KitResult<ExecutionResults> {
        let selector = for_method(class, method)?;
        self.execute(&[selector])
    }

    /// Run the method with this name and these parameter types
    pub fn execute_test_method_with_parameter_types(
        &self,
        class: impl Into<ClassName>,
        method: impl Into<MethodName>,
        parameter_types: impl Into<ParameterTypes>,
    ) -> KitResult<ExecutionResults> {
        let selector = for_method_with_parameter_types(class, method, parameter_types)?;
        self.execute(&[selector])
    }

    /// Resolve all selectors, run them and aggregate the events
    ///
    /// Nothing runs unless every selector resolves.
    pub fn execute(&self, selectors: &[Selector]) -> KitResult<ExecutionResults> {
        let start = Instant::now();
        debug!("Executing {} selector(s)", selectors.len());

        let plan = self.engine.resolve(selectors)?;

        let collector = Arc::new(EventCollector::new());
        self.engine.execute(plan, collector.clone())?;

        let collector = Arc::try_unwrap(collector).map_err(|_| {
            KitError::Engine("execution finished while the listener was still in use".to_string())
        })?;
        let results = collector.into_results();

        info!(
            "{} started, {} succeeded, {} failed, {} aborted, {} skipped in {}ms",
            results.number_of_started_tests(),
            results.number_of_succeeded_tests(),
            results.number_of_failed_tests(),
            results.number_of_aborted_tests(),
            results.number_of_skipped_tests(),
            start.elapsed().as_millis()
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::assert_that;
    use crate::executor::ScriptedEngine;
    use crate::models::{ExecutionEvent, Throwable, UnitId, PANIC_TYPE};
    use crate::selector::{MethodSignature, TypeName};
    use crate::suites;

    fn kit() -> TestKit {
        TestKit::new(suites::catalog())
    }

    #[test]
    fn test_single_class() {
        let results = kit().execute_test_class("DummyClass").unwrap();
        assert_eq!(results.number_of_started_tests(), 1);
        assert_that(&results)
            .has_single_succeeded_test()
            .has_no_failures()
            .has_number_of_started_containers(1);
    }

    #[test]
    fn test_two_classes() {
        let results = kit()
            .execute_test_classes(["DummyClass", "SecondDummyClass"])
            .unwrap();
        assert_eq!(results.number_of_started_tests(), 2);
        assert_that(&results).has_number_of_started_containers(2);
    }

    #[test]
    fn test_no_classes() {
        let results = kit().execute_test_classes(Vec::<&str>::new()).unwrap();
        assert_eq!(results, ExecutionResults::default());
    }

    #[test]
    fn test_single_method() {
        let results = kit().execute_test_method("DummyClass", "nothing").unwrap();
        assert_eq!(results.number_of_started_tests(), 1);
    }

    #[test]
    fn test_single_type_and_sequence_forms_agree() {
        let single = kit()
            .execute_test_method_with_parameter_types(
                "DummyPropertyClass",
                "single",
                TypeName::of::<String>(),
            )
            .unwrap();
        let sequence = kit()
            .execute_test_method_with_parameter_types(
                "DummyPropertyClass",
                "single",
                vec![TypeName::of::<String>()],
            )
            .unwrap();

        assert_eq!(single.number_of_started_tests(), 1);
        assert_eq!(single, sequence);
    }

    #[test]
    fn test_simple_type_name_selects_overload() {
        let results = kit()
            .execute_test_method_with_parameter_types("DummyPropertyClass", "single", "i64")
            .unwrap();
        assert_that(&results).has_single_succeeded_test();
    }

    #[test]
    fn test_null_sequence_is_null_reference() {
        let err = kit()
            .execute_test_method_with_parameter_types(
                "DummyPropertyClass",
                "single",
                ParameterTypes::Sequence(None),
            )
            .unwrap_err();
        assert!(matches!(err, KitError::NullReference(_)));
    }

    #[test]
    fn test_null_single_type_is_invalid_argument() {
        let err = kit()
            .execute_test_method_with_parameter_types(
                "DummyPropertyClass",
                "single",
                ParameterTypes::Single(None),
            )
            .unwrap_err();
        assert_eq!(
            err,
            KitError::InvalidArgument("methodParameterTypes must not be null".to_string())
        );
    }

    #[test]
    fn test_ambiguous_name_fails_before_running() {
        let err = kit()
            .execute_test_method("DummyPropertyClass", "single")
            .unwrap_err();
        assert!(matches!(err, KitError::Resolution { .. }));
    }

    #[test]
    fn test_unknown_class() {
        let err = kit().execute_test_class("Missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not resolve class:Missing: class 'Missing' is not registered"
        );
    }

    #[test]
    fn test_reruns_compare_equal() {
        let kit = kit();
        let first = kit.execute_test_class("FailingClass").unwrap();
        let second = kit.execute_test_class("FailingClass").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_failure_follows_execution_order() {
        let results = kit().execute_test_class("FailingClass").unwrap();

        assert_that(&results)
            .has_number_of_started_tests(5)
            .has_number_of_succeeded_tests(1)
            .has_number_of_failed_tests(4)
            .first_failure()
            .with_exception_instance_of("AssertionFailedError")
            .with_message("expected 4 but was 5");

        let first = results.first_failures_throwable().unwrap();
        assert_eq!(first.message(), Some("expected 4 but was 5"));
    }

    #[test]
    fn test_failures_keep_their_throwables() {
        let results = kit().execute_test_method("FailingClass", "fails_second").unwrap();
        assert_that(&results)
            .has_single_failed_test()
            .with_exception_instance_of("IllegalStateError")
            .with_cause_instance_of("IoError")
            .with_cause_message("pipe broken");

        let results = kit().execute_test_method("FailingClass", "panics").unwrap();
        assert_that(&results)
            .has_single_failed_test()
            .with_exception_instance_of(PANIC_TYPE)
            .with_message("index out of bounds");

        let results = kit().execute_test_method("FailingClass", "lookup").unwrap();
        assert_that(&results)
            .has_single_failed_test()
            .with_exception_instance_of("LookupError")
            .with_message("lookup of 'user' failed")
            .has_cause_chain(&["dyn Error"]);
    }

    #[test]
    fn test_aborted_and_skipped() {
        let results = kit()
            .execute_test_classes(["AbortedClass", "DisabledClass"])
            .unwrap();
        assert_that(&results)
            .has_number_of_started_tests(2)
            .has_number_of_skipped_tests(1)
            .has_number_of_failed_tests(0)
            .has_single_aborted_test()
            .with_message_ending_with("network is unavailable");
        assert_that(&results)
            .has_single_skipped_test()
            .with_reason("not implemented yet");
    }

    #[test]
    fn test_report_entries() {
        let results = kit().execute_test_method("ReportingClass", "single_value").unwrap();
        assert_that(&results).has_single_report_entry().with_value("done");

        let results = kit().execute_test_class("ReportingClass").unwrap();
        assert_that(&results)
            .has_number_of_report_entries(3)
            .with_key_value_pairs(&[("value", "done"), ("user", "alice"), ("attempts", "3")]);

        let results = kit().execute_test_method("DummyPropertyClass", "sum").unwrap();
        assert_that(&results)
            .has_number_of_report_entries(2)
            .with_values(&["3", "42"]);
    }

    #[test]
    fn test_failed_setup_starts_no_test() {
        let results = kit().execute_test_class("BrokenSetupClass").unwrap();
        assert_that(&results)
            .has_number_of_started_tests(0)
            .has_single_failed_container()
            .with_exception_instance_of("SetupError")
            .with_message("database unavailable");
    }

    #[test]
    fn test_failed_teardown_keeps_test_result() {
        let results = kit().execute_test_class("BrokenTeardownClass").unwrap();
        assert_that(&results)
            .has_single_succeeded_test()
            .has_number_of_failed_containers(1);
    }

    #[test]
    fn test_parallel_matches_sequential_counts() {
        let classes = ["DummyClass", "SecondDummyClass", "FailingClass", "ReportingClass"];
        let sequential = kit().execute_test_classes(classes).unwrap();
        let parallel = TestKit::with_config(suites::catalog(), EngineConfig::parallel(3))
            .execute_test_classes(classes)
            .unwrap();

        assert_eq!(
            parallel.number_of_started_tests(),
            sequential.number_of_started_tests()
        );
        assert_eq!(
            parallel.number_of_failed_tests(),
            sequential.number_of_failed_tests()
        );
        assert_eq!(
            parallel.number_of_report_entries(),
            sequential.number_of_report_entries()
        );
        assert_that(&parallel).has_number_of_started_containers(4);
    }

    #[tokio::test]
    async fn test_parallel_from_async_code() {
        let results = TestKit::with_config(suites::catalog(), EngineConfig::parallel(2))
            .execute_test_classes(["DummyClass", "SecondDummyClass"])
            .unwrap();
        assert_that(&results)
            .has_number_of_started_tests(2)
            .has_number_of_succeeded_tests(2)
            .has_number_of_started_containers(2);
    }

    #[test]
    fn test_scripted_engine() {
        let unit = UnitId::method("Scripted", MethodSignature::new("a", Vec::new()));
        let engine = ScriptedEngine::new(vec![
            ExecutionEvent::started(unit.clone()),
            ExecutionEvent::failed(unit, Throwable::new("Boom", "scripted")),
        ])
        .with_known_classes(["Scripted"]);
        let kit = TestKit::with_engine(engine);

        let results = kit.execute_test_class("Scripted").unwrap();
        assert_that(&results)
            .has_single_failed_test()
            .with_message("scripted");
        assert!(kit.execute_test_class("Unknown").is_err());
    }
}
