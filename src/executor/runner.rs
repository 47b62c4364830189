//! Test class runner
//!
//! Runs the selected methods of one class and reports each lifecycle step.
//! Panics inside bodies and hooks are caught and reported as failures.

use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

use super::in_process::PlannedClass;
use super::ExecutionListener;
use crate::catalog::{
    LifecycleHook, MethodKind, TestBody, TestContext, TestInterruption, TestMethod,
};
use crate::models::{ExecutionEvent, Throwable, UnitId};
use crate::selector::ClassName;

/// Run one planned class from container start to container finish
pub(crate) fn run_class(planned: &PlannedClass, listener: &dyn ExecutionListener) {
    let class = &planned.class;
    let container = UnitId::container(class.name());

    info!("Running {}", container);
    listener.execution_event(ExecutionEvent::started(container.clone()));

    let setup = class.before_all_hook().map(run_hook).unwrap_or(Ok(()));
    match &setup {
        Ok(()) => {
            for method in planned.methods() {
                run_method(class.name(), method, listener);
            }
        }
        Err(throwable) => error!("Class setup of {} failed: {}", class.name(), throwable),
    }

    // Teardown runs even when setup failed; the setup failure is the one reported.
    let teardown = class.after_all_hook().map(run_hook).unwrap_or(Ok(()));
    let finished = match (setup, teardown) {
        (Ok(()), Ok(())) => ExecutionEvent::succeeded(container),
        (Ok(()), Err(throwable)) => {
            error!("Class teardown of {} failed: {}", class.name(), throwable);
            ExecutionEvent::failed(container, throwable)
        }
        (Err(throwable), teardown) => {
            if let Err(suppressed) = teardown {
                warn!(
                    "Class teardown of {} also failed: {}",
                    class.name(),
                    suppressed
                );
            }
            ExecutionEvent::failed(container, throwable)
        }
    };
    listener.execution_event(finished);
}

fn run_hook(hook: &LifecycleHook) -> Result<(), Throwable> {
    match catch_unwind(AssertUnwindSafe(|| hook())) {
        Ok(result) => result,
        Err(payload) => Err(Throwable::from_panic(&*payload)),
    }
}

fn run_method(class: &ClassName, method: &TestMethod, listener: &dyn ExecutionListener) {
    let signature = method.signature();

    if let Some(reason) = method.disabled_reason() {
        debug!("Skipping {}#{}: {}", class, signature, reason);
        listener.execution_event(ExecutionEvent::skipped(
            UnitId::method(class, signature.clone()),
            Some(reason.to_string()),
        ));
        return;
    }

    match method.kind() {
        MethodKind::Test => {
            let unit_id = UnitId::method(class, signature.clone());
            run_unit(unit_id, signature.to_string(), Vec::new(), method.body(), listener);
        }
        MethodKind::Parameterized { arguments } => {
            for (index, args) in arguments.iter().enumerate() {
                let invocation = index + 1;
                let unit_id = UnitId::invocation(class, signature.clone(), invocation);
                let display_name = format!("[{invocation}] {}", render_arguments(args));
                run_unit(unit_id, display_name, args.clone(), method.body(), listener);
            }
        }
    }
}

fn run_unit(
    unit_id: UnitId,
    display_name: String,
    arguments: Vec<Value>,
    body: &TestBody,
    listener: &dyn ExecutionListener,
) {
    listener.execution_event(ExecutionEvent::started(unit_id.clone()));

    let mut context = TestContext::new(display_name, arguments);
    let outcome = catch_unwind(AssertUnwindSafe(|| body(&mut context)));
    let entries = context.into_report_entries();

    let finished = match outcome {
        Ok(Ok(())) => ExecutionEvent::succeeded(unit_id),
        Ok(Err(TestInterruption::Failed(throwable))) => {
            debug!("{} failed: {}", unit_id, throwable);
            ExecutionEvent::failed(unit_id, throwable)
        }
        Ok(Err(TestInterruption::Aborted(throwable))) => {
            debug!("{} aborted: {}", unit_id, throwable);
            ExecutionEvent::aborted(unit_id, throwable)
        }
        Err(payload) => {
            let throwable = Throwable::from_panic(&*payload);
            warn!("{} panicked: {}", unit_id, throwable);
            ExecutionEvent::failed(unit_id, throwable)
        }
    };

    listener.execution_event(finished.with_report_entries(entries));
}

fn render_arguments(arguments: &[Value]) -> String {
    arguments
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
