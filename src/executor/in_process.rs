//! In-process engine over a test catalog

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::parallel::ParallelScheduler;
use super::runner::run_class;
use super::{EngineConfig, ExecutionEngine, ExecutionListener};
use crate::catalog::{MethodKind, TestCatalog, TestClass, TestMethod};
use crate::error::{KitError, KitResult};
use crate::selector::{MethodName, Selector, TypeName};

/// A class and the declaration indices of its selected methods
#[derive(Clone, Debug)]
pub struct PlannedClass {
    pub class: Arc<TestClass>,
    method_indices: Vec<usize>,
}

impl PlannedClass {
    pub(crate) fn new(class: Arc<TestClass>, method_indices: Vec<usize>) -> Self {
        Self {
            class,
            method_indices,
        }
    }

    /// Selected methods in declaration order
    pub fn methods(&self) -> impl Iterator<Item = &TestMethod> {
        self.method_indices
            .iter()
            .filter_map(|&index| self.class.methods().get(index))
    }

    /// Number of test units this class will report
    pub fn unit_count(&self) -> usize {
        self.methods()
            .map(|m| {
                if m.disabled_reason().is_some() {
                    1
                } else {
                    m.invocation_count()
                }
            })
            .sum()
    }
}

/// Resolved classes in first-selection order
#[derive(Clone, Debug, Default)]
pub struct TestPlan {
    pub classes: Vec<PlannedClass>,
}

impl TestPlan {
    pub fn unit_count(&self) -> usize {
        self.classes.iter().map(PlannedClass::unit_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Engine that discovers units from a catalog and runs them in this process
#[derive(Clone, Debug)]
pub struct InProcessEngine {
    catalog: Arc<TestCatalog>,
    config: EngineConfig,
}

impl InProcessEngine {
    pub fn new(catalog: TestCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &TestCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn select_methods(class: &TestClass, selector: &Selector) -> KitResult<Vec<usize>> {
        let indices = match selector {
            Selector::Class { .. } => (0..class.methods().len()).collect(),
            Selector::Method { method, .. } => {
                vec![Self::unique_by_name(class, method, selector)?]
            }
            Selector::MethodWithParameterTypes {
                method,
                parameter_types,
                ..
            } => vec![Self::by_parameter_types(
                class,
                method,
                parameter_types,
                selector,
            )?],
        };

        for &index in &indices {
            let method = &class.methods()[index];
            if let MethodKind::Parameterized { arguments } = method.kind() {
                if arguments.is_empty() && method.disabled_reason().is_none() {
                    return Err(KitError::resolution(
                        selector,
                        format!(
                            "parameterized method {} declares no arguments",
                            method.signature()
                        ),
                    ));
                }
            }
        }

        Ok(indices)
    }

    fn unique_by_name(
        class: &TestClass,
        method: &MethodName,
        selector: &Selector,
    ) -> KitResult<usize> {
        let candidates: Vec<(usize, &TestMethod)> = class.methods_named(method).collect();
        match candidates.as_slice() {
            [] => Err(KitError::resolution(
                selector,
                format!("method '{}' not found in {}", method, class.name()),
            )),
            [(index, _)] => Ok(*index),
            several => {
                let signatures: Vec<String> =
                    several.iter().map(|(_, m)| m.signature().to_string()).collect();
                Err(KitError::resolution(
                    selector,
                    format!(
                        "method name '{}' is ambiguous, candidates: {}",
                        method,
                        signatures.join(", ")
                    ),
                ))
            }
        }
    }

    /// Exact type names win; otherwise bare names must match exactly one overload
    ///
    /// A requested name with a path or generic arguments only ever matches in full.
    fn by_parameter_types(
        class: &TestClass,
        method: &MethodName,
        parameter_types: &[TypeName],
        selector: &Selector,
    ) -> KitResult<usize> {
        let candidates: Vec<(usize, &TestMethod)> = class.methods_named(method).collect();

        if let Some((index, _)) = candidates
            .iter()
            .find(|(_, m)| m.parameter_types() == parameter_types)
        {
            return Ok(*index);
        }

        let simple_matches: Vec<usize> = candidates
            .iter()
            .filter(|(_, m)| {
                m.parameter_types().len() == parameter_types.len()
                    && m.parameter_types()
                        .iter()
                        .zip(parameter_types)
                        .all(|(declared, wanted)| declared.matches(wanted))
            })
            .map(|(index, _)| *index)
            .collect();

        match simple_matches.as_slice() {
            [index] => Ok(*index),
            [] => Err(KitError::resolution(
                selector,
                format!(
                    "no method '{}' with matching parameter types in {}",
                    method,
                    class.name()
                ),
            )),
            _ => Err(KitError::resolution(
                selector,
                format!(
                    "parameter types match several overloads of '{}'; use full type names",
                    method
                ),
            )),
        }
    }
}

impl ExecutionEngine for InProcessEngine {
    type Plan = TestPlan;

    fn resolve(&self, selectors: &[Selector]) -> KitResult<TestPlan> {
        let mut selected: Vec<(Arc<TestClass>, BTreeSet<usize>)> = Vec::new();

        for selector in selectors {
            let class = self.catalog.get(selector.class()).ok_or_else(|| {
                KitError::resolution(
                    selector,
                    format!("class '{}' is not registered", selector.class()),
                )
            })?;
            let indices = Self::select_methods(class, selector)?;
            debug!("{} resolved to {} method(s)", selector, indices.len());

            match selected
                .iter_mut()
                .find(|(known, _)| known.name() == class.name())
            {
                Some((_, methods)) => methods.extend(indices),
                None => selected.push((class.clone(), indices.into_iter().collect())),
            }
        }

        let plan = TestPlan {
            classes: selected
                .into_iter()
                .map(|(class, methods)| PlannedClass::new(class, methods.into_iter().collect()))
                .collect(),
        };
        info!(
            "Resolved {} selector(s) to {} class(es) and {} unit(s)",
            selectors.len(),
            plan.classes.len(),
            plan.unit_count()
        );
        Ok(plan)
    }

    fn execute(&self, plan: TestPlan, listener: Arc<dyn ExecutionListener>) -> KitResult<()> {
        let start = Instant::now();

        if self.config.parallel && plan.classes.len() > 1 {
            ParallelScheduler::new(self.config.max_concurrent).run(plan.classes, listener)?;
        } else {
            for planned in &plan.classes {
                run_class(planned, listener.as_ref());
            }
        }

        info!("Execution completed in {}ms", start.elapsed().as_millis());
        Ok(())
    }
}
