//! Test catalog
//!
//! Test classes are registered explicitly: a class is a named container of
//! test methods with optional class-level lifecycle hooks. The in-process
//! engine discovers runnable units from a [`TestCatalog`].
//!
//! ## Method kinds
//!
//! - Plain tests run once
//! - Parameterized tests run once per argument set
//! - Disabled methods are reported as skipped and never run

mod context;

pub use context::{assume_true, fail, TestContext, TestInterruption, TestOutcome};

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::models::Throwable;
use crate::selector::{ClassName, MethodName, MethodSignature, TypeName};

/// Body of a test method
pub type TestBody = Arc<dyn Fn(&mut TestContext) -> TestOutcome + Send + Sync>;

/// Class-level lifecycle hook
pub type LifecycleHook = Arc<dyn Fn() -> Result<(), Throwable> + Send + Sync>;

/// How often a method runs
#[derive(Clone, Debug, PartialEq)]
pub enum MethodKind {
    Test,
    Parameterized {
        /// One entry per invocation
        arguments: Vec<Vec<Value>>,
    },
}

/// A single test method
#[derive(Clone)]
pub struct TestMethod {
    signature: MethodSignature,
    kind: MethodKind,
    disabled: Option<String>,
    body: TestBody,
}

impl TestMethod {
    /// Plain test that runs once
    pub fn test<F>(name: impl Into<MethodName>, body: F) -> Self
    where
        F: Fn(&mut TestContext) -> TestOutcome + Send + Sync + 'static,
    {
        Self {
            signature: MethodSignature::new(name, Vec::new()),
            kind: MethodKind::Test,
            disabled: None,
            body: Arc::new(body),
        }
    }

    /// Test that runs once per argument set
    pub fn parameterized<F>(
        name: impl Into<MethodName>,
        parameter_types: Vec<TypeName>,
        arguments: Vec<Vec<Value>>,
        body: F,
    ) -> Self
    where
        F: Fn(&mut TestContext) -> TestOutcome + Send + Sync + 'static,
    {
        Self {
            signature: MethodSignature::new(name, parameter_types),
            kind: MethodKind::Parameterized { arguments },
            disabled: None,
            body: Arc::new(body),
        }
    }

    /// Declare parameter types, e.g. to tell overloads apart
    pub fn with_parameter_types(mut self, parameter_types: Vec<TypeName>) -> Self {
        self.signature.parameter_types = parameter_types;
        self
    }

    pub fn disabled(mut self, reason: impl Into<String>) -> Self {
        self.disabled = Some(reason.into());
        self
    }

    pub fn name(&self) -> &MethodName {
        &self.signature.name
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn parameter_types(&self) -> &[TypeName] {
        &self.signature.parameter_types
    }

    pub fn kind(&self) -> &MethodKind {
        &self.kind
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled.as_deref()
    }

    pub(crate) fn body(&self) -> &TestBody {
        &self.body
    }

    /// Number of units this method expands to when it runs
    pub fn invocation_count(&self) -> usize {
        match &self.kind {
            MethodKind::Test => 1,
            MethodKind::Parameterized { arguments } => arguments.len(),
        }
    }
}

impl fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMethod")
            .field("signature", &self.signature)
            .field("kind", &self.kind)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// A named container of test methods
#[derive(Clone)]
pub struct TestClass {
    name: ClassName,
    description: String,
    methods: Vec<TestMethod>,
    before_all: Option<LifecycleHook>,
    after_all: Option<LifecycleHook>,
}

impl TestClass {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            methods: Vec::new(),
            before_all: None,
            after_all: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_method(mut self, method: TestMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Shorthand for adding a plain test
    pub fn test<F>(self, name: impl Into<MethodName>, body: F) -> Self
    where
        F: Fn(&mut TestContext) -> TestOutcome + Send + Sync + 'static,
    {
        self.with_method(TestMethod::test(name, body))
    }

    /// Runs once before any test of the class; a failure fails the class
    pub fn before_all<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<(), Throwable> + Send + Sync + 'static,
    {
        self.before_all = Some(Arc::new(hook));
        self
    }

    /// Runs once after all tests of the class
    pub fn after_all<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<(), Throwable> + Send + Sync + 'static,
    {
        self.after_all = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn methods(&self) -> &[TestMethod] {
        &self.methods
    }

    /// Methods with the given name, in declaration order
    pub fn methods_named<'a>(
        &'a self,
        name: &'a MethodName,
    ) -> impl Iterator<Item = (usize, &'a TestMethod)> + 'a {
        self.methods
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.name() == name)
    }

    pub(crate) fn before_all_hook(&self) -> Option<&LifecycleHook> {
        self.before_all.as_ref()
    }

    pub(crate) fn after_all_hook(&self) -> Option<&LifecycleHook> {
        self.after_all.as_ref()
    }
}

impl fmt::Debug for TestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestClass")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .field("before_all", &self.before_all.is_some())
            .field("after_all", &self.after_all.is_some())
            .finish()
    }
}

/// Registry of test classes, kept in registration order
#[derive(Clone, Debug, Default)]
pub struct TestCatalog {
    classes: Vec<Arc<TestClass>>,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing an earlier class of the same name
    pub fn register(&mut self, class: TestClass) {
        let class = Arc::new(class);
        match self.classes.iter_mut().find(|c| c.name() == class.name()) {
            Some(existing) => *existing = class,
            None => self.classes.push(class),
        }
    }

    pub fn with_class(mut self, class: TestClass) -> Self {
        self.register(class);
        self
    }

    pub fn get(&self, name: &ClassName) -> Option<&Arc<TestClass>> {
        self.classes.iter().find(|c| c.name() == name)
    }

    pub fn classes(&self) -> &[Arc<TestClass>] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
