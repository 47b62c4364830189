//! Test execution engines
//!
//! An engine turns selectors into a plan (`resolve`) and runs that plan,
//! reporting every lifecycle event to a listener (`execute`). Resolution of
//! all selectors completes before the first event is emitted.
//!
//! Provides an in-process engine over a [`TestCatalog`](crate::catalog::TestCatalog)
//! with sequential and parallel execution, and a scripted engine that replays
//! a fixed event sequence.

mod in_process;
mod parallel;
mod runner;
mod scripted;

pub use in_process::{InProcessEngine, PlannedClass, TestPlan};
pub use parallel::ParallelScheduler;
pub use scripted::ScriptedEngine;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::KitResult;
use crate::models::ExecutionEvent;
use crate::selector::Selector;

/// Receiver of execution events
///
/// Engines may call it from several threads at once; events of a single
/// unit are always delivered from one thread, in lifecycle order.
pub trait ExecutionListener: Send + Sync {
    fn execution_event(&self, event: ExecutionEvent);
}

/// Discovery and execution capability the kit depends on
pub trait ExecutionEngine: Send + Sync {
    /// Resolved units, ready to run
    type Plan: Send;

    /// Map selectors onto runnable units, failing on anything unknown
    fn resolve(&self, selectors: &[Selector]) -> KitResult<Self::Plan>;

    /// Run a resolved plan to completion
    fn execute(&self, plan: Self::Plan, listener: Arc<dyn ExecutionListener>) -> KitResult<()>;
}

/// Engine execution settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run test classes concurrently
    #[serde(default)]
    pub parallel: bool,

    /// Maximum number of classes running at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl EngineConfig {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel(max_concurrent: usize) -> Self {
        Self {
            parallel: true,
            max_concurrent,
        }
    }
}
