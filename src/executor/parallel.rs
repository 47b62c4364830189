//! Parallel class execution
//!
//! Runs several test classes at once on a tokio runtime. Units of one class
//! stay on a single blocking task, so their events never interleave. The
//! scheduler may also be driven from async code.

use futures::future::join_all;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::in_process::PlannedClass;
use super::runner::run_class;
use super::ExecutionListener;
use crate::error::{KitError, KitResult};

/// Parallel scheduler for planned classes
pub struct ParallelScheduler {
    max_concurrent: usize,
}

impl ParallelScheduler {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Block until every class has run
    ///
    /// Builds its own runtime. Called from async code, that runtime lives on a
    /// dedicated thread and the calling task blocks until it is done.
    pub fn run(
        &self,
        classes: Vec<PlannedClass>,
        listener: Arc<dyn ExecutionListener>,
    ) -> KitResult<()> {
        if Handle::try_current().is_err() {
            return self.block_on(classes, listener);
        }

        debug!("Inside an async runtime, scheduling on a separate thread");
        thread::scope(|scope| {
            scope
                .spawn(|| self.block_on(classes, listener))
                .join()
                .unwrap_or_else(|_| {
                    Err(KitError::Engine("scheduler thread panicked".to_string()))
                })
        })
    }

    fn block_on(
        &self,
        classes: Vec<PlannedClass>,
        listener: Arc<dyn ExecutionListener>,
    ) -> KitResult<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.max_concurrent)
            .enable_all()
            .build()
            .map_err(|e| KitError::Engine(format!("failed to start runtime: {e}")))?;

        runtime.block_on(self.run_classes(classes, listener))
    }

    async fn run_classes(
        &self,
        classes: Vec<PlannedClass>,
        listener: Arc<dyn ExecutionListener>,
    ) -> KitResult<()> {
        info!(
            "Running {} classes in parallel (max {} concurrent)",
            classes.len(),
            self.max_concurrent
        );

        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::new();

        for planned in classes {
            let semaphore = semaphore.clone();
            let listener = listener.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;

                debug!("Starting parallel execution of {}", planned.class.name());
                tokio::task::spawn_blocking(move || run_class(&planned, listener.as_ref())).await
            });

            handles.push(handle);
        }

        for joined in join_all(handles).await {
            joined
                .and_then(|inner| inner)
                .map_err(|e| KitError::Engine(format!("class worker failed: {e}")))?;
        }

        info!(
            "Parallel execution completed in {}ms",
            start.elapsed().as_millis()
        );
        Ok(())
    }
}

impl Default for ParallelScheduler {
    fn default() -> Self {
        Self::new(4)
    }
}
