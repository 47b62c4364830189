//! Scripted engine
//!
//! Replays a fixed event sequence instead of running anything. Lets the
//! aggregation and assertion layers be exercised with exact event orders.

use std::sync::Arc;
use tracing::debug;

use super::{ExecutionEngine, ExecutionListener};
use crate::error::{KitError, KitResult};
use crate::models::ExecutionEvent;
use crate::selector::{ClassName, Selector};

/// Engine that emits a pre-recorded event stream
#[derive(Clone, Debug, Default)]
pub struct ScriptedEngine {
    events: Vec<ExecutionEvent>,
    known_classes: Option<Vec<ClassName>>,
}

impl ScriptedEngine {
    pub fn new(events: Vec<ExecutionEvent>) -> Self {
        Self {
            events,
            known_classes: None,
        }
    }

    /// Only these classes resolve; any other class fails resolution
    pub fn with_known_classes<I, C>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ClassName>,
    {
        self.known_classes = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    pub fn events(&self) -> &[ExecutionEvent] {
        &self.events
    }
}

impl ExecutionEngine for ScriptedEngine {
    type Plan = Vec<ExecutionEvent>;

    fn resolve(&self, selectors: &[Selector]) -> KitResult<Self::Plan> {
        if let Some(known) = &self.known_classes {
            if let Some(unknown) = selectors.iter().find(|s| !known.contains(s.class())) {
                return Err(KitError::resolution(
                    unknown,
                    format!("class '{}' is not scripted", unknown.class()),
                ));
            }
        }
        Ok(self.events.clone())
    }

    fn execute(&self, plan: Self::Plan, listener: Arc<dyn ExecutionListener>) -> KitResult<()> {
        debug!("Replaying {} scripted events", plan.len());
        for event in plan {
            listener.execution_event(event);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitId;
    use crate::results::EventCollector;
    use crate::selector::for_class;

    #[test]
    fn test_unknown_class_is_rejected() {
        let engine = ScriptedEngine::default().with_known_classes(["Known"]);
        assert!(engine.resolve(&[for_class("Known").unwrap()]).is_ok());
        assert!(matches!(
            engine.resolve(&[for_class("Other").unwrap()]),
            Err(KitError::Resolution { .. })
        ));
    }

    #[test]
    fn test_replays_in_order() {
        let container = UnitId::container("Known");
        let engine = ScriptedEngine::new(vec![
            ExecutionEvent::started(container.clone()),
            ExecutionEvent::succeeded(container),
        ]);

        let collector = Arc::new(EventCollector::new());
        let plan = engine.resolve(&[]).unwrap();
        engine.execute(plan, collector.clone()).unwrap();
        assert_eq!(collector.events_seen(), 2);
    }
}
