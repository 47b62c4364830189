//! Event aggregation
//!
//! Folds an execution event stream into [`ExecutionResults`]. The collector
//! may be driven from several engine threads at once; one mutex around the
//! fold keeps every append in arrival order.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::executor::ExecutionListener;
use crate::models::{
    EventKind, ExecutionEvent, ExecutionResults, ReportEntry, SkippedUnit, Throwable, UnitFailure,
    UnitId, UnitOutcome, UnitReportEntries, UnitScope, UnitStatus,
};

/// Listener that records events into an `ExecutionResults` snapshot
#[derive(Debug, Default)]
pub struct EventCollector {
    state: Mutex<Aggregation>,
}

#[derive(Debug, Default)]
struct Aggregation {
    results: ExecutionResults,
    running: HashSet<UnitId>,
    events_seen: usize,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event
    pub fn record(&self, event: ExecutionEvent) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.fold(event);
    }

    /// Number of events recorded so far
    pub fn events_seen(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events_seen
    }

    /// Finish aggregation and hand out the snapshot
    pub fn into_results(self) -> ExecutionResults {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        if !state.running.is_empty() {
            warn!(
                "{} unit(s) started but never finished",
                state.running.len()
            );
        }
        debug!("Aggregated {} events", state.events_seen);
        state.results
    }
}

impl ExecutionListener for EventCollector {
    fn execution_event(&self, event: ExecutionEvent) {
        self.record(event);
    }
}

impl Aggregation {
    fn fold(&mut self, event: ExecutionEvent) {
        self.events_seen += 1;
        debug!("{}", event);

        let ExecutionEvent {
            unit_id,
            kind,
            throwable,
            reason,
            report_entries,
            ..
        } = event;

        if !report_entries.is_empty() {
            self.append_report_entries(&unit_id, report_entries);
        }

        match unit_id.scope() {
            UnitScope::Test => self.fold_test(unit_id, kind, throwable, reason),
            UnitScope::Container => self.fold_container(unit_id, kind, throwable, reason),
        }
    }

    fn fold_test(
        &mut self,
        unit_id: UnitId,
        kind: EventKind,
        throwable: Option<Throwable>,
        reason: Option<String>,
    ) {
        if kind.is_terminal() && !self.running.remove(&unit_id) {
            warn!("{} reported {} without being started", unit_id, kind);
        }

        let results = &mut self.results;
        let status = match kind {
            EventKind::Started => {
                results.started_tests += 1;
                self.running.insert(unit_id);
                return;
            }
            EventKind::Succeeded => UnitStatus::Succeeded,
            EventKind::Failed => {
                results.failures.push(UnitFailure {
                    unit_id: unit_id.clone(),
                    throwable: throwable.unwrap_or_else(Throwable::unknown),
                });
                UnitStatus::Failed
            }
            EventKind::Aborted => {
                results.aborted.push(UnitFailure {
                    unit_id: unit_id.clone(),
                    throwable: throwable.unwrap_or_else(Throwable::unknown),
                });
                UnitStatus::Aborted
            }
            EventKind::Skipped => {
                results.skipped.push(SkippedUnit {
                    unit_id: unit_id.clone(),
                    reason,
                });
                UnitStatus::Skipped
            }
        };

        results.outcomes.push(UnitOutcome { unit_id, status });
    }

    fn fold_container(
        &mut self,
        unit_id: UnitId,
        kind: EventKind,
        throwable: Option<Throwable>,
        reason: Option<String>,
    ) {
        let results = &mut self.results;
        match kind {
            EventKind::Started => results.started_containers += 1,
            EventKind::Succeeded => {}
            EventKind::Failed | EventKind::Aborted => {
                results.container_failures.push(UnitFailure {
                    unit_id,
                    throwable: throwable.unwrap_or_else(Throwable::unknown),
                })
            }
            EventKind::Skipped => results
                .skipped_containers
                .push(SkippedUnit { unit_id, reason }),
        }
    }

    fn append_report_entries(&mut self, unit_id: &UnitId, entries: Vec<ReportEntry>) {
        let collections = &mut self.results.report_entries;
        match collections.iter_mut().find(|c| &c.unit_id == unit_id) {
            Some(collection) => collection.entries.extend(entries),
            None => collections.push(UnitReportEntries {
                unit_id: unit_id.clone(),
                entries,
            }),
        }
    }
}

/// Fold an already materialized event sequence
pub fn aggregate<I>(events: I) -> ExecutionResults
where
    I: IntoIterator<Item = ExecutionEvent>,
{
    let collector = EventCollector::new();
    for event in events {
        collector.record(event);
    }
    collector.into_results()
}
