//! Execution result models
//!
//! Defines per-unit status and the immutable `ExecutionResults` snapshot
//! produced by folding an event stream.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::{ReportEntry, UnitId};
use super::throwable::Throwable;

/// Final status of a test unit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Succeeded,
    Failed,
    Aborted,
    Skipped,
}

impl UnitStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnitStatus::Succeeded => "✓",
            UnitStatus::Failed => "✗",
            UnitStatus::Aborted => "!",
            UnitStatus::Skipped => "○",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UnitStatus::Succeeded)
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitStatus::Succeeded => write!(f, "SUCCEEDED"),
            UnitStatus::Failed => write!(f, "FAILED"),
            UnitStatus::Aborted => write!(f, "ABORTED"),
            UnitStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// Final status of one test unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOutcome {
    pub unit_id: UnitId,
    pub status: UnitStatus,
}

impl fmt::Display for UnitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.status.symbol(), self.unit_id, self.status)
    }
}

/// A unit that failed or aborted, with what it threw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub unit_id: UnitId,
    pub throwable: Throwable,
}

/// A unit that never started
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedUnit {
    pub unit_id: UnitId,
    pub reason: Option<String>,
}

/// Report entries published by one unit, in publication order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReportEntries {
    pub unit_id: UnitId,
    pub entries: Vec<ReportEntry>,
}

/// Immutable record of one kit execution
///
/// Lists keep the order in which the engine reported events, so "the first
/// failure" is the failure that happened first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResults {
    pub(crate) started_tests: usize,
    pub(crate) outcomes: Vec<UnitOutcome>,
    pub(crate) failures: Vec<UnitFailure>,
    pub(crate) aborted: Vec<UnitFailure>,
    pub(crate) skipped: Vec<SkippedUnit>,
    pub(crate) report_entries: Vec<UnitReportEntries>,
    pub(crate) started_containers: usize,
    pub(crate) container_failures: Vec<UnitFailure>,
    pub(crate) skipped_containers: Vec<SkippedUnit>,
}

impl ExecutionResults {
    pub fn number_of_started_tests(&self) -> usize {
        self.started_tests
    }

    pub fn number_of_failed_tests(&self) -> usize {
        self.failures.len()
    }

    pub fn number_of_aborted_tests(&self) -> usize {
        self.aborted.len()
    }

    pub fn number_of_skipped_tests(&self) -> usize {
        self.skipped.len()
    }

    pub fn number_of_succeeded_tests(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == UnitStatus::Succeeded)
            .count()
    }

    /// Throwable of the earliest failure, `None` when nothing failed
    pub fn first_failures_throwable(&self) -> Option<&Throwable> {
        self.failures.first().map(|f| &f.throwable)
    }

    pub fn failures(&self) -> &[UnitFailure] {
        &self.failures
    }

    pub fn aborted(&self) -> &[UnitFailure] {
        &self.aborted
    }

    pub fn skipped(&self) -> &[SkippedUnit] {
        &self.skipped
    }

    /// Final status of every test unit, in completion order
    pub fn outcomes(&self) -> &[UnitOutcome] {
        &self.outcomes
    }

    pub fn status_of(&self, unit_id: &UnitId) -> Option<UnitStatus> {
        self.outcomes
            .iter()
            .find(|o| &o.unit_id == unit_id)
            .map(|o| o.status)
    }

    /// Report entries grouped per reporting unit
    pub fn report_entries(&self) -> &[UnitReportEntries] {
        &self.report_entries
    }

    /// Every report entry of every unit, flattened in order
    pub fn all_report_entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.report_entries.iter().flat_map(|r| r.entries.iter())
    }

    pub fn number_of_report_entries(&self) -> usize {
        self.report_entries.iter().map(|r| r.entries.len()).sum()
    }

    pub fn number_of_started_containers(&self) -> usize {
        self.started_containers
    }

    pub fn number_of_failed_containers(&self) -> usize {
        self.container_failures.len()
    }

    /// Failures not attributable to a single test, such as class setup
    pub fn container_failures(&self) -> &[UnitFailure] {
        &self.container_failures
    }

    pub fn skipped_containers(&self) -> &[SkippedUnit] {
        &self.skipped_containers
    }

    /// True when no test or container failed or aborted
    pub fn is_all_succeeded(&self) -> bool {
        self.failures.is_empty() && self.aborted.is_empty() && self.container_failures.is_empty()
    }
}

impl fmt::Display for ExecutionResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Execution Results")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for outcome in &self.outcomes {
            writeln!(f, "  {outcome}")?;
        }
        for failure in &self.container_failures {
            writeln!(f, "  ✗ {} {}", failure.unit_id, failure.throwable)?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Started: {} | Succeeded: {} | Failed: {} | Aborted: {} | Skipped: {}",
            self.number_of_started_tests(),
            self.number_of_succeeded_tests(),
            self.number_of_failed_tests(),
            self.number_of_aborted_tests(),
            self.number_of_skipped_tests()
        )?;
        writeln!(
            f,
            "Containers: {} started | {} failed",
            self.started_containers,
            self.container_failures.len()
        )
    }
}
