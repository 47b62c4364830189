//! Data models for test execution
//!
//! Events flowing out of an engine and the results folded from them.

mod event;
mod test_result;
mod throwable;

pub use event::{EventKind, ExecutionEvent, ReportEntry, UnitId, UnitScope};
pub use test_result::{
    ExecutionResults, SkippedUnit, UnitFailure, UnitOutcome, UnitReportEntries, UnitStatus,
};
pub use throwable::{Throwable, ABORTED_TYPE, PANIC_TYPE, UNKNOWN_TYPE};
