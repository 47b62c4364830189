//! Execution events
//!
//! The engine reports every unit's lifecycle as a stream of events. For one
//! unit the stream is either `Started` followed by exactly one terminal event
//! (`Succeeded`, `Failed` or `Aborted`), or a single `Skipped`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::throwable::Throwable;
use crate::selector::{ClassName, MethodSignature};

/// Identity of a container (test class) or a test unit
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    pub class: ClassName,
    pub method: Option<MethodSignature>,
    /// 1-based invocation index of a parameterized method
    pub invocation: Option<usize>,
}

impl UnitId {
    pub fn container(class: impl Into<ClassName>) -> Self {
        Self {
            class: class.into(),
            method: None,
            invocation: None,
        }
    }

    pub fn method(class: impl Into<ClassName>, method: MethodSignature) -> Self {
        Self {
            class: class.into(),
            method: Some(method),
            invocation: None,
        }
    }

    pub fn invocation(class: impl Into<ClassName>, method: MethodSignature, index: usize) -> Self {
        Self {
            class: class.into(),
            method: Some(method),
            invocation: Some(index),
        }
    }

    pub fn scope(&self) -> UnitScope {
        if self.method.is_some() {
            UnitScope::Test
        } else {
            UnitScope::Container
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[class:{}]", self.class)?;
        match (&self.method, self.invocation) {
            (Some(method), Some(index)) => write!(
                f,
                "/[test-template:{method}]/[test-template-invocation:#{index}]"
            ),
            (Some(method), None) => write!(f, "/[method:{method}]"),
            (None, _) => Ok(()),
        }
    }
}

/// Whether a unit is a container or a test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitScope {
    Container,
    Test,
}

/// Lifecycle notification kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Started,
    Skipped,
    Aborted,
    Succeeded,
    Failed,
}

impl EventKind {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventKind::Succeeded | EventKind::Failed | EventKind::Aborted
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Started => write!(f, "STARTED"),
            EventKind::Skipped => write!(f, "SKIPPED"),
            EventKind::Aborted => write!(f, "ABORTED"),
            EventKind::Succeeded => write!(f, "SUCCEEDED"),
            EventKind::Failed => write!(f, "FAILED"),
        }
    }
}

/// Key-value datum published by a unit while it ran
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub key: String,
    pub value: String,
}

impl ReportEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// A single lifecycle notification for one unit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub unit_id: UnitId,
    pub kind: EventKind,
    pub throwable: Option<Throwable>,
    /// Skip reason, only meaningful for `Skipped`
    pub reason: Option<String>,
    pub report_entries: Vec<ReportEntry>,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionEvent {
    fn new(unit_id: UnitId, kind: EventKind) -> Self {
        Self {
            unit_id,
            kind,
            throwable: None,
            reason: None,
            report_entries: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn started(unit_id: UnitId) -> Self {
        Self::new(unit_id, EventKind::Started)
    }

    pub fn succeeded(unit_id: UnitId) -> Self {
        Self::new(unit_id, EventKind::Succeeded)
    }

    pub fn failed(unit_id: UnitId, throwable: Throwable) -> Self {
        Self::new(unit_id, EventKind::Failed).with_throwable(throwable)
    }

    pub fn aborted(unit_id: UnitId, throwable: Throwable) -> Self {
        Self::new(unit_id, EventKind::Aborted).with_throwable(throwable)
    }

    pub fn skipped(unit_id: UnitId, reason: Option<String>) -> Self {
        let mut event = Self::new(unit_id, EventKind::Skipped);
        event.reason = reason;
        event
    }

    pub fn with_throwable(mut self, throwable: Throwable) -> Self {
        self.throwable = Some(throwable);
        self
    }

    pub fn with_report_entries(mut self, entries: Vec<ReportEntry>) -> Self {
        self.report_entries = entries;
        self
    }

    pub fn with_report_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.report_entries.push(ReportEntry::new(key, value));
        self
    }
}

impl fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.unit_id)?;
        if let Some(throwable) = &self.throwable {
            write!(f, " ({throwable})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::TypeName;

    #[test]
    fn test_unit_id_display() {
        let container = UnitId::container("DummyClass");
        assert_eq!(container.to_string(), "[class:DummyClass]");
        assert_eq!(container.scope(), UnitScope::Container);

        let method = UnitId::method("DummyClass", MethodSignature::new("nothing", Vec::new()));
        assert_eq!(method.to_string(), "[class:DummyClass]/[method:nothing()]");
        assert_eq!(method.scope(), UnitScope::Test);

        let invocation = UnitId::invocation(
            "DummyPropertyClass",
            MethodSignature::new("single", vec![TypeName::of::<String>()]),
            1,
        );
        assert_eq!(
            invocation.to_string(),
            "[class:DummyPropertyClass]/[test-template:single(String)]/[test-template-invocation:#1]"
        );
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(EventKind::Failed.is_terminal());
        assert!(EventKind::Aborted.is_terminal());
        assert!(!EventKind::Started.is_terminal());
        assert!(!EventKind::Skipped.is_terminal());
    }

    #[test]
    fn test_event_serializes_kind_lowercase() {
        let event = ExecutionEvent::started(UnitId::container("A"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "started");
    }
}
