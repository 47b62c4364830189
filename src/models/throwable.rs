//! Captured throwables
//!
//! A `Throwable` is a plain-data record of an error raised by a test unit:
//! its type, its message and the chain of causes behind it.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::error::Error;
use std::fmt;

/// Type name recorded for caught panics
pub const PANIC_TYPE: &str = "panic";

/// Type name recorded for aborted units
pub const ABORTED_TYPE: &str = "TestAborted";

/// Type name recorded when an engine reports a failure without a throwable
pub const UNKNOWN_TYPE: &str = "unknown";

/// An error captured while a test unit ran
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throwable {
    pub type_name: String,
    pub message: Option<String>,
    pub cause: Option<Box<Throwable>>,
}

impl Throwable {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Throwable without a message
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: None,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: Throwable) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Capture an error and its `source()` chain
    ///
    /// The outer type is known statically and recorded with its full path;
    /// sources are only reachable as trait objects and are recorded as
    /// `dyn Error`.
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(err) = source {
            causes.push(Throwable::new("dyn Error", err.to_string()));
            source = err.source();
        }

        let chain = causes.into_iter().rev().fold(None, |inner, mut cause| {
            cause.cause = inner.map(Box::new);
            Some(cause)
        });

        let mut outer = Throwable::new(std::any::type_name::<E>(), error.to_string());
        outer.cause = chain.map(Box::new);
        outer
    }

    /// Capture a panic payload returned by `catch_unwind`
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            Some((*s).to_string())
        } else {
            payload.downcast_ref::<String>().cloned()
        };
        Self {
            type_name: PANIC_TYPE.to_string(),
            message,
            cause: None,
        }
    }

    pub(crate) fn unknown() -> Self {
        Throwable::new(UNKNOWN_TYPE, "no throwable was reported")
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// This throwable followed by each of its causes
    pub fn chain(&self) -> impl Iterator<Item = &Throwable> {
        std::iter::successors(Some(self), |t| t.cause.as_deref())
    }

    /// Whether the type matches
    ///
    /// A qualified name (a path or generic arguments) must match in full. A
    /// bare name matches the last path segment of the recorded type.
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        if self.type_name == type_name {
            return true;
        }
        !is_qualified(type_name) && simple(&self.type_name) == type_name
    }
}

fn is_qualified(type_name: &str) -> bool {
    type_name.contains("::") || type_name.contains('<')
}

fn simple(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {msg}", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}
