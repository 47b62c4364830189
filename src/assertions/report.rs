//! Claims about published report entries

use super::AssertionFailure;
use crate::models::{ReportEntry, UnitId};

/// Claims about the only report entry of a run
#[derive(Clone, Copy, Debug)]
pub struct ReportEntryAssert<'a> {
    unit_id: &'a UnitId,
    entry: &'a ReportEntry,
}

impl<'a> ReportEntryAssert<'a> {
    pub(crate) fn new(unit_id: &'a UnitId, entry: &'a ReportEntry) -> Self {
        Self { unit_id, entry }
    }

    pub fn entry(&self) -> &'a ReportEntry {
        self.entry
    }

    #[track_caller]
    pub fn with_key_and_value(self, key: &str, value: &str) -> Self {
        if self.entry.key != key || self.entry.value != value {
            AssertionFailure::new("report entry", format!("{key}={value}"), self.entry)
                .with_detail(format!("published by {}", self.unit_id))
                .raise();
        }
        self
    }

    /// Entry published under the default `value` key
    #[track_caller]
    pub fn with_value(self, value: &str) -> Self {
        self.with_key_and_value("value", value)
    }
}

/// Claims about all report entries of a run, in publication order
#[derive(Clone, Debug)]
pub struct ReportEntriesAssert<'a> {
    entries: Vec<&'a ReportEntry>,
}

impl<'a> ReportEntriesAssert<'a> {
    pub(crate) fn new(entries: Vec<&'a ReportEntry>) -> Self {
        Self { entries }
    }

    fn render<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
        items
            .into_iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[track_caller]
    pub fn with_values(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.entries.iter().map(|e| e.value.as_str()).collect();
        if actual != expected {
            AssertionFailure::new(
                "report entry values",
                Self::render(expected),
                Self::render(&actual),
            )
            .raise();
        }
        self
    }

    #[track_caller]
    pub fn with_key_value_pairs(self, expected: &[(&str, &str)]) -> Self {
        let matches = self.entries.len() == expected.len()
            && self
                .entries
                .iter()
                .zip(expected)
                .all(|(entry, (key, value))| entry.key == *key && entry.value == *value);
        if !matches {
            AssertionFailure::new(
                "report entries",
                Self::render(expected.iter().map(|(k, v)| format!("{k}={v}"))),
                Self::render(&self.entries),
            )
            .raise();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::MethodSignature;

    #[test]
    fn test_entries_claims() {
        let first = ReportEntry::new("value", "a");
        let second = ReportEntry::new("user", "b");
        ReportEntriesAssert::new(vec![&first, &second])
            .with_values(&["a", "b"])
            .with_key_value_pairs(&[("value", "a"), ("user", "b")]);
    }

    #[test]
    #[should_panic(expected = "Expected report entry values to be <b, a> but was <a, b>")]
    fn test_values_are_ordered() {
        let first = ReportEntry::new("value", "a");
        let second = ReportEntry::new("value", "b");
        ReportEntriesAssert::new(vec![&first, &second]).with_values(&["b", "a"]);
    }

    #[test]
    #[should_panic(expected = "Expected report entry to be <k=v> but was <k=w>")]
    fn test_single_entry_mismatch() {
        let unit = UnitId::method("A", MethodSignature::new("a", Vec::new()));
        let entry = ReportEntry::new("k", "w");
        ReportEntryAssert::new(&unit, &entry).with_key_and_value("k", "v");
    }
}
