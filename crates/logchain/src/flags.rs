//! Mode gating.
//!
//! Modes only describe a record; whether a record should reach the user is
//! up to listeners. [`ModeFlags`] is the usual answer: the set of modes the
//! application has switched on (typically from command-line flags).
//!
//! Evaluation walks the record's modes in order. A toggle flips the next
//! plain mode, so `not.verbose` passes only while `verbose` is off. A record
//! with no modes always passes.

use std::collections::BTreeSet;

use crate::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeFlags {
    enabled: BTreeSet<String>,
}

impl ModeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`enable`](ModeFlags::enable).
    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.enable(name);
        self
    }

    pub fn enable(&mut self, name: impl Into<String>) {
        self.enabled.insert(name.into());
    }

    pub fn disable(&mut self, name: &str) {
        self.enabled.remove(name);
    }

    /// Sets a mode on or off.
    pub fn set(&mut self, name: impl Into<String>, on: bool) {
        let name = name.into();
        if on {
            self.enabled.insert(name);
        } else {
            self.enabled.remove(&name);
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }

    /// Whether a record passes the gate.
    pub fn allows(&self, record: &Record) -> bool {
        let mut negate = false;
        for mode in record.modes() {
            if mode.is_toggle() {
                negate = !negate;
                continue;
            }
            if self.is_enabled(mode.name()) == negate {
                return false;
            }
            negate = false;
        }
        true
    }
}

impl<S: Into<String>> FromIterator<S> for ModeFlags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().map(Into::into).collect(),
        }
    }
}
