//! Emission records.
//!
//! A [`Record`] accumulates the modes and styles referenced by one segment of
//! a chain. Attaching an emitter names the record, which marks it complete:
//! from then on its membership never changes and the [`Stack`](crate::Stack)
//! forks a new record for the next access.
//!
//! ```text
//! verbose . red . error ( "msg" )
//!    │       │      │
//!    │       │      └─ attach_emitter → Named { name: "error" }
//!    │       └─ add_style
//!    └─ add_mode
//! ```

use std::rc::Rc;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use crate::descriptor::{Emitter, Mode, Style};

/// Lifecycle of a record. There is no way back from `Named`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// No emitter attached yet.
    Open,
    /// An emitter is attached; the record is ready to drain.
    Named,
}

/// One potential emission.
#[derive(Debug, Clone, Default)]
pub struct Record {
    modes: Vec<Rc<Mode>>,
    styles: Vec<Rc<Style>>,
    emitter: Option<Rc<Emitter>>,
    args: Vec<Value>,
}

impl Record {
    /// Creates an empty, open record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an open record inheriting the parent's modes and styles.
    ///
    /// The containers are copied; only the descriptors are shared.
    pub fn with_parent(parent: &Record) -> Self {
        Self {
            modes: parent.modes.clone(),
            styles: parent.styles.clone(),
            emitter: None,
            args: Vec::new(),
        }
    }

    pub fn state(&self) -> RecordState {
        if self.emitter.is_some() {
            RecordState::Named
        } else {
            RecordState::Open
        }
    }

    pub fn is_named(&self) -> bool {
        self.state() == RecordState::Named
    }

    /// Adds a mode unless one with the same name is already present.
    pub fn add_mode(&mut self, mode: Rc<Mode>) -> &mut Self {
        if !self.modes.iter().any(|m| m.name() == mode.name()) {
            self.modes.push(mode);
        }
        self
    }

    /// Adds a style unless one with the same name is already present.
    pub fn add_style(&mut self, style: Rc<Style>) -> &mut Self {
        if !self.styles.iter().any(|s| s.name() == style.name()) {
            self.styles.push(style);
        }
        self
    }

    /// Removes a style by name. Returns whether anything was removed.
    pub fn remove_style(&mut self, name: &str) -> bool {
        let before = self.styles.len();
        self.styles.retain(|s| s.name() != name);
        self.styles.len() != before
    }

    /// Names the record after the emitter. Styles are left untouched.
    ///
    /// A record is named once: returns false and keeps the existing emitter
    /// if one is already attached.
    pub fn attach_emitter(&mut self, emitter: Rc<Emitter>) -> bool {
        if let Some(current) = &self.emitter {
            tracing::debug!(
                name = current.name(),
                rejected = emitter.name(),
                "record already named"
            );
            return false;
        }
        self.emitter = Some(emitter);
        true
    }

    pub fn name(&self) -> Option<&str> {
        self.emitter.as_deref().map(Emitter::name)
    }

    pub fn emitter(&self) -> Option<&Rc<Emitter>> {
        self.emitter.as_ref()
    }

    pub fn priority(&self) -> Option<i32> {
        self.emitter.as_deref().map(Emitter::priority)
    }

    pub fn modes(&self) -> &[Rc<Mode>] {
        &self.modes
    }

    pub fn mode_names(&self) -> Vec<&str> {
        self.modes.iter().map(|m| m.name()).collect()
    }

    pub fn has_mode(&self, name: &str) -> bool {
        self.modes.iter().any(|m| m.name() == name)
    }

    pub fn styles(&self) -> &[Rc<Style>] {
        &self.styles
    }

    pub fn style_names(&self) -> Vec<&str> {
        self.styles.iter().map(|s| s.name()).collect()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub(crate) fn set_args(&mut self, args: Vec<Value>) {
        self.args = args;
    }

    /// Runs the args through every transform on the record.
    ///
    /// Order: modes, then styles, then the emitter. The result is a
    /// `Value::Array` unless a transform changed the shape.
    pub fn render(&self) -> Value {
        let value = Value::Array(self.args.clone());
        let value = self.modes.iter().fold(value, |acc, mode| mode.apply(acc));
        let value = self.styles.iter().fold(value, |acc, style| style.apply(acc));
        match &self.emitter {
            Some(emitter) => emitter.apply(value),
            None => value,
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Record", 5)?;
        state.serialize_field("name", &self.name())?;
        state.serialize_field("priority", &self.priority())?;
        state.serialize_field("modes", &self.mode_names())?;
        state.serialize_field("styles", &self.style_names())?;
        state.serialize_field("args", &self.args)?;
        state.end()
    }
}
