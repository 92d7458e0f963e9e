//! Listener table for emitted records and registrations.
//!
//! Three kinds of listeners exist:
//!
//! - Named: `on("warn", |record| ..)` fires for records named `warn`.
//! - Wildcard: `on_any(|name, record| ..)` fires for every record, before the
//!   named listeners of that record.
//! - Registration: `on_register(|reg| ..)` fires whenever a mode, style or
//!   emitter is registered.
//!
//! Listeners run synchronously in registration order. Callers take a
//! snapshot (a cloned list of `Rc`s) before invoking them so that a listener
//! may register further listeners without a double borrow.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::record::Record;

/// Listener for records with a specific name.
pub type RecordFn = Rc<dyn Fn(&Record)>;

/// Listener for every record. Receives the record name first.
pub type WildcardFn = Rc<dyn Fn(&str, &Record)>;

/// Listener for registrations.
pub type RegisterFn = Rc<dyn Fn(&Registration)>;

/// What kind of accessor was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    Mode,
    Style,
    Emitter,
}

impl RegistrationKind {
    /// The event name the registration is published under.
    pub fn event_name(&self) -> &'static str {
        match self {
            RegistrationKind::Mode => "mode",
            RegistrationKind::Style => "style",
            RegistrationKind::Emitter => "emitter",
        }
    }
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Payload of a registration event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub kind: RegistrationKind,
    pub name: String,
}

#[derive(Clone, Default)]
pub struct Listeners {
    named: HashMap<String, Vec<RecordFn>>,
    wildcard: Vec<WildcardFn>,
    registration: Vec<RegisterFn>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.named.values().all(Vec::is_empty)
            && self.wildcard.is_empty()
            && self.registration.is_empty()
    }

    pub fn on(&mut self, name: impl Into<String>, f: RecordFn) {
        self.named.entry(name.into()).or_default().push(f);
    }

    pub fn on_any(&mut self, f: WildcardFn) {
        self.wildcard.push(f);
    }

    pub fn on_register(&mut self, f: RegisterFn) {
        self.registration.push(f);
    }

    /// Removes every listener for `name`. `"*"` clears wildcard listeners.
    pub fn off(&mut self, name: &str) -> usize {
        if name == "*" {
            return std::mem::take(&mut self.wildcard).len();
        }
        self.named.remove(name).map_or(0, |list| list.len())
    }

    /// Number of listeners for `name`. `"*"` counts wildcard listeners.
    pub fn count(&self, name: &str) -> usize {
        if name == "*" {
            return self.wildcard.len();
        }
        self.named.get(name).map_or(0, Vec::len)
    }

    pub fn named_snapshot(&self, name: &str) -> Vec<RecordFn> {
        self.named.get(name).cloned().unwrap_or_default()
    }

    pub fn wildcard_snapshot(&self) -> Vec<WildcardFn> {
        self.wildcard.clone()
    }

    pub fn registration_snapshot(&self) -> Vec<RegisterFn> {
        self.registration.clone()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let named: usize = self.named.values().map(Vec::len).sum();
        f.debug_struct("Listeners")
            .field("named_count", &named)
            .field("wildcard_count", &self.wildcard.len())
            .field("registration_count", &self.registration.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_listeners_empty() {
        let listeners = Listeners::new();
        assert!(listeners.is_empty());
        assert_eq!(listeners.count("warn"), 0);
        assert_eq!(listeners.count("*"), 0);
    }

    #[test]
    fn test_named_snapshot_keeps_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for i in 0..3 {
            let calls = calls.clone();
            listeners.on("warn", Rc::new(move |_: &Record| calls.borrow_mut().push(i)));
        }

        let record = Record::new();
        for f in listeners.named_snapshot("warn") {
            f(&record);
        }
        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
        assert!(listeners.named_snapshot("error").is_empty());
    }

    #[test]
    fn test_off_removes_named_and_wildcard() {
        let mut listeners = Listeners::new();
        listeners.on("warn", Rc::new(|_: &Record| {}));
        listeners.on("warn", Rc::new(|_: &Record| {}));
        listeners.on_any(Rc::new(|_: &str, _: &Record| {}));

        assert_eq!(listeners.off("warn"), 2);
        assert_eq!(listeners.off("warn"), 0);
        assert_eq!(listeners.off("*"), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_registration_kind_event_names() {
        assert_eq!(RegistrationKind::Mode.event_name(), "mode");
        assert_eq!(RegistrationKind::Style.to_string(), "style");
        assert_eq!(RegistrationKind::Emitter.event_name(), "emitter");
    }

    #[test]
    fn test_debug_shows_counts() {
        let mut listeners = Listeners::new();
        listeners.on_register(Rc::new(|_: &Registration| {}));
        let debug = format!("{:?}", listeners);
        assert!(debug.contains("registration_count: 1"));
    }
}
