//! The logger: registries, chain resolution and emission.
//!
//! A [`Logger`] owns three things:
//!
//! - registries of modes, styles and emitters, populated by `add_*`
//! - the [`Stack`] recording the chain currently being built
//! - the listener table
//!
//! All of it sits behind `RefCell`s and every method takes `&self`, because
//! listeners are allowed to log through the same logger while an emission is
//! being published. Borrows are never held across a listener call.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use logchain::Logger;
//!
//! let logger = Logger::new();
//! logger.add_mode("verbose").unwrap();
//! logger.add_style("red", |v| v).unwrap();
//! logger.add_emitter("error").unwrap();
//! logger.add_emitter("warn").unwrap();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! logger.on_any(move |name, record| {
//!     sink.borrow_mut().push((name.to_string(), record.mode_names().join(",")));
//! });
//!
//! logger.chain("verbose.red.error.warn").unwrap().call(["foo"]).unwrap();
//!
//! assert_eq!(
//!     *seen.borrow(),
//!     vec![
//!         ("error".to_string(), "verbose".to_string()),
//!         ("warn".to_string(), "verbose".to_string()),
//!     ]
//! );
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::chain::{Link, Method, MethodKind, Styled, Toggle};
use crate::descriptor::{Emitter, EmitterOptions, Mode, ModeOptions, Style};
use crate::error::{LogError, Result};
use crate::listeners::{Listeners, Registration, RegistrationKind};
use crate::record::Record;
use crate::stack::Stack;

/// Name of the emitter every [`Logger::new`] starts with, and the one plain
/// modes emit through when called directly.
pub const DEFAULT_EMITTER: &str = "log";

/// Replacement behaviour for calling an emitter method.
pub type MethodFn = Rc<dyn Fn(&Logger, Vec<Value>) -> Result<()>>;

#[derive(Debug, Clone)]
enum Accessor {
    Mode(Rc<Mode>),
    Style(Rc<Style>),
    Emitter(Rc<Emitter>),
}

#[derive(Debug, Default)]
struct Registry {
    modes: IndexMap<String, Rc<Mode>>,
    styles: IndexMap<String, Rc<Style>>,
    emitters: IndexMap<String, Rc<Emitter>>,
    // Last registration for a name decides what accessing it does.
    accessors: HashMap<String, RegistrationKind>,
}

impl Registry {
    fn resolve(&self, name: &str) -> Result<Accessor> {
        let found = match self.accessors.get(name) {
            Some(RegistrationKind::Mode) => self.modes.get(name).cloned().map(Accessor::Mode),
            Some(RegistrationKind::Style) => self.styles.get(name).cloned().map(Accessor::Style),
            Some(RegistrationKind::Emitter) => {
                self.emitters.get(name).cloned().map(Accessor::Emitter)
            }
            None => None,
        };
        found.ok_or_else(|| LogError::UnknownName(name.to_string()))
    }
}

/// Chainable, mode and style aware event logger.
pub struct Logger {
    registry: RefCell<Registry>,
    stack: RefCell<Stack>,
    listeners: RefCell<Listeners>,
    methods: RefCell<HashMap<String, MethodFn>>,
}

impl Logger {
    /// Creates a logger with the default `log` emitter.
    pub fn new() -> Self {
        let logger = Self::empty();
        logger.insert_emitter(Rc::new(Emitter::builtin(DEFAULT_EMITTER)));
        logger
    }

    /// Creates a logger with nothing registered.
    pub fn empty() -> Self {
        Self {
            registry: RefCell::new(Registry::default()),
            stack: RefCell::new(Stack::new()),
            listeners: RefCell::new(Listeners::new()),
            methods: RefCell::new(HashMap::new()),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a plain mode.
    pub fn add_mode(&self, name: &str) -> Result<&Self> {
        self.add_mode_with(name, ModeOptions::new())
    }

    /// Registers a mode with options (kind, transform).
    ///
    /// The registered name always wins over a name set in `options`.
    pub fn add_mode_with(&self, name: &str, options: ModeOptions) -> Result<&Self> {
        let mode = Rc::new(Mode::new(options.name(name))?);
        {
            let mut registry = self.registry.borrow_mut();
            registry.modes.insert(name.to_string(), mode);
            registry
                .accessors
                .insert(name.to_string(), RegistrationKind::Mode);
        }
        self.announce(RegistrationKind::Mode, name);
        Ok(self)
    }

    /// Registers a style with its transform.
    pub fn add_style<F>(&self, name: &str, f: F) -> Result<&Self>
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.insert_style(Style::new(name, f)?);
        Ok(self)
    }

    /// Registers an already-built style.
    pub fn insert_style(&self, style: Style) -> &Self {
        let name = style.name().to_string();
        {
            let mut registry = self.registry.borrow_mut();
            registry.styles.insert(name.clone(), Rc::new(style));
            registry
                .accessors
                .insert(name.clone(), RegistrationKind::Style);
        }
        self.announce(RegistrationKind::Style, &name);
        self
    }

    /// Registers an emitter with the default priority.
    pub fn add_emitter(&self, name: &str) -> Result<&Self> {
        self.add_emitter_with(name, EmitterOptions::new())
    }

    /// Registers an emitter with options (priority, transform).
    pub fn add_emitter_with(&self, name: &str, options: EmitterOptions) -> Result<&Self> {
        let emitter = Emitter::new(options.name(name))?;
        self.insert_emitter(Rc::new(emitter));
        self.announce(RegistrationKind::Emitter, name);
        Ok(self)
    }

    fn insert_emitter(&self, emitter: Rc<Emitter>) {
        let name = emitter.name().to_string();
        self.methods.borrow_mut().remove(&name);
        let mut registry = self.registry.borrow_mut();
        registry.emitters.insert(name.clone(), emitter);
        registry.accessors.insert(name, RegistrationKind::Emitter);
    }

    fn announce(&self, kind: RegistrationKind, name: &str) {
        tracing::debug!(%kind, name, "registered");
        let registration = Registration {
            kind,
            name: name.to_string(),
        };
        let listeners = self.listeners.borrow().registration_snapshot();
        for f in listeners {
            f(&registration);
        }
    }

    /// Overrides what calling the emitter method `name` does.
    ///
    /// The override receives the message arguments instead of the default
    /// emission; it may still call [`emit`](Logger::emit) itself. The chain
    /// state recorded by the access is left in place.
    pub fn set_method<F>(&self, name: &str, f: F) -> Result<&Self>
    where
        F: Fn(&Logger, Vec<Value>) -> Result<()> + 'static,
    {
        if self.emitter(name).is_none() {
            return Err(LogError::UnknownEmitter(name.to_string()));
        }
        self.methods
            .borrow_mut()
            .insert(name.to_string(), Rc::new(f));
        Ok(self)
    }

    /// Restores the default behaviour of the emitter method `name`.
    pub fn reset_method(&self, name: &str) -> bool {
        self.methods.borrow_mut().remove(name).is_some()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn mode(&self, name: &str) -> Option<Rc<Mode>> {
        self.registry.borrow().modes.get(name).cloned()
    }

    pub fn style(&self, name: &str) -> Option<Rc<Style>> {
        self.registry.borrow().styles.get(name).cloned()
    }

    pub fn emitter(&self, name: &str) -> Option<Rc<Emitter>> {
        self.registry.borrow().emitters.get(name).cloned()
    }

    /// Mode names in registration order.
    pub fn mode_names(&self) -> Vec<String> {
        self.registry.borrow().modes.keys().cloned().collect()
    }

    pub fn style_names(&self) -> Vec<String> {
        self.registry.borrow().styles.keys().cloned().collect()
    }

    pub fn emitter_names(&self) -> Vec<String> {
        self.registry.borrow().emitters.keys().cloned().collect()
    }

    /// Applies a registered style to a value without touching the chain.
    pub fn apply_style(&self, name: &str, value: impl Into<Value>) -> Result<Value> {
        let style = self
            .style(name)
            .ok_or_else(|| LogError::UnknownName(name.to_string()))?;
        Ok(style.apply(value.into()))
    }

    /// A copy of the records currently on the stack, oldest first.
    pub fn pending(&self) -> Vec<Record> {
        self.stack.borrow().items().cloned().collect()
    }

    // ========================================================================
    // Chain access
    // ========================================================================

    /// Accesses `name`, recording it on the chain.
    ///
    /// - emitter: attached to the chain, inheriting from a finished record
    /// - mode: added to the current record; toggles yield [`Link::Toggle`]
    /// - style: queued on the current record
    pub fn get(&self, name: &str) -> Result<Link<'_>> {
        let accessor = self.registry.borrow().resolve(name)?;
        let link = match accessor {
            Accessor::Emitter(emitter) => {
                self.stack.borrow_mut().chain_emitter(emitter);
                Link::Method(Method::new(self, name, MethodKind::Emitter))
            }
            Accessor::Mode(mode) => {
                let toggle = mode.is_toggle();
                self.stack.borrow_mut().add_mode(mode);
                if toggle {
                    Link::Toggle(Toggle::new(self, name))
                } else {
                    Link::Method(Method::new(self, name, MethodKind::Mode))
                }
            }
            Accessor::Style(style) => {
                self.stack.borrow_mut().add_style(style.clone());
                Link::Style(Styled::new(self, style))
            }
        };
        Ok(link)
    }

    /// Resolves a dotted path such as `"verbose.red.error"` left to right.
    pub fn chain(&self, path: &str) -> Result<Link<'_>> {
        let mut names = path.split('.');
        let first = names.next().unwrap_or_default();
        names.try_fold(self.get(first)?, |link, name| link.get(name))
    }

    pub(crate) fn attach_chained(&self, name: &str) -> Result<()> {
        let emitter = self
            .emitter(name)
            .ok_or_else(|| LogError::UnknownEmitter(name.to_string()))?;
        self.stack.borrow_mut().set_name(emitter);
        Ok(())
    }

    pub(crate) fn unqueue_style(&self, name: &str) {
        self.stack.borrow_mut().remove_style(name);
    }

    pub(crate) fn invoke(&self, name: &str, args: Vec<Value>) -> Result<()> {
        let method = self.methods.borrow().get(name).cloned();
        match method {
            Some(f) => f(self, args),
            None => self.dispatch(name, args),
        }
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Emits `args` through the emitter `name`.
    ///
    /// If the chain is not already sitting on a record named `name`, the
    /// emitter is attached first, exactly as accessing it would. Then every
    /// finished record on the stack is published.
    pub fn emit<I, V>(&self, name: &str, args: I) -> Result<&Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let emitter = self
            .emitter(name)
            .ok_or_else(|| LogError::UnknownEmitter(name.to_string()))?;
        {
            let mut stack = self.stack.borrow_mut();
            if stack.current().name() != Some(name) {
                stack.chain_emitter(emitter);
            }
        }
        self.dispatch(name, args.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    fn dispatch(&self, name: &str, args: Vec<Value>) -> Result<()> {
        if self.emitter(name).is_none() {
            return Err(LogError::UnknownEmitter(name.to_string()));
        }
        let records = self.stack.borrow_mut().drain();
        tracing::debug!(emitter = name, records = records.len(), "draining chain");
        for mut record in records {
            let Some(record_name) = record.name().map(str::to_string) else {
                tracing::trace!(modes = ?record.mode_names(), "discarding unnamed record");
                continue;
            };
            record.set_args(args.clone());
            self.publish(&record_name, &record);
        }
        Ok(())
    }

    fn publish(&self, name: &str, record: &Record) {
        let wildcard = self.listeners.borrow().wildcard_snapshot();
        for f in wildcard {
            f(name, record);
        }
        let named = self.listeners.borrow().named_snapshot(name);
        for f in named {
            f(record);
        }
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    /// Listens for records named `name`.
    pub fn on<F>(&self, name: &str, f: F) -> &Self
    where
        F: Fn(&Record) + 'static,
    {
        self.listeners.borrow_mut().on(name, Rc::new(f));
        self
    }

    /// Listens for every record. Runs before the record's named listeners.
    pub fn on_any<F>(&self, f: F) -> &Self
    where
        F: Fn(&str, &Record) + 'static,
    {
        self.listeners.borrow_mut().on_any(Rc::new(f));
        self
    }

    /// Listens for mode, style and emitter registrations.
    pub fn on_register<F>(&self, f: F) -> &Self
    where
        F: Fn(&Registration) + 'static,
    {
        self.listeners.borrow_mut().on_register(Rc::new(f));
        self
    }

    /// Removes the listeners for `name` (`"*"` for wildcard listeners).
    pub fn off(&self, name: &str) -> usize {
        self.listeners.borrow_mut().off(name)
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.borrow().count(name)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("Logger")
            .field("modes", &registry.modes.keys().collect::<Vec<_>>())
            .field("styles", &registry.styles.keys().collect::<Vec<_>>())
            .field("emitters", &registry.emitters.keys().collect::<Vec<_>>())
            .field("pending", &self.stack.borrow().len())
            .field("listeners", &*self.listeners.borrow())
            .finish()
    }
}
