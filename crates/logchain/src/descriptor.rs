//! Named descriptors: modes, styles and emitters.
//!
//! Descriptors are the leaves of a chain. Each one carries a name and an
//! optional transform that listeners may apply to message arguments. They are
//! created once at registration time and shared with records through `Rc`.
//!
//! ```rust
//! use logchain::{Mode, ModeKind, ModeOptions};
//!
//! let not = Mode::new(ModeOptions::new().name("not").kind("toggle")).unwrap();
//! assert_eq!(not.kind(), ModeKind::Toggle);
//!
//! let err = Mode::new(ModeOptions::new().name("x").kind("bogus")).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "\"type\" must be one of [mode, toggle] but got \"bogus\""
//! );
//! ```

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{LogError, Result};

/// Function applied to message arguments.
///
/// Arguments travel as a single [`Value`], usually a `Value::Array` of the
/// message arguments.
pub type Transform = Rc<dyn Fn(Value) -> Value>;

/// Returns the identity transform.
pub fn identity() -> Transform {
    Rc::new(|value| value)
}

/// Default priority of an emitter. Higher numbers are less severe.
pub const DEFAULT_PRIORITY: i32 = 100;

fn require_name(name: Option<String>) -> Result<String> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(LogError::MissingName),
    }
}

// ============================================================================
// Mode
// ============================================================================

/// The closed set of mode kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeKind {
    /// A plain mode. Can be called directly to emit through `log`.
    #[default]
    Mode,
    /// Flips the next mode in the chain. Never emits on its own.
    Toggle,
}

impl ModeKind {
    /// All accepted spellings, in order.
    pub const ALLOWED: [&'static str; 2] = ["mode", "toggle"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Mode => "mode",
            ModeKind::Toggle => "toggle",
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeKind {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mode" => Ok(ModeKind::Mode),
            "toggle" => Ok(ModeKind::Toggle),
            other => Err(LogError::InvalidKind {
                allowed: Self::ALLOWED.join(", "),
                got: other.to_string(),
            }),
        }
    }
}

/// Options for building a [`Mode`].
#[derive(Clone, Default)]
pub struct ModeOptions {
    name: Option<String>,
    kind: Option<String>,
    transform: Option<Transform>,
}

impl ModeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the kind by name. Validated when the mode is built.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.transform = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for ModeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeOptions")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}

/// A named, chain-activatable flag.
#[derive(Clone)]
pub struct Mode {
    name: String,
    kind: ModeKind,
    transform: Option<Transform>,
}

impl Mode {
    /// Builds a mode, validating name and kind.
    pub fn new(options: ModeOptions) -> Result<Self> {
        let name = require_name(options.name)?;
        let kind = match options.kind {
            Some(kind) => kind.parse()?,
            None => ModeKind::Mode,
        };
        Ok(Self {
            name,
            kind,
            transform: options.transform,
        })
    }

    /// Builds a plain mode with no transform.
    pub fn named(name: impl Into<String>) -> Result<Self> {
        Self::new(ModeOptions::new().name(name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> ModeKind {
        self.kind
    }

    /// Reassigns the kind, re-running validation.
    pub fn set_kind(&mut self, kind: &str) -> Result<()> {
        self.kind = kind.parse()?;
        Ok(())
    }

    pub fn is_toggle(&self) -> bool {
        self.kind == ModeKind::Toggle
    }

    /// The transform, or identity when none was given.
    pub fn transform(&self) -> Transform {
        self.transform.clone().unwrap_or_else(identity)
    }

    pub fn set_transform<F>(&mut self, f: F)
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.transform = Some(Rc::new(f));
    }

    pub fn apply(&self, value: Value) -> Value {
        match &self.transform {
            Some(f) => f(value),
            None => value,
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mode")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Options for building an [`Emitter`].
#[derive(Clone, Default)]
pub struct EmitterOptions {
    name: Option<String>,
    priority: Option<i32>,
    transform: Option<Transform>,
}

impl EmitterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.transform = Some(Rc::new(f));
        self
    }

    /// Reuses an existing transform, e.g. a registered style's.
    pub fn transform_rc(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl fmt::Debug for EmitterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterOptions")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}

/// A named emission channel.
#[derive(Clone)]
pub struct Emitter {
    name: String,
    priority: i32,
    transform: Option<Transform>,
}

impl Emitter {
    pub fn new(options: EmitterOptions) -> Result<Self> {
        Ok(Self {
            name: require_name(options.name)?,
            priority: options.priority.unwrap_or(DEFAULT_PRIORITY),
            transform: options.transform,
        })
    }

    pub fn named(name: impl Into<String>) -> Result<Self> {
        Self::new(EmitterOptions::new().name(name))
    }

    /// Built-in emitters whose names are known to be valid.
    pub(crate) fn builtin(name: &'static str) -> Self {
        Self {
            name: name.to_string(),
            priority: DEFAULT_PRIORITY,
            transform: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn transform(&self) -> Transform {
        self.transform.clone().unwrap_or_else(identity)
    }

    pub fn set_transform<F>(&mut self, f: F)
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.transform = Some(Rc::new(f));
    }

    pub fn apply(&self, value: Value) -> Value {
        match &self.transform {
            Some(f) => f(value),
            None => value,
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

impl fmt::Display for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Style
// ============================================================================

/// A named transform consumed by listeners when rendering a record.
#[derive(Clone)]
pub struct Style {
    name: String,
    transform: Transform,
}

impl Style {
    pub fn new<F>(name: impl Into<String>, f: F) -> Result<Self>
    where
        F: Fn(Value) -> Value + 'static,
    {
        Self::from_transform(name, Rc::new(f))
    }

    pub fn from_transform(name: impl Into<String>, transform: Transform) -> Result<Self> {
        Ok(Self {
            name: require_name(Some(name.into()))?,
            transform,
        })
    }

    /// A style that leaves values untouched. Mostly useful in tests.
    pub fn plain(name: impl Into<String>) -> Result<Self> {
        Self::from_transform(name, identity())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> Transform {
        self.transform.clone()
    }

    pub fn apply(&self, value: Value) -> Value {
        (self.transform)(value)
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Style").field("name", &self.name).finish()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_requires_name() {
        assert!(matches!(
            Mode::new(ModeOptions::new()),
            Err(LogError::MissingName)
        ));
        assert!(matches!(Mode::named(""), Err(LogError::MissingName)));
    }

    #[test]
    fn test_mode_defaults_to_plain_kind() {
        let verbose = Mode::named("verbose").unwrap();
        assert_eq!(verbose.name(), "verbose");
        assert_eq!(verbose.kind(), ModeKind::Mode);
        assert!(!verbose.is_toggle());
    }

    #[test]
    fn test_mode_toggle_kind() {
        let not = Mode::new(ModeOptions::new().name("not").kind("toggle")).unwrap();
        assert!(not.is_toggle());
        assert_eq!(not.to_string(), "not");
    }

    #[test]
    fn test_mode_invalid_kind() {
        let err = Mode::new(ModeOptions::new().name("verbose").kind("bogus")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"type\" must be one of [mode, toggle] but got \"bogus\""
        );
    }

    #[test]
    fn test_mode_set_kind_revalidates() {
        let mut mode = Mode::named("verbose").unwrap();
        mode.set_kind("toggle").unwrap();
        assert!(mode.is_toggle());

        let err = mode.set_kind("logger").unwrap_err();
        assert!(matches!(err, LogError::InvalidKind { ref got, .. } if got == "logger"));
        // failed reassignment leaves the previous kind
        assert!(mode.is_toggle());
    }

    #[test]
    fn test_mode_transform_defaults_to_identity() {
        let mode = Mode::named("verbose").unwrap();
        assert_eq!(mode.apply(json!("foo")), json!("foo"));
        assert_eq!((mode.transform())(json!(["a", 1])), json!(["a", 1]));
    }

    #[test]
    fn test_mode_transform() {
        let mut debug = Mode::new(
            ModeOptions::new()
                .name("debug")
                .transform(|v| json!(format!("[DEBUG]: {}", v.as_str().unwrap_or_default()))),
        )
        .unwrap();
        assert_eq!(debug.apply(json!("foo")), json!("[DEBUG]: foo"));

        debug.set_name("trace");
        debug.set_transform(|_| json!("replaced"));
        assert_eq!(debug.name(), "trace");
        assert_eq!(debug.apply(json!("foo")), json!("replaced"));
    }

    #[test]
    fn test_emitter_default_priority() {
        let info = Emitter::named("info").unwrap();
        assert_eq!(info.priority(), DEFAULT_PRIORITY);

        let error = Emitter::new(EmitterOptions::new().name("error").priority(0)).unwrap();
        assert_eq!(error.priority(), 0);
    }

    #[test]
    fn test_emitter_requires_name() {
        assert!(matches!(
            Emitter::new(EmitterOptions::new().priority(3)),
            Err(LogError::MissingName)
        ));
    }

    #[test]
    fn test_emitter_transform() {
        let mut write = Emitter::new(
            EmitterOptions::new()
                .name("write")
                .transform(|v| json!(format!("[LOG]: {}", v.as_str().unwrap_or_default()))),
        )
        .unwrap();
        assert_eq!(write.apply(json!("foo")), json!("[LOG]: foo"));

        write.set_priority(7);
        write.set_name("out");
        assert_eq!(write.priority(), 7);
        assert_eq!(write.to_string(), "out");
    }

    #[test]
    fn test_style_requires_name() {
        assert!(matches!(Style::plain(""), Err(LogError::MissingName)));
    }

    #[test]
    fn test_style_apply() {
        let upper = Style::new("upper", |v| {
            json!(v.as_str().map(str::to_uppercase).unwrap_or_default())
        })
        .unwrap();
        assert_eq!(upper.apply(json!("foo")), json!("FOO"));
    }
}
