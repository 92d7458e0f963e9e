//! Typed chain links.
//!
//! Every access through [`Logger::get`] records something on the logger's
//! stack and returns a [`Link`] describing what was accessed:
//!
//! - [`Method`]: an emitter or a plain mode. Calling it with message arguments
//!   drains the stack and publishes events.
//! - [`Styled`]: a style. It can be applied to a value directly, which
//!   consumes the style instead of queueing it.
//! - [`Toggle`]: a toggle mode. It only continues the chain; there is no way
//!   to pass it message arguments.
//!
//! All three continue the chain with `get`.

use std::rc::Rc;

use serde_json::Value;

use crate::descriptor::Style;
use crate::error::{LogError, Result};
use crate::logger::{Logger, DEFAULT_EMITTER};

/// The result of one chain access.
#[derive(Debug)]
pub enum Link<'a> {
    Method(Method<'a>),
    Style(Styled<'a>),
    Toggle(Toggle<'a>),
}

impl<'a> Link<'a> {
    pub fn name(&self) -> &str {
        match self {
            Link::Method(m) => m.name(),
            Link::Style(s) => s.name(),
            Link::Toggle(t) => t.name(),
        }
    }

    pub fn logger(&self) -> &'a Logger {
        match self {
            Link::Method(m) => m.logger,
            Link::Style(s) => s.logger,
            Link::Toggle(t) => t.logger,
        }
    }

    /// Continues the chain with the next name.
    pub fn get(self, name: &str) -> Result<Link<'a>> {
        self.logger().get(name)
    }

    /// Whether message arguments can be passed to this link.
    pub fn is_callable(&self) -> bool {
        matches!(self, Link::Method(_))
    }

    /// Calls the link with message arguments.
    ///
    /// Fails with [`LogError::NotCallable`] for styles and toggles.
    pub fn call<I, V>(self, args: I) -> Result<&'a Logger>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        match self {
            Link::Method(m) => m.call(args),
            Link::Style(s) => Err(LogError::NotCallable {
                name: s.name().to_string(),
                kind: "style",
            }),
            Link::Toggle(t) => Err(LogError::NotCallable {
                name: t.name,
                kind: "toggle",
            }),
        }
    }

    pub fn into_method(self) -> Option<Method<'a>> {
        match self {
            Link::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_style(self) -> Option<Styled<'a>> {
        match self {
            Link::Style(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Method
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MethodKind {
    Emitter,
    Mode,
}

/// A callable link: an emitter, or a plain mode emitting through `log`.
#[derive(Debug)]
pub struct Method<'a> {
    logger: &'a Logger,
    name: String,
    kind: MethodKind,
}

impl<'a> Method<'a> {
    pub(crate) fn new(logger: &'a Logger, name: &str, kind: MethodKind) -> Self {
        Self {
            logger,
            name: name.to_string(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when this method came from a mode rather than an emitter.
    pub fn is_mode(&self) -> bool {
        self.kind == MethodKind::Mode
    }

    pub fn get(self, name: &str) -> Result<Link<'a>> {
        self.logger.get(name)
    }

    /// Emits with the given message arguments and returns the logger so the
    /// chain can continue.
    ///
    /// Modes emit through the default `log` emitter, which is attached to the
    /// chain the same way an explicit `.log` access would be.
    pub fn call<I, V>(self, args: I) -> Result<&'a Logger>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        match self.kind {
            MethodKind::Emitter => self.logger.invoke(&self.name, args)?,
            MethodKind::Mode => {
                self.logger.attach_chained(DEFAULT_EMITTER)?;
                self.logger.invoke(DEFAULT_EMITTER, args)?;
            }
        }
        Ok(self.logger)
    }
}

// ============================================================================
// Styled
// ============================================================================

/// A style link.
#[derive(Debug)]
pub struct Styled<'a> {
    logger: &'a Logger,
    style: Rc<Style>,
}

impl<'a> Styled<'a> {
    pub(crate) fn new(logger: &'a Logger, style: Rc<Style>) -> Self {
        Self { logger, style }
    }

    pub fn name(&self) -> &str {
        self.style.name()
    }

    pub fn get(self, name: &str) -> Result<Link<'a>> {
        self.logger.get(name)
    }

    /// Applies the style to a value directly.
    ///
    /// The style is taken back off the pending record, so it does not also
    /// apply to the next emission.
    pub fn apply(self, value: impl Into<Value>) -> Value {
        self.logger.unqueue_style(self.style.name());
        self.style.apply(value.into())
    }
}

// ============================================================================
// Toggle
// ============================================================================

/// A toggle link. Only continues the chain.
#[derive(Debug)]
pub struct Toggle<'a> {
    logger: &'a Logger,
    name: String,
}

impl<'a> Toggle<'a> {
    pub(crate) fn new(logger: &'a Logger, name: &str) -> Self {
        Self {
            logger,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(self, name: &str) -> Result<Link<'a>> {
        self.logger.get(name)
    }
}
