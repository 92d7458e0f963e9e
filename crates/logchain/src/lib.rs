//! Logchain - chainable, mode and style aware event logger.
//!
//! A chain such as `verbose.red.error("disk full")` is resolved one access at
//! a time. Each access records a mode, style or emitter on the logger's
//! [`Stack`]; the final call publishes one event per finished record, carrying
//! the modes and styles active for it and the message arguments.
//!
//! Logchain does not print anything. Listeners decide what an event means:
//! gate it with [`ModeFlags`], render it through the record's transforms, send
//! it somewhere. See the `logchain-console` crate for a terminal writer.
//!
//! # Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use logchain::{Logger, ModeOptions};
//!
//! let logger = Logger::new();
//! logger.add_mode("verbose").unwrap();
//! logger.add_mode_with("not", ModeOptions::new().kind("toggle")).unwrap();
//! logger.add_emitter("info").unwrap();
//!
//! let lines = Rc::new(RefCell::new(Vec::new()));
//! let sink = lines.clone();
//! logger.on("info", move |record| {
//!     sink.borrow_mut().push(format!("{:?} {}", record.mode_names(), record.args()[0]));
//! });
//!
//! logger
//!     .get("info").unwrap().call(["plain"]).unwrap()
//!     .chain("not.verbose.info").unwrap().call(["quiet"]).unwrap();
//!
//! assert_eq!(
//!     *lines.borrow(),
//!     vec![
//!         "[] \"plain\"".to_string(),
//!         "[\"not\", \"verbose\"] \"quiet\"".to_string(),
//!     ]
//! );
//! ```
//!
//! # Chain Semantics
//!
//! | Access | Effect on the stack |
//! |--------|---------------------|
//! | mode | added to the current record (new record if current is finished) |
//! | style | queued on the current record (new record if current is finished) |
//! | emitter | names the current record; a finished record is continued by a new one inheriting its modes and styles |
//!
//! Calling an emitter (or a plain mode, which emits through `log`) drains the
//! stack. For every record, wildcard listeners fire first, then the record's
//! named listeners, each in registration order.

mod chain;
mod config;
mod descriptor;
mod error;
mod flags;
mod listeners;
mod logger;
mod record;
mod stack;

pub use chain::{Link, Method, Styled, Toggle};
pub use config::{EmitterConfig, LoggerConfig, ModeConfig};
pub use descriptor::{
    identity, Emitter, EmitterOptions, Mode, ModeKind, ModeOptions, Style, Transform,
    DEFAULT_PRIORITY,
};
pub use error::{LogError, Result};
pub use flags::ModeFlags;
pub use listeners::{
    Listeners, RecordFn, RegisterFn, Registration, RegistrationKind, WildcardFn,
};
pub use logger::{Logger, MethodFn, DEFAULT_EMITTER};
pub use record::{Record, RecordState};
pub use stack::Stack;
