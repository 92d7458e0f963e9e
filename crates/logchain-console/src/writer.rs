//! Line writer for published records.
//!
//! [`ConsoleWriter`] is a wildcard listener. For every record it checks the
//! record's modes against its [`ModeFlags`] and an optional priority ceiling,
//! renders the record through its transforms and writes one line:
//!
//! ```text
//! [warn]: disk almost full 93
//! ```
//!
//! # Output Modes
//!
//! | Mode | Output |
//! |------|--------|
//! | `Term` | rendered line, ANSI codes kept |
//! | `Text` | rendered line, ANSI codes stripped |
//! | `Json` | the record serialized on one line, transforms not applied |
//! | `Auto` | `Term` when writing to a terminal, `Text` otherwise |

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use console::Term;
use logchain::{Logger, ModeFlags, Record};
use serde_json::Value;

/// In-memory output shared between a writer and its owner.
pub type SharedBuffer = Rc<RefCell<Vec<u8>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Auto-detect: TTY gets Term, anything else gets Text
    #[default]
    Auto,
    /// Keep ANSI styling
    Term,
    /// Strip ANSI styling
    Text,
    /// One JSON object per record
    Json,
}

impl OutputMode {
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Json)
    }

    /// Resolves Auto against stdout. Other modes are returned unchanged.
    pub fn resolve_auto(&self) -> OutputMode {
        self.resolve_for(Term::stdout().is_term())
    }

    fn resolve_for(&self, is_term: bool) -> OutputMode {
        match self {
            OutputMode::Auto if is_term => OutputMode::Term,
            OutputMode::Auto => OutputMode::Text,
            other => *other,
        }
    }
}

enum Target {
    Term(Term),
    Shared(SharedBuffer),
    Writer(RefCell<Box<dyn Write>>),
}

impl Target {
    fn is_term(&self) -> bool {
        match self {
            Target::Term(term) => term.is_term(),
            _ => false,
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            Target::Term(term) => term.write_line(line),
            Target::Shared(buffer) => writeln!(buffer.borrow_mut(), "{line}"),
            Target::Writer(writer) => {
                let mut writer = writer.borrow_mut();
                writeln!(writer, "{line}")?;
                writer.flush()
            }
        }
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Term(_) => f.write_str("Term"),
            Target::Shared(buffer) => write!(f, "Shared({} bytes)", buffer.borrow().len()),
            Target::Writer(_) => f.write_str("Writer"),
        }
    }
}

/// Writes published records as lines.
#[derive(Debug)]
pub struct ConsoleWriter {
    mode: OutputMode,
    flags: ModeFlags,
    max_priority: Option<i32>,
    target: Target,
}

impl ConsoleWriter {
    /// A writer to stdout.
    pub fn stdout(mode: OutputMode) -> Self {
        Self::with_target(mode, Target::Term(Term::stdout()))
    }

    /// A writer to stderr.
    pub fn stderr(mode: OutputMode) -> Self {
        Self::with_target(mode, Target::Term(Term::stderr()))
    }

    /// A writer to any `Write` implementation.
    pub fn to_writer<W: Write + 'static>(mode: OutputMode, writer: W) -> Self {
        Self::with_target(mode, Target::Writer(RefCell::new(Box::new(writer))))
    }

    /// A writer to a fresh in-memory buffer, returned alongside it.
    pub fn buffer(mode: OutputMode) -> (Self, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let writer = Self::with_target(mode, Target::Shared(buffer.clone()));
        (writer, buffer)
    }

    fn with_target(mode: OutputMode, target: Target) -> Self {
        Self {
            mode,
            flags: ModeFlags::new(),
            max_priority: None,
            target,
        }
    }

    pub fn flags(mut self, flags: ModeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Drops records less severe than `priority`.
    pub fn max_priority(mut self, priority: i32) -> Self {
        self.max_priority = Some(priority);
        self
    }

    /// The concrete mode used for output.
    pub fn mode(&self) -> OutputMode {
        self.mode.resolve_for(self.target.is_term())
    }

    pub fn allows(&self, record: &Record) -> bool {
        let severe_enough = match (self.max_priority, record.priority()) {
            (Some(max), Some(priority)) => priority <= max,
            _ => true,
        };
        severe_enough && self.flags.allows(record)
    }

    /// The line for `record`, or `None` if it is filtered out.
    pub fn format(&self, name: &str, record: &Record) -> Option<String> {
        if !self.allows(record) {
            return None;
        }
        let mode = self.mode();
        if mode.is_structured() {
            return match serde_json::to_string(record) {
                Ok(json) => Some(json),
                Err(err) => {
                    tracing::warn!(record = name, error = %err, "failed to serialize record");
                    None
                }
            };
        }
        let text = line(name, record);
        match mode {
            OutputMode::Text => Some(console::strip_ansi_codes(&text).into_owned()),
            _ => Some(text),
        }
    }

    pub fn write(&self, name: &str, record: &Record) -> io::Result<()> {
        match self.format(name, record) {
            Some(text) => self.target.write_line(&text),
            None => {
                tracing::trace!(record = name, modes = ?record.mode_names(), "record filtered");
                Ok(())
            }
        }
    }

    /// Subscribes the writer to every record published by `logger`.
    pub fn attach(self, logger: &Logger) {
        let writer = Rc::new(self);
        logger.on_any(move |name, record| {
            if let Err(err) = writer.write(name, record) {
                tracing::warn!(record = name, error = %err, "failed to write record");
            }
        });
    }
}

fn line(name: &str, record: &Record) -> String {
    let parts: Vec<String> = match record.render() {
        Value::Array(items) => items.iter().map(display).collect(),
        other => vec![display(&other)],
    };
    if parts.is_empty() {
        format!("[{name}]:")
    } else {
        format!("[{name}]: {}", parts.join(" "))
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
