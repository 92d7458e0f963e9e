//! Terminal support for logchain.
//!
//! - [`palette`]: colour and attribute styles backed by `console`
//! - [`StyleSheet`]: styles loaded from YAML
//! - [`presets`]: the usual `verbose`/`debug`/`not` modes and coloured emitters
//! - [`ConsoleWriter`]: a listener that prints records as lines
//!
//! ```rust
//! use logchain::{Logger, ModeFlags};
//! use logchain_console::{palette, presets, ConsoleWriter, OutputMode};
//!
//! let logger = Logger::new();
//! palette::install(&logger).unwrap();
//! presets::install(&logger).unwrap();
//!
//! let (writer, buffer) = ConsoleWriter::buffer(OutputMode::Text);
//! writer.flags(ModeFlags::new().with("verbose")).attach(&logger);
//!
//! logger.chain("verbose.info").unwrap().call(["shown"]).unwrap();
//! logger.chain("not.verbose.info").unwrap().call(["hidden"]).unwrap();
//!
//! assert_eq!(String::from_utf8(buffer.borrow().clone()).unwrap(), "[info]: shown\n");
//! ```

pub mod palette;
pub mod presets;
mod stylesheet;
mod writer;

pub use palette::Styling;
pub use stylesheet::{StyleSheet, StyleSheetError};
pub use writer::{ConsoleWriter, OutputMode, SharedBuffer};
