//! Chained logging demo.
//!
//! ```text
//! logchain-demo                 # plain and not.verbose messages
//! logchain-demo -v              # verbose messages instead
//! logchain-demo -d -o json      # debug messages, one JSON record per line
//! RUST_LOG=logchain=trace logchain-demo   # internal tracing on stderr
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use logchain::{Logger, LoggerConfig, ModeFlags};
use logchain_console::{palette, presets, ConsoleWriter, OutputMode, StyleSheet};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Output {
    #[default]
    Auto,
    Term,
    Text,
    Json,
}

impl From<Output> for OutputMode {
    fn from(output: Output) -> Self {
        match output {
            Output::Auto => OutputMode::Auto,
            Output::Term => OutputMode::Term,
            Output::Text => OutputMode::Text,
            Output::Json => OutputMode::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "logchain-demo", version, about = "Show chained, mode-gated log output")]
struct Cli {
    /// Enable the `verbose` mode
    #[arg(short, long)]
    verbose: bool,

    /// Enable the `debug` mode
    #[arg(short, long)]
    debug: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Output::Auto)]
    output: Output,

    /// YAML file with extra modes, emitters and enabled flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// YAML stylesheet of name: dotted.style entries
    #[arg(long, value_name = "FILE")]
    styles: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let logger = build_logger(&cli)?;
    run(&logger)
}

fn build_logger(cli: &Cli) -> Result<Logger> {
    let logger = Logger::new();
    palette::install(&logger)?;
    presets::install(&logger)?;

    let mut flags = ModeFlags::new();
    if let Some(path) = &cli.config {
        let config = LoggerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?;
        config.apply(&logger)?;
        flags = config.flags();
    }
    if let Some(path) = &cli.styles {
        StyleSheet::from_file(path)?.install(&logger)?;
    }
    if cli.verbose {
        flags.enable("verbose");
    }
    if cli.debug {
        flags.enable("debug");
    }
    tracing::debug!(enabled = ?flags.enabled().collect::<Vec<_>>(), "mode flags");

    ConsoleWriter::stdout(cli.output.into())
        .flags(flags)
        .attach(&logger);
    Ok(logger)
}

fn run(logger: &Logger) -> Result<()> {
    // One record per call, gated by the enabled modes.
    logger
        .get("info")?.call(["this is a normal info message"])?
        .chain("verbose.info")?.call(["this is a verbose message"])?
        .chain("not.verbose.info")?.call(["this is a not.verbose message"])?
        .chain("not.not.verbose.info")?.call(["this is a not.not.verbose message"])?
        .chain("not.verbose.not.info")?.call(["this is a not.verbose.not message"])?;

    // Messages that change with the verbose flag.
    logger
        .chain("verbose.error")?.call(["--- VERBOSE INFO ---"])?
        .chain("not.verbose.subhead")?.call(["--- IMPORTANT INFO ---"])?
        .chain("verbose.inform")?.call(["inform"])?
        .chain("verbose.warn")?.call(["warn"])?
        .chain("verbose.success")?.call(["success"])?
        .chain("not.verbose.success")?.call(["success"])?;

    // Every emitter in a chain publishes its own record.
    logger
        .chain("verbose.yellow.inform.info.warn.error.success")?
        .call(["some verbose information"])?
        .chain("not.verbose.error.success")?
        .call(["some not verbose information"])?;

    // Styles can be applied on their own.
    if let Some(green) = logger.get("green")?.into_style() {
        let text = green.apply("use a style directly");
        logger.emit("log", [text])?;
    }

    logger.chain("debug.yellow.log")?.call(["this is a debug option"])?;

    // Modes called directly publish through `log`.
    logger
        .get("verbose")?.call(["this is directly in verbose"])?
        .chain("not.verbose")?.call(["this is directly in not verbose"])?
        .get("debug")?.call(["this is directly in debug"])?
        .chain("not.debug")?.call(["this is directly in not debug"])?;

    Ok(())
}
