// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mxstream CLI entrypoint.
//!
//! `decode` streams a model response (file or stdin) and prints one JSON event per line. The
//! other commands expose the pure transforms for scripting.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use log::{debug, error, info, LevelFilter};
use tokio::io::AsyncRead;

use mxstream::config::{load_config, Config};
use mxstream::format::{unwrap, wrap_with};
use mxstream::model::{EditOp, EditOperation};
use mxstream::ops::{apply_edits, validate_and_fix};
use mxstream::stream::{EventStream, StreamDecoder};
use mxstream::tools::tool_definitions;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Decode a model event stream into JSON lines
    Decode {
        /// Stream file (stdin when omitted)
        input: Option<PathBuf>,
        /// Current document; edit batches are applied against it
        #[arg(long)]
        base: Option<PathBuf>,
    },
    /// Wrap bare cells in an mxfile document
    Wrap { input: Option<PathBuf> },
    /// Extract content cells from an mxfile document
    Unwrap { input: Option<PathBuf> },
    /// Strip dangling edge references
    Repair { input: Option<PathBuf> },
    /// Apply a JSON array of edit operations
    Apply {
        /// JSON file holding `[{"operation": .., "cell_id": .., "new_xml": ..}, ..]`
        #[arg(long)]
        ops: PathBuf,
        input: Option<PathBuf>,
    },
    /// Print the tool definitions offered to the model
    Tools,
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print(text: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn read_ops(path: &Path) -> mxstream::Result<Vec<EditOp>> {
    let wire: Vec<EditOperation> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let ops = wire.into_iter().map(EditOp::try_from).collect::<Result<Vec<_>, _>>()?;
    debug!(count = ops.len(); "loaded edit operations");
    Ok(ops)
}

async fn decode_stream(
    input: Option<&Path>,
    base: Option<&Path>,
    config: &Config,
) -> mxstream::Result<()> {
    let mut decoder = StreamDecoder::new().with_options(config.decoder.clone());
    if let Some(base) = base {
        decoder = decoder.with_base(unwrap(&fs::read_to_string(base)?));
    }

    let reader: Box<dyn AsyncRead + Unpin> = match input {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };

    let mut events = EventStream::new(reader, decoder);
    let mut out = io::stdout().lock();
    let mut count = 0usize;
    let mut errors = 0usize;
    while let Some(event) = events.next_event().await {
        serde_json::to_writer(&mut out, &event)?;
        out.write_all(b"\n")?;
        out.flush()?;
        count += 1;
        errors += usize::from(event.is_error());
    }
    info!(count, errors; "stream decoded");
    Ok(())
}

fn run(args: &Args) -> mxstream::Result<()> {
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Decode { input, base } => {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(decode_stream(input.as_deref(), base.as_deref(), &config))
        }
        Command::Wrap { input } => {
            Ok(print(&wrap_with(&read_input(input.as_deref())?, &config.envelope))?)
        }
        Command::Unwrap { input } => Ok(print(&unwrap(&read_input(input.as_deref())?))?),
        Command::Repair { input } => Ok(print(&validate_and_fix(&read_input(input.as_deref())?))?),
        Command::Apply { ops, input } => {
            let ops = read_ops(ops)?;
            let base = unwrap(&read_input(input.as_deref())?);
            Ok(print(&apply_edits(&base, &ops))?)
        }
        Command::Tools => {
            let json = serde_json::to_string_pretty(&tool_definitions())?;
            Ok(print(&json)?)
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default()).filter_level(log_level).init();

    debug!(args:?; "parsed arguments");

    process::exit(exit_code(run(&args)));
}

fn exit_code(result: mxstream::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!(err:err; "Run failed");
            1
        }
    }
}
