//! Keytrail - key transcript logger
//!
//! Program shell: argument parsing, the consent prompt and opening the
//! device and transcript handles before handing them to the event loop.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use keytrail::{
    install_interrupt_handler, Config, EventLoop, LoggerHandle, TranscriptSink,
};

/// Log key activity from a Linux input event device
#[derive(Parser, Debug)]
#[command(name = "keytrail", version, about)]
struct Args {
    /// Input event device, e.g. /dev/input/event3
    device: Option<PathBuf>,

    /// Transcript file (appended to, created if missing)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Do not echo transcript lines to stdout
    #[arg(long)]
    no_mirror: bool,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<u8> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            log::warn!("using default config: {}", e);
            Config::default()
        }),
    };

    let Some(device_path) = args.device.clone().or_else(|| config.device.path.clone()) else {
        bail!("usage: keytrail /dev/input/eventX");
    };
    let log_path = args.log.clone().unwrap_or_else(|| config.transcript.path.clone());
    let mirror = config.transcript.mirror_to_console && !args.no_mirror;

    println!("keytrail - run only on machines you own or in a vm.");
    print!("type '{}' to confirm and proceed: ", config.consent.phrase);
    io::stdout().flush()?;

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        return Ok(1);
    }
    if !config.consent.accepts(&answer) {
        println!("aborting.");
        return Ok(1);
    }

    let device = File::open(&device_path)
        .with_context(|| format!("open device {}", device_path.display()))?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;

    let shutdown = install_interrupt_handler()?;

    println!(
        "logging... press ctrl+c to stop. output: {}",
        log_path.display()
    );

    let sink = if mirror {
        TranscriptSink::with_stdout(log_file)
    } else {
        TranscriptSink::new(log_file, None)
    };
    let mut handle = LoggerHandle::new(device, sink);
    let mut event_loop = EventLoop::new();

    let reason = event_loop.run(&mut handle, &shutdown);
    let code = handle.shutdown(&reason);

    Ok(u8::try_from(code).unwrap_or(1))
}
