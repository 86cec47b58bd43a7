//! Rich-Text Terminal (rtt) - CLI entry point

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portable_pty::{native_pty_system, CommandBuilder, PtySize};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rtt::RichTextTerminal;

#[derive(Parser)]
#[command(name = "rtt")]
#[command(about = "Run a command and capture its terminal output as rich text")]
#[command(
    long_about = "Rich-Text Terminal (rtt) - Capture terminal output as rich text.

rtt parses the ANSI/VT escape sequences a program writes to its terminal
and renders each line of output as styled HTML: colors, bold, italics,
underline, and hyperlinks all survive the trip.

EXAMPLES:
    rtt run ls -- --color=always      Run ls on a pty and print HTML lines
    rtt render session.bin            Render a captured byte stream
    cat session.bin | rtt render      Same, from stdin"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command on a pseudo-terminal and print its output as HTML
    Run {
        /// Program to run
        command: String,
        /// Arguments to pass to the program (after --)
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Render a captured terminal byte stream as HTML
    Render {
        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },
}

fn run_command(command: &str, args: &[String]) -> Result<()> {
    let pty_system = native_pty_system();
    // A one-row, zero-column pty nudges programs away from progress bars
    // and column-fitted layouts.
    let pair = pty_system
        .openpty(PtySize {
            rows: 1,
            cols: 0,
            pixel_width: 0,
            pixel_height: 0,
        })
        .context("failed to open pty")?;

    let mut cmd = CommandBuilder::new(command);
    cmd.args(args);
    if let Ok(cwd) = std::env::current_dir() {
        cmd.cwd(cwd);
    }
    let mut child = pair
        .slave
        .spawn_command(cmd)
        .with_context(|| format!("failed to spawn {command}"))?;
    drop(pair.slave);

    let reader = pair
        .master
        .try_clone_reader()
        .context("failed to clone pty reader")?;
    let mut term = RichTextTerminal::new(reader).with_upgrade_hook(|| {
        warn!("child requested full-screen mode; a real terminal emulator should take over");
    });

    let cancel = AtomicBool::new(false);
    term.run(&cancel).context("parse failed")?;

    if term.upgraded() {
        // Nothing to hand the pty over to here, so stop the child instead
        // of leaving it wedged in a mode we cannot display.
        child.kill().ok();
    }
    child.wait().context("failed to wait for child")?;

    for line in term.lines() {
        println!("{line}");
    }
    Ok(())
}

fn render_stream(file: Option<&PathBuf>) -> Result<()> {
    let src: Box<dyn Read> = match file {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };

    let mut term = RichTextTerminal::new(src);
    let cancel = AtomicBool::new(false);
    term.run(&cancel).context("parse failed")?;

    for line in term.lines() {
        println!("{line}");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { command, args } => run_command(&command, &args),
        Commands::Render { file } => render_stream(file.as_ref()),
    }
}
