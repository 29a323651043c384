//! Tag Overlay CLI
//!
//! Usage:
//!   tag-overlay [OPTIONS] [FILE]
//!
//! Options:
//!   -s, --settings <FILE>  Settings file (TOML format)
//!   -t, --trace            Print the markup after every event
//!   -v, --verbose          Increase log verbosity (repeatable)
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use tag_overlay::{replay_with_settings, Settings};

#[derive(Parser)]
#[command(name = "tag-overlay")]
#[command(about = "Replay tag overlay event scripts and render the result as HTML")]
struct Cli {
    /// Event script (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Settings file for overlay, HTML and theme options (TOML format)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Print the markup after every event, not just the final state
    #[arg(short, long)]
    trace: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let settings = match &cli.settings {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match replay_with_settings(&source, &settings, cli.trace) {
        Ok(report) => {
            for (index, step) in report.steps.iter().enumerate() {
                if let Some(html) = &step.html {
                    println!("<!-- event {}: {:?} -->", index, step.outcome);
                    println!("{}", html);
                }
            }
            println!("{}", report.html);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
