//! ATM Simulator CLI
//!
//! Reads commands from stdin, one per line, and prints each result.
//!
//! # Usage
//!
//! ```bash
//! cargo run                    # built-in demo accounts
//! cargo run -- accounts.csv    # accounts from a CSV file
//! ```
//!
//! Type `end` (or close stdin) to quit.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to see activity on stderr

use atm_simulator::{Atm, AtmConfig, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut config = AtmConfig::default();
    if let Some(path) = env::args().nth(1) {
        let file = File::open(&path)?;
        config.load_accounts_csv(BufReader::new(file))?;
        log::info!("Loaded {} account(s) from {}", config.accounts.len(), path);
    }

    let mut atm = Atm::new(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Welcome to the ATM! Please login.")?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();

        if trimmed.eq_ignore_ascii_case("end") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        writeln!(out, "{}", atm.handle_line(trimmed))?;
    }

    writeln!(out)?;
    Ok(())
}
