//! Something to point `uuidscan` at: keeps a random UUID secret in memory and checks guesses
//! against it.
//!
//! Prints its pid, then answers one line of stdin at a time. An empty line gets `Hello!`, any
//! other line is a guess at the secret. Exits at end of input.

use anyhow::{Context, Result};
use argh::FromArgs;
use std::io::{BufRead, Write};
use uuid::Uuid;

#[derive(FromArgs)]
/// Keep a random UUID secret in memory and check guesses against it.
struct Args {
    /// print the secret to stderr
    #[argh(switch)]
    reveal: bool,
}

#[derive(Debug, Clone)]
struct State {
    secret: String,
}

impl State {
    fn new() -> State {
        State {
            secret: Uuid::new_v4().as_hyphenated().to_string(),
        }
    }

    fn answer(&self, line: &str) -> &'static str {
        if line.is_empty() {
            "Hello!"
        } else if line == self.secret {
            "Secret validated!"
        } else {
            "The secret is still safe!"
        }
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let state = State::new();
    if args.reveal {
        eprintln!("Secret: {}", state.secret);
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", std::process::id())?;
    stdout.flush()?;
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        writeln!(stdout, "{}", state.answer(line.trim()))?;
        stdout.flush()?;
    }
    Ok(())
}
