#![warn(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]

mod error;
mod maps;
mod process;
mod scan;

use crate::error::Error;
use crate::process::Target;
use crate::scan::Report;
use env_logger::Env;
use std::process::ExitCode;

/// How a run ended. Turned into an exit status in `main` and nowhere else.
#[derive(Debug)]
enum Outcome {
    Completed,
    Usage(String),
    InvalidPid(String),
    Failed(Error),
}

impl Outcome {
    fn report(&self) -> ExitCode {
        match self {
            Outcome::Completed => ExitCode::SUCCESS,
            Outcome::Usage(program) => {
                println!("Usage: {} PID", program);
                ExitCode::FAILURE
            }
            Outcome::InvalidPid(arg) => {
                println!("Invalid pid: {}", arg);
                ExitCode::FAILURE
            }
            Outcome::Failed(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("uuidscan=warn")).init();

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let outcome = run(&args);
    log::debug!("{:?}", outcome);
    outcome.report()
}

/// Takes `<program> <pid>`. The one argument is always read as a pid, even when it looks like
/// a flag; any integer is accepted here and left to [`Target::attach`] to find or not.
fn parse_args(args: &[String]) -> Result<i64, Outcome> {
    let [_, pid] = args else {
        let program = args.first().map_or("uuidscan", String::as_str);
        return Err(Outcome::Usage(program.to_owned()));
    };
    pid.trim()
        .parse()
        .map_err(|_| Outcome::InvalidPid(pid.clone()))
}

fn run(args: &[String]) -> Outcome {
    let pid = match parse_args(args) {
        Ok(pid) => pid,
        Err(outcome) => return outcome,
    };

    let target = match Target::attach(pid) {
        Ok(target) => target,
        Err(err) => return Outcome::Failed(err),
    };
    let mut report = Report::new(std::io::stdout().lock(), std::io::stderr().lock());
    match scan::run(target.regions, &target.memory, &mut report) {
        Ok(_) => Outcome::Completed,
        Err(err) => Outcome::Failed(err),
    }
}
