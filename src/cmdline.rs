use crate::{config::ProbeConfig, logging};
use clap::Parser;
use nix::libc;
use std::fmt;

/// A program that operates on one PCM character device.
pub trait ProbeCmd<A>: Sized
where
    A: Parser,
{
    fn execute(args: A, config: ProbeConfig) -> Result<(), String>;

    fn run() {
        let args = A::try_parse().unwrap_or_else(|err| {
            // Help and version requests are not failures.
            if !err.use_stderr() {
                err.exit();
            }
            println!("{}", err.to_string().trim_end());
            std::process::exit(libc::EXIT_FAILURE)
        });

        let config = ProbeConfig::from_env();
        logging::init(config.log_level);

        let code = Self::execute(args, config)
            .map(|_| libc::EXIT_SUCCESS)
            .unwrap_or_else(|msg| {
                println!("{msg}");
                libc::EXIT_FAILURE
            });

        std::process::exit(code)
    }
}

/// Renders a block of report text and prints it to standard output.
pub fn emit(render: impl FnOnce(&mut String) -> fmt::Result) -> Result<(), String> {
    let mut out = String::new();
    render(&mut out).map_err(|err| err.to_string())?;
    print!("{out}");
    Ok(())
}

pub fn emit_json<T: serde::Serialize>(document: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(document).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}
