//! Command-line client for Gradient clusters and hyperparameter tuning jobs.
//!
//! `run` is the whole program minus process setup: it takes parsed
//! arguments, settings, a transport and the two output streams, and returns
//! the exit code. `main` wires in the real ones.

pub mod args;
pub mod commands;
pub mod error;
pub mod exitcode;
pub mod output;
pub mod settings;
pub mod transport;

use std::io::Write;

pub use args::Cli;
pub use error::{CliError, CliResult};
pub use settings::Settings;
pub use transport::{Transport, UreqTransport};

/// Execute one invocation and return its exit code.
pub fn run<T: Transport>(
    cli: &Cli,
    settings: &Settings,
    transport: &T,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> i32 {
    let client = settings.client();
    let written = match commands::execute_command(cli, &client, transport) {
        Ok(text) => stdout.write_all(text.as_bytes()).map(|_| exitcode::OK),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            output::report(stdout, stderr, &e).map(|_| e.exit_code())
        }
    };
    let flushed = stdout.flush();
    match (written, flushed) {
        (Ok(code), Ok(())) => code,
        _ => exitcode::IOERR,
    }
}
