//! Terminal output formatting
//!
//! Command results and API error messages are plain text on stdout.
//! Local failures get a red "error:" prefix on stderr. Colors respect
//! NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::{self, Write};

use colored::Colorize;
use gradient_core::present;

use crate::error::CliError;

/// Print error (red bold "error:" prefix).
pub fn error(out: &mut impl Write, msg: &(impl std::fmt::Display + ?Sized)) -> io::Result<()> {
    writeln!(out, "{}: {}", "error".red().bold(), msg)
}

/// Report a failed command on the stream it belongs to.
pub fn report(
    stdout: &mut impl Write,
    stderr: &mut impl Write,
    err: &CliError,
) -> io::Result<()> {
    match err {
        CliError::Api(api) if err.is_remote_rejection() => {
            stdout.write_all(present::error(api).as_bytes())
        }
        other => error(stderr, other),
    }
}
