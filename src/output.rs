//! Diagnostics and the process-exit contract.
//!
//! [`parse_args`] never exits; the functions here turn its outcome into the
//! conventional behaviour of a command-line program: help is printed and the
//! process exits 0, errors are reported and the process exits 1.

use crate::config::Schema;
use crate::help::generate_help;
use crate::parser::{parse_args, Matches, ParseError, ParseOutcome};
use std::io::{self, Write};

/// Program name used when the invocation is empty.
const FALLBACK_PROGRAM: &str = "program";

/// Text to print and status to exit with instead of continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub code: i32,
    pub text: String,
}

/// Format a diagnostic line for a parse error.
pub fn format_error(program: &str, error: &ParseError) -> String {
    if error.suggests_help() {
        format!(
            "{}: {}. For more information see {} --help\n",
            program, error, program
        )
    } else {
        format!("{}: {}\n", program, error)
    }
}

/// Write a diagnostic for a parse error to the given stream.
pub fn report_error(out: &mut dyn Write, program: &str, error: &ParseError) -> io::Result<()> {
    out.write_all(format_error(program, error).as_bytes())?;
    out.flush()
}

/// Parse an invocation and decide whether the caller should continue.
///
/// Returns the matches on success, or the text and exit status for a help
/// request (0) or an error (1).
pub fn evaluate<S: AsRef<str>>(schema: &Schema, argv: &[S]) -> Result<Matches, Exit> {
    let program = argv.first().map_or(FALLBACK_PROGRAM, |p| p.as_ref());

    match parse_args(schema, argv) {
        Ok(ParseOutcome::Success(matches)) => Ok(matches),
        Ok(ParseOutcome::Help { subcommand }) => Err(Exit {
            code: 0,
            text: generate_help(schema, subcommand, program),
        }),
        Err(error) => {
            tracing::debug!(%error, "parse failed");
            Err(Exit {
                code: 1,
                text: format_error(program, &error),
            })
        }
    }
}

/// Parse an invocation, writing help or diagnostics to `out` and exiting the
/// process when parsing does not succeed.
pub fn parse_or_exit<S: AsRef<str>>(schema: &Schema, argv: &[S], out: &mut dyn Write) -> Matches {
    match evaluate(schema, argv) {
        Ok(matches) => matches,
        Err(exit) => {
            // Nothing sensible is left to do if the stream is gone
            let _ = out.write_all(exit.text.as_bytes());
            let _ = out.flush();
            std::process::exit(exit.code)
        }
    }
}

/// [`parse_or_exit`] over the process arguments, reporting to stderr.
pub fn parse_env_or_exit(schema: &Schema) -> Matches {
    let argv: Vec<String> = std::env::args().collect();
    parse_or_exit(schema, &argv, &mut io::stderr())
}
