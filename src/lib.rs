//! scopearg - Scope-aware command-line argument parsing.
//!
//! This library matches process arguments against a declared set of
//! options and one-level subcommands. Options can be global, limited to the
//! root invocation, or bound to a single subcommand. Parsed values are
//! returned in a per-call [`Matches`] record, so a [`Schema`] can be reused
//! freely.

pub mod config;
pub mod help;
pub mod output;
pub mod parser;
pub mod token;
pub mod value;

pub use config::{
    CommandSpec, ConfigError, ExampleSpec, Kind, OptionSpec, Schema, SchemaBuilder, Scope,
    Settings,
};
pub use help::{generate_help, generate_usage};
pub use output::{evaluate, parse_env_or_exit, parse_or_exit, report_error, Exit};
pub use parser::{parse_args, Matches, ParseError, ParseOutcome, ParseResult};
pub use value::Value;
