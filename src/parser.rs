//! Matching of invocation tokens against a schema.

use crate::config::{Kind, OptionSpec, Schema};
use crate::token::{self, classify, Token};
use crate::value::{parse_signed, Coercer, Value};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors caused by the user's invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no program name in invocation")]
    EmptyInvocation,

    #[error("unknown argument `{0}`")]
    UnknownArgument(String),

    #[error("excess positional argument `{0}`")]
    ExcessPositional(String),

    #[error("missing argument: option `{0}` requires an argument but none was given")]
    MissingArgument(String),

    #[error("invalid numerical sequence for option `{long}`: {value}")]
    InvalidNumber { long: String, value: String },

    #[error("option `{long}` has a too long string argument, max allowed is {max}")]
    StringTooLong { long: String, max: usize },

    #[error("too many positional arguments: expected {expected} got {got}")]
    TooManyPositionals { expected: usize, got: usize },

    #[error("too few positional arguments: expected {expected} got {got}")]
    TooFewPositionals { expected: usize, got: usize },

    #[error("missing required argument `{0}`")]
    MissingRequired(String),

    #[error("multiple shorthand options at once are not supported: `{0}`")]
    UnsupportedBundledShortForm(String),

    #[error("invalid flag usage: option `{0}` does not expect an argument")]
    BooleanWithExplicitValue(String),
}

impl ParseError {
    /// Whether the diagnostic should point the user at `--help`.
    pub fn suggests_help(&self) -> bool {
        matches!(
            self,
            ParseError::UnknownArgument(_)
                | ParseError::ExcessPositional(_)
                | ParseError::MissingArgument(_)
                | ParseError::TooManyPositionals { .. }
                | ParseError::TooFewPositionals { .. }
                | ParseError::MissingRequired(_)
                | ParseError::BooleanWithExplicitValue(_)
        )
    }
}

/// Values matched during one parse, keyed by long option name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matches {
    #[serde(skip)]
    command: Option<usize>,
    subcommand: Option<String>,
    values: BTreeMap<String, Value>,
}

impl Matches {
    /// Name of the selected subcommand, if any.
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// Index of the selected subcommand in the schema's command table.
    pub fn command_index(&self) -> Option<usize> {
        self.command
    }

    pub fn get(&self, long: &str) -> Option<&Value> {
        self.values.get(long)
    }

    pub fn contains(&self, long: &str) -> bool {
        self.values.contains_key(long)
    }

    /// `true` if the flag was given, `false` otherwise.
    pub fn flag(&self, long: &str) -> bool {
        self.get(long).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn string(&self, long: &str) -> Option<&str> {
        self.get(long).and_then(Value::as_str)
    }

    pub fn int(&self, long: &str) -> Option<i64> {
        self.get(long).and_then(Value::as_int)
    }

    pub fn uint(&self, long: &str) -> Option<u64> {
        self.get(long).and_then(Value::as_uint)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of parsing an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Successfully parsed arguments.
    Success(Matches),
    /// User requested help (-h or --help before any terminator).
    Help { subcommand: Option<usize> },
}

/// Result of matching the tokens of one invocation.
pub type ParseResult = Result<Matches, ParseError>;

/// Select the subcommand named by the first token after the program name.
pub fn resolve_command(schema: &Schema, first: Option<&str>) -> Option<usize> {
    first.and_then(|name| schema.command_index(name))
}

/// Check for a help request before the first terminator.
pub fn wants_help<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .map(|arg| arg.as_ref())
        .take_while(|arg| !token::is_terminator(arg))
        .any(|arg| arg == "-h" || arg == "--help")
}

/// Parse a full invocation (`argv[0]` is the program name) against a schema.
///
/// Returns `ParseOutcome::Help` if -h/--help appears before a terminator,
/// without checking required options. Otherwise returns
/// `ParseOutcome::Success` with the matched values or the first error.
pub fn parse_args<S: AsRef<str>>(schema: &Schema, argv: &[S]) -> Result<ParseOutcome, ParseError> {
    let (program, rest) = argv.split_first().ok_or(ParseError::EmptyInvocation)?;

    let command = resolve_command(schema, rest.first().map(|arg| arg.as_ref()));
    debug!(
        program = program.as_ref(),
        subcommand = command.map(|i| schema.commands()[i].name.as_str()),
        "resolved subcommand"
    );

    if wants_help(rest) {
        debug!("found help request");
        return Ok(ParseOutcome::Help {
            subcommand: command,
        });
    }

    let args = if command.is_some() { &rest[1..] } else { rest };
    let mut parser = Parser::new(schema, command);
    parser.parse(args).map(ParseOutcome::Success)
}

/// Internal parser state for one invocation.
struct Parser<'a> {
    schema: &'a Schema,
    command: Option<usize>,
    coercer: Coercer<'a>,
    /// Indices of matched options in the schema's option table
    matched: HashSet<usize>,
    values: BTreeMap<String, Value>,
}

impl<'a> Parser<'a> {
    fn new(schema: &'a Schema, command: Option<usize>) -> Self {
        Self {
            schema,
            command,
            coercer: Coercer::new(schema.settings()),
            matched: HashSet::new(),
            values: BTreeMap::new(),
        }
    }

    fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> ParseResult {
        let mut index = 0;

        while index < args.len() {
            let arg = args[index].as_ref();
            let next = args.get(index + 1).map(|arg| arg.as_ref());
            let token = classify(arg);
            trace!(arg = arg, ?token, "classified token");

            match token {
                Token::Terminator => {
                    debug!("found terminator, parsing the rest as positionals");
                    self.parse_remaining_positionals(&args[index + 1..])?;
                    break;
                }
                Token::Equals { key, value } => self.parse_equals(key, value)?,
                Token::Long(name) => {
                    index += self.parse_named(arg, next, |o| o.long == name)?;
                }
                Token::Short(c) => {
                    index += self.parse_named(arg, next, |o| o.matches_short(c))?;
                }
                Token::Bundled(_) => {
                    return Err(ParseError::UnsupportedBundledShortForm(arg.to_string()));
                }
                Token::Positional(value) => self.parse_positional(value)?,
            }

            index += 1;
        }

        self.check_required()?;
        Ok(self.finish())
    }

    /// First reachable option satisfying `pred`, in declaration order.
    fn find(&self, pred: impl Fn(&OptionSpec) -> bool) -> Option<(usize, &'a OptionSpec)> {
        let schema = self.schema;
        let command = self.command;
        schema
            .options()
            .iter()
            .enumerate()
            .find(|&(_, o)| o.scope.reachable(command) && pred(o))
    }

    /// Reachable positional options not matched yet, in declaration order.
    fn pending_positionals(&self) -> Vec<(usize, &'a OptionSpec)> {
        let schema = self.schema;
        schema
            .options()
            .iter()
            .enumerate()
            .filter(|(i, o)| {
                o.positional && o.scope.reachable(self.command) && !self.matched.contains(i)
            })
            .collect()
    }

    fn record(&mut self, index: usize, option: &OptionSpec, value: Value) {
        trace!(
            option = option.long.as_str(),
            kind = option.kind.as_str(),
            %value,
            "matched option"
        );
        self.matched.insert(index);
        self.values.insert(option.long.clone(), value);
    }

    /// Handle `--name` or `-c`. Returns how many extra tokens were consumed.
    fn parse_named(
        &mut self,
        arg: &str,
        next: Option<&str>,
        pred: impl Fn(&OptionSpec) -> bool,
    ) -> Result<usize, ParseError> {
        let (index, option) = self
            .find(pred)
            .ok_or_else(|| ParseError::UnknownArgument(arg.to_string()))?;

        if option.kind == Kind::Bool {
            self.record(index, option, Value::Bool(true));
            return Ok(0);
        }

        let raw = next
            .filter(|raw| self.takes_value(option, raw))
            .ok_or_else(|| ParseError::MissingArgument(option.long.clone()))?;
        let value = self.coercer.coerce(option, raw)?;
        self.record(index, option, value);
        Ok(1)
    }

    /// Whether `raw` can serve as the value of `option`. Terminators and
    /// option-shaped tokens cannot, except negative numbers for signed
    /// options.
    fn takes_value(&self, option: &OptionSpec, raw: &str) -> bool {
        if token::is_terminator(raw) {
            return false;
        }
        if token::is_option_shaped(raw) {
            return option.kind == Kind::Int
                && parse_signed(raw, self.schema.settings()).is_some();
        }
        true
    }

    /// Handle `--name=value` or `-c=value`.
    fn parse_equals(&mut self, key: &str, raw: &str) -> Result<(), ParseError> {
        let (index, option) = self
            .find(|o| o.matches_key(key))
            .ok_or_else(|| ParseError::UnknownArgument(key.to_string()))?;

        if option.kind == Kind::Bool {
            return Err(ParseError::BooleanWithExplicitValue(option.long.clone()));
        }

        let value = self.coercer.coerce(option, raw)?;
        self.record(index, option, value);
        Ok(())
    }

    fn parse_positional(&mut self, raw: &str) -> Result<(), ParseError> {
        let (index, option) = self
            .pending_positionals()
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::ExcessPositional(raw.to_string()))?;

        let value = self.coercer.coerce(option, raw)?;
        self.record(index, option, value);
        Ok(())
    }

    /// Assign every token after a terminator to the pending positionals.
    fn parse_remaining_positionals<S: AsRef<str>>(&mut self, rest: &[S]) -> Result<(), ParseError> {
        let pending = self.pending_positionals();

        if rest.len() > pending.len() {
            return Err(ParseError::TooManyPositionals {
                expected: pending.len(),
                got: rest.len(),
            });
        }
        if rest.len() < pending.len() {
            return Err(ParseError::TooFewPositionals {
                expected: pending.len(),
                got: rest.len(),
            });
        }

        for ((index, option), raw) in pending.into_iter().zip(rest) {
            let value = self.coercer.coerce(option, raw.as_ref())?;
            self.record(index, option, value);
        }
        Ok(())
    }

    fn check_required(&self) -> Result<(), ParseError> {
        let schema = self.schema;
        for (index, option) in schema.options().iter().enumerate() {
            if !option.scope.reachable(self.command) {
                continue;
            }
            if option.required && !self.matched.contains(&index) {
                return Err(ParseError::MissingRequired(option.long.clone()));
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Matches {
        Matches {
            command: self.command,
            subcommand: self
                .command
                .map(|i| self.schema.commands()[i].name.clone()),
            values: std::mem::take(&mut self.values),
        }
    }
}
