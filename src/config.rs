//! Option, command and example descriptors, and their validation.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Default upper bound for string values, in bytes.
pub const DEFAULT_MAX_STRING_LEN: usize = 1024;

/// Errors in a descriptor table. These are defects in the embedding program,
/// never in the user's invocation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON schema: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid option at index {0}: a long option is always required")]
    MissingLong(usize),

    #[error("invalid option '{0}': options that are not boolean or positional need a value name")]
    MissingValueName(String),

    #[error("invalid long option '{0}': must not start with '-' or contain '=' or whitespace")]
    InvalidLongOption(String),

    #[error("invalid short option '{0}': must be a single ASCII letter or digit")]
    InvalidShortOption(char),

    #[error("'{0}' is reserved for the help flag")]
    ReservedName(String),

    #[error("duplicate long option: --{0}")]
    DuplicateLong(String),

    #[error("duplicate short option: -{0}")]
    DuplicateShort(char),

    #[error("command at index {0} has an empty name")]
    EmptyCommandName(usize),

    #[error("duplicate command name: {0}")]
    DuplicateCommand(String),

    #[error("option '{long}' is bound to unknown command '{command}'")]
    UnknownCommandScope { long: String, command: String },

    #[error("example at index {0} needs both a usage and a help text")]
    IncompleteExample(usize),
}

/// The type of value an option produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Presence flag, always `true` when matched
    #[serde(alias = "flag", alias = "boolean")]
    Bool,
    /// Verbatim string
    #[serde(alias = "string")]
    Str,
    /// Signed 64-bit integer
    Int,
    /// Unsigned 64-bit integer
    UInt,
}

impl Kind {
    /// Name used in diagnostics and help.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Str => "string",
            Kind::Int => "int",
            Kind::UInt => "uint",
        }
    }
}

/// Where an option is reachable.
///
/// The integer tag encoding (`0` global, `1` root-only, `n + 2` bound to the
/// command at index `n`) is available through [`Scope::tag`] and
/// [`Scope::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Reachable regardless of the active command
    #[default]
    Global,
    /// Reachable only when no command was given
    Root,
    /// Reachable only under the command at this index
    Command(usize),
}

impl Scope {
    pub fn tag(self) -> usize {
        match self {
            Scope::Global => 0,
            Scope::Root => 1,
            Scope::Command(index) => index + 2,
        }
    }

    pub fn from_tag(tag: usize) -> Scope {
        match tag {
            0 => Scope::Global,
            1 => Scope::Root,
            n => Scope::Command(n - 2),
        }
    }

    /// Check whether an option with this scope takes part in a run where
    /// `active` is the selected command.
    pub fn reachable(self, active: Option<usize>) -> bool {
        match self {
            Scope::Global => true,
            Scope::Root => active.is_none(),
            Scope::Command(index) => active == Some(index),
        }
    }

    /// Check whether two scopes can be reachable in the same run.
    fn overlaps(self, other: Scope) -> bool {
        match (self, other) {
            (Scope::Global, _) | (_, Scope::Global) => true,
            (Scope::Root, Scope::Root) => true,
            (Scope::Command(a), Scope::Command(b)) => a == b,
            _ => false,
        }
    }
}

/// Descriptor for a single option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Short option character (e.g., 't' for -t)
    pub short: Option<char>,
    /// Long option name, also the key of the parsed value
    pub long: String,
    pub kind: Kind,
    pub required: bool,
    /// Matched by position instead of by name
    pub positional: bool,
    pub scope: Scope,
    /// Help text for this option
    pub help: String,
    /// Placeholder for the value in help output (e.g., "sec")
    pub value_name: Option<String>,
}

impl OptionSpec {
    pub fn new(long: impl Into<String>, kind: Kind) -> Self {
        Self {
            short: None,
            long: long.into(),
            kind,
            required: false,
            positional: false,
            scope: Scope::Global,
            help: String::new(),
            value_name: None,
        }
    }

    pub fn flag(long: impl Into<String>) -> Self {
        Self::new(long, Kind::Bool)
    }

    pub fn string(long: impl Into<String>) -> Self {
        Self::new(long, Kind::Str)
    }

    pub fn int(long: impl Into<String>) -> Self {
        Self::new(long, Kind::Int)
    }

    pub fn uint(long: impl Into<String>) -> Self {
        Self::new(long, Kind::UInt)
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Use the first character of the long name as the short option.
    pub fn auto_short(mut self) -> Self {
        self.short = self.long.chars().next();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Check whether `-c` selects this option.
    pub fn matches_short(&self, c: char) -> bool {
        self.short == Some(c)
    }

    /// Check whether an option key such as `--timeout` or `-t` names this
    /// option.
    pub fn matches_key(&self, key: &str) -> bool {
        if let Some(long) = key.strip_prefix("--") {
            return self.long == long;
        }
        if let Some(short) = key.strip_prefix('-') {
            let mut chars = short.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return self.matches_short(c);
            }
        }
        false
    }
}

/// Descriptor for a one-level subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub help: String,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
        }
    }
}

/// A usage example shown at the end of the help text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExampleSpec {
    /// Arguments appended to the program name (e.g., "-t 10 --warn")
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub help: String,
}

impl ExampleSpec {
    pub fn new(usage: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            help: help.into(),
        }
    }
}

/// Engine settings carried by a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Accept `0x`-prefixed hexadecimal numbers
    pub allow_hex: bool,
    /// Accept `0b`-prefixed binary numbers
    pub allow_binary: bool,
    /// Longest accepted string value in bytes, `None` for no bound
    pub max_string_len: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_hex: true,
            allow_binary: true,
            max_string_len: Some(DEFAULT_MAX_STRING_LEN),
        }
    }
}

/// A validated set of commands, options and examples.
///
/// A `Schema` can only be obtained through [`SchemaBuilder::build`],
/// [`Schema::from_json`] or [`Schema::from_file`], all of which validate it.
/// It holds no per-run state and can be parsed against any number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    commands: Vec<CommandSpec>,
    options: Vec<OptionSpec>,
    examples: Vec<ExampleSpec>,
    settings: Settings,
}

/// Incremental construction of a [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn command(mut self, name: impl Into<String>, help: impl Into<String>) -> Self {
        self.schema.commands.push(CommandSpec::new(name, help));
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.schema.options.push(option);
        self
    }

    pub fn example(mut self, usage: impl Into<String>, help: impl Into<String>) -> Self {
        self.schema.examples.push(ExampleSpec::new(usage, help));
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.schema.settings = settings;
        self
    }

    pub fn build(self) -> Result<Schema, ConfigError> {
        self.schema.validate()?;
        Ok(self.schema)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ScopeName {
    Global,
    Root,
}

/// JSON form of a scope: `"global"`, `"root"` or `{"command": "name"}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScopeDef {
    Named(ScopeName),
    Command { command: CommandRef },
}

#[derive(Debug, Deserialize)]
struct RawOption {
    #[serde(default)]
    long: String,
    short: Option<char>,
    #[serde(default)]
    auto_short: bool,
    kind: Kind,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    positional: bool,
    scope: Option<ScopeDef>,
    #[serde(default)]
    help: String,
    value_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default)]
    commands: Vec<CommandSpec>,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    examples: Vec<ExampleSpec>,
    #[serde(default)]
    settings: Settings,
}

impl RawOption {
    fn resolve(self, commands: &[CommandSpec]) -> Result<OptionSpec, ConfigError> {
        let scope = match self.scope {
            None | Some(ScopeDef::Named(ScopeName::Global)) => Scope::Global,
            Some(ScopeDef::Named(ScopeName::Root)) => Scope::Root,
            Some(ScopeDef::Command {
                command: CommandRef::Index(index),
            }) => Scope::Command(index),
            Some(ScopeDef::Command {
                command: CommandRef::Name(name),
            }) => match commands.iter().position(|c| c.name == name) {
                Some(index) => Scope::Command(index),
                None => {
                    return Err(ConfigError::UnknownCommandScope {
                        long: self.long,
                        command: name,
                    })
                }
            },
        };

        let short = match self.short {
            Some(c) => Some(c),
            None if self.auto_short => self.long.chars().next(),
            None => None,
        };

        Ok(OptionSpec {
            short,
            long: self.long,
            kind: self.kind,
            required: self.required,
            positional: self.positional,
            scope,
            help: self.help,
            value_name: self.value_name,
        })
    }
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Parse and validate a JSON schema.
    pub fn from_json(json: &str) -> Result<Schema, ConfigError> {
        let raw: RawSchema = serde_json::from_str(json)?;
        let options = raw
            .options
            .into_iter()
            .map(|o| o.resolve(&raw.commands))
            .collect::<Result<Vec<_>, _>>()?;

        let schema = Schema {
            commands: raw.commands,
            options,
            examples: raw.examples,
            settings: raw.settings,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Read, parse and validate a JSON schema file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Schema, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn examples(&self) -> &[ExampleSpec] {
        &self.examples
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index of the command with this name. First match wins.
    pub fn command_index(&self, name: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.name == name)
    }

    /// Options taking part in a run where `active` is the selected command,
    /// in declaration order.
    pub fn reachable_options(&self, active: Option<usize>) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter().filter(move |o| o.scope.reachable(active))
    }

    /// Validate the descriptor tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for (index, command) in self.commands.iter().enumerate() {
            if command.name.is_empty() {
                return Err(ConfigError::EmptyCommandName(index));
            }
            if !names.insert(command.name.as_str()) {
                return Err(ConfigError::DuplicateCommand(command.name.clone()));
            }
        }

        for (index, option) in self.options.iter().enumerate() {
            self.validate_option(index, option)?;
        }

        // Identifiers only clash when both options can be reachable at once.
        for (index, option) in self.options.iter().enumerate() {
            for earlier in &self.options[..index] {
                if !option.scope.overlaps(earlier.scope) {
                    continue;
                }
                if option.long == earlier.long {
                    return Err(ConfigError::DuplicateLong(option.long.clone()));
                }
                if let Some(short) = option.short {
                    if earlier.short == Some(short) {
                        return Err(ConfigError::DuplicateShort(short));
                    }
                }
            }
        }

        for (index, example) in self.examples.iter().enumerate() {
            if example.usage.is_empty() || example.help.is_empty() {
                return Err(ConfigError::IncompleteExample(index));
            }
        }

        Ok(())
    }

    /// Validate a single option descriptor.
    fn validate_option(&self, index: usize, option: &OptionSpec) -> Result<(), ConfigError> {
        if option.long.is_empty() {
            return Err(ConfigError::MissingLong(index));
        }

        let has_value_name = option.value_name.as_deref().is_some_and(|v| !v.is_empty());
        if option.kind != Kind::Bool && !option.positional && !has_value_name {
            return Err(ConfigError::MissingValueName(option.long.clone()));
        }

        let malformed = option.long.starts_with('-')
            || option.long.contains('=')
            || option.long.chars().any(char::is_whitespace);
        if malformed {
            return Err(ConfigError::InvalidLongOption(option.long.clone()));
        }

        if option.long == "help" {
            return Err(ConfigError::ReservedName("--help".to_string()));
        }

        if let Some(short) = option.short {
            if short == 'h' {
                return Err(ConfigError::ReservedName("-h".to_string()));
            }
            if !short.is_ascii_alphanumeric() {
                return Err(ConfigError::InvalidShortOption(short));
            }
        }

        if let Scope::Command(command) = option.scope {
            if command >= self.commands.len() {
                return Err(ConfigError::UnknownCommandScope {
                    long: option.long.clone(),
                    command: command.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_valid_schema() {
        let schema = Schema::builder()
            .command("run", "Run it")
            .command("debug", "Debug it")
            .option(OptionSpec::flag("warn").help("Enable warnings"))
            .option(
                OptionSpec::int("timeout")
                    .short('t')
                    .value_name("sec")
                    .required(),
            )
            .option(OptionSpec::flag("quiet").short('q').scope(Scope::Command(0)))
            .example("-t 10 --warn", "Set the timeout to 10s and enable warnings")
            .build()
            .unwrap();

        assert_eq!(schema.commands().len(), 2);
        assert_eq!(schema.options().len(), 3);
        assert_eq!(schema.examples().len(), 1);
        assert_eq!(schema.command_index("debug"), Some(1));
        assert_eq!(schema.command_index("missing"), None);
    }

    #[test]
    fn test_missing_long_fails() {
        let result = Schema::builder()
            .option(OptionSpec::flag("ok"))
            .option(OptionSpec::flag(""))
            .build();
        assert!(matches!(result, Err(ConfigError::MissingLong(1))));
    }

    #[test]
    fn test_missing_value_name_fails() {
        let result = Schema::builder().option(OptionSpec::string("iface")).build();
        match result {
            Err(ConfigError::MissingValueName(long)) => assert_eq!(long, "iface"),
            other => panic!("Expected MissingValueName, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_name_counts_as_missing() {
        let result = Schema::builder()
            .option(OptionSpec::uint("count").value_name(""))
            .build();
        assert!(matches!(result, Err(ConfigError::MissingValueName(_))));
    }

    #[test]
    fn test_positional_and_bool_need_no_value_name() {
        let result = Schema::builder()
            .option(OptionSpec::string("patchfile").positional().required())
            .option(OptionSpec::flag("nowrite"))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_command_fails() {
        let result = Schema::builder()
            .command("apply", "")
            .command("apply", "")
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateCommand(_))));
    }

    #[test]
    fn test_empty_command_name_fails() {
        let result = Schema::builder().command("", "nameless").build();
        assert!(matches!(result, Err(ConfigError::EmptyCommandName(0))));
    }

    #[test]
    fn test_duplicate_long_in_same_scope_fails() {
        let result = Schema::builder()
            .option(OptionSpec::flag("force"))
            .option(OptionSpec::flag("force").scope(Scope::Root))
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateLong(_))));
    }

    #[test]
    fn test_same_long_in_disjoint_scopes_is_allowed() {
        let result = Schema::builder()
            .command("apply", "")
            .command("restore", "")
            .option(OptionSpec::flag("force").scope(Scope::Command(0)))
            .option(OptionSpec::flag("force").scope(Scope::Command(1)))
            .option(OptionSpec::flag("dry").short('n').scope(Scope::Root))
            .option(OptionSpec::flag("no-backup").short('n').scope(Scope::Command(1)))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_short_fails() {
        let result = Schema::builder()
            .option(OptionSpec::flag("verbose").short('v'))
            .option(OptionSpec::flag("version").short('v'))
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateShort('v'))));
    }

    #[test]
    fn test_help_is_reserved() {
        let long = Schema::builder().option(OptionSpec::flag("help")).build();
        assert!(matches!(long, Err(ConfigError::ReservedName(_))));

        let short = Schema::builder()
            .option(OptionSpec::flag("host").short('h'))
            .build();
        assert!(matches!(short, Err(ConfigError::ReservedName(_))));
    }

    #[test]
    fn test_long_with_leading_dash_fails() {
        let result = Schema::builder().option(OptionSpec::flag("-x")).build();
        assert!(matches!(result, Err(ConfigError::InvalidLongOption(ref l)) if l == "-x"));
    }

    #[test]
    fn test_long_with_equals_fails() {
        let result = Schema::builder().option(OptionSpec::flag("a=b")).build();
        assert!(matches!(result, Err(ConfigError::InvalidLongOption(ref l)) if l == "a=b"));
    }

    #[test]
    fn test_long_with_whitespace_fails() {
        let result = Schema::builder()
            .option(OptionSpec::string("dry run").value_name("x"))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidLongOption(_))));

        let tab = Schema::builder().option(OptionSpec::flag("dry\trun")).build();
        assert!(matches!(tab, Err(ConfigError::InvalidLongOption(_))));
    }

    #[test]
    fn test_long_with_inner_dash_is_valid() {
        let result = Schema::builder().option(OptionSpec::flag("dry-run")).build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_auto_short_uses_first_letter() {
        let option = OptionSpec::string("interface").value_name("name").auto_short();
        assert_eq!(option.short, Some('i'));

        let schema = Schema::builder().option(option).build().unwrap();
        assert!(schema.options()[0].matches_key("-i"));
    }

    #[test]
    fn test_auto_short_reserved_letter_fails() {
        let result = Schema::builder()
            .option(OptionSpec::flag("host").auto_short())
            .build();
        assert!(matches!(result, Err(ConfigError::ReservedName(_))));
    }

    #[test]
    fn test_from_json_auto_short() {
        let schema = Schema::from_json(
            r#"{"options":[
                {"long":"interface","kind":"string","value_name":"name","auto_short":true},
                {"long":"timeout","kind":"int","value_name":"sec","short":"s","auto_short":true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(schema.options()[0].short, Some('i'));
        assert_eq!(schema.options()[1].short, Some('s'));
    }

    #[test]
    fn test_invalid_short_fails() {
        let result = Schema::builder()
            .option(OptionSpec::flag("dash").short('-'))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidShortOption('-'))));
    }

    #[test]
    fn test_scope_bound_to_unknown_command_fails() {
        let result = Schema::builder()
            .command("apply", "")
            .option(OptionSpec::flag("nowrite").scope(Scope::Command(1)))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::UnknownCommandScope { .. })
        ));
    }

    #[test]
    fn test_incomplete_example_fails() {
        let result = Schema::builder().example("-t 10", "").build();
        assert!(matches!(result, Err(ConfigError::IncompleteExample(0))));
    }

    #[test]
    fn test_scope_tags() {
        assert_eq!(Scope::Global.tag(), 0);
        assert_eq!(Scope::Root.tag(), 1);
        assert_eq!(Scope::Command(0).tag(), 2);
        assert_eq!(Scope::from_tag(0), Scope::Global);
        assert_eq!(Scope::from_tag(1), Scope::Root);
        assert_eq!(Scope::from_tag(5), Scope::Command(3));
    }

    #[test]
    fn test_scope_reachable() {
        assert!(Scope::Global.reachable(None));
        assert!(Scope::Global.reachable(Some(2)));
        assert!(Scope::Root.reachable(None));
        assert!(!Scope::Root.reachable(Some(0)));
        assert!(Scope::Command(1).reachable(Some(1)));
        assert!(!Scope::Command(1).reachable(Some(0)));
        assert!(!Scope::Command(1).reachable(None));
    }

    #[test]
    fn test_reachable_options_filters_by_scope() {
        let schema = Schema::builder()
            .command("apply", "")
            .option(OptionSpec::flag("global"))
            .option(OptionSpec::flag("root").scope(Scope::Root))
            .option(OptionSpec::flag("bound").scope(Scope::Command(0)))
            .build()
            .unwrap();

        let root: Vec<&str> = schema
            .reachable_options(None)
            .map(|o| o.long.as_str())
            .collect();
        assert_eq!(root, vec!["global", "root"]);

        let apply: Vec<&str> = schema
            .reachable_options(Some(0))
            .map(|o| o.long.as_str())
            .collect();
        assert_eq!(apply, vec!["global", "bound"]);
    }

    #[test]
    fn test_matches_key() {
        let option = OptionSpec::int("timeout").short('t');
        assert!(option.matches_key("--timeout"));
        assert!(option.matches_key("-t"));
        assert!(!option.matches_key("timeout"));
        assert!(!option.matches_key("-timeout"));
        assert!(!option.matches_key("--t"));
    }

    #[test]
    fn test_from_json_full_schema() {
        let json = r#"{
            "commands": [
                {"name": "apply", "help": "Apply a patch file"},
                {"name": "restore", "help": "Restore backed up files"}
            ],
            "options": [
                {
                    "long": "patchfile",
                    "kind": "string",
                    "required": true,
                    "positional": true,
                    "help": "The patch to apply"
                },
                {
                    "long": "nowrite",
                    "kind": "bool",
                    "scope": {"command": "apply"},
                    "help": "Only print substitutions"
                },
                {
                    "long": "timeout",
                    "short": "t",
                    "kind": "int",
                    "value_name": "sec",
                    "scope": "root"
                }
            ],
            "examples": [
                {"usage": "apply fixes.patc", "help": "Apply fixes"}
            ],
            "settings": {"allow_binary": false}
        }"#;

        let schema = Schema::from_json(json).unwrap();
        assert_eq!(schema.commands()[1].name, "restore");
        assert_eq!(schema.options()[0].kind, Kind::Str);
        assert!(schema.options()[0].positional);
        assert_eq!(schema.options()[1].scope, Scope::Command(0));
        assert_eq!(schema.options()[2].scope, Scope::Root);
        assert_eq!(schema.options()[2].short, Some('t'));
        assert!(schema.settings().allow_hex);
        assert!(!schema.settings().allow_binary);
        assert_eq!(
            schema.settings().max_string_len,
            Some(DEFAULT_MAX_STRING_LEN)
        );
    }

    #[test]
    fn test_from_json_scope_by_index() {
        let json = r#"{
            "commands": [{"name": "run"}],
            "options": [{"long": "quiet", "kind": "flag", "scope": {"command": 0}}]
        }"#;
        let schema = Schema::from_json(json).unwrap();
        assert_eq!(schema.options()[0].scope, Scope::Command(0));
    }

    #[test]
    fn test_from_json_unknown_command_name() {
        let json = r#"{
            "commands": [{"name": "run"}],
            "options": [{"long": "quiet", "kind": "bool", "scope": {"command": "walk"}}]
        }"#;
        match Schema::from_json(json) {
            Err(ConfigError::UnknownCommandScope { long, command }) => {
                assert_eq!(long, "quiet");
                assert_eq!(command, "walk");
            }
            other => panic!("Expected UnknownCommandScope, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"{"options": [{"long": "iface", "kind": "string"}]}"#;
        assert!(matches!(
            Schema::from_json(json),
            Err(ConfigError::MissingValueName(_))
        ));
    }

    #[test]
    fn test_from_json_invalid_json() {
        let result = Schema::from_json("not json");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_json_unbounded_strings() {
        let json = r#"{"settings": {"max_string_len": null}}"#;
        let schema = Schema::from_json(json).unwrap();
        assert_eq!(schema.settings().max_string_len, None);
    }

    #[test]
    fn test_empty_schema_is_valid() {
        let schema = Schema::from_json("{}").unwrap();
        assert!(schema.options().is_empty());
        assert!(schema.commands().is_empty());
    }
}
