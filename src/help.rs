//! Help text generation using Clap.

use crate::config::{Kind, OptionSpec, Schema};
use clap::{Arg, ArgAction, Command};

/// Build a Clap Command showing what is reachable under `subcommand`.
fn build_command(schema: &Schema, subcommand: Option<usize>, program: &str) -> Command {
    let mut cmd = Command::new(program.to_string())
        .disable_help_subcommand(true)
        .disable_version_flag(true);

    if let Some(index) = subcommand {
        let spec = &schema.commands()[index];
        cmd = cmd.bin_name(format!("{} {}", program, spec.name));
        if !spec.help.is_empty() {
            cmd = cmd.about(spec.help.clone());
        }
    }

    // Positionals may only be marked required while every earlier one is,
    // Clap rejects a required positional after an optional one.
    let mut positional_index = 1usize;
    let mut required_prefix = true;

    for option in schema.reachable_options(subcommand) {
        let arg = if option.positional {
            required_prefix &= option.required;
            let arg = build_positional(option, positional_index, required_prefix);
            positional_index += 1;
            arg
        } else {
            build_named(option)
        };
        cmd = cmd.arg(arg);
    }

    // The command list is only shown at the root
    if subcommand.is_none() {
        for spec in schema.commands() {
            let mut sub = Command::new(spec.name.clone());
            if !spec.help.is_empty() {
                sub = sub.about(spec.help.clone());
            }
            cmd = cmd.subcommand(sub);
        }
    }

    let after_help = build_after_help(schema, program, subcommand.is_none());
    if !after_help.is_empty() {
        cmd = cmd.after_help(after_help);
    }

    cmd
}

/// Build a Clap Arg for an option matched by name.
fn build_named(option: &OptionSpec) -> Arg {
    let mut arg = Arg::new(option.long.clone()).long(option.long.clone());

    if let Some(short) = option.short {
        arg = arg.short(short);
    }

    if option.kind == Kind::Bool {
        arg = arg.action(ArgAction::SetTrue);
    } else {
        arg = arg.action(ArgAction::Set);
        if let Some(ref value_name) = option.value_name {
            arg = arg.value_name(value_name.clone());
        }
    }

    if option.required {
        arg = arg.required(true);
    }

    if !option.help.is_empty() {
        arg = arg.help(option.help.clone());
    }

    arg
}

/// Build a Clap Arg for a positional option.
fn build_positional(option: &OptionSpec, index: usize, required: bool) -> Arg {
    let value_name = option
        .value_name
        .clone()
        .unwrap_or_else(|| option.long.clone());

    let mut arg = Arg::new(option.long.clone())
        .index(index)
        .action(ArgAction::Set)
        .value_name(value_name)
        .required(required);

    if !option.help.is_empty() {
        arg = arg.help(option.help.clone());
    }

    arg
}

/// Examples and, at the root, the per-command help hint.
fn build_after_help(schema: &Schema, program: &str, root: bool) -> String {
    let mut text = String::new();

    if !schema.examples().is_empty() {
        let width = schema
            .examples()
            .iter()
            .map(|e| e.usage.len())
            .max()
            .unwrap_or(0);

        text.push_str("Examples:\n");
        for example in schema.examples() {
            text.push_str(&format!(
                "  {} {:<width$}  {}\n",
                program,
                example.usage,
                example.help,
                width = width
            ));
        }
    }

    if root && !schema.commands().is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&format!(
            "Use `{} [command] --help` to get help for a specific command",
            program
        ));
    }

    text
}

/// Generate the full help text for the given subcommand context.
///
/// The `program` parameter is the program name (normally `argv[0]`).
pub fn generate_help(schema: &Schema, subcommand: Option<usize>, program: &str) -> String {
    let mut cmd = build_command(schema, subcommand, program);
    cmd.render_help().to_string()
}

/// Generate the one-line usage for the given subcommand context.
pub fn generate_usage(schema: &Schema, subcommand: Option<usize>, program: &str) -> String {
    let mut cmd = build_command(schema, subcommand, program);
    cmd.render_usage().to_string()
}
