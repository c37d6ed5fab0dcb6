//! scopearg - Scope-aware command-line argument parsing.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use scopearg::{evaluate, generate_help, Schema};

/// Program name used in diagnostics when --name is not given.
const DEFAULT_PROGRAM: &str = "scopearg";

/// Parse arguments against a JSON schema of options and subcommands.
#[derive(Parser, Debug)]
#[command(name = "scopearg", version, about, disable_help_subcommand = true)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse arguments and print the matched values as JSON
    Parse {
        /// JSON schema, or @path to read it from a file
        #[arg(long)]
        schema: String,

        /// Program name used in diagnostics and help
        #[arg(long)]
        name: Option<String>,

        /// Arguments to parse, starting after the program name
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print help text for a schema
    Help {
        /// JSON schema, or @path to read it from a file
        #[arg(long)]
        schema: String,

        /// Program name used in the help text
        #[arg(long)]
        name: Option<String>,

        /// Show help for this subcommand instead of the root
        #[arg(long = "for")]
        command: Option<String>,
    },
}

fn load_schema(source: &str) -> Result<Schema> {
    match source.strip_prefix('@') {
        Some(path) => {
            Schema::from_file(path).with_context(|| format!("failed to load schema from {}", path))
        }
        None => Schema::from_json(source).context("invalid schema"),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { schema, name, args } => {
            let schema = load_schema(&schema)?;
            let program = name.as_deref().unwrap_or(DEFAULT_PROGRAM);

            let argv: Vec<&str> = std::iter::once(program)
                .chain(args.iter().map(String::as_str))
                .collect();

            match evaluate(&schema, &argv) {
                Ok(matches) => {
                    let json = serde_json::to_string_pretty(&matches)
                        .context("failed to serialize matches")?;
                    println!("{}", json);
                }
                Err(exit) if exit.code == 0 => print!("{}", exit.text),
                Err(exit) => {
                    eprint!("{}", exit.text);
                    std::process::exit(exit.code);
                }
            }
        }
        Commands::Help {
            schema,
            name,
            command,
        } => {
            let schema = load_schema(&schema)?;
            let program = name.as_deref().unwrap_or(DEFAULT_PROGRAM);

            let subcommand = match command {
                Some(ref c) => match schema.command_index(c) {
                    Some(index) => Some(index),
                    None => bail!("unknown command: {}", c),
                },
                None => None,
            };

            print!("{}", generate_help(&schema, subcommand, program));
        }
    }

    Ok(())
}
