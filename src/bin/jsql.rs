//! jsql: compile JSON query documents to SQL.
//!
//! ```bash
//! jsql '{"$select": {"$from": "people", "$where": {"id": 7}}}'
//! jsql --dialect postgres --file query.json --format json
//! cat query.json | jsql --file -
//! jsql operators --dialect mysql
//! jsql syntax '$select'
//! ```

use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use jsql::config::{Config, OutputFormat};
use jsql::prelude::*;

#[derive(Parser)]
#[command(name = "jsql")]
#[command(version)]
#[command(about = "Compile JSON query documents to parameterised SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    jsql '{\"$select\": {\"$from\": \"people\"}}'
    jsql --dialect mysql --file query.json
    jsql operators --dialect postgres")]
struct Cli {
    /// The query document as JSON
    query: Option<String>,

    /// Read the query from a file (`-` for stdin)
    #[arg(short = 'F', long, conflicts_with = "query")]
    file: Option<String>,

    /// SQL dialect: ansi, mysql, postgresql
    #[arg(short, long, env = "JSQL_DIALECT", global = true)]
    dialect: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the operators a dialect resolves
    Operators,
    /// Print a dialect's grammar for a statement template
    Syntax {
        /// Template name, e.g. '$select'; omit to list all
        name: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load().context("Failed to load configuration")?;
    let dialect = cli
        .dialect
        .clone()
        .or(config.dialect)
        .unwrap_or_else(|| "ansi".to_string());
    let builder = SqlBuilder::new(&dialect)?;

    match &cli.command {
        Some(Commands::Operators) => {
            show_operators(builder.dialect());
            Ok(())
        }
        Some(Commands::Syntax { name }) => show_syntax(builder.dialect(), name.as_deref()),
        None => {
            let format = cli.format.or(config.format).unwrap_or_default();
            compile(cli, &builder, format)
        }
    }
}

fn read_query(cli: &Cli) -> Result<String> {
    match (&cli.query, cli.file.as_deref()) {
        (Some(query), _) => Ok(query.clone()),
        (None, Some("-")) => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
        (None, Some(path)) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
        (None, None) => bail!("No query given. Try: jsql --help"),
    }
}

fn compile(cli: &Cli, builder: &SqlBuilder, format: OutputFormat) -> Result<()> {
    let input = read_query(cli)?;
    let query: Value = serde_json::from_str(&input).context("Query is not valid JSON")?;
    let result = builder.build(&query)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            if cli.verbose {
                println!("{} {}", "Dialect:".dimmed(), builder.dialect().name().yellow());
            }
            println!("{}", result.sql.white().bold());
            if !result.values.is_empty() {
                println!();
                println!("{}", "Bindings:".cyan());
                for (i, value) in result.values.iter().enumerate() {
                    println!("  {} = {}", format!("#{}", i + 1).dimmed(), value.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn show_operators(dialect: &Dialect) {
    println!("{} {}", "Operators for".cyan().bold(), dialect.name().yellow().bold());
    println!();
    let registry = dialect.registry();
    for name in registry.names() {
        let Ok(spec) = registry.resolve(&name) else {
            continue;
        };
        let kind = match spec.kind() {
            OperatorKind::Statement => "statement".green(),
            OperatorKind::Clause => "clause".normal(),
            OperatorKind::Flag => "flag".cyan(),
        };
        let origin = if registry.owns(&name) {
            "".normal()
        } else {
            "(inherited)".dimmed()
        };
        println!("  {:<16} {:<10} {}", name, kind, origin);
    }
}

fn show_syntax(dialect: &Dialect, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let template = dialect.syntax(name)?;
            println!("{}", template.grammar());
        }
        None => {
            for name in dialect.syntax_names() {
                let template = dialect.syntax(name)?;
                println!("{:<14} {}", name.cyan(), template.grammar().dimmed());
            }
        }
    }
    Ok(())
}
