pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "switchboard",
    about = "Switchboard operator CLI",
    long_about = "Inspect Switchboard configuration, the operation catalog, and message \
                  classification without starting the server.",
    after_help = "Examples:\n  switchboard doctor --json\n  switchboard catalog --platform meraki\n  switchboard classify \"list all meraki switches\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "List the registered operation catalog, optionally for one platform")]
    Catalog {
        #[arg(long, help = "Restrict the listing to one platform (spaces|catalyst|meraki|webex)")]
        platform: Option<String>,
    },
    #[command(about = "Show how a message would be classified for retrieval")]
    Classify {
        message: String,
        #[arg(long, help = "Explicit domain hint, as a caller would supply it")]
        domain: Option<String>,
    },
    #[command(about = "Validate config, registry construction, and platform gate readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Catalog { platform } => commands::catalog::run(platform.as_deref()),
        Command::Classify { message, domain } => {
            commands::CommandResult {
                exit_code: 0,
                output: commands::classify::run(&message, domain.as_deref()),
            }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
