use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mfdash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Commands {
    /// `None` for commands that run without config or a backend.
    fn into_app_command(self) -> Option<mfdash::AppCommand> {
        use mfdash::AppCommand;
        Some(match self {
            Commands::Setup => return None,
            Commands::Login { token } => AppCommand::Login { token },
            Commands::Logout => AppCommand::Logout,
            Commands::Families => AppCommand::Families,
            Commands::Schemes { family } => AppCommand::Schemes { family },
            Commands::Positions => AppCommand::Positions,
            Commands::Buy { scheme_code, units } => AppCommand::Buy { scheme_code, units },
            Commands::Refresh => AppCommand::Refresh,
            Commands::Watch => AppCommand::Watch,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Store a session token issued by the backend
    Login {
        #[arg(short, long)]
        token: String,
    },
    /// Forget the stored session token
    Logout,
    /// List fund families
    Families,
    /// List the schemes of a fund family
    Schemes { family: String },
    /// Show purchased funds
    Positions,
    /// Buy units of a scheme
    Buy {
        scheme_code: String,
        /// Units to buy, defaults to purchase.default_units
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        units: Option<u32>,
    },
    /// Refresh purchased fund values once
    Refresh,
    /// Keep refreshing purchased fund values until Ctrl-C
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.map(Commands::into_app_command) {
        Some(Some(command)) => mfdash::run_command(command, cli.config_path.as_deref()).await,
        Some(None) => mfdash::cli::setup::setup(),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}
