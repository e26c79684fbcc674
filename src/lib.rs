pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::portfolio::Portfolio;
use crate::core::purchase::PurchaseWorkflow;
use crate::core::{FundGateway, Session};
use crate::providers::HttpGateway;
use crate::store::TokenStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Login { token: String },
    Logout,
    Families,
    Schemes { family: String },
    Positions,
    Buy { scheme_code: String, units: Option<u32> },
    Refresh,
    Watch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("mfdash starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let token_store = store::open_token_store(&config)?;
    execute(command, &config, token_store).await
}

/// Runs a command against an already opened token store.
pub async fn execute(
    command: AppCommand,
    config: &AppConfig,
    token_store: Arc<dyn TokenStore>,
) -> Result<()> {
    let session = Arc::new(Session::new());
    if let Some(token) = token_store.load().await? {
        session.begin(token);
    }
    if !session.is_active() {
        debug!("No stored token, requests will be rejected until `mfdash login`");
    }

    let gateway = || -> Result<Arc<dyn FundGateway>> {
        Ok(Arc::new(HttpGateway::new(&config.backend, session.clone())?))
    };

    match command {
        AppCommand::Login { token } => {
            cli::session::login(token_store.as_ref(), &session, &token).await
        }
        AppCommand::Logout => cli::session::logout(token_store.as_ref(), &session).await,
        AppCommand::Families => cli::browse::families(gateway()?.as_ref()).await,
        AppCommand::Schemes { family } => cli::browse::schemes(gateway()?, &family).await,
        AppCommand::Positions => cli::positions::show(&Portfolio::new(gateway()?)).await,
        AppCommand::Refresh => cli::positions::refresh(&Portfolio::new(gateway()?)).await,
        AppCommand::Buy { scheme_code, units } => {
            let gateway = gateway()?;
            let portfolio = Arc::new(Portfolio::new(gateway.clone()));
            let workflow =
                PurchaseWorkflow::new(gateway, portfolio.clone(), config.purchase.default_units);
            cli::buy::run(&workflow, &scheme_code, units).await?;
            cli::positions::print_positions(&portfolio.positions().await);
            Ok(())
        }
        AppCommand::Watch => cli::watch::run(gateway()?, &config.dashboard_settings()).await,
    }
}
