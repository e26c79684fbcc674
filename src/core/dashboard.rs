//! The dashboard screen: browser, portfolio and purchases under one lifecycle.

use super::browser::FundBrowser;
use super::fund::FundFamily;
use super::gateway::FundGateway;
use super::portfolio::{Portfolio, RefreshReport};
use super::purchase::PurchaseWorkflow;
use super::refresh::RefreshTask;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub refresh_interval: Duration,
    pub default_units: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            refresh_interval: Duration::from_secs(60 * 60),
            default_units: 1,
        }
    }
}

pub struct Dashboard {
    pub browser: FundBrowser,
    pub portfolio: Arc<Portfolio>,
    pub purchases: PurchaseWorkflow,
    families: Vec<FundFamily>,
    errors: Vec<String>,
    refresh: Option<RefreshTask>,
}

impl Dashboard {
    /// Loads families and positions in parallel and starts the refresh loop.
    /// Load failures are kept as messages; the dashboard still opens.
    pub async fn open(
        gateway: Arc<dyn FundGateway>,
        settings: &DashboardSettings,
        reports: Option<mpsc::UnboundedSender<RefreshReport>>,
    ) -> Self {
        let portfolio = Arc::new(Portfolio::new(gateway.clone()));

        let (families, positions) = tokio::join!(gateway.list_families(), portfolio.reload());

        let mut errors = Vec::new();
        let families = families.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load fund families");
            errors.push(e.to_string());
            Vec::new()
        });
        if let Err(e) = positions {
            errors.push(e.to_string());
        }
        debug!(families = families.len(), "Dashboard opened");

        let refresh = RefreshTask::spawn(portfolio.clone(), settings.refresh_interval, reports);

        Dashboard {
            browser: FundBrowser::new(gateway.clone()),
            purchases: PurchaseWorkflow::new(gateway, portfolio.clone(), settings.default_units),
            portfolio,
            families,
            errors,
            refresh: Some(refresh),
        }
    }

    pub fn families(&self) -> &[FundFamily] {
        &self.families
    }

    /// Messages from the startup loads.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Stops the refresh loop and freezes the portfolio.
    pub async fn close(mut self) {
        self.portfolio.close().await;
        if let Some(refresh) = self.refresh.take() {
            refresh.cancel().await;
        }
        debug!("Dashboard closed");
    }
}
