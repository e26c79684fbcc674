use super::{positions, ui};
use crate::core::{Dashboard, DashboardSettings, FundGateway};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Keeps the dashboard open, printing positions after every refresh cycle,
/// until Ctrl-C.
pub async fn run(gateway: Arc<dyn FundGateway>, settings: &DashboardSettings) -> Result<()> {
    let (tx, mut reports) = mpsc::unbounded_channel();
    let dashboard = Dashboard::open(gateway, settings, Some(tx)).await;

    for error in dashboard.errors() {
        println!("{}", ui::style_text(error, ui::StyleType::Error));
    }
    println!(
        "{} fund families available. Refreshing every {}s, Ctrl-C to stop.",
        dashboard.families().len(),
        settings.refresh_interval.as_secs()
    );
    println!(
        "{}",
        positions::positions_table(&dashboard.portfolio.positions().await)
    );

    let result = loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                break signal.context("Failed to listen for Ctrl-C");
            }
            Some(report) = reports.recv() => {
                let stamp = chrono::Local::now().format("%H:%M:%S").to_string();
                println!("\n{}", ui::separator(&stamp));
                println!(
                    "{}",
                    positions::positions_table(&dashboard.portfolio.positions().await)
                );
                println!("\n{}", positions::report_summary(&report));
            }
        }
    };

    info!("Closing dashboard");
    dashboard.close().await;
    result
}
