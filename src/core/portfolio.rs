//! Purchased positions and their revaluation.

use super::error::GatewayError;
use super::fund::{PurchasedPosition, merge_value};
use super::gateway::FundGateway;
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Outcome of one revaluation cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub updated: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Default)]
struct PortfolioState {
    positions: Vec<PurchasedPosition>,
    closed: bool,
}

/// Owns the position list. Every mutation goes through the one mutex, so a
/// reload and a refresh merge never lose each other's writes.
pub struct Portfolio {
    gateway: Arc<dyn FundGateway>,
    state: Mutex<PortfolioState>,
}

impl Portfolio {
    pub fn new(gateway: Arc<dyn FundGateway>) -> Self {
        Portfolio {
            gateway,
            state: Mutex::new(PortfolioState::default()),
        }
    }

    pub async fn positions(&self) -> Vec<PurchasedPosition> {
        self.state.lock().await.positions.clone()
    }

    /// Replaces the list with a fresh snapshot from the backend. On failure
    /// the previous snapshot stays.
    pub async fn reload(&self) -> Result<usize, GatewayError> {
        if self.is_closed().await {
            return Ok(0);
        }
        let result = self.gateway.list_positions().await;

        let mut state = self.state.lock().await;
        if state.closed {
            debug!("Portfolio closed, dropping reloaded positions");
            return Ok(0);
        }
        match result {
            Ok(positions) => {
                debug!(count = positions.len(), "Positions reloaded");
                let count = positions.len();
                state.positions = positions;
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Failed to reload positions");
                Err(e)
            }
        }
    }

    pub async fn refresh_values(&self) -> RefreshReport {
        self.refresh_values_with_progress(&|| {}).await
    }

    /// Fetches the current value of every scheme held when the cycle starts,
    /// all at once, and merges each result as soon as it arrives. A failing
    /// scheme keeps its old value and does not hold back the others.
    pub async fn refresh_values_with_progress(
        &self,
        on_fetched: &(dyn Fn() + Send + Sync),
    ) -> RefreshReport {
        let scheme_names: BTreeSet<String> = {
            let state = self.state.lock().await;
            if state.closed {
                return RefreshReport::default();
            }
            state
                .positions
                .iter()
                .map(|p| p.scheme_name.clone())
                .collect()
        };
        debug!(count = scheme_names.len(), "Refreshing scheme values");

        let fetches = scheme_names.into_iter().map(|name| async move {
            let result = self.gateway.fetch_current_value(&name).await;
            on_fetched();
            let mut state = self.state.lock().await;
            if state.closed {
                return (name, None);
            }
            let outcome = match result {
                Ok(value) => {
                    let merged = merge_value(&mut state.positions, &name, value);
                    debug!(scheme = %name, value, merged, "Merged scheme value");
                    Ok(())
                }
                Err(e) => {
                    warn!(scheme = %name, error = %e, kind = e.kind(), "Failed to fetch scheme value");
                    Err(e.to_string())
                }
            };
            (name, Some(outcome))
        });

        let mut report = RefreshReport::default();
        for (name, outcome) in join_all(fetches).await {
            match outcome {
                Some(Ok(())) => report.updated.push(name),
                Some(Err(reason)) => report.failed.push((name, reason)),
                None => {}
            }
        }
        report
    }

    /// After this no reload or merge is applied.
    pub async fn close(&self) {
        self.state.lock().await.closed = true;
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FakeGateway;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn positions() -> Vec<PurchasedPosition> {
        vec![
            PurchasedPosition::new("Alpha", 1.0, 10.0),
            PurchasedPosition::new("Beta", 2.0, 20.0),
            PurchasedPosition::new("Gamma", 3.0, 30.0),
        ]
    }

    #[tokio::test]
    async fn test_reload_replaces_snapshot() {
        let gateway = Arc::new(FakeGateway::with_positions(positions()));
        let portfolio = Portfolio::new(gateway);

        assert_eq!(portfolio.reload().await.unwrap(), 3);
        assert_eq!(portfolio.positions().await, positions());
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_previous_snapshot() {
        let gateway = Arc::new(FakeGateway::with_positions(positions()));
        let portfolio = Portfolio::new(gateway.clone());
        portfolio.reload().await.unwrap();

        let mut failing = FakeGateway::with_positions(Vec::new());
        failing.positions_error = Some(GatewayError::Backend(
            "Failed to fetch purchased funds".to_string(),
        ));
        let portfolio = Portfolio {
            gateway: Arc::new(failing),
            state: Mutex::new(PortfolioState {
                positions: portfolio.positions().await,
                closed: false,
            }),
        };

        let err = portfolio.reload().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch purchased funds");
        assert_eq!(portfolio.positions().await, positions());
    }

    #[tokio::test]
    async fn test_refresh_isolates_failures() {
        let mut fake = FakeGateway::with_positions(positions());
        fake.values.insert("Alpha".to_string(), Ok(11.0));
        fake.values.insert(
            "Beta".to_string(),
            Err(GatewayError::Backend("Scheme not found".to_string())),
        );
        fake.values.insert("Gamma".to_string(), Ok(33.0));
        let portfolio = Portfolio::new(Arc::new(fake));
        portfolio.reload().await.unwrap();

        let report = portfolio.refresh_values().await;

        assert_eq!(report.updated, vec!["Alpha".to_string(), "Gamma".to_string()]);
        assert_eq!(
            report.failed,
            vec![("Beta".to_string(), "Scheme not found".to_string())]
        );
        let positions = portfolio.positions().await;
        assert_eq!(positions.len(), 3);
        assert_eq!(positions[0].value, Some(11.0));
        assert_eq!(positions[1].value, Some(20.0));
        assert_eq!(positions[2].value, Some(33.0));
    }

    #[tokio::test]
    async fn test_refresh_fetches_each_scheme_once() {
        let mut fake = FakeGateway::with_positions(vec![
            PurchasedPosition::new("Alpha", 1.0, 10.0),
            PurchasedPosition::new("Alpha", 1.0, 10.0),
        ]);
        fake.values.insert("Alpha".to_string(), Ok(12.5));
        let gateway = Arc::new(fake);
        let portfolio = Portfolio::new(gateway.clone());
        portfolio.reload().await.unwrap();

        let fetched = AtomicUsize::new(0);
        portfolio
            .refresh_values_with_progress(&|| {
                fetched.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert_eq!(FakeGateway::calls(&gateway.value_calls), 1);
        assert_eq!(fetched.load(Ordering::SeqCst), 1);
        assert!(portfolio.positions().await.iter().all(|p| p.value == Some(12.5)));
    }

    #[tokio::test]
    async fn test_closed_portfolio_ignores_updates() {
        let mut fake = FakeGateway::with_positions(positions());
        fake.values.insert("Alpha".to_string(), Ok(99.0));
        let gateway = Arc::new(fake);
        let portfolio = Portfolio::new(gateway.clone());
        portfolio.reload().await.unwrap();
        portfolio.close().await;

        let report = portfolio.refresh_values().await;
        assert_eq!(report, RefreshReport::default());
        assert_eq!(portfolio.reload().await.unwrap(), 0);
        assert_eq!(portfolio.positions().await, positions());
        assert_eq!(FakeGateway::calls(&gateway.value_calls), 0);
        assert_eq!(FakeGateway::calls(&gateway.position_calls), 1);
    }

    #[tokio::test]
    async fn test_position_added_mid_cycle_waits_for_next_cycle() {
        let mut fake =
            FakeGateway::with_positions(vec![PurchasedPosition::new("Alpha", 1.0, 10.0)]);
        fake.values.insert("Alpha".to_string(), Ok(11.0));
        fake.values.insert("New".to_string(), Ok(6.0));
        fake.value_delay = Some(Duration::from_millis(100));
        let gateway = Arc::new(fake);
        let portfolio = Arc::new(Portfolio::new(gateway.clone()));
        portfolio.reload().await.unwrap();

        let cycle = {
            let portfolio = portfolio.clone();
            tokio::spawn(async move { portfolio.refresh_values().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        gateway
            .positions
            .lock()
            .unwrap()
            .push(PurchasedPosition::new("New", 2.0, 5.0));
        assert_eq!(portfolio.reload().await.unwrap(), 2);

        let report = cycle.await.unwrap();
        assert_eq!(report.updated, vec!["Alpha".to_string()]);
        assert_eq!(FakeGateway::calls(&gateway.value_calls), 1);
        let positions = portfolio.positions().await;
        assert_eq!(positions[0].value, Some(11.0));
        assert_eq!(positions[1].scheme_name, "New");
        assert_eq!(positions[1].value, Some(5.0));

        let report = portfolio.refresh_values().await;
        assert_eq!(report.updated, vec!["Alpha".to_string(), "New".to_string()]);
        assert_eq!(FakeGateway::calls(&gateway.value_calls), 3);
        assert_eq!(portfolio.positions().await[1].value, Some(6.0));
    }
}
