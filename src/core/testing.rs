//! In-process gateway used by the workflow tests.

use super::error::GatewayError;
use super::fund::{FundFamily, PurchaseConfirmation, PurchasedPosition, Scheme};
use super::gateway::FundGateway;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeGateway {
    pub families: Vec<FundFamily>,
    pub schemes: HashMap<String, Vec<Scheme>>,
    pub scheme_delays: HashMap<String, Duration>,
    pub positions: Mutex<Vec<PurchasedPosition>>,
    pub positions_error: Option<GatewayError>,
    pub values: HashMap<String, Result<f64, GatewayError>>,
    pub value_delay: Option<Duration>,
    pub purchase_result: Option<Result<PurchaseConfirmation, GatewayError>>,
    pub purchase_delay: Option<Duration>,
    pub scheme_calls: AtomicUsize,
    pub position_calls: AtomicUsize,
    pub value_calls: AtomicUsize,
    pub purchase_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn with_positions(positions: Vec<PurchasedPosition>) -> Self {
        FakeGateway {
            positions: Mutex::new(positions),
            ..Default::default()
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FundGateway for FakeGateway {
    async fn list_families(&self) -> Result<Vec<FundFamily>, GatewayError> {
        Ok(self.families.clone())
    }

    async fn list_schemes(&self, family_id: &str) -> Result<Vec<Scheme>, GatewayError> {
        self.scheme_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.scheme_delays.get(family_id) {
            tokio::time::sleep(*delay).await;
        }
        self.schemes
            .get(family_id)
            .cloned()
            .ok_or_else(|| GatewayError::Backend("Failed to fetch schemes".to_string()))
    }

    async fn list_positions(&self) -> Result<Vec<PurchasedPosition>, GatewayError> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.positions_error {
            return Err(err.clone());
        }
        Ok(self.positions.lock().unwrap().clone())
    }

    async fn fetch_current_value(&self, scheme_name: &str) -> Result<f64, GatewayError> {
        self.value_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.value_delay {
            tokio::time::sleep(delay).await;
        }
        self.values
            .get(scheme_name)
            .cloned()
            .unwrap_or_else(|| Err(GatewayError::Backend("Scheme not found".to_string())))
    }

    async fn purchase(
        &self,
        scheme_code: &str,
        units: u32,
    ) -> Result<PurchaseConfirmation, GatewayError> {
        self.purchase_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.purchase_delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.purchase_result.clone().unwrap_or_else(|| {
            Ok(PurchaseConfirmation {
                message: format!("Purchased {units} units of {scheme_code}"),
                current_value: None,
            })
        });
        if result.is_ok() {
            self.positions
                .lock()
                .unwrap()
                .push(PurchasedPosition::new(scheme_code, units as f64, 0.0));
        }
        result
    }
}
