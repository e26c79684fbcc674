//! Buying units of a scheme and reconciling the position list afterwards.

use super::error::GatewayError;
use super::fund::PurchaseConfirmation;
use super::gateway::FundGateway;
use super::portfolio::Portfolio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// What the user is told after pressing buy.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Completed {
        confirmation: PurchaseConfirmation,
        /// Set when the purchase went through but the position list could
        /// not be reloaded afterwards.
        reload_error: Option<String>,
    },
    Failed(GatewayError),
}

impl PurchaseOutcome {
    pub fn message(&self) -> String {
        match self {
            PurchaseOutcome::Completed { confirmation, .. } => confirmation.message.clone(),
            PurchaseOutcome::Failed(e) => format!("Error: {e}"),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PurchaseOutcome::Completed { .. })
    }
}

// Clears the in-flight flag however the purchase ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PurchaseWorkflow {
    gateway: Arc<dyn FundGateway>,
    portfolio: Arc<Portfolio>,
    default_units: u32,
    in_flight: AtomicBool,
}

impl PurchaseWorkflow {
    pub fn new(
        gateway: Arc<dyn FundGateway>,
        portfolio: Arc<Portfolio>,
        default_units: u32,
    ) -> Self {
        PurchaseWorkflow {
            gateway,
            portfolio,
            default_units,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn default_units(&self) -> u32 {
        self.default_units
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Buys `units` (or the configured default) of `scheme_code`. Only one
    /// purchase may be in flight; a second submit is rejected without
    /// reaching the backend. The position list is reloaded only on success.
    pub async fn buy(&self, scheme_code: &str, units: Option<u32>) -> PurchaseOutcome {
        let units = units.unwrap_or(self.default_units);
        if let Err(e) = validate(scheme_code, units) {
            return PurchaseOutcome::Failed(e);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(scheme_code, "Rejecting purchase while another is in flight");
            return PurchaseOutcome::Failed(GatewayError::Validation(
                "A purchase is already in progress".to_string(),
            ));
        }
        let _guard = InFlight(&self.in_flight);

        let confirmation = match self.gateway.purchase(scheme_code, units).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                warn!(scheme_code, units, error = %e, kind = e.kind(), "Purchase failed");
                return PurchaseOutcome::Failed(e);
            }
        };
        info!(scheme_code, units, message = %confirmation.message, "Purchase confirmed");

        let reload_error = self.portfolio.reload().await.err().map(|e| e.to_string());
        PurchaseOutcome::Completed {
            confirmation,
            reload_error,
        }
    }
}

fn validate(scheme_code: &str, units: u32) -> Result<(), GatewayError> {
    if scheme_code.trim().is_empty() {
        return Err(GatewayError::Validation(
            "Scheme code must not be empty".to_string(),
        ));
    }
    if units == 0 {
        return Err(GatewayError::Validation(
            "Units must be a positive whole number".to_string(),
        ));
    }
    Ok(())
}
