use super::error::GatewayError;
use super::fund::{FundFamily, PurchaseConfirmation, PurchasedPosition, Scheme};
use async_trait::async_trait;

/// Typed operations against the fund backend.
#[async_trait]
pub trait FundGateway: Send + Sync {
    async fn list_families(&self) -> Result<Vec<FundFamily>, GatewayError>;

    async fn list_schemes(&self, family_id: &str) -> Result<Vec<Scheme>, GatewayError>;

    async fn list_positions(&self) -> Result<Vec<PurchasedPosition>, GatewayError>;

    /// Latest unit value for a scheme, looked up by name.
    async fn fetch_current_value(&self, scheme_name: &str) -> Result<f64, GatewayError>;

    async fn purchase(
        &self,
        scheme_code: &str,
        units: u32,
    ) -> Result<PurchaseConfirmation, GatewayError>;
}
