use super::util::with_retry;
use crate::core::config::BackendConfig;
use crate::core::error::GatewayError;
use crate::core::fund::{
    FamiliesResponse, FundFamily, PurchaseConfirmation, PurchaseRequest, PurchasedPosition,
    Scheme, SchemeValueResponse,
};
use crate::core::gateway::FundGateway;
use crate::core::session::{Session, SessionToken};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const FAMILIES_FALLBACK: &str = "Failed to fetch fund families";
const SCHEMES_FALLBACK: &str = "Failed to fetch schemes";
const POSITIONS_FALLBACK: &str = "Failed to fetch purchased funds";
const VALUE_FALLBACK: &str = "Failed to fetch scheme value";
const PURCHASE_FALLBACK: &str = "Failed to purchase fund";
const AUTH_FALLBACK: &str = "Could not validate credentials";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Gateway talking to the fund backend over HTTP with bearer authentication.
pub struct HttpGateway {
    base_url: Url,
    client: Client,
    session: Arc<Session>,
    retries: usize,
    retry_delay_ms: u64,
}

impl HttpGateway {
    pub fn new(config: &BackendConfig, session: Arc<Session>) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid backend base_url: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Backend base_url cannot carry a path: {base_url}"));
        }

        let client = Client::builder()
            .user_agent("mfdash/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpGateway {
            base_url,
            client,
            session,
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base url always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder, token: &SessionToken) -> RequestBuilder {
        request
            .bearer_auth(token.expose())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        fallback: &str,
    ) -> Result<T, GatewayError> {
        let token = self.session.token()?;
        debug!("Requesting {}", url);
        with_retry(
            || self.execute(self.authorized(self.client.get(url.clone()), &token), fallback),
            self.retries,
            self.retry_delay_ms,
        )
        .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let is_auth = status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
        let reason = extract_detail(&body)
            .unwrap_or_else(|| (if is_auth { AUTH_FALLBACK } else { fallback }).to_string());
        debug!(%status, reason = %reason, "Backend rejected request");

        if is_auth {
            Err(GatewayError::Auth(reason))
        } else {
            Err(GatewayError::Backend(reason))
        }
    }
}

/// Pulls a usable `detail` string out of an error body, if any.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        _ => None,
    }
}

fn require(value: &str, what: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl FundGateway for HttpGateway {
    async fn list_families(&self) -> Result<Vec<FundFamily>, GatewayError> {
        let url = self.endpoint(&["fund_families"]);
        let response: FamiliesResponse = self.get_json(url, FAMILIES_FALLBACK).await?;
        Ok(response.families)
    }

    async fn list_schemes(&self, family_id: &str) -> Result<Vec<Scheme>, GatewayError> {
        require(family_id, "Fund family")?;
        let url = self.endpoint(&["funds", family_id]);
        self.get_json(url, SCHEMES_FALLBACK).await
    }

    async fn list_positions(&self) -> Result<Vec<PurchasedPosition>, GatewayError> {
        let url = self.endpoint(&["funds", "purchases"]);
        self.get_json(url, POSITIONS_FALLBACK).await
    }

    async fn fetch_current_value(&self, scheme_name: &str) -> Result<f64, GatewayError> {
        require(scheme_name, "Scheme name")?;
        let mut url = self.endpoint(&["funds", "fetch_scheme_value"]);
        url.query_pairs_mut().append_pair("scheme", scheme_name);
        let response: SchemeValueResponse = self.get_json(url, VALUE_FALLBACK).await?;
        Ok(response.value)
    }

    async fn purchase(
        &self,
        scheme_code: &str,
        units: u32,
    ) -> Result<PurchaseConfirmation, GatewayError> {
        let token = self.session.token()?;
        require(scheme_code, "Scheme code")?;
        if units == 0 {
            return Err(GatewayError::Validation(
                "Units must be a positive whole number".to_string(),
            ));
        }

        let url = self.endpoint(&["funds", "purchase"]);
        debug!(scheme_code, units, "Submitting purchase to {}", url);
        // Not retried: a resend could place the order twice.
        let request = self
            .authorized(self.client.post(url), &token)
            .json(&PurchaseRequest { scheme_code, units });
        self.execute(request, PURCHASE_FALLBACK).await
    }
}
