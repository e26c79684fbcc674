//! Fund families, schemes and purchased positions as served by the backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// A grouping of schemes offered by one issuer. The name is also its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FundFamily(pub String);

impl FundFamily {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl Display for FundFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FundFamily {
    fn from(s: &str) -> Self {
        FundFamily(s.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FamiliesResponse {
    pub families: Vec<FundFamily>,
}

/// An investable scheme. Only `code` is guaranteed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    #[serde(rename = "Scheme_Code", deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(rename = "Scheme_Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Net_Asset_Value", default)]
    pub nav: Option<f64>,
    #[serde(rename = "Date", default)]
    pub nav_date: Option<String>,
    #[serde(rename = "Scheme_Type", default)]
    pub scheme_type: Option<String>,
    #[serde(rename = "Scheme_Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Mutual_Fund_Family", default)]
    pub family: Option<String>,
}

impl Scheme {
    pub fn new(code: &str, name: &str) -> Self {
        Scheme {
            code: code.to_string(),
            name: Some(name.to_string()),
            nav: None,
            nav_date: None,
            scheme_type: None,
            category: None,
            family: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }
}

// Scheme codes arrive as integers but are sent back as strings on purchase.
fn code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Number(i64),
        Text(String),
    }

    Ok(match RawCode::deserialize(deserializer)? {
        RawCode::Number(n) => n.to_string(),
        RawCode::Text(s) => s,
    })
}

/// A holding of units in one scheme. Several positions can share a scheme
/// name, one per purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedPosition {
    pub scheme_name: String,
    pub units: f64,
    /// Unit value. `None` until the backend knows a NAV for the scheme.
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub purchase_time: Option<NaiveDateTime>,
}

impl PurchasedPosition {
    pub fn new(scheme_name: &str, units: f64, value: f64) -> Self {
        PurchasedPosition {
            scheme_name: scheme_name.to_string(),
            units,
            value: Some(value),
            purchase_time: None,
        }
    }
}

/// Writes `value` into every position named `scheme_name`, leaving every
/// other field and entry alone. Returns how many entries were touched.
pub fn merge_value(positions: &mut [PurchasedPosition], scheme_name: &str, value: f64) -> usize {
    let mut merged = 0;
    for position in positions
        .iter_mut()
        .filter(|p| p.scheme_name == scheme_name)
    {
        position.value = Some(value);
        merged += 1;
    }
    merged
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchemeValueResponse {
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchaseRequest<'a> {
    pub scheme_code: &'a str,
    pub units: u32,
}

/// What the backend says after accepting a purchase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PurchaseConfirmation {
    pub message: String,
    #[serde(default)]
    pub current_value: Option<f64>,
}
