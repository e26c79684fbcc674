//! Family selection and the scheme list that follows it.

use super::fund::Scheme;
use super::gateway::FundGateway;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserPhase {
    NoFamilySelected,
    LoadingSchemes,
    SchemesLoaded,
    LoadError(String),
}

/// What the browser currently displays.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserView {
    pub phase: BrowserPhase,
    pub selected_family: Option<String>,
    pub schemes: Vec<Scheme>,
}

/// Result of a single `select_family` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Cleared,
    Loaded,
    Failed,
    /// A newer selection was made while this one was in flight.
    Superseded,
}

struct BrowserState {
    view: BrowserView,
    generation: u64,
}

pub struct FundBrowser {
    gateway: Arc<dyn FundGateway>,
    state: Mutex<BrowserState>,
}

impl FundBrowser {
    pub fn new(gateway: Arc<dyn FundGateway>) -> Self {
        FundBrowser {
            gateway,
            state: Mutex::new(BrowserState {
                view: BrowserView {
                    phase: BrowserPhase::NoFamilySelected,
                    selected_family: None,
                    schemes: Vec::new(),
                },
                generation: 0,
            }),
        }
    }

    pub async fn view(&self) -> BrowserView {
        self.state.lock().await.view.clone()
    }

    /// Selects a family and loads its schemes. An empty id deselects without
    /// touching the network. Only the latest selection may write results.
    pub async fn select_family(&self, family_id: &str) -> SelectionOutcome {
        let family_id = family_id.trim();
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            if family_id.is_empty() {
                state.view = BrowserView {
                    phase: BrowserPhase::NoFamilySelected,
                    selected_family: None,
                    schemes: Vec::new(),
                };
                return SelectionOutcome::Cleared;
            }
            state.view = BrowserView {
                phase: BrowserPhase::LoadingSchemes,
                selected_family: Some(family_id.to_string()),
                schemes: Vec::new(),
            };
            state.generation
        };

        debug!(family = family_id, generation, "Loading schemes");
        let result = self.gateway.list_schemes(family_id).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(
                family = family_id,
                generation,
                current = state.generation,
                "Discarding stale scheme response"
            );
            return SelectionOutcome::Superseded;
        }

        match result {
            Ok(schemes) => {
                debug!(family = family_id, count = schemes.len(), "Schemes loaded");
                state.view.schemes = schemes;
                state.view.phase = BrowserPhase::SchemesLoaded;
                SelectionOutcome::Loaded
            }
            Err(e) => {
                state.view.schemes.clear();
                state.view.phase = BrowserPhase::LoadError(e.to_string());
                SelectionOutcome::Failed
            }
        }
    }
}
