//! Periodic revaluation of a portfolio, scoped to the lifetime of its owner.

use super::portfolio::{Portfolio, RefreshReport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const MIN_PERIOD: Duration = Duration::from_millis(1);
const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Handle to the background refresh loop. Cancelling consumes the handle;
/// dropping an uncancelled handle stops the loop as well.
pub struct RefreshTask {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTask {
    /// Starts revaluing `portfolio` every `period`. The first cycle runs one
    /// full period after the start. Reports go to `reports` when given.
    /// The period is clamped to between a millisecond and a year.
    pub fn spawn(
        portfolio: Arc<Portfolio>,
        period: Duration,
        reports: Option<mpsc::UnboundedSender<RefreshReport>>,
    ) -> Self {
        let clamped = period.clamp(MIN_PERIOD, MAX_PERIOD);
        if clamped != period {
            warn!(?period, ?clamped, "Refresh period out of range, clamping");
        }
        let period = clamped;
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            debug!(?period, "Refresh loop started");

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {}
                }

                // Shutdown drops the cycle mid-flight, so no fetch started
                // after it can land.
                let report = tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    report = portfolio.refresh_values() => report,
                };

                info!(
                    updated = report.updated.len(),
                    failed = report.failed.len(),
                    "Refresh cycle finished"
                );
                if let Some(tx) = &reports
                    && tx.send(report).is_err()
                {
                    debug!("Refresh report listener went away");
                }
            }
            debug!("Refresh loop stopped");
        });

        RefreshTask {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Stops the loop and waits for it to exit. Once this returns, the loop
    /// makes no gateway call and touches no state.
    pub async fn cancel(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            debug!(error = %e, "Refresh loop ended abnormally");
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.shutdown.send(true);
            handle.abort();
        }
    }
}
