/// Timer-driven shadow polling with a single request in flight
use log::{debug, info, warn};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::models::DashboardView;
use crate::sensors::LuxCalibration;
use crate::shadow::client::{ShadowError, ShadowFields, ShadowSource};
use crate::shadow::state::DashboardState;

pub const POLL_INTERVAL_MS: u64 = 3000;

type PendingFetch<'a> = Pin<Box<dyn Future<Output = Result<ShadowFields, ShadowError>> + Send + 'a>>;

pub struct Poller<S> {
    source: S,
    state: DashboardState,
    calibration: LuxCalibration,
    period: Duration,
    views: watch::Sender<DashboardView>,
}

impl<S> Poller<S>
where
    S: ShadowSource + Send + Sync + 'static,
{
    /// Create a poller and the receiver the renderer reads views from
    ///
    /// The receiver immediately holds the initial "checking" view.
    pub fn new(source: S, calibration: LuxCalibration) -> (Self, watch::Receiver<DashboardView>) {
        let state = DashboardState::default();
        let (views, receiver) = watch::channel(state.view(&calibration));

        let poller = Poller {
            source,
            state,
            calibration,
            period: Duration::from_millis(POLL_INTERVAL_MS),
            views,
        };
        (poller, receiver)
    }

    #[cfg(test)]
    fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Fetch once and publish the resulting view
    #[cfg(test)]
    async fn poll_once(&mut self) -> DashboardView {
        let outcome = self.source.fetch().await;
        self.state.record(outcome);
        publish(&self.views, &self.state, &self.calibration)
    }

    /// Start polling on a background task
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown_rx));

        PollerHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let Poller {
            source,
            mut state,
            calibration,
            period,
            views,
        } = self;

        info!("Polling device shadow every {} ms", period.as_millis());

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut pending: Option<PendingFetch<'_>> = None;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Poller stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if pending.is_some() {
                        debug!("Previous shadow request still in flight, skipping tick");
                        continue;
                    }
                    pending = Some(Box::pin(source.fetch()));
                }
                outcome = wait_for(&mut pending) => {
                    pending = None;
                    state.record(outcome);
                    publish(&views, &state, &calibration);
                }
            }
        }

        if pending.is_some() {
            warn!("Dropping shadow request still in flight at shutdown");
        }
    }
}

/// Hand the renderer a fresh view of `state`
fn publish(
    views: &watch::Sender<DashboardView>,
    state: &DashboardState,
    calibration: &LuxCalibration,
) -> DashboardView {
    let view = state.view(calibration);
    // send_replace never fails, even with no receivers left
    views.send_replace(view.clone());
    view
}

/// Resolve the in-flight fetch, or never when there is none
async fn wait_for(pending: &mut Option<PendingFetch<'_>>) -> Result<ShadowFields, ShadowError> {
    match pending.as_mut() {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}

/// Owner of a running poller task
///
/// Dropping the handle without calling [`PollerHandle::stop`] aborts the task.
pub struct PollerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancel the timer and wait for the poller to finish
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("Poller task ended abnormally: {}", e);
                }
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
