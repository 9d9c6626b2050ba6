//! Modem status poller
//!
//! Owns the login state and the most recent status blob. Refreshes are
//! throttled: a call to [`Poller::update`] within `min_interval` of the
//! previous attempt does no network traffic, whether the previous attempt
//! succeeded or not.

use crate::core::source::{ModemError, StatusSource};
use crate::models::sensor::{SensorKind, SensorReading};
use crate::models::status::ModemStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of a refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// A valid status was stored
    Refreshed,
    /// Skipped, the previous attempt was too recent
    Throttled,
    /// The body was not a status blob; a new login was attempted
    Relogin,
    /// Not logged in and the login attempt failed
    LoginFailed,
    /// The modem could not be reached, during login or the status request;
    /// the offline placeholder was stored
    Offline,
    /// Timeout or unexpected HTTP status; previous status kept
    Failed,
}

/// Latest known status
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub status: Option<ModemStatus>,
    pub updated_at: Option<DateTime<Utc>>,
    pub logged_in: bool,
}

/// Throttled, re-authenticating status fetcher
pub struct Poller {
    source: Arc<dyn StatusSource>,
    min_interval: Duration,
    state: RwLock<Snapshot>,
    /// Held for the duration of a refresh; guards the throttle timestamp
    last_attempt: Mutex<Option<Instant>>,
}

impl Poller {
    /// Create a poller and perform the initial login
    ///
    /// A failed initial login is logged, but the session is still treated as
    /// logged in so the first refresh goes straight to the status page. If
    /// the modem answers with something other than a status blob, the
    /// regular re-login path takes over.
    pub async fn start(source: Arc<dyn StatusSource>, min_interval: Duration) -> Self {
        info!("Connecting to modem at {}", source.source_name());

        if let Err(e) = source.login().await {
            log_modem_error("initial login", source.source_name(), &e);
        }

        Self {
            source,
            min_interval,
            state: RwLock::new(Snapshot {
                logged_in: true,
                ..Snapshot::default()
            }),
            last_attempt: Mutex::new(None),
        }
    }

    /// Refresh the status unless the previous attempt was too recent
    pub async fn update(&self) -> UpdateOutcome {
        let mut last_attempt = self.last_attempt.lock().await;
        if let Some(previous) = *last_attempt {
            if previous.elapsed() < self.min_interval {
                debug!("Update throttled");
                return UpdateOutcome::Throttled;
            }
        }
        *last_attempt = Some(Instant::now());

        debug!("Update start");

        if !self.state.read().await.logged_in {
            match self.source.login().await {
                Ok(()) => self.state.write().await.logged_in = true,
                Err(ModemError::Unreachable(e)) => {
                    error!("No route to device {}: {}", self.source.source_name(), e);
                    self.store(ModemStatus::offline()).await;
                    return UpdateOutcome::Offline;
                }
                Err(e) => {
                    log_modem_error("login", self.source.source_name(), &e);
                    return UpdateOutcome::LoginFailed;
                }
            }
        }

        match self.source.fetch_status().await {
            Ok(body) => match ModemStatus::parse(&body) {
                Ok(status) => {
                    debug!("Status refreshed ({} fields)", status.len());
                    self.store(status).await;
                    UpdateOutcome::Refreshed
                }
                Err(e) => {
                    debug!("No valid data returned ({}): {:?}", e, body);
                    let logged_in = self.login().await;
                    self.state.write().await.logged_in = logged_in;
                    UpdateOutcome::Relogin
                }
            },
            Err(ModemError::Unreachable(e)) => {
                error!("No route to device {}: {}", self.source.source_name(), e);
                self.store(ModemStatus::offline()).await;
                UpdateOutcome::Offline
            }
            Err(e) => {
                log_modem_error("status request", self.source.source_name(), &e);
                UpdateOutcome::Failed
            }
        }
    }

    /// Latest known status
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    /// Readings for the requested sensors from the latest status
    pub async fn readings(&self, kinds: &[SensorKind]) -> Vec<SensorReading> {
        let snapshot = self.state.read().await;
        kinds
            .iter()
            .map(|kind| SensorReading::new(*kind, snapshot.status.as_ref(), snapshot.updated_at))
            .collect()
    }

    /// Refresh every `interval` until `shutdown` flips to true
    pub async fn run(self: Arc<Self>, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.update().await;
                    debug!("Poll outcome: {:?}", outcome);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Poller stopping");
                        return;
                    }
                }
            }
        }
    }

    async fn login(&self) -> bool {
        match self.source.login().await {
            Ok(()) => true,
            Err(e) => {
                log_modem_error("login", self.source.source_name(), &e);
                false
            }
        }
    }

    async fn store(&self, status: ModemStatus) {
        let mut snapshot = self.state.write().await;
        snapshot.status = Some(status);
        snapshot.updated_at = Some(Utc::now());
    }
}

fn log_modem_error(action: &str, source: &str, e: &ModemError) {
    match e {
        ModemError::Timeout(_) | ModemError::Unreachable(_) => {
            error!("Modem {} failed for {}: {}", action, source, e)
        }
        ModemError::LoginRejected(_) => debug!("Modem {} failed for {}: {}", action, source, e),
        _ => warn!("Modem {} failed for {}: {}", action, source, e),
    }
}
