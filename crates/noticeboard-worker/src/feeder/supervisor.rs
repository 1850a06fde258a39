//! Feeder supervisor: runs each feeder in its own task and restarts it
//! after a panic.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use noticeboard_core::config::FeedersConfig;
use noticeboard_service::{DraftOutcome, IngestionService};

use super::Feeder;

/// First restart delay after a crash.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// How long `stop` waits for each feeder task.
const STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Counters and last outcome for one feeder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeederStatus {
    pub name: String,
    /// Whether a poll loop is currently alive.
    pub running: bool,
    /// Drafts stored as new notices.
    pub ingested: u64,
    /// Drafts skipped because they were already stored.
    pub duplicates: u64,
    /// Failed polls plus drafts that failed to ingest.
    pub failures: u64,
    /// Times the poll loop was restarted after a panic.
    pub restarts: u32,
    pub last_error: Option<String>,
    pub last_poll_at: Option<DateTime<Utc>>,
}

type StatusMap = Arc<RwLock<BTreeMap<String, FeederStatus>>>;

/// Runs feeders until told to stop.
///
/// Each feeder gets a poll loop on its own task. Drafts go through
/// [`IngestionService::create_from_draft`]; a failing item or poll is
/// logged and counted, never fatal. A poll loop that panics is started
/// again after a delay that doubles on each consecutive crash up to the
/// configured ceiling.
#[derive(Debug)]
pub struct FeederSupervisor {
    feeders: Vec<Arc<dyn Feeder>>,
    statuses: StatusMap,
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl FeederSupervisor {
    /// Create a supervisor for `feeders`.
    pub fn new(feeders: Vec<Arc<dyn Feeder>>, config: &FeedersConfig) -> Self {
        let statuses = feeders
            .iter()
            .map(|f| {
                let status = FeederStatus {
                    name: f.name().to_string(),
                    ..FeederStatus::default()
                };
                (f.name().to_string(), status)
            })
            .collect();
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            feeders,
            statuses: Arc::new(RwLock::new(statuses)),
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: Duration::from_secs(config.restart_backoff_max_seconds.max(1)),
        }
    }

    /// Override the restart delays.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max.max(initial);
        self
    }

    /// Number of supervised feeders.
    pub fn len(&self) -> usize {
        self.feeders.len()
    }

    /// Whether there is nothing to supervise.
    pub fn is_empty(&self) -> bool {
        self.feeders.is_empty()
    }

    /// Spawn one supervised poll loop per feeder.
    pub async fn start(&self, pipeline: IngestionService) {
        let mut handles = self.handles.lock().await;
        for feeder in &self.feeders {
            let task = SupervisedFeeder {
                feeder: Arc::clone(feeder),
                pipeline: pipeline.clone(),
                statuses: Arc::clone(&self.statuses),
                shutdown: self.shutdown_tx.subscribe(),
                initial_backoff: self.initial_backoff,
                max_backoff: self.max_backoff,
            };
            info!(
                feeder = feeder.name(),
                interval_secs = feeder.interval().as_secs(),
                "Starting feeder"
            );
            handles.push(tokio::spawn(task.run()));
        }
    }

    /// Signal every feeder to stop and wait for them, bounded per task.
    ///
    /// A feeder still busy after the timeout is aborted together with its
    /// in-flight poll; nothing it fetched is ingested afterwards.
    pub async fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
        let handles: Vec<JoinHandle<()>> = self.handles.lock().await.drain(..).collect();
        for mut handle in handles {
            if time::timeout(STOP_TIMEOUT, &mut handle).await.is_err() {
                warn!("Feeder did not stop in time; aborting");
                handle.abort();
                let _ = handle.await;
            }
        }
        info!("Feeders stopped");
    }

    /// Snapshot of every feeder's status, ordered by name.
    pub async fn status(&self) -> Vec<FeederStatus> {
        self.statuses.read().await.values().cloned().collect()
    }
}

/// Aborts the poll loop when the supervising task goes away.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// State moved into each supervising task.
struct SupervisedFeeder {
    feeder: Arc<dyn Feeder>,
    pipeline: IngestionService,
    statuses: StatusMap,
    shutdown: watch::Receiver<bool>,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl SupervisedFeeder {
    async fn run(mut self) {
        let name = self.feeder.name().to_string();
        let mut backoff = self.initial_backoff;

        loop {
            let started = Instant::now();
            let worker = tokio::spawn(poll_loop(
                Arc::clone(&self.feeder),
                self.pipeline.clone(),
                Arc::clone(&self.statuses),
                self.shutdown.clone(),
            ));
            let _poll_guard = AbortOnDrop(worker.abort_handle());

            let panic = match worker.await {
                Ok(()) => break,
                Err(e) if e.is_panic() => e.to_string(),
                Err(_) => break,
            };

            // A loop that ran longer than the ceiling counts as recovered.
            if started.elapsed() > self.max_backoff {
                backoff = self.initial_backoff;
            }
            error!(feeder = %name, error = %panic, backoff_ms = backoff.as_millis() as u64, "Feeder crashed; restarting");
            update(&self.statuses, &name, |s| {
                s.running = false;
                s.restarts += 1;
                s.last_error = Some(format!("panic: {panic}"));
            })
            .await;

            tokio::select! {
                _ = time::sleep(backoff) => {}
                _ = self.shutdown.changed() => {}
            }
            if *self.shutdown.borrow() {
                break;
            }
            backoff = (backoff * 2).min(self.max_backoff);
        }

        update(&self.statuses, &name, |s| s.running = false).await;
        info!(feeder = %name, "Feeder exited");
    }
}

async fn poll_loop(
    feeder: Arc<dyn Feeder>,
    pipeline: IngestionService,
    statuses: StatusMap,
    mut shutdown: watch::Receiver<bool>,
) {
    let name = feeder.name().to_string();
    update(&statuses, &name, |s| s.running = true).await;

    let mut ticker = time::interval(feeder.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                poll_once(feeder.as_ref(), &pipeline, &statuses, &name).await;
            }
        }
    }
}

async fn poll_once(feeder: &dyn Feeder, pipeline: &IngestionService, statuses: &StatusMap, name: &str) {
    let drafts = match feeder.poll().await {
        Ok(drafts) => drafts,
        Err(e) => {
            warn!(feeder = %name, error = %e, "Feed poll failed; retrying next tick");
            update(statuses, name, |s| {
                s.failures += 1;
                s.last_error = Some(e.to_string());
                s.last_poll_at = Some(Utc::now());
            })
            .await;
            return;
        }
    };

    let mut handled = Vec::new();
    let (mut ingested, mut duplicates, mut failures) = (0u64, 0u64, 0u64);
    let mut last_error = None;

    for draft in drafts {
        let external_ref = draft.external_ref.clone();
        match pipeline.create_from_draft(draft).await {
            Ok(DraftOutcome::Created(created)) => {
                ingested += 1;
                info!(feeder = %name, notice_id = %created.id, "Feed item ingested");
                handled.extend(external_ref);
            }
            Ok(DraftOutcome::Duplicate) => {
                duplicates += 1;
                handled.extend(external_ref);
            }
            Err(e) => {
                failures += 1;
                error!(feeder = %name, external_ref = ?external_ref, error = %e, "Feed item failed");
                last_error = Some(e.to_string());
            }
        }
    }

    if !handled.is_empty() {
        if let Err(e) = feeder.acknowledge(&handled).await {
            warn!(feeder = %name, error = %e, "Failed to acknowledge feed items");
            failures += 1;
            last_error = Some(e.to_string());
        }
    }

    update(statuses, name, |s| {
        s.ingested += ingested;
        s.duplicates += duplicates;
        s.failures += failures;
        if last_error.is_some() {
            s.last_error = last_error;
        }
        s.last_poll_at = Some(Utc::now());
    })
    .await;
}

async fn update(statuses: &StatusMap, name: &str, apply: impl FnOnce(&mut FeederStatus)) {
    if let Some(status) = statuses.write().await.get_mut(name) {
        apply(status);
    }
}
