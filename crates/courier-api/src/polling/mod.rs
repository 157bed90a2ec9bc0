//! Long-polling update loop.
//!
//! One task fetches batches through an [`UpdateSource`] and republishes them,
//! in order, on a bounded channel. The channel is the backpressure contract:
//! while the consumer has not drained the queue the loop is parked on `send`,
//! so at most one fetch is ever in flight and nothing is fetched ahead of the
//! consumer.
//!
//! The cursor advances only after an update has been handed over, and it
//! survives restarts of the same poller, so an update is never delivered
//! twice by one instance.


use courier_core::{
    config::PollingConfig,
    error::CourierError,
    traits::{FetchRequest, UpdateSource},
    types::Update,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Lifecycle of an [`UpdatePoller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Never started.
    Idle,
    Running,
    /// Ended by `stop()` or because the consumer went away.
    Stopped,
    /// Ended by a conflict: another consumer is polling the same bot.
    Faulted,
}

struct Shared {
    /// Highest update id handed to the consumer; 0 = none yet.
    offset: AtomicU64,
    state: Mutex<PollerState>,
}

impl Shared {
    fn state(&self) -> PollerState {
        *lock(&self.state)
    }

    fn set_state(&self, state: PollerState) {
        *lock(&self.state) = state;
    }
}

struct Run {
    cancel: CancellationToken,
    task: Option<JoinHandle<Result<(), CourierError>>>,
}

/// Turns batched `getUpdates` calls into a single ordered stream.
pub struct UpdatePoller<S: ?Sized> {
    source: Arc<S>,
    config: PollingConfig,
    shared: Arc<Shared>,
    run: Mutex<Option<Run>>,
}

impl<S: UpdateSource + ?Sized + 'static> UpdatePoller<S> {
    pub fn new(source: Arc<S>, config: PollingConfig) -> Self {
        Self {
            source,
            config,
            shared: Arc::new(Shared {
                offset: AtomicU64::new(0),
                state: Mutex::new(PollerState::Idle),
            }),
            run: Mutex::new(None),
        }
    }

    /// Spawn the polling task and return the update stream.
    ///
    /// `allowed_updates` restricts the update kinds (empty = all). The stream
    /// ends when the poller stops or faults. Restarting after either resumes
    /// from the preserved cursor. Must be called inside a tokio runtime.
    pub fn start(
        &self,
        allowed_updates: Vec<String>,
    ) -> Result<mpsc::Receiver<Update>, CourierError> {
        self.config.validate()?;

        let mut run = lock(&self.run);
        if self.shared.state() == PollerState::Running {
            return Err(CourierError::Poller("already running".into()));
        }

        let (tx, rx) = mpsc::channel(self.config.buffer);
        let cancel = CancellationToken::new();
        self.shared.set_state(PollerState::Running);

        info!(
            offset = self.offset(),
            "update poller starting long polling..."
        );

        let worker = Worker {
            source: Arc::clone(&self.source),
            limit: self.config.limit,
            timeout_secs: self.config.timeout_secs,
            retry_delay: Duration::from_millis(self.config.retry_delay_ms),
            allowed_updates,
            shared: Arc::clone(&self.shared),
            tx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(worker.run());

        *run = Some(Run {
            cancel,
            task: Some(task),
        });
        Ok(rx)
    }

    /// Ask the loop to end. Idempotent; a no-op before `start`.
    ///
    /// An in-flight fetch is abandoned; the stream closes once the task exits.
    pub fn stop(&self) {
        if let Some(run) = lock(&self.run).as_ref() {
            if !run.cancel.is_cancelled() {
                info!("update poller stop requested");
                run.cancel.cancel();
            }
        }
    }

    /// Wait for the current run to finish.
    ///
    /// Returns the conflict error when the loop faulted. Subsequent calls for
    /// the same run return `Ok(())`.
    pub async fn wait(&self) -> Result<(), CourierError> {
        let task = lock(&self.run).as_mut().and_then(|run| run.task.take());
        match task {
            Some(task) => task
                .await
                .map_err(|e| CourierError::Poller(format!("poll task failed: {e}")))?,
            None => Ok(()),
        }
    }

    pub fn state(&self) -> PollerState {
        self.shared.state()
    }

    /// Whether the loop has reached `Stopped` or `Faulted`.
    pub fn is_stopped(&self) -> bool {
        matches!(
            self.shared.state(),
            PollerState::Stopped | PollerState::Faulted
        )
    }

    /// Highest update id delivered so far; the next fetch asks for `offset + 1`.
    pub fn offset(&self) -> u64 {
        self.shared.offset.load(Ordering::SeqCst)
    }
}

impl<S: ?Sized> Drop for UpdatePoller<S> {
    fn drop(&mut self) {
        if let Some(run) = lock(&self.run).as_ref() {
            run.cancel.cancel();
        }
    }
}

struct Worker<S: ?Sized> {
    source: Arc<S>,
    limit: u32,
    timeout_secs: u32,
    retry_delay: Duration,
    allowed_updates: Vec<String>,
    shared: Arc<Shared>,
    tx: mpsc::Sender<Update>,
    cancel: CancellationToken,
}

impl<S: UpdateSource + ?Sized> Worker<S> {
    async fn run(self) -> Result<(), CourierError> {
        let outcome = self.poll().await;

        // Record the terminal state before the sender drops, so a consumer
        // that sees end-of-stream also sees why.
        let state = match outcome {
            Ok(()) => PollerState::Stopped,
            Err(_) => PollerState::Faulted,
        };
        self.shared.set_state(state);
        info!(
            offset = self.shared.offset.load(Ordering::SeqCst),
            ?state,
            "update poller finished"
        );

        outcome
    }

    async fn poll(&self) -> Result<(), CourierError> {
        loop {
            let request = FetchRequest {
                offset: self.shared.offset.load(Ordering::SeqCst) + 1,
                limit: self.limit,
                timeout_secs: self.timeout_secs,
                allowed_updates: self.allowed_updates.clone(),
            };

            let fetched = tokio::select! {
                _ = self.cancel.cancelled() => return Ok(()),
                result = self.source.fetch_updates(&request) => result,
            };

            match fetched {
                Ok(updates) => {
                    for update in updates {
                        if !self.publish(update).await {
                            return Ok(());
                        }
                    }
                }
                Err(e) if e.is_conflict() => {
                    error!("get updates conflict, another consumer is polling this bot: {e}");
                    return Err(e);
                }
                Err(e) => {
                    warn!(offset = request.offset, "get updates error: {e}");
                    if !self.retry_delay.is_zero() {
                        tokio::select! {
                            _ = self.cancel.cancelled() => return Ok(()),
                            _ = tokio::time::sleep(self.retry_delay) => {}
                        }
                    }
                }
            }

            if self.cancel.is_cancelled() {
                return Ok(());
            }
        }
    }

    /// Hand one update to the consumer, then advance the cursor.
    ///
    /// Returns `false` when the loop should end.
    async fn publish(&self, update: Update) -> bool {
        let update_id = update.update_id;
        tokio::select! {
            biased;
            sent = self.tx.send(update) => match sent {
                Ok(()) => {
                    self.shared.offset.fetch_max(update_id, Ordering::SeqCst);
                    true
                }
                Err(_) => {
                    info!("update receiver dropped, stopping poll");
                    false
                }
            },
            _ = self.cancel.cancelled() => false,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
