//! Debounced write-behind to the remote and cache tiers.
//!
//! A single worker task owns both tiers. Every scheduled snapshot restarts the
//! quiet-period timer and replaces the previous one, so a burst of edits
//! produces one flush carrying the last state. Flushes run one at a time in
//! the worker, which keeps writes ordered.
//!
//! Storage failures never reach the caller: they are logged and recorded in
//! the [`FlushReport`] published on the watch channel.

use std::sync::Arc;
use std::time::Duration;

use nebula_storage::{LocalCache, RemoteStore, write_state};
use nebula_types::AppState;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Outcome of one flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushReport {
    /// 1-based count of flushes performed by this coordinator.
    pub sequence: u64,
    pub remote_error: Option<String>,
    pub cache_error: Option<String>,
}

impl FlushReport {
    #[must_use]
    pub fn remote_ok(&self) -> bool {
        self.remote_error.is_none()
    }

    #[must_use]
    pub fn cache_ok(&self) -> bool {
        self.cache_error.is_none()
    }
}

#[derive(Debug)]
enum Command {
    Schedule(Arc<AppState>),
    Cancel,
    ClearCache,
    Flush(oneshot::Sender<Option<FlushReport>>),
    Shutdown(oneshot::Sender<Option<FlushReport>>),
}

/// Handle to the persistence worker.
#[derive(Debug)]
pub struct PersistenceCoordinator {
    commands: mpsc::UnboundedSender<Command>,
    reports: watch::Receiver<Option<FlushReport>>,
    worker: JoinHandle<()>,
}

impl PersistenceCoordinator {
    /// Spawn the worker on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        remote: Arc<dyn RemoteStore>,
        cache: Arc<dyn LocalCache>,
        debounce: Duration,
    ) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (report_tx, reports) = watch::channel(None);
        let worker = Worker {
            remote,
            cache,
            debounce,
            reports: report_tx,
            flushes: 0,
        };
        Self {
            commands,
            reports,
            worker: tokio::spawn(worker.run(rx)),
        }
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Persistence worker is gone; dropping command");
        }
    }

    /// Queue `state` for the next flush, restarting the quiet period.
    pub fn schedule(&self, state: Arc<AppState>) {
        self.send(Command::Schedule(state));
    }

    /// Drop the queued state without writing it.
    pub fn cancel(&self) {
        self.send(Command::Cancel);
    }

    /// Drop the queued state and remove every cache entry.
    pub fn clear_cache(&self) {
        self.send(Command::ClearCache);
    }

    /// Write the queued state now. `None` if nothing was queued.
    pub async fn flush_now(&self) -> Option<FlushReport> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Flush(reply));
        rx.await.ok().flatten()
    }

    /// Flush anything queued and stop the worker.
    pub async fn shutdown(self) -> Option<FlushReport> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Shutdown(reply));
        let report = rx.await.ok().flatten();
        if let Err(err) = self.worker.await {
            tracing::warn!("Persistence worker ended abnormally: {err}");
        }
        report
    }

    /// Observe flush reports as they are produced.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<FlushReport>> {
        self.reports.clone()
    }

    #[must_use]
    pub fn last_report(&self) -> Option<FlushReport> {
        self.reports.borrow().clone()
    }
}

struct Worker {
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn LocalCache>,
    debounce: Duration,
    reports: watch::Sender<Option<FlushReport>>,
    flushes: u64,
}

impl Worker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        let mut pending: Option<Arc<AppState>> = None;
        let timer = time::sleep(self.debounce);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                biased;

                command = rx.recv() => match command {
                    Some(Command::Schedule(state)) => {
                        pending = Some(state);
                        timer.as_mut().reset(Instant::now() + self.debounce);
                        tracing::debug!(debounce_ms = self.debounce.as_millis(), "Flush scheduled");
                    }
                    Some(Command::Cancel) => {
                        if pending.take().is_some() {
                            tracing::debug!("Pending flush cancelled");
                        }
                    }
                    Some(Command::ClearCache) => {
                        pending = None;
                        if let Err(err) = self.cache.clear() {
                            tracing::warn!("Failed to clear local cache: {err}");
                        }
                    }
                    Some(Command::Flush(reply)) => {
                        let report = self.flush_pending(&mut pending).await;
                        let _ = reply.send(report);
                    }
                    Some(Command::Shutdown(reply)) => {
                        let report = self.flush_pending(&mut pending).await;
                        let _ = reply.send(report);
                        break;
                    }
                    None => {
                        self.flush_pending(&mut pending).await;
                        break;
                    }
                },
                () = &mut timer, if pending.is_some() => {
                    self.flush_pending(&mut pending).await;
                }
            }
        }
        tracing::debug!(flushes = self.flushes, "Persistence worker stopped");
    }

    async fn flush_pending(&mut self, pending: &mut Option<Arc<AppState>>) -> Option<FlushReport> {
        let state = pending.take()?;
        Some(self.flush(&state).await)
    }

    /// Remote first, then the cache regardless of the remote outcome.
    async fn flush(&mut self, state: &AppState) -> FlushReport {
        self.flushes += 1;

        let remote_error = match self.remote.save(state).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(store = %self.remote.describe(), "Remote save failed: {err}");
                Some(err.to_string())
            }
        };
        let cache_error = match write_state(self.cache.as_ref(), state) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!("Local cache write failed: {err}");
                Some(err.to_string())
            }
        };

        let report = FlushReport {
            sequence: self.flushes,
            remote_error,
            cache_error,
        };
        tracing::debug!(
            sequence = report.sequence,
            remote_ok = report.remote_ok(),
            cache_ok = report.cache_ok(),
            "Flushed dashboard state"
        );
        self.reports.send_replace(Some(report.clone()));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_storage::{CacheKey, MemoryCache, MemoryStore, read_state};

    const DEBOUNCE: Duration = Duration::from_millis(1000);

    fn state(logo: &str) -> Arc<AppState> {
        Arc::new(AppState {
            logo_text: logo.to_string(),
            ..AppState::default()
        })
    }

    fn setup() -> (PersistenceCoordinator, MemoryStore, MemoryCache) {
        let store = MemoryStore::default();
        let cache = MemoryCache::default();
        let coordinator =
            PersistenceCoordinator::spawn(Arc::new(store.clone()), Arc::new(cache.clone()), DEBOUNCE);
        (coordinator, store, cache)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_is_flushed_once_with_last_state() {
        let (coordinator, store, cache) = setup();
        coordinator.schedule(state("a"));
        coordinator.schedule(state("b"));
        coordinator.schedule(state("c"));

        time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.document().unwrap().logo_text, "c");
        assert_eq!(cache.get(CacheKey::LogoText).unwrap().as_deref(), Some("c"));

        let report = coordinator.last_report().unwrap();
        assert_eq!(report.sequence, 1);
        assert!(report.remote_ok() && report.cache_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn new_change_restarts_quiet_period() {
        let (coordinator, store, _cache) = setup();
        coordinator.schedule(state("a"));
        time::sleep(Duration::from_millis(600)).await;
        coordinator.schedule(state("b"));
        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.save_count(), 0);

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.document().unwrap().logo_text, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn remote_failure_still_writes_cache() {
        let (coordinator, store, cache) = setup();
        store.set_offline(true);
        let mut reports = coordinator.subscribe();

        coordinator.schedule(state("offline"));
        reports.changed().await.unwrap();

        let report = reports.borrow().clone().unwrap();
        assert!(!report.remote_ok());
        assert!(report.cache_ok());
        assert_eq!(read_state(&cache).unwrap().logo_text, "offline");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_state() {
        let (coordinator, store, cache) = setup();
        coordinator.schedule(state("never"));
        coordinator.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.save_count(), 0);
        assert!(cache.is_empty());
        assert_eq!(coordinator.flush_now().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_now_skips_the_wait() {
        let (coordinator, store, _cache) = setup();
        coordinator.schedule(state("now"));
        let report = coordinator.flush_now().await.unwrap();
        assert!(report.remote_ok());
        assert_eq!(store.document().unwrap().logo_text, "now");

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_flushes_pending_state() {
        let (coordinator, store, _cache) = setup();
        coordinator.schedule(state("last"));
        let report = coordinator.shutdown().await;
        assert!(report.is_some());
        assert_eq!(store.document().unwrap().logo_text, "last");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cache_removes_entries_and_pending() {
        let (coordinator, store, cache) = setup();
        coordinator.schedule(state("x"));
        coordinator.flush_now().await;
        assert!(!cache.is_empty());

        coordinator.schedule(state("y"));
        coordinator.clear_cache();
        assert_eq!(coordinator.flush_now().await, None);
        assert!(cache.is_empty());
        assert_eq!(store.save_count(), 1);
    }
}
