//! The debounced rebuild loop.
//!
//! Two states, idle and rebuilding. Every change (re)arms a single debounce
//! deadline; when it passes and no rebuild is running, one rebuild starts.
//! Changes during a rebuild only move the deadline, so the next rebuild
//! starts after the current one finishes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

use super::watcher::FileChange;
use crate::error::Result;
use crate::ui;

/// Quiet period after the last change before a rebuild starts.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// One rebuild of the extension.
#[async_trait]
pub trait Rebuild: Send + Sync + 'static {
    async fn rebuild(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Rebuilding,
}

pub struct WatchController<R> {
    rebuild: Arc<R>,
    debounce: Duration,
    state: WatchState,
    deadline: Option<Instant>,
    inflight: Option<JoinHandle<Result<()>>>,
}

impl<R: Rebuild> WatchController<R> {
    pub fn new(rebuild: R) -> Self {
        Self {
            rebuild: Arc::new(rebuild),
            debounce: DEBOUNCE,
            state: WatchState::Idle,
            deadline: None,
            inflight: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Run until `shutdown` resolves, or until the change stream ends and no
    /// rebuild is pending.
    ///
    /// A failed rebuild is reported and the loop keeps going. A rebuild still
    /// running at shutdown is left to finish on its own.
    pub async fn run<S>(mut self, mut changes: mpsc::Receiver<FileChange>, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut watching = true;

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    eprintln!();
                    ui::info("Stopping watch mode...");
                    break;
                }

                change = changes.recv(), if watching => match change {
                    Some(change) => {
                        ui::change(change.kind(), change.path());
                        self.deadline = Some(Instant::now() + self.debounce);
                    }
                    None => watching = false,
                },

                () = sleep_until(self.deadline), if self.deadline.is_some() && self.inflight.is_none() => {
                    self.deadline = None;
                    self.start_rebuild();
                }

                joined = join(&mut self.inflight), if self.inflight.is_some() => {
                    self.inflight = None;
                    self.state = WatchState::Idle;
                    report(joined);
                }
            }

            if !watching && self.deadline.is_none() && self.inflight.is_none() {
                tracing::debug!("change stream closed, leaving watch mode");
                break;
            }
        }

        Ok(())
    }

    fn start_rebuild(&mut self) {
        self.state = WatchState::Rebuilding;
        let rebuild = Arc::clone(&self.rebuild);
        self.inflight = Some(tokio::spawn(async move { rebuild.rebuild().await }));
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn join(
    inflight: &mut Option<JoinHandle<Result<()>>>,
) -> std::result::Result<Result<()>, JoinError> {
    match inflight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn report(joined: std::result::Result<Result<()>, JoinError>) {
    match joined {
        Ok(Ok(())) => {}
        Ok(Err(err)) => ui::error(&err.to_string()),
        Err(err) => ui::error(&format!("Rebuild task failed: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    use crate::error::CliError;

    #[derive(Default)]
    struct Recorder {
        starts: Mutex<Vec<Instant>>,
        running: AtomicUsize,
        max_running: AtomicUsize,
        duration: Duration,
        fail_first: bool,
    }

    #[async_trait]
    impl Rebuild for Arc<Recorder> {
        async fn rebuild(&self) -> Result<()> {
            let index = {
                let mut starts = self.starts.lock().unwrap();
                starts.push(Instant::now());
                starts.len()
            };
            let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(running, Ordering::SeqCst);

            tokio::time::sleep(self.duration).await;

            self.running.fetch_sub(1, Ordering::SeqCst);
            if self.fail_first && index == 1 {
                return Err(CliError::Custom("boom".into()));
            }
            Ok(())
        }
    }

    fn change() -> FileChange {
        FileChange::Modified(PathBuf::from("/project/src/script.ts"))
    }

    struct Harness {
        changes: mpsc::Sender<FileChange>,
        stop: oneshot::Sender<()>,
        task: JoinHandle<Result<()>>,
    }

    fn start(recorder: Arc<Recorder>) -> Harness {
        let (changes, rx) = mpsc::channel(16);
        let (stop, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(WatchController::new(recorder).run(rx, async move {
            let _ = stop_rx.await;
        }));
        Harness { changes, stop, task }
    }

    async fn send_after(harness: &Harness, delay_ms: u64) {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        harness.changes.send(change()).await.unwrap();
    }

    async fn stop(harness: Harness) {
        harness.stop.send(()).unwrap();
        harness.task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_changes_triggers_one_rebuild() {
        let recorder = Arc::new(Recorder::default());
        let origin = Instant::now();
        let harness = start(recorder.clone());

        send_after(&harness, 0).await;
        send_after(&harness, 30).await;
        send_after(&harness, 30).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        stop(harness).await;

        let starts = recorder.starts.lock().unwrap();
        assert_eq!(starts.len(), 1);
        let started = starts[0] - origin;
        assert!(
            started >= Duration::from_millis(160) && started < Duration::from_millis(170),
            "rebuild started at {started:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_changes_trigger_separate_rebuilds() {
        let recorder = Arc::new(Recorder::default());
        let harness = start(recorder.clone());

        send_after(&harness, 0).await;
        send_after(&harness, 250).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        stop(harness).await;

        assert_eq!(recorder.starts.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn changes_during_rebuild_wait_for_it() {
        let recorder = Arc::new(Recorder {
            duration: Duration::from_millis(300),
            ..Default::default()
        });
        let origin = Instant::now();
        let harness = start(recorder.clone());

        // Rebuild runs from 100ms to 400ms; this change lands at 150ms.
        send_after(&harness, 0).await;
        send_after(&harness, 150).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        stop(harness).await;

        let starts = recorder.starts.lock().unwrap();
        assert_eq!(starts.len(), 2);
        assert_eq!(recorder.max_running.load(Ordering::SeqCst), 1);
        let second = starts[1] - origin;
        assert!(
            second >= Duration::from_millis(400) && second < Duration::from_millis(410),
            "second rebuild started at {second:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_rebuild_keeps_watching() {
        let recorder = Arc::new(Recorder {
            fail_first: true,
            ..Default::default()
        });
        let harness = start(recorder.clone());

        send_after(&harness, 0).await;
        send_after(&harness, 300).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        stop(harness).await;

        assert_eq!(recorder.starts.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_stream_finishes_pending_rebuild_then_returns() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel(4);
        tx.send(change()).await.unwrap();
        drop(tx);

        WatchController::new(recorder.clone())
            .run(rx, std::future::pending())
            .await
            .unwrap();

        assert_eq!(recorder.starts.lock().unwrap().len(), 1);
    }

    #[test]
    fn starts_idle_with_default_debounce() {
        let controller = WatchController::new(Arc::new(Recorder::default()));
        assert_eq!(controller.state(), WatchState::Idle);
        assert_eq!(controller.debounce, DEBOUNCE);
        let controller = controller.with_debounce(Duration::from_millis(5));
        assert_eq!(controller.debounce, Duration::from_millis(5));
    }
}
