//! Overdue detection across all active processes, on demand or on a timer.

use tokio::{sync::mpsc, task::JoinHandle, time::MissedTickBehavior};

use super::Tracker;
use crate::{engine, error::Result, models::ProcessStatus};

impl Tracker {
    /// Flags every in-progress step of an active process whose due date has
    /// passed. Returns the number of steps flagged.
    ///
    /// A step is flagged at most once; running the sweep again right away
    /// changes nothing and sends nothing.
    pub async fn check_overdue_steps(&self) -> Result<usize> {
        self.write(|db, ctx| {
            let mut notifications = Vec::new();
            db.update_processes_with_status(ProcessStatus::Active, |process| {
                let flagged = engine::sweep_overdue(process, ctx);
                let changed = !flagged.is_empty();
                notifications.extend(flagged);
                changed
            })?;

            if !notifications.is_empty() {
                log::info!("overdue sweep flagged {} step(s)", notifications.len());
            }
            Ok((notifications.len(), notifications))
        })
        .await
    }

    /// Starts the recurring overdue sweep on the current tokio runtime.
    ///
    /// The first sweep runs immediately, then once per
    /// [`Tracker::sweep_interval`]. Failures are logged and the loop keeps
    /// going. The sweep runs until [`OverdueSweep::stop`] is called.
    pub fn start_overdue_sweep(&self) -> OverdueSweep {
        let tracker = self.clone();
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            log::info!(
                "overdue sweep started, interval: {:?}",
                tracker.sweep_interval
            );
            let mut interval = tokio::time::interval(tracker.sweep_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = tracker.check_overdue_steps().await {
                            log::error!("overdue sweep failed: {e}");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        log::info!("overdue sweep shutting down");
                        break;
                    }
                }
            }
        });

        OverdueSweep {
            shutdown: shutdown_tx,
            handle,
        }
    }
}

/// Handle to a running overdue sweep.
///
/// Dropping the handle without calling [`OverdueSweep::stop`] also ends the
/// loop, without waiting for it.
pub struct OverdueSweep {
    shutdown: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl OverdueSweep {
    /// Stops the sweep and waits for an in-flight run to finish.
    pub async fn stop(self) {
        // A closed channel means the loop has already ended.
        let _ = self.shutdown.send(()).await;
        if let Err(e) = self.handle.await {
            log::warn!("overdue sweep task ended abnormally: {e}");
        }
    }

    /// Returns true once the sweep loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
