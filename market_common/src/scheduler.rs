//! Recurring refresh task with cancellation.
//!
//! `RefreshScheduler::start` runs the task once right away and then once per
//! period on a dedicated thread. The wait between runs is a crossbeam `select!`
//! on the stop channel, so `RefreshHandle::stop` (or dropping the handle) wakes
//! the worker immediately instead of waiting out the period.

use crossbeam_channel::{Sender, bounded, select};
use log::{error, info};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::Result;

/// Starts recurring refresh tasks.
pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Spawn a worker that runs `task` now and then every `period`.
    pub fn start<F>(name: &str, period: Duration, mut task: F) -> Result<RefreshHandle>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let label = name.to_string();

        let worker = thread::Builder::new()
            .name(format!("refresh-{name}"))
            .spawn(move || {
                info!("Refresh task '{}' started, period {:?}", label, period);
                loop {
                    task();
                    select! {
                        recv(stop_rx) -> _ => break,
                        default(period) => {}
                    }
                }
                info!("Refresh task '{}' stopped", label);
            })?;

        Ok(RefreshHandle {
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        })
    }
}

/// Owner of a running refresh task; stops it when dropped.
pub struct RefreshHandle {
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Signal the worker and wait for it to finish its current run.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    fn shutdown(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.try_send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Refresh task panicked");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
