//! Deletion scheduler: a single task owning every pending deletion.

use std::collections::HashMap;
use std::future::poll_fn;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::time::{delay_queue, DelayQueue};
use tracing::{debug, info, warn};

use super::handle::{SchedulerCommand, SchedulerHandle};
use super::job::{DeliveryJob, JobKey};
use crate::server::metrics;
use crate::telegram::MessagingApi;

pub struct DeletionScheduler {
    api: Arc<dyn MessagingApi>,
    queue: DelayQueue<JobKey>,
    jobs: HashMap<JobKey, (delay_queue::Key, DeliveryJob)>,
    command_receiver: mpsc::Receiver<SchedulerCommand>,
    shutdown_token: CancellationToken,
}

impl DeletionScheduler {
    fn new(
        api: Arc<dyn MessagingApi>,
        command_receiver: mpsc::Receiver<SchedulerCommand>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            api,
            queue: DelayQueue::new(),
            jobs: HashMap::new(),
            command_receiver,
            shutdown_token,
        }
    }

    /// Main scheduler loop.
    pub async fn run(mut self) {
        info!("Starting deletion scheduler");

        loop {
            tokio::select! {
                Some(expired) = poll_fn(|cx| self.queue.poll_expired(cx)), if !self.queue.is_empty() => {
                    let key = expired.into_inner();
                    if let Some((_, job)) = self.jobs.remove(&key) {
                        self.fire(job);
                    }
                    metrics::set_pending_deletions(self.jobs.len());
                }
                cmd = self.command_receiver.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => {
                            debug!("All scheduler handles dropped");
                            break;
                        }
                    }
                }
                _ = self.shutdown_token.cancelled() => {
                    info!("Deletion scheduler received shutdown signal");
                    break;
                }
            }
        }

        if !self.jobs.is_empty() {
            warn!(
                "Deletion scheduler stopped with {} pending jobs; they will not fire",
                self.jobs.len()
            );
        }
        info!("Deletion scheduler stopped");
    }

    fn handle_command(&mut self, cmd: SchedulerCommand) {
        match cmd {
            SchedulerCommand::Schedule { job, response } => {
                let replaced = self.schedule(job);
                let _ = response.send(replaced);
            }
            SchedulerCommand::Pending { response } => {
                let mut pending: Vec<DeliveryJob> =
                    self.jobs.values().map(|(_, job)| job.clone()).collect();
                pending.sort_by(|a, b| a.fire_at.cmp(&b.fire_at));
                let _ = response.send(pending);
            }
        }
    }

    /// Insert `job`, dropping any pending job with the same key. Returns whether
    /// one was replaced.
    fn schedule(&mut self, job: DeliveryJob) -> bool {
        let replaced = match self.jobs.remove(&job.job_key) {
            Some((old_key, _)) => {
                self.queue.remove(&old_key);
                true
            }
            None => false,
        };

        let delay_key = self.queue.insert(job.job_key.clone(), job.remaining());
        debug!(
            "Scheduled {} to fire at {} (replaced: {})",
            job.job_key, job.fire_at, replaced
        );
        self.jobs.insert(job.job_key.clone(), (delay_key, job));
        metrics::set_pending_deletions(self.jobs.len());
        replaced
    }

    /// Delete the delivered message; failures are logged only.
    fn fire(&self, job: DeliveryJob) {
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            match api.delete_message(job.chat, job.delivered_message).await {
                Ok(()) => {
                    debug!("Deleted message {} in chat {}", job.delivered_message, job.chat);
                    metrics::record_deletion_fired("deleted");
                }
                Err(e) => {
                    warn!("Failed to run {}: {}", job.job_key, e);
                    metrics::record_deletion_fired("failed");
                }
            }
        });
    }
}

/// Create a scheduler and its handle. The caller spawns `run`.
pub fn create_scheduler(
    api: Arc<dyn MessagingApi>,
    shutdown_token: CancellationToken,
) -> (DeletionScheduler, SchedulerHandle) {
    let (command_tx, command_rx) = mpsc::channel(100);
    let scheduler = DeletionScheduler::new(api, command_rx, shutdown_token);
    (scheduler, SchedulerHandle::new(command_tx))
}
