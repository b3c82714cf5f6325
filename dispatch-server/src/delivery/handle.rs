use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::job::DeliveryJob;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Deletion scheduler not available")]
    Unavailable,
}

/// Command sent to the scheduler.
pub enum SchedulerCommand {
    Schedule {
        job: DeliveryJob,
        response: oneshot::Sender<bool>,
    },
    Pending {
        response: oneshot::Sender<Vec<DeliveryJob>>,
    },
}

/// Handle to the deletion scheduler, shared by request handlers.
#[derive(Clone)]
pub struct SchedulerHandle {
    command_tx: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    pub fn new(command_tx: mpsc::Sender<SchedulerCommand>) -> Self {
        Self { command_tx }
    }

    /// Schedule `job`, replacing a pending job with the same key.
    /// Returns true when a job was replaced.
    pub async fn schedule(&self, job: DeliveryJob) -> Result<bool, SchedulerError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(SchedulerCommand::Schedule {
                job,
                response: response_tx,
            })
            .await
            .map_err(|_| SchedulerError::Unavailable)?;
        response_rx.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// Pending jobs, soonest first.
    pub async fn pending_jobs(&self) -> Result<Vec<DeliveryJob>, SchedulerError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(SchedulerCommand::Pending {
                response: response_tx,
            })
            .await
            .map_err(|_| SchedulerError::Unavailable)?;
        response_rx.await.map_err(|_| SchedulerError::Unavailable)
    }
}
