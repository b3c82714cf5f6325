//! Delivery of requested files and their deferred deletion.

mod handle;
mod job;
mod request;
mod scheduler;
mod service;

pub use handle::{SchedulerCommand, SchedulerError, SchedulerHandle};
pub use job::{DeliveryJob, JobKey};
pub use request::{
    RetrievalHandler, RetrievalOutcome, NOT_FOUND_TEXT, UNEXPECTED_ERROR_TEXT, VISIT_WEBSITE_TEXT,
};
pub use scheduler::{create_scheduler, DeletionScheduler};
pub use service::{build_caption, DeliveryLinks, DeliveryOutcome, DeliveryService, COPY_FAILED_TEXT};
