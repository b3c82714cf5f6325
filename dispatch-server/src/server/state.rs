use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::content_store::ContentStore;
use crate::deep_link::DeepLinkResolver;
use crate::delivery::{
    create_scheduler, DeletionScheduler, DeliveryLinks, DeliveryService, RetrievalHandler,
    SchedulerHandle,
};
use crate::ingestion::IngestionPipeline;
use crate::metadata::{MetadataProvider, MetadataResolver};
use crate::notifications::ContentAnnouncer;
use crate::telegram::MessagingApi;

use super::ServerConfig;

pub type GuardedContentStore = Arc<dyn ContentStore>;
pub type GuardedIngestionPipeline = Arc<IngestionPipeline>;
pub type GuardedRetrievalHandler = Arc<RetrievalHandler>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub content_store: GuardedContentStore,
    pub ingestion: GuardedIngestionPipeline,
    pub retrieval: GuardedRetrievalHandler,
    pub scheduler_handle: SchedulerHandle,
}

impl FromRef<ServerState> for GuardedContentStore {
    fn from_ref(input: &ServerState) -> Self {
        input.content_store.clone()
    }
}

impl FromRef<ServerState> for SchedulerHandle {
    fn from_ref(input: &ServerState) -> Self {
        input.scheduler_handle.clone()
    }
}

impl ServerState {
    /// Wire the pipeline and delivery components from resolved configuration.
    /// The returned scheduler must be spawned by the caller.
    pub fn assemble(
        config: &AppConfig,
        content_store: GuardedContentStore,
        messaging: Arc<dyn MessagingApi>,
        metadata: Arc<dyn MetadataProvider>,
        hash: String,
        shutdown_token: CancellationToken,
    ) -> (ServerState, DeletionScheduler) {
        let telegram = &config.telegram;
        let (scheduler, scheduler_handle) =
            create_scheduler(Arc::clone(&messaging), shutdown_token);

        let announcer = Arc::new(ContentAnnouncer::new(
            Arc::clone(&messaging),
            telegram.notification_channel,
            config.site_base_url.clone(),
        ));
        let ingestion = IngestionPipeline::new(
            Arc::clone(&content_store),
            MetadataResolver::new(metadata),
            announcer,
        );

        let delivery = DeliveryService::new(
            Arc::clone(&messaging),
            telegram.source_channel,
            config.delivery.retention,
            DeliveryLinks {
                bot_username: telegram.bot_username.clone(),
                main_channel: telegram.main_channel_link.clone(),
                update_channel: telegram.update_channel_link.clone(),
                developer: telegram.developer_link.clone(),
            },
            scheduler_handle.clone(),
        );
        let retrieval = RetrievalHandler::new(
            messaging,
            DeepLinkResolver::new(Arc::clone(&content_store)),
            delivery,
            telegram.bot_username.clone(),
            config.site_base_url.clone(),
        );

        let server_config = ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            metrics_port: config.metrics_port,
            source_channel: telegram.source_channel,
            webhook_secret: telegram
                .webhook_secret
                .as_ref()
                .map(|s| s.expose().to_string()),
        };

        let state = ServerState {
            config: server_config,
            start_time: Instant::now(),
            hash,
            content_store,
            ingestion: Arc::new(ingestion),
            retrieval: Arc::new(retrieval),
            scheduler_handle,
        };
        (state, scheduler)
    }
}
