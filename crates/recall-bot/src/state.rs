//! Application state wiring the archive, configuration and secrets together.
//!
//! AppState is shared by the operator CLI and the Telegram front end. The
//! bot-only pieces (LLM provider, publisher, transport) are built by
//! [`crate::telegram::run`] because the CLI never needs them.

use std::path::PathBuf;

use recall_core::history::service::HistoryService;
use recall_core::publish::{DisabledPublisher, DocumentPublisher};
use recall_infra::config::{load_config, resolve_data_dir, Secrets};
use recall_infra::sqlite::history::SqliteHistoryRepository;
use recall_infra::sqlite::pool::{database_url, DatabasePool};
use recall_infra::telegraph::TelegraphPublisher;
use recall_types::config::{PublishingSettings, RecallConfig};
use recall_types::error::PublishError;

pub type ConcreteHistoryService = HistoryService<SqliteHistoryRepository>;

/// Shared application state.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: RecallConfig,
    pub secrets: Secrets,
    pub db_pool: DatabasePool,
    pub history: ConcreteHistoryService,
}

impl AppState {
    /// Resolve the data dir, load config and secrets, open the database.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let secrets = Secrets::from_env();

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        tracing::debug!(data_dir = %data_dir.display(), "Archive opened");

        let history = HistoryService::new(SqliteHistoryRepository::new(db_pool.clone()));

        Ok(Self {
            data_dir,
            config,
            secrets,
            db_pool,
            history,
        })
    }
}

/// Publisher selected by `[publishing] enabled`.
pub enum ConfiguredPublisher {
    Telegraph(TelegraphPublisher),
    Disabled(DisabledPublisher),
}

impl ConfiguredPublisher {
    pub fn from_settings(settings: &PublishingSettings) -> Result<Self, PublishError> {
        if settings.enabled {
            Ok(Self::Telegraph(TelegraphPublisher::new(settings)?))
        } else {
            tracing::info!("Publishing disabled, long answers will be truncated");
            Ok(Self::Disabled(DisabledPublisher))
        }
    }
}

impl DocumentPublisher for ConfiguredPublisher {
    async fn create_account(
        &self,
        short_name: &str,
        author_name: &str,
    ) -> Result<String, PublishError> {
        match self {
            Self::Telegraph(p) => p.create_account(short_name, author_name).await,
            Self::Disabled(p) => p.create_account(short_name, author_name).await,
        }
    }

    async fn publish(&self, title: &str, html: &str) -> Result<String, PublishError> {
        match self {
            Self::Telegraph(p) => p.publish(title, html).await,
            Self::Disabled(p) => p.publish(title, html).await,
        }
    }
}
