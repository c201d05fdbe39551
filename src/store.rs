//! Opens the configured entry store.

use anyhow::{Context, Result};
use configuration::{Config, StorageBackend};
use database::{EntryRepository, InMemoryRepository, PgRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct Store {
    repo: Arc<dyn EntryRepository>,
    backend: StorageBackend,
    /// JSON file the in-memory store was seeded from and is written back to.
    source: Option<PathBuf>,
    _listener: Option<JoinHandle<()>>,
}

impl Store {
    /// `source` overrides `storage.seed_file`. With `listen`, the PostgreSQL
    /// store also forwards changes made by other writers.
    pub async fn open(config: &Config, source: Option<&Path>, listen: bool) -> Result<Self> {
        let source = source.map(Path::to_path_buf).or_else(|| config.storage.seed_file.clone());

        match config.storage.backend {
            StorageBackend::Memory => {
                let repo = match &source {
                    Some(path) if path.exists() => {
                        let json = tokio::fs::read_to_string(path)
                            .await
                            .with_context(|| format!("Failed to read {}", path.display()))?;
                        InMemoryRepository::from_json(&json)
                            .with_context(|| format!("Failed to parse {}", path.display()))?
                    }
                    Some(path) => {
                        tracing::info!(path = %path.display(), "Entry file does not exist yet, starting empty");
                        InMemoryRepository::new()
                    }
                    None => InMemoryRepository::new(),
                };
                Ok(Self { repo: Arc::new(repo), backend: StorageBackend::Memory, source, _listener: None })
            }
            StorageBackend::Postgres => {
                if let Some(path) = &source {
                    tracing::warn!(path = %path.display(), "Ignoring entry file with the postgres backend");
                }
                let url = database::database_url(&config.storage.database_url_env)?;
                let pool = database::connect(&url, config.storage.max_connections).await?;
                database::run_migrations(&pool)
                    .await
                    .context("Failed to run database migrations")?;

                let repo = PgRepository::new(pool);
                let listener = if listen { Some(repo.spawn_listener().await?) } else { None };
                Ok(Self {
                    repo: Arc::new(repo),
                    backend: StorageBackend::Postgres,
                    source: None,
                    _listener: listener,
                })
            }
        }
    }

    pub fn repo(&self) -> &dyn EntryRepository {
        self.repo.as_ref()
    }

    /// Writes the in-memory store back to its entry file after a change.
    /// PostgreSQL writes are already durable.
    pub async fn persist(&self) -> Result<()> {
        let Some(path) = &self.source else {
            if self.backend == StorageBackend::Memory {
                tracing::warn!("No entry file configured; this change is lost when the process exits");
            }
            return Ok(());
        };
        let entries = self.repo.list_entries().await?;
        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), count = entries.len(), "Saved entries");
        Ok(())
    }
}
