use crate::DbError;
use crate::repository::{EVENT_CAPACITY, EntryRepository, sort_newest_first};
use async_trait::async_trait;
use chrono::Utc;
use core_types::{EntryPatch, FinancialEntry, NewEntry};
use events::EntryEvent;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

/// A process-local `EntryRepository`.
///
/// Used when no database is configured, optionally seeded from a JSON export
/// of a previous `list_entries`.
#[derive(Debug)]
pub struct InMemoryRepository {
    entries: RwLock<Vec<FinancialEntry>>,
    events: broadcast::Sender<EntryEvent>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    pub fn with_entries(entries: Vec<FinancialEntry>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { entries: RwLock::new(entries), events }
    }

    /// Seeds the store from a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, DbError> {
        let entries: Vec<FinancialEntry> = serde_json::from_str(json)?;
        tracing::info!(count = entries.len(), "Seeded in-memory entry store");
        Ok(Self::with_entries(entries))
    }

    fn announce(&self, event: EntryEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl EntryRepository for InMemoryRepository {
    async fn list_entries(&self) -> Result<Vec<FinancialEntry>, DbError> {
        let mut entries = self.entries.read().await.clone();
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<FinancialEntry, DbError> {
        let entry = FinancialEntry::from_new(entry, Utc::now())?;
        self.entries.write().await.push(entry.clone());
        self.announce(EntryEvent::Created(entry.clone()));
        Ok(entry)
    }

    async fn update_entry(&self, id: Uuid, patch: EntryPatch) -> Result<FinancialEntry, DbError> {
        let updated = {
            let mut entries = self.entries.write().await;
            let entry = entries
                .iter_mut()
                .find(|entry| entry.id == id)
                .ok_or(DbError::NotFound(id))?;
            patch.apply(entry, Utc::now())?;
            entry.clone()
        };
        self.announce(EntryEvent::Updated(updated.clone()));
        Ok(updated)
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, DbError> {
        let deleted = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            entries.len() < before
        };
        if deleted {
            self.announce(EntryEvent::Deleted { id });
        }
        Ok(deleted)
    }

    fn changes(&self) -> broadcast::Receiver<EntryEvent> {
        self.events.subscribe()
    }
}
