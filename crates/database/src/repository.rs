use crate::DbError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{EntryPatch, FinancialEntry, NewEntry};
use events::{EntryEvent, RemoteChange};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::postgres::{PgListener, PgPool};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// The notification channel the `entries` trigger publishes on.
pub const CHANGE_CHANNEL: &str = "entries_changed";

/// Buffered events per receiver before it starts lagging.
pub(crate) const EVENT_CAPACITY: usize = 256;

/// Storage for financial entries.
///
/// Every successful write is announced on the `changes()` channel. Consumers
/// should treat any event as "reload": there is no delta contract.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// All entries, newest date first; same-day entries newest-created first.
    async fn list_entries(&self) -> Result<Vec<FinancialEntry>, DbError>;

    async fn create_entry(&self, entry: NewEntry) -> Result<FinancialEntry, DbError>;

    /// Applies `patch` to the entry with `id`.
    ///
    /// Fails with `DbError::NotFound` when no such entry exists.
    async fn update_entry(&self, id: Uuid, patch: EntryPatch) -> Result<FinancialEntry, DbError>;

    /// Removes the entry with `id`. Returns `false` when it did not exist.
    async fn delete_entry(&self, id: Uuid) -> Result<bool, DbError>;

    fn changes(&self) -> broadcast::Receiver<EntryEvent>;
}

/// Orders entries the way `EntryRepository::list_entries` promises.
pub(crate) fn sort_newest_first(entries: &mut [FinancialEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
}

/// A row of the `entries` table.
#[derive(FromRow, Debug, Clone)]
struct DbEntry {
    id: Uuid,
    #[sqlx(rename = "type")]
    entry_type: String,
    category: String,
    amount: Decimal,
    date: NaiveDate,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbEntry> for FinancialEntry {
    type Error = DbError;

    fn try_from(row: DbEntry) -> Result<Self, Self::Error> {
        Ok(FinancialEntry {
            id: row.id,
            entry_type: row.entry_type.parse()?,
            category: row.category,
            amount: row.amount,
            date: row.date,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_ENTRIES: &str = r#"
    SELECT id, type, category, amount, date, description, created_at, updated_at
    FROM entries
"#;

/// `EntryRepository` backed by the PostgreSQL `entries` table.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
    events: broadcast::Sender<EntryEvent>,
}

impl PgRepository {
    /// Creates a new `PgRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { pool, events }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Forwards notifications from other writers into `changes()` as
    /// `EntryEvent::RemoteChange`.
    ///
    /// Writes made through this repository also fire the trigger, so they are
    /// seen twice; consumers reload on any event and do not mind.
    pub async fn spawn_listener(&self) -> Result<JoinHandle<()>, DbError> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        tracing::info!(channel = CHANGE_CHANNEL, "Listening for remote entry changes");

        let events = self.events.clone();
        Ok(tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        let event = match RemoteChange::from_payload(notification.payload()) {
                            Ok(change) => EntryEvent::RemoteChange(change),
                            Err(e) => {
                                tracing::warn!(error = %e, payload = notification.payload(), "Undecodable change notification");
                                EntryEvent::Resync
                            }
                        };
                        // No receivers is not an error; nobody is watching yet.
                        let _ = events.send(event);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Change listener failed. Shutting down.");
                        let _ = events.send(EntryEvent::Resync);
                        break;
                    }
                }
            }
        }))
    }

    async fn fetch_entry(&self, id: Uuid) -> Result<Option<FinancialEntry>, DbError> {
        let query = format!("{SELECT_ENTRIES} WHERE id = $1");
        sqlx::query_as::<_, DbEntry>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(FinancialEntry::try_from)
            .transpose()
    }

    fn announce(&self, event: EntryEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl EntryRepository for PgRepository {
    async fn list_entries(&self) -> Result<Vec<FinancialEntry>, DbError> {
        let query = format!("{SELECT_ENTRIES} ORDER BY date DESC, created_at DESC");
        let rows = sqlx::query_as::<_, DbEntry>(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(FinancialEntry::try_from).collect()
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<FinancialEntry, DbError> {
        let entry = FinancialEntry::from_new(entry, Utc::now())?;

        sqlx::query(
            r#"
            INSERT INTO entries (id, type, category, amount, date, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(entry.entry_type.as_str())
        .bind(&entry.category)
        .bind(entry.amount)
        .bind(entry.date)
        .bind(&entry.description)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %entry.id, "Created entry");
        self.announce(EntryEvent::Created(entry.clone()));
        Ok(entry)
    }

    async fn update_entry(&self, id: Uuid, patch: EntryPatch) -> Result<FinancialEntry, DbError> {
        patch.validate()?;
        let mut entry = self.fetch_entry(id).await?.ok_or(DbError::NotFound(id))?;
        patch.apply(&mut entry, Utc::now())?;

        let result = sqlx::query(
            r#"
            UPDATE entries
            SET type = $2, category = $3, amount = $4, date = $5, description = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(entry.id)
        .bind(entry.entry_type.as_str())
        .bind(&entry.category)
        .bind(entry.amount)
        .bind(entry.date)
        .bind(&entry.description)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        // Deleted by another writer between the read and the write.
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id));
        }

        tracing::debug!(%id, "Updated entry");
        self.announce(EntryEvent::Updated(entry.clone()));
        Ok(entry)
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(%id, "Deleted entry");
            self.announce(EntryEvent::Deleted { id });
        }
        Ok(deleted)
    }

    fn changes(&self) -> broadcast::Receiver<EntryEvent> {
        self.events.subscribe()
    }
}
