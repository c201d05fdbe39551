use crate::error::EventsError;
use core_types::FinancialEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification raised by another writer of the same store (e.g. a trigger
/// on the entries table). Only the operation and row id are carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteChange {
    pub operation: String,
    #[serde(default)]
    pub id: Option<Uuid>,
}

impl RemoteChange {
    /// Decodes the JSON payload of a database notification.
    pub fn from_payload(payload: &str) -> Result<Self, EventsError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// The top-level change notification enum.
///
/// Serialized as `{"type": "...", "payload": {...}}` so it can be logged or
/// forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EntryEvent {
    /// An entry was created through this process.
    Created(FinancialEntry),
    /// An entry was updated through this process.
    Updated(FinancialEntry),
    /// An entry was deleted through this process.
    Deleted { id: Uuid },
    /// Some other writer changed the store.
    RemoteChange(RemoteChange),
    /// The receiver fell behind and dropped notifications; reload everything.
    Resync,
}

impl EntryEvent {
    /// The id of the entry this event refers to, when it names one.
    pub fn entry_id(&self) -> Option<Uuid> {
        match self {
            EntryEvent::Created(entry) | EntryEvent::Updated(entry) => Some(entry.id),
            EntryEvent::Deleted { id } => Some(*id),
            EntryEvent::RemoteChange(change) => change.id,
            EntryEvent::Resync => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use core_types::{EntryType, NewEntry};
    use rust_decimal_macros::dec;

    #[test]
    fn remote_payload_decodes() {
        let change = RemoteChange::from_payload(
            r#"{"operation":"DELETE","id":"6f1c3a52-6c4b-4a8e-9d1e-0d6d3f1a2b3c"}"#,
        )
        .unwrap();
        assert_eq!(change.operation, "DELETE");
        assert!(change.id.is_some());
        assert!(RemoteChange::from_payload("not json").is_err());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let entry = FinancialEntry::from_new(
            NewEntry {
                entry_type: EntryType::Expense,
                category: "Fuel".into(),
                amount: dec!(40),
                date: NaiveDate::from_ymd_opt(2025, 6, 28).unwrap(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap();
        let event = EntryEvent::Created(entry.clone());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Created");
        assert_eq!(json["payload"]["category"], "Fuel");
        assert_eq!(event.entry_id(), Some(entry.id));
        assert_eq!(EntryEvent::Resync.entry_id(), None);
    }
}
