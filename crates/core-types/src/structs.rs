use crate::enums::EntryType;
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded money movement.
///
/// Entries are owned by the storage layer; the calendar and analytics crates
/// only ever read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: String,
    /// Always non-negative; the direction is carried by `entry_type`.
    pub amount: Decimal,
    /// The calendar day the movement belongs to.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancialEntry {
    /// Materializes a validated `NewEntry` with a fresh id and timestamps.
    pub fn from_new(new: NewEntry, now: DateTime<Utc>) -> Result<Self, CoreError> {
        new.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            entry_type: new.entry_type,
            category: new.category.trim().to_string(),
            amount: new.amount,
            date: new.date,
            description: new.description,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is(&self, entry_type: EntryType) -> bool {
        self.entry_type == entry_type
    }
}

/// The caller-supplied fields of an entry that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewEntry {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_amount(self.amount)?;
        validate_category(&self.category)
    }
}

/// A partial update. `None` leaves the stored value untouched; for the
/// description, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<EntryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.entry_type.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        Ok(())
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply(&self, entry: &mut FinancialEntry, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.validate()?;
        if let Some(entry_type) = self.entry_type {
            entry.entry_type = entry_type;
        }
        if let Some(category) = &self.category {
            entry.category = category.trim().to_string();
        }
        if let Some(amount) = self.amount {
            entry.amount = amount;
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
        entry.updated_at = now;
        Ok(())
    }
}

fn validate_amount(amount: Decimal) -> Result<(), CoreError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::invalid("amount", format!("{amount} is negative")));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), CoreError> {
    if category.trim().is_empty() {
        return Err(CoreError::invalid("category", "must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_entry(amount: Decimal) -> NewEntry {
        NewEntry {
            entry_type: EntryType::Income,
            category: "  Freelance ".into(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 6, 27).unwrap(),
            description: None,
        }
    }

    #[test]
    fn from_new_trims_category_and_stamps_times() {
        let now = Utc::now();
        let entry = FinancialEntry::from_new(new_entry(dec!(1000)), now).unwrap();
        assert_eq!(entry.category, "Freelance");
        assert_eq!(entry.created_at, now);
        assert_eq!(entry.updated_at, now);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(FinancialEntry::from_new(new_entry(dec!(-1)), Utc::now()).is_err());
        assert!(FinancialEntry::from_new(new_entry(dec!(0)), Utc::now()).is_ok());
    }

    #[test]
    fn patch_updates_only_present_fields() {
        let created = Utc::now();
        let mut entry = FinancialEntry::from_new(new_entry(dec!(10)), created).unwrap();
        let patch = EntryPatch {
            amount: Some(dec!(25.50)),
            description: Some(Some("invoice 12".into())),
            ..Default::default()
        };
        let later = created + chrono::Duration::seconds(5);
        patch.apply(&mut entry, later).unwrap();

        assert_eq!(entry.amount, dec!(25.50));
        assert_eq!(entry.category, "Freelance");
        assert_eq!(entry.description.as_deref(), Some("invoice 12"));
        assert_eq!(entry.updated_at, later);
    }

    #[test]
    fn patch_with_blank_category_fails_without_mutating() {
        let mut entry = FinancialEntry::from_new(new_entry(dec!(10)), Utc::now()).unwrap();
        let before = entry.clone();
        let patch = EntryPatch { category: Some("   ".into()), ..Default::default() };
        assert!(patch.apply(&mut entry, Utc::now()).is_err());
        assert_eq!(entry, before);
    }

    #[test]
    fn entry_json_uses_type_key_and_plain_date() {
        let entry = FinancialEntry::from_new(new_entry(dec!(10)), Utc::now()).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2025-06-27");
    }
}
