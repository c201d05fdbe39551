use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three kinds of money movement the tracker records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Expense,
    Income,
    Investment,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [EntryType::Expense, EntryType::Income, EntryType::Investment];

    /// The lowercase name used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Expense => "expense",
            EntryType::Income => "income",
            EntryType::Investment => "investment",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(EntryType::Expense),
            "income" => Ok(EntryType::Income),
            "investment" => Ok(EntryType::Investment),
            other => Err(CoreError::invalid("entry type", format!("unknown type '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Income".parse::<EntryType>().unwrap(), EntryType::Income);
        assert_eq!(" expense ".parse::<EntryType>().unwrap(), EntryType::Expense);
        assert!("salary".parse::<EntryType>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&EntryType::Investment).unwrap();
        assert_eq!(json, "\"investment\"");
    }
}
