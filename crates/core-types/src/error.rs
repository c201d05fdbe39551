use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}

impl CoreError {
    pub(crate) fn invalid(field: &str, detail: impl Into<String>) -> Self {
        CoreError::InvalidInput(field.to_string(), detail.into())
    }
}
