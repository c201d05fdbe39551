use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventsError {
    #[error("Failed to decode change notification: {0}")]
    Decode(#[from] serde_json::Error),
}
