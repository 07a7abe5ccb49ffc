use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("slot must end after it starts ({start} / {end})")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("no time slot selected")]
    EmptySelection,

    #[error("slot {start} - {end} collides with existing booking \"{title}\"")]
    SlotConflict {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: String,
    },

    #[error("invalid booking form: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("portal returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid slot: {0}")]
    InvalidSlot(String),

    #[error("missing configuration: {0}")]
    Configuration(String),
}
