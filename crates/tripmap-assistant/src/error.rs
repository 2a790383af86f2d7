use thiserror::Error;
use tripmap_core::ConfigError;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("assistant returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse assistant response: {source}")]
    Deserialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("assistant response contained no message content")]
    EmptyReply,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
