//! The visible transcript and the extract → normalize step after each reply.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tripmap_core::Destination;
use tripmap_extract::{extract, normalize_with, CountryBands};

use crate::client::AssistantClient;
use crate::error::AssistantError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// What one successful exchange yields to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    /// Reply prose with the structured block removed.
    pub cleaned_text: String,
    /// Empty when the reply carried no recognisable structured block.
    pub destinations: Vec<Destination>,
}

pub struct Conversation {
    client: AssistantClient,
    bands: CountryBands,
    transcript: Vec<TranscriptEntry>,
}

impl Conversation {
    #[must_use]
    pub fn new(client: AssistantClient) -> Self {
        Self {
            client,
            bands: CountryBands::default(),
            transcript: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_bands(mut self, bands: CountryBands) -> Self {
        self.bands = bands;
        self
    }

    #[must_use]
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Sends `message`, records both sides in the transcript, and returns the
    /// cleaned reply together with any destinations it described.
    ///
    /// # Errors
    ///
    /// Returns the [`AssistantError`] from the request. The failure is also
    /// appended to the transcript as an [`Role::Error`] entry; earlier entries
    /// are kept.
    pub async fn ask(&mut self, message: &str) -> Result<Exchange, AssistantError> {
        self.push(Role::User, message.to_owned());

        let reply = match self.client.complete(message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "assistant request failed");
                self.push(Role::Error, e.to_string());
                return Err(e);
            }
        };

        let extraction = extract(&reply);
        let destinations = extraction
            .structured_data
            .as_ref()
            .map(|payload| normalize_with(payload, &self.bands))
            .unwrap_or_default();
        tracing::info!(destinations = destinations.len(), "assistant reply processed");

        self.push(Role::Assistant, extraction.cleaned_text.clone());
        Ok(Exchange {
            cleaned_text: extraction.cleaned_text,
            destinations,
        })
    }

    fn push(&mut self, role: Role, text: String) {
        self.transcript.push(TranscriptEntry {
            role,
            text,
            at: Utc::now(),
        });
    }
}
