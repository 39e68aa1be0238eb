//! Registry configuration.

use std::time::Duration;

use starnotary_core::{DEFAULT_PROTOCOL_TAG, MAX_STORY_BYTES};

use crate::error::{NotaryError, Result};

/// Default challenge acceptance window.
pub const DEFAULT_CHALLENGE_WINDOW: Duration = Duration::from_secs(300);

/// Configuration for the [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotaryConfig {
    /// How long a challenge stays valid after issue, in whole seconds. A
    /// challenge exactly this old is still accepted.
    pub challenge_window: Duration,
    /// Tag embedded in every challenge message.
    pub protocol_tag: String,
    /// Maximum story length in bytes.
    pub max_story_bytes: usize,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            challenge_window: DEFAULT_CHALLENGE_WINDOW,
            protocol_tag: DEFAULT_PROTOCOL_TAG.to_string(),
            max_story_bytes: MAX_STORY_BYTES,
        }
    }
}

impl NotaryConfig {
    /// Set the challenge window.
    pub fn with_challenge_window(mut self, window: Duration) -> Self {
        self.challenge_window = window;
        self
    }

    /// Set the protocol tag.
    pub fn with_protocol_tag(mut self, tag: impl Into<String>) -> Self {
        self.protocol_tag = tag.into();
        self
    }

    /// Set the story length limit.
    pub fn with_max_story_bytes(mut self, max: usize) -> Self {
        self.max_story_bytes = max;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.challenge_window.as_secs() == 0 {
            return Err(NotaryError::InvalidConfig(
                "challenge window must be at least one second".into(),
            ));
        }
        // Challenges carry whole seconds
        if self.challenge_window.subsec_nanos() != 0 {
            return Err(NotaryError::InvalidConfig(format!(
                "challenge window {:?} is not a whole number of seconds",
                self.challenge_window
            )));
        }
        if self.protocol_tag.is_empty() || self.protocol_tag.contains(':') {
            return Err(NotaryError::InvalidConfig(format!(
                "protocol tag {:?} must be non-empty and contain no ':'",
                self.protocol_tag
            )));
        }
        if self.max_story_bytes == 0 {
            return Err(NotaryError::InvalidConfig(
                "story limit must be positive".into(),
            ));
        }
        Ok(())
    }
}
