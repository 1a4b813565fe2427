//! Prompt-model API
//!
//! An on-device generative language model, consumed through a readiness
//! query and single-turn sessions. Sessions hold model resources and must be
//! destroyed after use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::classifier::DownloadProgress;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Not supported on this device
    Unavailable,
    /// Supported, but weights must be downloaded first
    Downloadable,
    /// Ready for a session
    Ready,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Unavailable => "unavailable",
            Availability::Downloadable => "downloadable",
            Availability::Ready => "ready",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unavailable" | "no" => Ok(Availability::Unavailable),
            "downloadable" | "after-download" | "downloading" => Ok(Availability::Downloadable),
            "ready" | "available" | "readily" => Ok(Availability::Ready),
            _ => Err(format!("Unknown model availability: {}", s)),
        }
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn availability(&self) -> Result<Availability>;

    /// Create a session primed with a system instruction. Triggers the
    /// download when the model is [`Availability::Downloadable`].
    async fn create_session(
        &self,
        system_prompt: &str,
        on_download: &(dyn Fn(DownloadProgress) + Send + Sync),
    ) -> Result<Box<dyn PromptSession>>;
}

#[async_trait]
pub trait PromptSession: Send {
    /// Single-turn prompt, returning the raw model text
    async fn prompt(&mut self, input: &str) -> Result<String>;

    /// Release the session's resources
    async fn destroy(self: Box<Self>);
}
