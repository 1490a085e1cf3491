//! Collaborator traits for asset resolution and audio playback.
//!
//! These async traits are implemented by the `hskquiz-media` crate. The
//! engine only ever talks to trait objects and performs no file or audio
//! I/O itself, so front-ends and tests can swap in whatever they need.

use async_trait::async_trait;

/// Enumerates displayable reward assets.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// Ordered list of asset paths available in a reward folder.
    ///
    /// Errors are normalized to "zero candidates" by the engine; a missing
    /// reward image is a valid outcome, not a session failure.
    async fn list_assets(&self, folder: &str) -> anyhow::Result<Vec<String>>;
}

/// Speaks a round's prompt out loud.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Speak the given Chinese text. Playback runs off the engine's call
    /// path; a failure is logged and never blocks answering.
    async fn speak(&self, text: &str) -> anyhow::Result<()>;
}
