//! hskquiz-media — asset resolution and audio playback.
//!
//! Implements the core's `AssetResolver` and `AudioPlayer` traits against
//! the real filesystem and a text-to-speech command, plus mock versions for
//! testing the engine without touching either.

pub mod audio;
pub mod mock;
pub mod resolver;

pub use audio::{AudioError, CommandAudioPlayer, NullAudioPlayer};
pub use resolver::DirAssetResolver;
