//! Audio playback via an external text-to-speech command.
//!
//! The engine only needs "speak this Chinese text"; how that happens is a
//! deployment detail. The command player shells out to whatever TTS binary
//! the host has (`say` on macOS, `espeak-ng` elsewhere), and the null player
//! swallows everything for text-only runs and CI.

use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use hskquiz_core::traits::AudioPlayer;

/// Playback failures the command player can report.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The TTS command ran but exited non-zero.
    #[error("audio command `{command}` exited with status {status}")]
    CommandFailed { command: String, status: i32 },
}

/// Speaks text by running a configured command with the text as the final
/// argument.
pub struct CommandAudioPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandAudioPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// macOS `say` with a Mandarin voice.
    pub fn macos_say() -> Self {
        Self::new("say", vec!["-v".into(), "Tingting".into()])
    }

    /// `espeak-ng` with the Mandarin voice, the usual Linux choice.
    pub fn espeak() -> Self {
        Self::new("espeak-ng", vec!["-v".into(), "cmn".into()])
    }
}

#[async_trait]
impl AudioPlayer for CommandAudioPlayer {
    async fn speak(&self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("failed to run audio command `{}`", self.program))?;

        if !status.success() {
            return Err(AudioError::CommandFailed {
                command: self.program.clone(),
                status: status.code().unwrap_or(-1),
            }
            .into());
        }
        Ok(())
    }
}

/// Player that plays nothing. For `--no-audio` runs and tests.
pub struct NullAudioPlayer;

#[async_trait]
impl AudioPlayer for NullAudioPlayer {
    async fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_player_always_succeeds() {
        assert!(NullAudioPlayer.speak("你好").await.is_ok());
    }

    #[tokio::test]
    async fn succeeding_command_is_ok() {
        let player = CommandAudioPlayer::new("true", vec![]);
        assert!(player.speak("你好").await.is_ok());
    }

    #[tokio::test]
    async fn failing_command_reports_its_status() {
        let player = CommandAudioPlayer::new("false", vec![]);
        let err = player.speak("你好").await.unwrap_err();
        assert!(err.to_string().contains("exited with status"));
    }

    #[tokio::test]
    async fn missing_command_reports_context() {
        let player = CommandAudioPlayer::new("definitely-not-a-tts-binary", vec![]);
        let err = player.speak("你好").await.unwrap_err();
        assert!(err.to_string().contains("failed to run audio command"));
    }
}
