//! Mock collaborators for testing without real file or audio I/O.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use hskquiz_core::traits::{AssetResolver, AudioPlayer};

/// An asset resolver backed by an in-memory folder map.
#[derive(Default)]
pub struct MockAssetResolver {
    folders: HashMap<String, Vec<String>>,
    fail_folders: HashSet<String>,
    call_count: AtomicU32,
}

impl MockAssetResolver {
    /// Resolver with the given folder → paths mapping.
    pub fn new(folders: HashMap<String, Vec<String>>) -> Self {
        Self {
            folders,
            ..Self::default()
        }
    }

    /// Resolver with one folder holding the given paths.
    pub fn with_folder(folder: &str, paths: &[&str]) -> Self {
        let mut folders = HashMap::new();
        folders.insert(
            folder.to_string(),
            paths.iter().map(|p| (*p).to_string()).collect(),
        );
        Self::new(folders)
    }

    /// Make enumeration of a folder fail.
    pub fn fail_on(mut self, folder: &str) -> Self {
        self.fail_folders.insert(folder.to_string());
        self
    }

    /// Number of enumeration calls made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AssetResolver for MockAssetResolver {
    async fn list_assets(&self, folder: &str) -> anyhow::Result<Vec<String>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_folders.contains(folder) {
            anyhow::bail!("mock failure enumerating {folder}");
        }
        Ok(self.folders.get(folder).cloned().unwrap_or_default())
    }
}

/// An audio player that records what it was asked to speak.
#[derive(Default)]
pub struct MockAudioPlayer {
    spoken: Mutex<Vec<String>>,
    fail: bool,
}

impl MockAudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A player whose every `speak` call fails.
    pub fn failing() -> Self {
        Self {
            spoken: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioPlayer for MockAudioPlayer {
    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        if self.fail {
            anyhow::bail!("mock playback failure");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_resolver_serves_and_counts() {
        let resolver = MockAssetResolver::with_folder("gohoubi_images", &["01.png", "02.png"]);

        let paths = resolver.list_assets("gohoubi_images").await.unwrap();
        assert_eq!(paths, vec!["01.png", "02.png"]);

        let empty = resolver.list_assets("unknown").await.unwrap();
        assert!(empty.is_empty());
        assert_eq!(resolver.call_count(), 2);
    }

    #[tokio::test]
    async fn mock_resolver_can_fail_per_folder() {
        let resolver =
            MockAssetResolver::with_folder("gohoubi_images", &["01.png"]).fail_on("zannen_images");

        assert!(resolver.list_assets("gohoubi_images").await.is_ok());
        assert!(resolver.list_assets("zannen_images").await.is_err());
    }

    #[tokio::test]
    async fn mock_player_records_speech() {
        let player = MockAudioPlayer::new();
        player.speak("你好").await.unwrap();
        player.speak("谢谢").await.unwrap();
        assert_eq!(player.spoken(), vec!["你好", "谢谢"]);
    }

    #[tokio::test]
    async fn failing_player_still_records() {
        let player = MockAudioPlayer::failing();
        assert!(player.speak("你好").await.is_err());
        assert_eq!(player.spoken(), vec!["你好"]);
    }
}
