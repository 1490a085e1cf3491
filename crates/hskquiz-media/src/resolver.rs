//! Filesystem reward-asset resolution.
//!
//! Enumerates reward images for a folder under a configured asset root. A
//! `images_config.json` manifest in the root takes precedence (entries that
//! do not exist on disk are skipped); otherwise the folder is scanned for
//! image files directly. The engine treats any error from here as "zero
//! candidates", so this resolver reports what it found and nothing more.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use hskquiz_core::traits::AssetResolver;

/// File extensions accepted as reward images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Manifest file consulted before scanning a folder.
pub const MANIFEST_FILE: &str = "images_config.json";

/// Resolves reward assets from folders under a root directory.
pub struct DirAssetResolver {
    root: PathBuf,
}

impl DirAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths listed for `folder` in the manifest, filtered to files that
    /// actually exist. `None` when there is no usable manifest entry.
    async fn from_manifest(&self, folder: &str) -> Option<Vec<String>> {
        let manifest_path = self.root.join(MANIFEST_FILE);
        let content = match tokio::fs::read_to_string(&manifest_path).await {
            Ok(content) => content,
            Err(_) => return None,
        };
        let manifest: HashMap<String, Vec<String>> = match serde_json::from_str(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(
                    path = %manifest_path.display(),
                    "ignoring unparsable manifest: {e}"
                );
                return None;
            }
        };

        let names = manifest.get(folder)?;
        let mut paths = Vec::new();
        for name in names {
            let path = self.root.join(folder).join(name);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                paths.push(path.to_string_lossy().into_owned());
            } else {
                tracing::debug!(path = %path.display(), "manifest names a missing image");
            }
        }
        if paths.is_empty() { None } else { Some(paths) }
    }

    /// Scan the folder for image files, sorted by file name.
    async fn scan_folder(&self, folder: &str) -> Result<Vec<String>> {
        let dir = self.root.join(folder);
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("failed to read asset folder: {}", dir.display()))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("failed to read asset folder: {}", dir.display()))?
        {
            let path = entry.path();
            if is_image(&path) {
                paths.push(path.to_string_lossy().into_owned());
            }
        }
        paths.sort();
        Ok(paths)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

#[async_trait]
impl AssetResolver for DirAssetResolver {
    async fn list_assets(&self, folder: &str) -> Result<Vec<String>> {
        if let Some(paths) = self.from_manifest(folder).await {
            tracing::debug!(folder, count = paths.len(), "assets resolved via manifest");
            return Ok(paths);
        }
        let paths = self.scan_folder(folder).await?;
        tracing::debug!(folder, count = paths.len(), "assets resolved via scan");
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    fn setup(folder: &str, files: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        for file in files {
            touch(&dir, file);
        }
        root
    }

    #[tokio::test]
    async fn scan_returns_sorted_image_paths() {
        let root = setup("gohoubi_images", &["02.png", "01.png", "03.jpg"]);
        let resolver = DirAssetResolver::new(root.path());

        let paths = resolver.list_assets("gohoubi_images").await.unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("01.png"));
        assert!(paths[1].ends_with("02.png"));
        assert!(paths[2].ends_with("03.jpg"));
    }

    #[tokio::test]
    async fn scan_skips_non_image_files() {
        let root = setup("gohoubi_images", &["01.png", "notes.txt", "readme.md"]);
        let resolver = DirAssetResolver::new(root.path());

        let paths = resolver.list_assets("gohoubi_images").await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("01.png"));
    }

    #[tokio::test]
    async fn missing_folder_is_an_error_for_the_engine_to_normalize() {
        let root = TempDir::new().unwrap();
        let resolver = DirAssetResolver::new(root.path());
        assert!(resolver.list_assets("zannen_images").await.is_err());
    }

    #[tokio::test]
    async fn empty_folder_yields_no_candidates() {
        let root = setup("zannen_images", &[]);
        let resolver = DirAssetResolver::new(root.path());
        let paths = resolver.list_assets("zannen_images").await.unwrap();
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn manifest_takes_precedence_and_skips_missing_files() {
        let root = setup("gohoubi_images", &["01.png", "02.png", "03.png"]);
        std::fs::write(
            root.path().join(MANIFEST_FILE),
            r#"{"gohoubi_images": ["01.png", "ghost.png"]}"#,
        )
        .unwrap();
        let resolver = DirAssetResolver::new(root.path());

        let paths = resolver.list_assets("gohoubi_images").await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("01.png"));
    }

    #[tokio::test]
    async fn unparsable_manifest_falls_back_to_scan() {
        let root = setup("gohoubi_images", &["01.png"]);
        std::fs::write(root.path().join(MANIFEST_FILE), "not json at all").unwrap();
        let resolver = DirAssetResolver::new(root.path());

        let paths = resolver.list_assets("gohoubi_images").await.unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[tokio::test]
    async fn manifest_without_the_folder_falls_back_to_scan() {
        let root = setup("zannen_images", &["f1.png", "f2.png"]);
        std::fs::write(
            root.path().join(MANIFEST_FILE),
            r#"{"gohoubi_images": ["01.png"]}"#,
        )
        .unwrap();
        let resolver = DirAssetResolver::new(root.path());

        let paths = resolver.list_assets("zannen_images").await.unwrap();
        assert_eq!(paths.len(), 2);
    }
}
