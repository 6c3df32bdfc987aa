//! Filesystem image store.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PrismError, PrismResult};
use crate::traits::ImageStore;
use crate::types::{ImageKey, ImageReference, SourceImage};

/// Writes images to `<root>/<document_id>/image_<index>.<ext>`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Create a store rooted at `root`. Directories are created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an image with `key` and `image`'s format is written to.
    pub fn path_for(&self, key: &ImageKey, image: &SourceImage) -> PathBuf {
        self.root
            .join(sanitize(&key.document_id))
            .join(format!("image_{}.{}", key.index, image.format.extension()))
    }
}

impl ImageStore for FsImageStore {
    fn save(&self, key: &ImageKey, image: &SourceImage) -> PrismResult<ImageReference> {
        let path = self.path_for(key, image);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PrismError::image_persistence(
                    &key.document_id,
                    key.index,
                    format!("Failed to create {}", parent.display()),
                )
                .with_source(e)
            })?;
        }

        std::fs::write(&path, &image.bytes).map_err(|e| {
            PrismError::image_persistence(
                &key.document_id,
                key.index,
                format!("Failed to write {}", path.display()),
            )
            .with_source(e)
        })?;

        debug!(document_id = %key.document_id, index = key.index, path = %path.display(), "Saved image");
        Ok(ImageReference::new(path))
    }
}

/// Keep document ids from escaping the store root.
fn sanitize(document_id: &str) -> String {
    let cleaned: String = document_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}
