//! Image store trait.

use crate::error::PrismResult;
use crate::types::{ImageKey, ImageReference, SourceImage};

/// Persists extracted images so nodes can reference them by path.
///
/// Saving the same key twice overwrites the earlier image.
pub trait ImageStore: Send + Sync {
    /// Write `image` under `key` and return a reference the model can load.
    fn save(&self, key: &ImageKey, image: &SourceImage) -> PrismResult<ImageReference>;
}
