//! Pairing of extracted images with nodes.

use std::collections::HashMap;

/// Decides which extracted image, if any, belongs to each node.
pub trait ImageAssociation: Send + Sync {
    /// Index into the document's image list for the node at `sequence_index`.
    ///
    /// `image_count` is the number of images extracted from the document.
    fn image_for(&self, sequence_index: usize, image_count: usize) -> Option<usize>;
}

/// Image `i` belongs to node `i`; nodes past the image list get none.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalAssociation;

impl ImageAssociation for PositionalAssociation {
    fn image_for(&self, sequence_index: usize, image_count: usize) -> Option<usize> {
        (sequence_index < image_count).then_some(sequence_index)
    }
}

/// Caller-supplied node-to-image mapping, e.g. from page layout.
///
/// Entries pointing past the image list are ignored.
#[derive(Debug, Clone, Default)]
pub struct ExplicitAssociation {
    mapping: HashMap<usize, usize>,
}

impl ExplicitAssociation {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair node `sequence_index` with image `image_index`.
    pub fn pair(mut self, sequence_index: usize, image_index: usize) -> Self {
        self.mapping.insert(sequence_index, image_index);
        self
    }
}

impl FromIterator<(usize, usize)> for ExplicitAssociation {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        Self {
            mapping: iter.into_iter().collect(),
        }
    }
}

impl ImageAssociation for ExplicitAssociation {
    fn image_for(&self, sequence_index: usize, image_count: usize) -> Option<usize> {
        self.mapping
            .get(&sequence_index)
            .copied()
            .filter(|&i| i < image_count)
    }
}
