//! Node construction: sentence segmentation, token budgeting and image pairing.

mod association;
mod builder;
mod image_store;
mod segmenter;

pub use association::{ExplicitAssociation, ImageAssociation, PositionalAssociation};
pub use builder::NodeBuilder;
pub use image_store::FsImageStore;
pub use segmenter::{LiteralSplitter, SentenceSplitter};
