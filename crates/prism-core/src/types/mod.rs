//! Core types for prism.

mod image;
mod message;
mod node;

pub use image::*;
pub use message::*;
pub use node::*;
