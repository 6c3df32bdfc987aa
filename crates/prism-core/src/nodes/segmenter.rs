//! Sentence boundary detection.

/// Splits raw text into ordered candidate sentences and joins them back.
///
/// `join` must be the inverse of `split` for any text the splitter produced,
/// so node text can be traced back to the source.
pub trait SentenceSplitter: Send + Sync {
    /// Split `text` into candidate sentences, in order.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;

    /// Separator placed between sentences that share a node.
    fn separator(&self) -> &str;
}

/// Splits on a literal marker, `". "` by default.
///
/// This is a heuristic: abbreviations, decimals and a missing trailing space
/// all produce wrong boundaries.
#[derive(Debug, Clone)]
pub struct LiteralSplitter {
    marker: String,
}

impl LiteralSplitter {
    /// Create a splitter for `marker`. An empty marker falls back to `". "`.
    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        if marker.is_empty() {
            return Self::default();
        }
        Self { marker }
    }
}

impl Default for LiteralSplitter {
    fn default() -> Self {
        Self {
            marker: ". ".to_string(),
        }
    }
}

impl SentenceSplitter for LiteralSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if text.is_empty() {
            return Vec::new();
        }
        text.split(self.marker.as_str()).collect()
    }

    fn separator(&self) -> &str {
        &self.marker
    }
}
