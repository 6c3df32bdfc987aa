use crate::types::{ImageReference, ScoredMatch};

/// Separator between node texts in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Text and images gathered from one query's matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultimodalContext {
    /// Matched node texts in retriever order, blank-line separated.
    pub text_block: String,
    /// Images of the matched nodes that carry one, in retriever order.
    pub image_set: Vec<ImageReference>,
}

impl MultimodalContext {
    /// Build the context from retriever matches, preserving their order.
    pub fn from_matches(matches: &[ScoredMatch]) -> Self {
        let text_block = matches
            .iter()
            .map(|m| m.node.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        let image_set = matches
            .iter()
            .filter_map(|m| m.node.image_reference.clone())
            .collect();

        Self {
            text_block,
            image_set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetrievalNode;

    #[test]
    fn test_mixed_matches() {
        let matches = vec![
            ScoredMatch::new(
                RetrievalNode::new("doc", 3, "Second in index")
                    .with_image(ImageReference::new("img/doc/image_3.jpg")),
                0.9,
            ),
            ScoredMatch::new(RetrievalNode::new("doc", 0, "First in index"), 0.4),
        ];

        let context = MultimodalContext::from_matches(&matches);
        assert_eq!(context.text_block, "Second in index\n\nFirst in index");
        assert_eq!(context.image_set, vec![ImageReference::new("img/doc/image_3.jpg")]);
    }

    #[test]
    fn test_duplicate_images_kept() {
        let node = RetrievalNode::new("doc", 1, "x").with_image(ImageReference::new("a.jpg"));
        let matches = vec![ScoredMatch::new(node.clone(), 0.5), ScoredMatch::new(node, 0.5)];

        assert_eq!(MultimodalContext::from_matches(&matches).image_set.len(), 2);
    }

    #[test]
    fn test_no_matches() {
        let context = MultimodalContext::from_matches(&[]);
        assert!(context.text_block.is_empty());
        assert!(context.image_set.is_empty());
    }
}
