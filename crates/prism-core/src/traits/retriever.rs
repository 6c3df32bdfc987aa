//! Retriever trait.

use async_trait::async_trait;

use crate::error::PrismResult;
use crate::types::ScoredMatch;

/// Returns the nodes most relevant to a query, best first.
///
/// Retrieval strategy (similarity metric, top-k) is fixed when the retriever
/// is built; the query engine only consumes the ordered matches.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve scored matches for `query`. An empty result is not an error.
    async fn retrieve(&self, query: &str) -> PrismResult<Vec<ScoredMatch>>;
}
