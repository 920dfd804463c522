use crate::{SearchError, SearchQuery, SearchResponse};
use async_trait::async_trait;

#[async_trait]
pub trait DocumentIndex {
    /// Runs one disjunctive full-text query and returns hits in rank order.
    async fn search_documents(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError>;
}
