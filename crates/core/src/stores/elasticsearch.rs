use crate::config::StageConfig;
use crate::traits::DocumentIndex;
use crate::{SearchError, SearchHit, SearchQuery, SearchResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

const BACKEND: &str = "elasticsearch";

/// HTTP client bound to one cluster, index and document type.
pub struct ElasticsearchIndex {
    client: Arc<Client>,
    endpoint: Url,
    cluster_name: String,
    index_name: String,
    doc_type: String,
}

impl ElasticsearchIndex {
    pub fn new(config: &StageConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: Arc::new(Client::builder().build()?),
            endpoint: Url::parse(&config.endpoint)?,
            cluster_name: config.cluster_name.clone(),
            index_name: config.index.clone(),
            doc_type: config.doc_type.clone(),
        })
    }

    /// Builds the client and checks that the endpoint answers for the
    /// configured cluster.
    pub async fn connect(config: &StageConfig) -> Result<Self, SearchError> {
        info!(cluster = %config.cluster_name, endpoint = %config.endpoint, "connecting to elasticsearch");
        let index = Self::new(config)?;
        if let Err(err) = index.ensure_cluster().await {
            error!(cluster = %config.cluster_name, error = %err, "elasticsearch connection failed");
            index.close();
            return Err(err);
        }
        info!(cluster = %config.cluster_name, "connected to elasticsearch");
        Ok(index)
    }

    pub async fn ensure_cluster(&self) -> Result<(), SearchError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::BackendResponse {
                backend: BACKEND.to_string(),
                details: response.status().to_string(),
            });
        }

        let body: Value = response.json().await?;
        let reported = body
            .pointer("/cluster_name")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if reported != self.cluster_name {
            return Err(SearchError::NotReady(format!(
                "endpoint {} serves cluster `{}`, expected `{}`",
                self.endpoint, reported, self.cluster_name
            )));
        }
        Ok(())
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn search_url(&self, query: &SearchQuery) -> Result<Url, SearchError> {
        let mut path = format!("{}/", self.index_name);
        if !self.doc_type.is_empty() {
            path.push_str(&self.doc_type);
            path.push('/');
        }
        path.push_str("_search");

        let mut url = self.endpoint.join(&path)?;
        url.query_pairs_mut()
            .append_pair("search_type", query.search_type.as_param());
        Ok(url)
    }

    /// Releases the HTTP connection pool.
    pub fn close(self) {
        info!(cluster = %self.cluster_name, "closing elasticsearch client");
        drop(self);
    }
}

#[async_trait]
impl DocumentIndex for ElasticsearchIndex {
    async fn search_documents(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        if query.terms.is_empty() {
            return Ok(SearchResponse {
                status: "NO_TERMS".to_string(),
                ..SearchResponse::default()
            });
        }

        let response = self
            .client
            .post(self.search_url(query)?)
            .json(&build_search_body(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::BackendResponse {
                backend: BACKEND.to_string(),
                details: status.to_string(),
            });
        }

        let response_json: Value = response.json().await?;
        let mut parsed = parse_search_response(&response_json)?;
        parsed.status = status.canonical_reason().unwrap_or("OK").to_uppercase();
        Ok(parsed)
    }
}

pub fn build_search_body(query: &SearchQuery) -> Value {
    let mut matcher = Map::new();
    matcher.insert(query.field.clone(), Value::String(query.query_string()));

    json!({
        "from": 0,
        "size": query.top_k,
        "explain": query.explain,
        "query": {
            "match": Value::Object(matcher)
        }
    })
}

pub fn parse_search_response(response_json: &Value) -> Result<SearchResponse, SearchError> {
    let hits_section = response_json
        .pointer("/hits")
        .ok_or_else(|| SearchError::BackendResponse {
            backend: BACKEND.to_string(),
            details: "response has no `hits` section".to_string(),
        })?;

    let total_hits = match hits_section.pointer("/total") {
        Some(Value::Number(total)) => total.as_u64().unwrap_or_default(),
        Some(total @ Value::Object(_)) => total
            .pointer("/value")
            .and_then(Value::as_u64)
            .unwrap_or_default(),
        _ => 0,
    };

    let raw_hits = hits_section
        .pointer("/hits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut hits = Vec::with_capacity(raw_hits.len());
    for raw in raw_hits {
        let id = raw
            .pointer("/_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let score = raw.pointer("/_score").and_then(Value::as_f64).unwrap_or(0.0);
        let fields = match raw.pointer("/_source") {
            Some(Value::Object(source)) => source.clone(),
            _ => Map::new(),
        };
        hits.push(SearchHit { id, score, fields });
    }

    Ok(SearchResponse {
        status: "OK".to_string(),
        total_hits,
        hits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_body_matches_all_field_with_disjunction() {
        let query = SearchQuery::disjunction(vec!["Paris".to_string(), "Seine".to_string()], 20);
        let body = build_search_body(&query);

        assert_eq!(body["query"]["match"]["_all"], "Paris OR Seine");
        assert_eq!(body["size"], 20);
        assert_eq!(body["from"], 0);
        assert_eq!(body["explain"], true);
    }

    #[test]
    fn search_url_targets_index_type_and_dfs() -> Result<(), SearchError> {
        let index = ElasticsearchIndex::new(&StageConfig::default())?;
        let query = SearchQuery::disjunction(vec!["Paris".to_string()], 5);
        let url = index.search_url(&query)?;

        assert_eq!(url.path(), "/zen/abstract/_search");
        assert_eq!(url.query(), Some("search_type=dfs_query_then_fetch"));
        Ok(())
    }

    #[test]
    fn response_parsing_keeps_rank_order_and_fields() -> Result<(), SearchError> {
        let raw = json!({
            "hits": {
                "total": 42,
                "hits": [
                    {"_id": "a", "_score": 2.5, "_source": {"title": "Dock A", "uri": "u1"}},
                    {"_id": "b", "_score": 1.0}
                ]
            }
        });

        let response = parse_search_response(&raw)?;
        assert_eq!(response.total_hits, 42);
        assert_eq!(response.hits.len(), 2);
        assert_eq!(response.hits[0].id, "a");
        assert_eq!(response.hits[0].score, 2.5);
        assert_eq!(response.hits[0].fields["title"], "Dock A");
        assert!(response.hits[1].fields.is_empty());
        Ok(())
    }

    #[test]
    fn response_parsing_accepts_object_total() -> Result<(), SearchError> {
        let raw = json!({"hits": {"total": {"value": 7, "relation": "eq"}, "hits": []}});
        let response = parse_search_response(&raw)?;
        assert_eq!(response.total_hits, 7);
        assert!(response.hits.is_empty());
        Ok(())
    }

    #[test]
    fn response_without_hits_is_rejected() {
        let raw = json!({"error": "boom"});
        assert!(matches!(
            parse_search_response(&raw),
            Err(SearchError::BackendResponse { .. })
        ));
    }
}
