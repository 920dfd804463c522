use crate::features::AnswerFeatures;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type SourceId = u64;
pub type SnippetId = u64;
pub type AnswerId = u64;

/// Origin tag stamped on every `ResultInfo` this stage emits.
pub const PRIMARY_SEARCH_ORIGIN: &str = "doc_answer_core::stage::PrimarySearchStage";

pub const ANSWER_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ClueKind {
    Plain,
    /// Multi-word phrase; never sent to the full-text index.
    Phrase,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Clue {
    pub label: String,
    pub kind: ClueKind,
}

impl Clue {
    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ClueKind::Plain,
        }
    }

    pub fn phrase(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ClueKind::Phrase,
        }
    }
}

/// Read-only view of the question. Every candidate receives its own clone;
/// all fields are owned so a clone shares nothing with the original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionContext {
    pub text: String,
    pub language: String,
    pub clues: Vec<Clue>,
}

impl QuestionContext {
    pub fn new(text: impl Into<String>, clues: Vec<Clue>) -> Self {
        Self {
            text: text.into(),
            language: ANSWER_LANGUAGE.to_string(),
            clues,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SearchType {
    /// Scores term statistics across all shards before fetching.
    #[default]
    DfsQueryThenFetch,
}

impl SearchType {
    pub fn as_param(&self) -> &'static str {
        match self {
            SearchType::DfsQueryThenFetch => "dfs_query_then_fetch",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub terms: Vec<String>,
    pub field: String,
    pub top_k: usize,
    pub explain: bool,
    pub search_type: SearchType,
}

impl SearchQuery {
    pub const ALL_FIELD: &'static str = "_all";

    pub fn disjunction(terms: Vec<String>, top_k: usize) -> Self {
        Self {
            terms,
            field: Self::ALL_FIELD.to_string(),
            top_k,
            explain: true,
            search_type: SearchType::DfsQueryThenFetch,
        }
    }

    pub fn query_string(&self) -> String {
        self.terms.join(" OR ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchHit {
    pub id: String,
    pub score: f64,
    pub fields: Map<String, Value>,
}

impl SearchHit {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResponse {
    pub status: String,
    pub total_hits: u64,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultInfo {
    pub document_id: String,
    pub document_title: String,
    pub relevance: f64,
    pub source: String,
    pub source_id: Option<SourceId>,
    pub origin: String,
    /// Zero unless this candidate closes its group; then the 1-based count.
    pub is_last: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AnswerResource {
    pub iri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerInfo {
    pub features: Option<AnswerFeatures>,
    pub resources: Vec<AnswerResource>,
    pub is_last: u32,
    pub snippet_ids: Vec<SnippetId>,
    pub answer_id: Option<AnswerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerCandidate {
    pub question: QuestionContext,
    pub document_text: String,
    pub document_language: String,
    pub result_info: ResultInfo,
    pub answer_info: AnswerInfo,
}

impl AnswerCandidate {
    pub fn is_fallback(&self) -> bool {
        self.answer_info.features.is_none()
    }
}
