use crate::error::CandidateError;
use crate::models::{SnippetId, SourceId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const AGU_ABSTRACT_SOURCE_TYPE: &str = "agu abstract";

/// How an answer relates to the document it came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnswerOrigin {
    Fulltext,
    TitleInClue,
    DocumentTitle,
    DocumentAbstract,
}

impl AnswerOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOrigin::Fulltext => "fulltext",
            AnswerOrigin::TitleInClue => "title-in-clue",
            AnswerOrigin::DocumentTitle => "document title",
            AnswerOrigin::DocumentAbstract => "document abstract",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerSource {
    pub source_type: String,
    pub origin: AnswerOrigin,
    pub title: String,
    pub url: String,
}

impl AnswerSource {
    pub fn agu_abstract(origin: AnswerOrigin, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source_type: AGU_ABSTRACT_SOURCE_TYPE.to_string(),
            origin,
            title: title.into(),
            url: url.into(),
        }
    }
}

/// UI snippet pointing at the title of the answering document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AnsweringDocTitle {
    pub snippet_id: SnippetId,
    pub source_id: SourceId,
}

/// Shared provenance store. Implementations must make registration atomic:
/// concurrent callers always get distinct handles.
pub trait AnswerDashboard: Send + Sync {
    fn store_answer_source(&self, source: AnswerSource) -> Result<SourceId, CandidateError>;

    fn add_snippet(&self, snippet: AnsweringDocTitle) -> Result<(), CandidateError>;

    /// Drops a source whose candidate failed to build. Handles are never reused.
    fn remove_answer_source(&self, source_id: SourceId) -> Result<(), CandidateError>;
}

#[derive(Debug, Default)]
struct DashboardState {
    last_source_id: SourceId,
    sources: BTreeMap<SourceId, AnswerSource>,
    snippets: BTreeMap<SnippetId, AnsweringDocTitle>,
}

/// In-memory dashboard for a single question.
#[derive(Debug, Default)]
pub struct QuestionDashboard {
    state: Mutex<DashboardState>,
}

impl QuestionDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_source(&self, source_id: SourceId) -> Option<AnswerSource> {
        self.state.lock().sources.get(&source_id).cloned()
    }

    pub fn snippet(&self, snippet_id: SnippetId) -> Option<AnsweringDocTitle> {
        self.state.lock().snippets.get(&snippet_id).copied()
    }

    pub fn snippets(&self) -> Vec<AnsweringDocTitle> {
        self.state.lock().snippets.values().copied().collect()
    }

    pub fn source_count(&self) -> usize {
        self.state.lock().sources.len()
    }
}

impl AnswerDashboard for QuestionDashboard {
    fn store_answer_source(&self, source: AnswerSource) -> Result<SourceId, CandidateError> {
        let mut state = self.state.lock();
        state.last_source_id += 1;
        let source_id = state.last_source_id;
        state.sources.insert(source_id, source);
        Ok(source_id)
    }

    fn add_snippet(&self, snippet: AnsweringDocTitle) -> Result<(), CandidateError> {
        let mut state = self.state.lock();
        if !state.sources.contains_key(&snippet.source_id) {
            return Err(CandidateError::Store(format!(
                "snippet {} references unknown source {}",
                snippet.snippet_id, snippet.source_id
            )));
        }
        if state.snippets.contains_key(&snippet.snippet_id) {
            return Err(CandidateError::Store(format!(
                "snippet {} already registered",
                snippet.snippet_id
            )));
        }
        state.snippets.insert(snippet.snippet_id, snippet);
        Ok(())
    }

    fn remove_answer_source(&self, source_id: SourceId) -> Result<(), CandidateError> {
        let mut state = self.state.lock();
        if state.sources.remove(&source_id).is_none() {
            return Err(CandidateError::Store(format!("unknown source {source_id}")));
        }
        state.snippets.retain(|_, snippet| snippet.source_id != source_id);
        Ok(())
    }
}
