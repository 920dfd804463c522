use crate::dashboard::{AnswerDashboard, AnswerOrigin, AnswerSource, AnsweringDocTitle};
use crate::error::CandidateError;
use crate::features::document_hit_features;
use crate::ids::IdGenerators;
use crate::models::{
    AnswerCandidate, AnswerInfo, AnswerResource, QuestionContext, ResultInfo, SearchHit,
    ANSWER_LANGUAGE, PRIMARY_SEARCH_ORIGIN,
};
use serde_json::Value;
use tracing::{info, warn};

/// Title value the index client treats as "no title".
pub const MISSING_TITLE: &str = "NONE";

/// Services a builder registers provenance with.
pub struct AnswerServices<'a> {
    pub dashboard: &'a dyn AnswerDashboard,
    pub ids: &'a IdGenerators,
    /// Cluster the hits came from; stored as `ResultInfo::source`.
    pub source: &'a str,
}

/// Text of `field`, or an empty string when it is absent or null.
pub fn field_text(hit: &SearchHit, field: &str) -> Result<String, CandidateError> {
    match hit.fields.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(value.to_string()),
        Some(other) => Err(CandidateError::MalformedField {
            field: field.to_string(),
            details: format!("expected a scalar, found {other}"),
        }),
    }
}

/// Title usable for a document answer. `None` for an absent hit, a missing
/// or empty title, and the `NONE` sentinel.
pub fn usable_title(hit: Option<&SearchHit>) -> Result<Option<String>, CandidateError> {
    let Some(hit) = hit else {
        return Ok(None);
    };
    let title = field_text(hit, "title")?;
    if title.is_empty() || title == MISSING_TITLE {
        return Ok(None);
    }
    Ok(Some(title))
}

/// Builds a scored answer from `hit`, found at 1-based `position`.
/// `more` tells whether further hits follow this one.
pub fn document_to_answer(
    services: &AnswerServices<'_>,
    question: QuestionContext,
    hit: &SearchHit,
    position: u32,
    more: bool,
) -> Result<AnswerCandidate, CandidateError> {
    let title = field_text(hit, "title")?;
    let uri = field_text(hit, "uri")?;
    let abstract_text = field_text(hit, "abstract")?;

    info!(uri = %uri, title = %title, position, "found document answer");

    let source_id = services.dashboard.store_answer_source(AnswerSource::agu_abstract(
        AnswerOrigin::DocumentTitle,
        title.clone(),
        hit.id.clone(),
    ))?;

    let snippet = AnsweringDocTitle {
        snippet_id: services.ids.snippet.generate_id(),
        source_id,
    };
    if let Err(err) = services.dashboard.add_snippet(snippet) {
        if let Err(cleanup) = services.dashboard.remove_answer_source(source_id) {
            warn!(source_id, error = %cleanup, "failed to drop answer source of discarded candidate");
        }
        return Err(err);
    }

    let result_info = ResultInfo {
        document_id: hit.id.clone(),
        document_title: title,
        relevance: hit.score,
        source: services.source.to_string(),
        source_id: Some(source_id),
        origin: PRIMARY_SEARCH_ORIGIN.to_string(),
        is_last: if more { 0 } else { position },
    };

    let answer_info = AnswerInfo {
        features: Some(document_hit_features(position, result_info.relevance)),
        resources: vec![AnswerResource { iri: uri }],
        is_last: 1,
        snippet_ids: vec![snippet.snippet_id],
        answer_id: Some(services.ids.answer.generate_id()),
    };

    Ok(AnswerCandidate {
        question,
        document_text: abstract_text,
        document_language: ANSWER_LANGUAGE.to_string(),
        result_info,
        answer_info,
    })
}

/// The "no answer" candidate emitted when a position has no usable hit.
pub fn empty_answer(question: QuestionContext, position: u32) -> AnswerCandidate {
    AnswerCandidate {
        question,
        document_text: String::new(),
        document_language: ANSWER_LANGUAGE.to_string(),
        result_info: ResultInfo {
            document_id: String::new(),
            document_title: String::new(),
            relevance: 0.0,
            source: String::new(),
            source_id: None,
            origin: PRIMARY_SEARCH_ORIGIN.to_string(),
            is_last: position,
        },
        answer_info: AnswerInfo {
            features: None,
            resources: Vec::new(),
            is_last: 1,
            snippet_ids: Vec::new(),
            answer_id: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::QuestionDashboard;
    use crate::features::AnswerFeature;
    use crate::models::Clue;
    use serde_json::json;

    fn question() -> QuestionContext {
        QuestionContext::new("Where is Dock A?", vec![Clue::plain("Dock")])
    }

    fn hit() -> SearchHit {
        SearchHit::new("doc-1", 2.0)
            .with_field("title", "Dock A")
            .with_field("uri", "http://example.org/dock-a")
            .with_field("abstract", "Dock A is on the river.")
    }

    #[test]
    fn document_answer_links_provenance_and_snippet() -> Result<(), CandidateError> {
        let dashboard = QuestionDashboard::new();
        let ids = IdGenerators::default();
        let services = AnswerServices {
            dashboard: &dashboard,
            ids: &ids,
            source: "agu-cluster",
        };

        let candidate = document_to_answer(&services, question(), &hit(), 1, true)?;

        assert_eq!(candidate.document_text, "Dock A is on the river.");
        assert_eq!(candidate.document_language, "en");
        assert_eq!(candidate.result_info.is_last, 0);
        assert_eq!(candidate.result_info.source, "agu-cluster");
        assert_eq!(candidate.result_info.document_id, "doc-1");
        assert_eq!(candidate.answer_info.is_last, 1);
        assert_eq!(
            candidate.answer_info.resources,
            vec![AnswerResource {
                iri: "http://example.org/dock-a".to_string()
            }]
        );

        let source_id = candidate.result_info.source_id.expect("document answers carry a source");
        let source = dashboard.answer_source(source_id).expect("source registered");
        assert_eq!(source.title, "Dock A");
        assert_eq!(source.url, "doc-1");

        let snippet_id = candidate.answer_info.snippet_ids[0];
        assert_eq!(dashboard.snippet(snippet_id).map(|s| s.source_id), Some(source_id));

        let features = candidate.answer_info.features.expect("features present");
        assert_eq!(features.get(AnswerFeature::ResultReciprocalRank), Some(1.0));
        Ok(())
    }

    #[test]
    fn last_document_answer_carries_position() -> Result<(), CandidateError> {
        let dashboard = QuestionDashboard::new();
        let ids = IdGenerators::default();
        let services = AnswerServices {
            dashboard: &dashboard,
            ids: &ids,
            source: "agu-cluster",
        };

        let candidate = document_to_answer(&services, question(), &hit(), 3, false)?;
        assert_eq!(candidate.result_info.is_last, 3);
        Ok(())
    }

    #[test]
    fn absent_fields_default_to_empty() -> Result<(), CandidateError> {
        let bare = SearchHit::new("doc-9", 0.0).with_field("title", "Only a title");
        assert_eq!(field_text(&bare, "uri")?, "");
        assert_eq!(field_text(&bare.clone().with_field("uri", Value::Null), "uri")?, "");
        assert_eq!(field_text(&bare.with_field("year", 1999), "year")?, "1999");
        Ok(())
    }

    #[test]
    fn structured_field_is_malformed() {
        let odd = SearchHit::new("doc-2", 1.0).with_field("title", json!(["a", "b"]));
        assert!(matches!(
            usable_title(Some(&odd)),
            Err(CandidateError::MalformedField { .. })
        ));
    }

    #[test]
    fn sentinel_and_blank_titles_are_unusable() -> Result<(), CandidateError> {
        assert_eq!(usable_title(None)?, None);
        assert_eq!(usable_title(Some(&SearchHit::new("a", 1.0)))?, None);
        assert_eq!(
            usable_title(Some(&SearchHit::new("a", 1.0).with_field("title", "NONE")))?,
            None
        );
        assert_eq!(
            usable_title(Some(&SearchHit::new("a", 1.0).with_field("title", "")))?,
            None
        );
        assert_eq!(usable_title(Some(&hit()))?, Some("Dock A".to_string()));
        Ok(())
    }

    #[test]
    fn whitespace_title_is_kept() -> Result<(), CandidateError> {
        let spaced = SearchHit::new("a", 1.0).with_field("title", "  ");
        assert_eq!(usable_title(Some(&spaced))?, Some("  ".to_string()));
        Ok(())
    }

    struct SnippetRejectingDashboard {
        inner: QuestionDashboard,
    }

    impl AnswerDashboard for SnippetRejectingDashboard {
        fn store_answer_source(&self, source: AnswerSource) -> Result<crate::SourceId, CandidateError> {
            self.inner.store_answer_source(source)
        }

        fn add_snippet(&self, _snippet: AnsweringDocTitle) -> Result<(), CandidateError> {
            Err(CandidateError::Store("snippet store is read-only".to_string()))
        }

        fn remove_answer_source(&self, source_id: crate::SourceId) -> Result<(), CandidateError> {
            self.inner.remove_answer_source(source_id)
        }
    }

    #[test]
    fn rejected_snippet_drops_registered_source() {
        let dashboard = SnippetRejectingDashboard {
            inner: QuestionDashboard::new(),
        };
        let ids = IdGenerators::default();
        let services = AnswerServices {
            dashboard: &dashboard,
            ids: &ids,
            source: "agu-cluster",
        };

        let outcome = document_to_answer(&services, question(), &hit(), 1, false);
        assert!(matches!(outcome, Err(CandidateError::Store(_))));
        assert_eq!(dashboard.inner.source_count(), 0);
    }

    #[test]
    fn empty_answer_has_no_features_or_resources() {
        let candidate = empty_answer(question(), 1);
        assert!(candidate.is_fallback());
        assert_eq!(candidate.document_text, "");
        assert_eq!(candidate.result_info.is_last, 1);
        assert_eq!(candidate.result_info.document_title, "");
        assert_eq!(candidate.result_info.origin, PRIMARY_SEARCH_ORIGIN);
        assert_eq!(candidate.answer_info.is_last, 1);
        assert!(candidate.answer_info.resources.is_empty());
        assert!(candidate.answer_info.snippet_ids.is_empty());
    }
}
