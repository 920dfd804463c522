pub mod builder;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod features;
pub mod ids;
pub mod models;
pub mod multiplier;
pub mod stage;
pub mod stores;
pub mod terms;
pub mod traits;

pub use builder::{document_to_answer, empty_answer, field_text, usable_title, AnswerServices};
pub use config::StageConfig;
pub use dashboard::{AnswerDashboard, AnswerOrigin, AnswerSource, AnsweringDocTitle, QuestionDashboard};
pub use error::{CandidateError, SearchError, StageError};
pub use features::{AnswerFeature, AnswerFeatures};
pub use ids::{AtomicIdGenerator, IdGenerator, IdGenerators};
pub use models::{
    AnswerCandidate, AnswerId, AnswerInfo, AnswerResource, Clue, ClueKind, QuestionContext,
    ResultInfo, SearchHit, SearchQuery, SearchResponse, SearchType, SnippetId, SourceId,
};
pub use multiplier::{CandidateMultiplier, MultiplierState};
pub use stage::PrimarySearchStage;
pub use stores::ElasticsearchIndex;
pub use terms::clues_to_terms;
pub use traits::DocumentIndex;
