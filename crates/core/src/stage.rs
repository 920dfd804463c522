use crate::config::StageConfig;
use crate::dashboard::AnswerDashboard;
use crate::error::StageError;
use crate::ids::IdGenerators;
use crate::multiplier::CandidateMultiplier;
use crate::stores::ElasticsearchIndex;
use crate::terms::clues_to_terms;
use crate::traits::DocumentIndex;
use crate::{QuestionContext, SearchQuery};
use std::sync::Arc;
use tracing::info;

/// Live output contexts allowed per parallel pipeline job.
pub const CANDIDATES_PER_JOB: usize = 2;

/// Primary document search: queries the index once per question and hands
/// back a multiplier over the resulting answer candidates.
pub struct PrimarySearchStage<X = ElasticsearchIndex>
where
    X: DocumentIndex,
{
    index: X,
    config: StageConfig,
    ids: IdGenerators,
}

impl PrimarySearchStage<ElasticsearchIndex> {
    /// Validates the config and connects to the index. Any partially built
    /// client is released before the error is returned.
    pub async fn open(config: StageConfig, ids: IdGenerators) -> Result<Self, StageError> {
        config.validate()?;
        let index = ElasticsearchIndex::connect(&config)
            .await
            .map_err(StageError::Init)?;
        Ok(Self { index, config, ids })
    }

    pub fn close(self) {
        info!(cluster = %self.config.cluster_name, "closing primary search stage");
        self.index.close();
    }
}

impl<X> PrimarySearchStage<X>
where
    X: DocumentIndex + Send + Sync,
{
    pub fn with_index(index: X, config: StageConfig, ids: IdGenerators) -> Result<Self, StageError> {
        config.validate()?;
        Ok(Self { index, config, ids })
    }

    /// How many candidate contexts may be live at once for `max_jobs`
    /// concurrently running pipelines.
    pub fn candidate_instances_required(max_jobs: usize) -> usize {
        max_jobs * CANDIDATES_PER_JOB
    }

    pub async fn process(
        &self,
        question: &QuestionContext,
        dashboard: Arc<dyn AnswerDashboard>,
    ) -> Result<CandidateMultiplier, StageError> {
        let query = SearchQuery::disjunction(clues_to_terms(&question.clues), self.config.hit_list_size);
        info!(query = %query.query_string(), index = %self.config.index, "querying document index");

        let response = self
            .index
            .search_documents(&query)
            .await
            .map_err(StageError::Query)?;

        info!(
            status = %response.status,
            total_hits = response.total_hits,
            returned = response.hits.len(),
            "document index responded"
        );

        Ok(CandidateMultiplier::new(
            question.clone(),
            response.hits.into_iter(),
            self.config.cluster_name.clone(),
            dashboard,
            self.ids.clone(),
        ))
    }
}
