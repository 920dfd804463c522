//! Fans one question and its ranked hits out into independent answer
//! candidates.
//!
//! The multiplier is pull-driven: callers loop on [`CandidateMultiplier::has_more`]
//! and [`CandidateMultiplier::produce_next`], or use it as an [`Iterator`].
//! At least one candidate is always produced; with no hits that candidate
//! is the empty fallback answer.

use crate::builder::{document_to_answer, empty_answer, usable_title, AnswerServices};
use crate::dashboard::AnswerDashboard;
use crate::error::CandidateError;
use crate::ids::IdGenerators;
use crate::models::{AnswerCandidate, QuestionContext, SearchHit};
use std::iter::Peekable;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierState {
    NotStarted,
    Iterating,
    Exhausted,
}

pub struct CandidateMultiplier<I = std::vec::IntoIter<SearchHit>>
where
    I: Iterator<Item = SearchHit>,
{
    question: QuestionContext,
    hits: Peekable<I>,
    /// Hit pulled from the cursor whose candidate has not been built yet.
    pending: Option<SearchHit>,
    position: u32,
    source: String,
    dashboard: Arc<dyn AnswerDashboard>,
    ids: IdGenerators,
    failed: bool,
}

impl<I> CandidateMultiplier<I>
where
    I: Iterator<Item = SearchHit>,
{
    pub fn new(
        question: QuestionContext,
        hits: I,
        source: impl Into<String>,
        dashboard: Arc<dyn AnswerDashboard>,
        ids: IdGenerators,
    ) -> Self {
        Self {
            question,
            hits: hits.peekable(),
            pending: None,
            position: 0,
            source: source.into(),
            dashboard,
            ids,
            failed: false,
        }
    }

    /// Number of candidates produced so far.
    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn state(&mut self) -> MultiplierState {
        if self.position == 0 {
            MultiplierState::NotStarted
        } else if self.has_more() {
            MultiplierState::Iterating
        } else {
            MultiplierState::Exhausted
        }
    }

    /// True while unconsumed hits remain, and always before the first
    /// candidate has been produced.
    pub fn has_more(&mut self) -> bool {
        self.pending.is_some() || self.hits.peek().is_some() || self.position == 0
    }

    /// Builds the next candidate. On failure the hit stays at the cursor and
    /// the position is not advanced, so a retry sees the same hit.
    pub fn produce_next(&mut self) -> Result<AnswerCandidate, CandidateError> {
        if self.pending.is_none() {
            self.pending = self.hits.next();
        }
        let position = self.position + 1;
        let more = self.hits.peek().is_some();

        let services = AnswerServices {
            dashboard: self.dashboard.as_ref(),
            ids: &self.ids,
            source: &self.source,
        };
        let hit = self.pending.as_ref();

        let built = usable_title(hit).and_then(|title| match (title, hit) {
            (Some(_), Some(hit)) => {
                info!(position, document_id = %hit.id, "creating document answer");
                document_to_answer(&services, self.question.clone(), hit, position, more)
            }
            _ => {
                info!(position, "creating empty answer");
                Ok(empty_answer(self.question.clone(), position))
            }
        });

        match built {
            Ok(candidate) => {
                self.pending = None;
                self.position = position;
                debug!(position, more, "answer candidate produced");
                Ok(candidate)
            }
            Err(err) => {
                warn!(position, error = %err, "answer candidate build failed");
                Err(err)
            }
        }
    }
}

impl<I> Iterator for CandidateMultiplier<I>
where
    I: Iterator<Item = SearchHit>,
{
    type Item = Result<AnswerCandidate, CandidateError>;

    /// Yields a build failure once and then stops.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.has_more() {
            return None;
        }
        let produced = self.produce_next();
        self.failed = produced.is_err();
        Some(produced)
    }
}
