use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer features produced by the primary document search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnswerFeature {
    Occurrences,
    ResultReciprocalRank,
    ResultLogScore,
    OriginDocTitle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnswerFeatures {
    values: BTreeMap<AnswerFeature, f64>,
}

impl AnswerFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, feature: AnswerFeature, value: f64) -> &mut Self {
        self.values.insert(feature, value);
        self
    }

    pub fn get(&self, feature: AnswerFeature) -> Option<f64> {
        self.values.get(&feature).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnswerFeature, f64)> + '_ {
        self.values.iter().map(|(feature, value)| (*feature, *value))
    }
}

pub fn reciprocal_rank(position: u32) -> f64 {
    1.0 / f64::from(position.max(1))
}

pub fn log_relevance(score: f64) -> f64 {
    score.ln_1p()
}

/// Features of a single-hit candidate at 1-based `position`.
pub fn document_hit_features(position: u32, relevance: f64) -> AnswerFeatures {
    let mut features = AnswerFeatures::new();
    features
        .set(AnswerFeature::Occurrences, 1.0)
        .set(AnswerFeature::ResultReciprocalRank, reciprocal_rank(position))
        .set(AnswerFeature::ResultLogScore, log_relevance(relevance))
        .set(AnswerFeature::OriginDocTitle, 1.0);
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reciprocal_rank_decreases_with_position() {
        assert_eq!(reciprocal_rank(1), 1.0);
        assert_eq!(reciprocal_rank(4), 0.25);
        for position in 1..20 {
            assert!(reciprocal_rank(position) > reciprocal_rank(position + 1));
        }
    }

    #[test]
    fn log_relevance_is_zero_for_zero_score_and_monotonic() {
        assert_eq!(log_relevance(0.0), 0.0);
        assert!(log_relevance(2.0) > log_relevance(1.0));
        assert!((log_relevance(1.0) - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn document_hit_features_are_complete() {
        let features = document_hit_features(2, 3.0);
        assert_eq!(features.len(), 4);
        assert_eq!(features.get(AnswerFeature::Occurrences), Some(1.0));
        assert_eq!(features.get(AnswerFeature::ResultReciprocalRank), Some(0.5));
        assert_eq!(features.get(AnswerFeature::OriginDocTitle), Some(1.0));
        let log_score = features.get(AnswerFeature::ResultLogScore).unwrap_or_default();
        assert!((log_score - 4f64.ln()).abs() < 1e-12);
    }
}
