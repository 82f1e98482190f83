use crate::io::{ItemId, Ratings};
use crate::metrics::coverage::Coverage;
use crate::metrics::hitrate::HitRate;
use crate::metrics::mrr::Mrr;
use crate::metrics::ndcg::Ndcg;
use crate::metrics::precision::Precision;
use crate::metrics::recall::Recall;
use crate::metrics::RecommendationMetric;

pub struct EvaluationReporter {
    metrics: Vec<Box<dyn RecommendationMetric>>,
}

impl EvaluationReporter {
    pub fn new(ratings: &Ratings, length: usize) -> EvaluationReporter {
        let metrics: Vec<Box<dyn RecommendationMetric>> = vec![
            Box::new(Mrr::new(length)),
            Box::new(Ndcg::new(length)),
            Box::new(HitRate::new(length)),
            Box::new(Precision::new(length)),
            Box::new(Coverage::new(ratings, length)),
            Box::new(Recall::new(length)),
        ];
        EvaluationReporter { metrics }
    }

    pub fn add(&mut self, recommendations: &[ItemId], held_out: &[ItemId]) {
        for metric in self.metrics.iter_mut() {
            metric.add(recommendations, held_out);
        }
    }

    /// Comma separated scores, in the same order as [`EvaluationReporter::get_name`].
    pub fn result(&self) -> String {
        self.metrics
            .iter()
            .map(|metric| format!("{:.4}", metric.result()))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn get_name(&self) -> String {
        self.metrics
            .iter()
            .map(|metric| metric.get_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}
