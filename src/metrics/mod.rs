use crate::io::ItemId;

pub mod coverage;
pub mod evaluation_reporter;
pub mod hitrate;
pub mod mrr;
pub mod ndcg;
pub mod precision;
pub mod recall;

/// Accumulates a ranking quality score over many recommendation requests.
/// `held_out` holds the items the user actually rated but that were hidden
/// from the recommender.
pub trait RecommendationMetric {
    fn add(&mut self, recommendations: &[ItemId], held_out: &[ItemId]);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}
