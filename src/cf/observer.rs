use std::fmt::Display;

use log::info;

/// Receives the similarity of every other user while a recommendation is computed.
pub trait SimilarityObserver<U> {
    fn observe(&mut self, user_id: &U, similarity: f64);
}

/// Discards all observations.
impl<U> SimilarityObserver<U> for () {
    fn observe(&mut self, _user_id: &U, _similarity: f64) {}
}

impl<U, F> SimilarityObserver<U> for F
where
    F: FnMut(&U, f64),
{
    fn observe(&mut self, user_id: &U, similarity: f64) {
        self(user_id, similarity)
    }
}

/// Writes one log line per observed user.
#[derive(Debug, Default)]
pub struct LogObserver;

impl<U: Display> SimilarityObserver<U> for LogObserver {
    fn observe(&mut self, user_id: &U, similarity: f64) {
        info!("User {} similarity: {:.4}", user_id, similarity);
    }
}

/// Keeps all observations in arrival order.
#[derive(Debug)]
pub struct CollectingObserver<U> {
    pub similarities: Vec<(U, f64)>,
}

impl<U> CollectingObserver<U> {
    pub fn new() -> Self {
        CollectingObserver {
            similarities: Vec::new(),
        }
    }
}

impl<U> Default for CollectingObserver<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Clone> SimilarityObserver<U> for CollectingObserver<U> {
    fn observe(&mut self, user_id: &U, similarity: f64) {
        self.similarities.push((user_id.clone(), similarity));
    }
}
