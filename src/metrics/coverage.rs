use crate::io::{ItemId, Ratings};
use crate::metrics::RecommendationMetric;

use hashbrown::HashSet;

/// Share of all rated items that appeared in at least one top `length` list.
pub struct Coverage {
    qty_unique_rated_items: usize,
    recommended_items: HashSet<ItemId>,
    length: usize,
}

impl Coverage {
    pub fn new(ratings: &Ratings, length: usize) -> Coverage {
        let rated_items: HashSet<ItemId> = ratings
            .values()
            .flat_map(|user_ratings| user_ratings.keys().cloned())
            .collect();
        Coverage {
            qty_unique_rated_items: rated_items.len(),
            recommended_items: HashSet::new(),
            length,
        }
    }
}

impl RecommendationMetric for Coverage {
    fn add(&mut self, recommendations: &[ItemId], _held_out: &[ItemId]) {
        self.recommended_items
            .extend(recommendations.iter().take(self.length).cloned());
    }

    fn result(&self) -> f64 {
        if self.qty_unique_rated_items > 0 {
            self.recommended_items.len() as f64 / self.qty_unique_rated_items as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Coverage@{}", self.length)
    }
}
