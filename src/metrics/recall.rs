use crate::io::ItemId;
use crate::metrics::RecommendationMetric;

use hashbrown::HashSet;

pub struct Recall {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Recall {
    /// Returns a Recall evaluation metric: the share of the distinct held-out
    /// items that made it into the top `length` recommendations.
    pub fn new(length: usize) -> Recall {
        Recall {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RecommendationMetric for Recall {
    fn add(&mut self, recommendations: &[ItemId], held_out: &[ItemId]) {
        self.qty += 1;
        let unique_held_out: HashSet<&ItemId> = held_out.iter().collect();
        if unique_held_out.is_empty() {
            return;
        }
        let top_recos: HashSet<&ItemId> = recommendations.iter().take(self.length).collect();
        let qty_hits = top_recos.intersection(&unique_held_out).count();

        self.sum_of_scores += qty_hits as f64 / unique_held_out.len() as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Recall@{}", self.length)
    }
}
