use crate::io::ItemId;
use crate::metrics::RecommendationMetric;

use hashbrown::HashSet;

pub struct Precision {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Precision {
    /// Returns a Precision evaluation metric: the share of the `length`
    /// recommendation slots filled with a held-out item.
    pub fn new(length: usize) -> Precision {
        Precision {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RecommendationMetric for Precision {
    fn add(&mut self, recommendations: &[ItemId], held_out: &[ItemId]) {
        self.qty += 1;
        if self.length == 0 {
            return;
        }
        let top_recos: HashSet<&ItemId> = recommendations.iter().take(self.length).collect();
        let held_out: HashSet<&ItemId> = held_out.iter().collect();
        let qty_hits = top_recos.intersection(&held_out).count();

        self.sum_of_scores += qty_hits as f64 / self.length as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Precision@{}", self.length)
    }
}
