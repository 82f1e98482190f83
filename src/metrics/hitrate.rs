use crate::io::ItemId;
use crate::metrics::RecommendationMetric;

pub struct HitRate {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl HitRate {
    pub fn new(length: usize) -> HitRate {
        HitRate {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RecommendationMetric for HitRate {
    fn add(&mut self, recommendations: &[ItemId], held_out: &[ItemId]) {
        self.qty += 1;
        let hit = recommendations
            .iter()
            .take(self.length)
            .any(|item_id| held_out.contains(item_id));
        if hit {
            self.sum_of_scores += 1_f64
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("HitRate@{}", self.length)
    }
}
