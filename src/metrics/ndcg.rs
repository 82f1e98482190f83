use crate::io::ItemId;
use crate::metrics::RecommendationMetric;

use hashbrown::HashSet;
use itertools::Itertools;

pub struct Ndcg {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Ndcg {
    /// Calculate Ndcg for predicted recommendations and the held-out items of a user.
    pub fn new(length: usize) -> Ndcg {
        Ndcg {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }

    fn dcg(ranked: &[&ItemId], relevant: &HashSet<&ItemId>) -> f64 {
        ranked
            .iter()
            .enumerate()
            .filter(|(_, item_id)| relevant.contains(*item_id))
            .map(|(index, _)| {
                if index == 0 {
                    1_f64
                } else {
                    1_f64 / ((index as f64) + 1_f64).log2()
                }
            })
            .sum()
    }
}

impl RecommendationMetric for Ndcg {
    fn add(&mut self, recommendations: &[ItemId], held_out: &[ItemId]) {
        self.qty += 1;
        let relevant: HashSet<&ItemId> = held_out.iter().collect();
        let top_recos = recommendations.iter().take(self.length).collect_vec();
        let ideal = held_out.iter().unique().take(self.length).collect_vec();

        let dcg_max = Ndcg::dcg(&ideal, &relevant);
        if dcg_max > 0.0 {
            self.sum_of_scores += Ndcg::dcg(&top_recos, &relevant) / dcg_max;
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
        format!("Ndcg@{}", self.length)
    }
}
