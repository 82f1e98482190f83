use std::hash::Hash;

use hashbrown::HashMap;

use crate::cf::Rating;

pub trait SimilarityComputation {
    /// Similarity between two users, each given by their item ratings.
    /// Implementations must be symmetric in their arguments.
    fn similarity<I: Eq + Hash>(
        &self,
        ratings_a: &HashMap<I, Rating>,
        ratings_b: &HashMap<I, Rating>,
    ) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl SimilarityComputation for CosineSimilarity {
    fn similarity<I: Eq + Hash>(
        &self,
        ratings_a: &HashMap<I, Rating>,
        ratings_b: &HashMap<I, Rating>,
    ) -> f64 {
        cosine_similarity(ratings_a, ratings_b)
    }
}

/// Cosine similarity where the dot product only covers the co-rated items,
/// while both norms are taken over each user's complete rating vector.
///
/// Returns 0.0 if the users have no item in common or if one of the norms is zero.
pub fn cosine_similarity<I: Eq + Hash>(
    ratings_a: &HashMap<I, Rating>,
    ratings_b: &HashMap<I, Rating>,
) -> f64 {
    // Iterate the smaller map, lookups go into the larger one.
    let (smaller, larger) = if ratings_a.len() <= ratings_b.len() {
        (ratings_a, ratings_b)
    } else {
        (ratings_b, ratings_a)
    };

    let mut products: Vec<f64> = smaller
        .iter()
        .filter_map(|(item_id, rating)| larger.get(item_id).map(|other| rating * other))
        .collect();
    if products.is_empty() {
        return 0.0;
    }
    // Summation order must not depend on which map was iterated.
    products.sort_unstable_by(f64::total_cmp);
    let dot: f64 = products.iter().sum();

    let norm_a = squared_norm(ratings_a);
    let norm_b = squared_norm(ratings_b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn squared_norm<I>(ratings: &HashMap<I, Rating>) -> f64 {
    ratings.values().map(|rating| rating * rating).sum()
}

#[cfg(test)]
mod similarity_test {
    use float_cmp::approx_eq;

    use super::*;

    fn ratings(pairs: &[(u64, f64)]) -> HashMap<u64, f64> {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn should_be_one_for_identical_ratings() {
        let a = ratings(&[(101, 5.0), (102, 3.0), (104, 4.0)]);
        assert!(approx_eq!(f64, 1.0, cosine_similarity(&a, &a), epsilon = 1e-12));
    }

    #[test]
    fn should_be_symmetric() {
        let a = ratings(&[(101, 5.0), (102, 3.0), (104, 4.0)]);
        let b = ratings(&[(101, 4.0), (103, 4.0), (104, 5.0)]);
        let c = ratings(&[(102, 4.5), (103, 5.0), (104, 3.0)]);
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        assert_eq!(cosine_similarity(&a, &c), cosine_similarity(&c, &a));
        assert_eq!(cosine_similarity(&b, &c), cosine_similarity(&c, &b));
    }

    #[test]
    fn should_use_full_vectors_for_the_norms() {
        let a = ratings(&[(101, 5.0), (102, 3.0), (104, 4.0)]);
        let b = ratings(&[(101, 4.0), (103, 4.0), (104, 5.0)]);
        // dot over {101, 104} = 20 + 20, norms over all three ratings each = sqrt(50) * sqrt(57)
        let expected = 40.0 / (50_f64.sqrt() * 57_f64.sqrt());
        assert!(approx_eq!(f64, expected, cosine_similarity(&a, &b), epsilon = 1e-12));
    }

    #[test]
    fn should_be_zero_without_common_items() {
        let a = ratings(&[(1, 5.0), (2, 3.0)]);
        let b = ratings(&[(3, 4.0), (4, 5.0)]);
        assert_eq!(0.0, cosine_similarity(&a, &b));
    }

    #[test]
    fn should_be_zero_for_empty_ratings() {
        let a = ratings(&[(1, 5.0)]);
        let empty = ratings(&[]);
        assert_eq!(0.0, cosine_similarity(&a, &empty));
        assert_eq!(0.0, cosine_similarity(&empty, &a));
        assert_eq!(0.0, cosine_similarity(&empty, &empty));
    }

    #[test]
    fn should_handle_zero_norm() {
        let a = ratings(&[(1, 0.0), (2, 0.0)]);
        let b = ratings(&[(1, 3.0), (2, 1.0)]);
        assert_eq!(0.0, cosine_similarity(&a, &b));
    }

    #[test]
    fn should_be_negative_for_opposing_ratings() {
        let a = ratings(&[(1, 2.0)]);
        let b = ratings(&[(1, -2.0)]);
        assert!(approx_eq!(f64, -1.0, cosine_similarity(&a, &b), epsilon = 1e-12));
    }

    #[test]
    fn should_delegate_from_trait() {
        let a = ratings(&[(1, 1.0), (2, 2.0)]);
        let b = ratings(&[(2, 2.0), (3, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), CosineSimilarity.similarity(&a, &b));
    }
}
