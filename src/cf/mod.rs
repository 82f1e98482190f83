use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use hashbrown::HashMap;
use log::debug;

use crate::cf::observer::SimilarityObserver;
use crate::cf::similarity::{CosineSimilarity, SimilarityComputation};

pub mod observer;
pub mod similarity;

pub type Rating = f64;

/// Ratings per user, keyed by user id and then by item id.
pub type RatingTable<U, I> = HashMap<U, HashMap<I, Rating>>;

#[derive(Debug, Clone)]
pub struct ItemScore<I> {
    pub id: I,
    pub score: f64,
}

impl<I> ItemScore<I> {
    pub fn new(id: I, score: f64) -> Self {
        ItemScore { id, score }
    }
}

impl<I: Ord> PartialEq for ItemScore<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I: Ord> Eq for ItemScore<I> {}

impl<I: Ord> Ord for ItemScore<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by score, equal scores by ascending item id
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl<I: Ord> PartialOrd for ItemScore<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Converts a possibly negative requested amount of recommendations into an upper bound.
pub fn clamp_how_many(requested: i64) -> usize {
    usize::try_from(requested.max(0)).unwrap_or(usize::MAX)
}

/// Recommends at most `how_many` items the `target_user` has not rated yet,
/// best first. An unknown user gets no recommendations.
pub fn recommend<U, I>(ratings: &RatingTable<U, I>, target_user: &U, how_many: usize) -> Vec<I>
where
    U: Eq + Hash + Clone,
    I: Eq + Hash + Ord + Clone,
{
    recommend_with(&CosineSimilarity, ratings, target_user, how_many, &mut ())
}

/// Same as [`recommend`], reporting the similarity of every other user to `observer`.
pub fn recommend_observed<U, I, O>(
    ratings: &RatingTable<U, I>,
    target_user: &U,
    how_many: usize,
    observer: &mut O,
) -> Vec<I>
where
    U: Eq + Hash + Clone,
    I: Eq + Hash + Ord + Clone,
    O: SimilarityObserver<U>,
{
    recommend_with(&CosineSimilarity, ratings, target_user, how_many, observer)
}

pub fn recommend_with<U, I, S, O>(
    measure: &S,
    ratings: &RatingTable<U, I>,
    target_user: &U,
    how_many: usize,
    observer: &mut O,
) -> Vec<I>
where
    U: Eq + Hash + Clone,
    I: Eq + Hash + Ord + Clone,
    S: SimilarityComputation,
    O: SimilarityObserver<U>,
{
    let target_ratings = match ratings.get(target_user) {
        Some(target_ratings) => target_ratings,
        None => return Vec::new(),
    };

    let similarities = similarity_scores(measure, ratings, target_user, observer);
    let item_scores = score_items(ratings, target_ratings, &similarities);
    debug!(
        "scored {} candidate items using {} other users",
        item_scores.len(),
        similarities.len()
    );

    top_items(item_scores, how_many)
        .into_iter()
        .map(|scored| scored.id)
        .collect()
}

/// Similarity between `target_user` and every other user in the table, zero and
/// negative similarities included. Empty if the target user is unknown.
pub fn similarity_scores<U, I, S, O>(
    measure: &S,
    ratings: &RatingTable<U, I>,
    target_user: &U,
    observer: &mut O,
) -> HashMap<U, f64>
where
    U: Eq + Hash + Clone,
    I: Eq + Hash,
    S: SimilarityComputation,
    O: SimilarityObserver<U>,
{
    let target_ratings = match ratings.get(target_user) {
        Some(target_ratings) => target_ratings,
        None => return HashMap::new(),
    };

    let mut similarities = HashMap::with_capacity(ratings.len().saturating_sub(1));
    for (user_id, user_ratings) in ratings.iter() {
        if user_id == target_user {
            continue;
        }
        let similarity = measure.similarity(target_ratings, user_ratings);
        observer.observe(user_id, similarity);
        similarities.insert(user_id.clone(), similarity);
    }
    similarities
}

/// Similarity weighted average rating of every item the target has not rated,
/// taken over the users with a strictly positive similarity.
pub fn score_items<U, I>(
    ratings: &RatingTable<U, I>,
    target_ratings: &HashMap<I, Rating>,
    similarities: &HashMap<U, f64>,
) -> HashMap<I, f64>
where
    U: Eq + Hash,
    I: Eq + Hash + Clone,
{
    // weighted rating total and similarity sum per candidate item
    let mut accumulated: HashMap<I, (f64, f64)> = HashMap::new();

    for (user_id, similarity) in similarities.iter() {
        if *similarity <= 0.0 {
            continue;
        }
        let user_ratings = match ratings.get(user_id) {
            Some(user_ratings) => user_ratings,
            None => continue,
        };
        for (item_id, rating) in user_ratings.iter() {
            if target_ratings.contains_key(item_id) {
                continue;
            }
            let (total, similarity_sum) = accumulated.entry(item_id.clone()).or_insert((0.0, 0.0));
            *total += rating * similarity;
            *similarity_sum += similarity;
        }
    }

    // similarity_sum is a sum of strictly positive similarities
    accumulated
        .into_iter()
        .map(|(item_id, (total, similarity_sum))| (item_id, total / similarity_sum))
        .collect()
}

/// The `how_many` best scored items, best first.
pub fn top_items<I: Ord>(item_scores: HashMap<I, f64>, how_many: usize) -> Vec<ItemScore<I>> {
    if how_many == 0 {
        return Vec::new();
    }

    let mut top_items: BinaryHeap<ItemScore<I>> =
        BinaryHeap::with_capacity(how_many.min(item_scores.len()));
    for (item_id, score) in item_scores.into_iter() {
        let scored_item = ItemScore::new(item_id, score);
        if top_items.len() < how_many {
            top_items.push(scored_item);
        } else if let Some(mut bottom) = top_items.peek_mut() {
            // the heap top is the worst ranked item kept so far
            if scored_item < *bottom {
                *bottom = scored_item;
            }
        }
    }

    top_items.into_sorted_vec()
}

#[cfg(test)]
mod recommend_test {
    use float_cmp::approx_eq;
    use hashbrown::HashSet;

    use super::*;
    use crate::cf::observer::CollectingObserver;

    fn table(users: &[(u32, &[(u64, f64)])]) -> RatingTable<u32, u64> {
        users
            .iter()
            .map(|(user_id, ratings)| (*user_id, ratings.iter().cloned().collect()))
            .collect()
    }

    fn sample_table() -> RatingTable<u32, u64> {
        table(&[
            (1, &[(101, 5.0), (102, 3.0), (104, 4.0)]),
            (2, &[(101, 4.0), (103, 4.0), (104, 5.0)]),
            (3, &[(102, 4.5), (103, 5.0), (104, 3.0)]),
        ])
    }

    #[test]
    fn should_recommend_only_unrated_candidate() {
        let ratings = sample_table();
        assert_eq!(vec![103], recommend(&ratings, &1, 3));
    }

    #[test]
    fn should_recommend_from_single_similar_user() {
        let ratings = table(&[(1, &[(101, 5.0)]), (2, &[(101, 5.0), (102, 5.0)])]);
        assert_eq!(vec![102], recommend(&ratings, &1, 5));
    }

    #[test]
    fn should_return_nothing_for_unknown_user() {
        let ratings = sample_table();
        assert!(recommend(&ratings, &42, 3).is_empty());
        assert!(recommend(&ratings, &42, 0).is_empty());
        assert!(recommend(&RatingTable::<u32, u64>::new(), &1, 3).is_empty());
    }

    #[test]
    fn should_return_nothing_when_zero_requested() {
        let ratings = sample_table();
        assert!(recommend(&ratings, &1, 0).is_empty());
    }

    #[test]
    fn should_return_nothing_without_other_users() {
        let ratings = table(&[(7, &[(1, 4.0), (2, 3.0)])]);
        assert!(recommend(&ratings, &7, 5).is_empty());
    }

    #[test]
    fn should_rank_by_weighted_average() {
        let ratings = table(&[
            (1, &[(1, 1.0)]),
            (2, &[(1, 1.0), (5, 2.0)]),
            (3, &[(1, 1.0), (2, 1.0), (5, 5.0)]),
        ]);
        let sim_2 = 1.0 / 5_f64.sqrt();
        let sim_3 = 1.0 / 27_f64.sqrt();

        let similarities = similarity_scores(&CosineSimilarity, &ratings, &1, &mut ());
        let scores = score_items(&ratings, &ratings[&1], &similarities);

        assert_eq!(2, scores.len());
        let expected = (2.0 * sim_2 + 5.0 * sim_3) / (sim_2 + sim_3);
        assert!(approx_eq!(f64, expected, scores[&5], epsilon = 1e-12));
        assert!(approx_eq!(f64, 1.0, scores[&2], epsilon = 1e-12));

        assert_eq!(vec![5, 2], recommend(&ratings, &1, 10));
        assert_eq!(vec![5], recommend(&ratings, &1, 1));
    }

    #[test]
    fn should_break_ties_by_item_id() {
        let ratings = table(&[(1, &[(1, 5.0)]), (2, &[(1, 5.0), (30, 4.0), (10, 4.0), (20, 4.0)])]);
        assert_eq!(vec![10, 20, 30], recommend(&ratings, &1, 5));
        assert_eq!(vec![10, 20], recommend(&ratings, &1, 2));
    }

    #[test]
    fn should_ignore_non_positive_similarities() {
        let ratings = table(&[
            (1, &[(1, 5.0)]),
            (2, &[(1, -5.0), (2, 5.0)]),
            (3, &[(3, 5.0), (4, 5.0)]),
        ]);

        let mut observer: CollectingObserver<u32> = CollectingObserver::new();
        let recommendations = recommend_observed(&ratings, &1, 5, &mut observer);
        assert!(recommendations.is_empty());

        // negative and zero similarities are still reported
        let mut observed = observer.similarities;
        observed.sort_by_key(|(user_id, _)| *user_id);
        assert_eq!(2, observed.len());
        assert_eq!(2, observed[0].0);
        assert!(observed[0].1 < 0.0);
        assert_eq!((3, 0.0), observed[1]);
    }

    #[test]
    fn should_observe_every_other_user_once() {
        let ratings = sample_table();
        let mut observer: CollectingObserver<u32> = CollectingObserver::new();
        recommend_observed(&ratings, &2, 3, &mut observer);

        let mut observed_users: Vec<u32> = observer
            .similarities
            .iter()
            .map(|(user_id, _)| *user_id)
            .collect();
        observed_users.sort_unstable();
        assert_eq!(vec![1, 3], observed_users);
    }

    #[test]
    fn should_never_recommend_rated_items_and_respect_bounds() {
        let ratings = table(&[
            (1, &[(1, 5.0), (2, 1.0), (3, 4.0)]),
            (2, &[(1, 4.0), (4, 3.0), (5, 2.0)]),
            (3, &[(2, 2.0), (3, 5.0), (6, 4.0), (7, 1.0)]),
            (4, &[(8, 3.0)]),
            (5, &[(1, 1.0), (3, 1.0), (4, 5.0), (9, 2.5)]),
        ]);

        for (user_id, user_ratings) in ratings.iter() {
            let candidates: HashSet<u64> = ratings
                .iter()
                .filter(|(other_id, _)| *other_id != user_id)
                .flat_map(|(_, other_ratings)| other_ratings.keys().cloned())
                .filter(|item_id| !user_ratings.contains_key(item_id))
                .collect();

            for how_many in 0..12 {
                let recommendations = recommend(&ratings, user_id, how_many);
                assert!(recommendations.len() <= how_many);
                assert!(recommendations.len() <= candidates.len());
                for item_id in recommendations.iter() {
                    assert!(!user_ratings.contains_key(item_id));
                }
                let unique: HashSet<&u64> = recommendations.iter().collect();
                assert_eq!(unique.len(), recommendations.len());
            }
        }
    }

    #[test]
    fn should_support_string_identifiers() {
        let mut ratings: RatingTable<String, String> = RatingTable::new();
        ratings.insert(
            "alice".to_string(),
            vec![("dune".to_string(), 5.0)].into_iter().collect(),
        );
        ratings.insert(
            "bob".to_string(),
            vec![("dune".to_string(), 4.0), ("solaris".to_string(), 3.0)]
                .into_iter()
                .collect(),
        );
        assert_eq!(vec!["solaris".to_string()], recommend(&ratings, &"alice".to_string(), 3));
    }

    #[test]
    fn should_order_itemscores_best_first() {
        let mut scores: HashMap<u64, f64> = HashMap::new();
        scores.insert(123, 5000.0);
        scores.insert(234, 100.0);
        scores.insert(543, 1.0);
        scores.insert(345, 100.0);

        let ranked: Vec<u64> = top_items(scores.clone(), 3)
            .into_iter()
            .map(|scored| scored.id)
            .collect();
        assert_eq!(vec![123, 234, 345], ranked);

        let ranked: Vec<u64> = top_items(scores, 10)
            .into_iter()
            .map(|scored| scored.id)
            .collect();
        assert_eq!(vec![123, 234, 345, 543], ranked);
    }

    #[test]
    fn should_clamp_negative_amounts() {
        assert_eq!(0, clamp_how_many(-3));
        assert_eq!(0, clamp_how_many(0));
        assert_eq!(7, clamp_how_many(7));
    }
}
