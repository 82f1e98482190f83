use indicatif::ProgressBar;
use serde_derive::Serialize;

use crate::cf;
use crate::io::{ItemId, Ratings, UserId};
use crate::metrics::evaluation_reporter::EvaluationReporter;
use crate::stopwatch::Stopwatch;

/// Outcome of one leave-one-out recommendation request.
#[derive(Debug, PartialEq, Serialize)]
pub struct EvaluationRecord {
    pub user_id: UserId,
    pub held_out_item: ItemId,
    /// Zero based position of the held-out item in the recommendations.
    pub hit_position: Option<usize>,
}

/// Picks the best rated item of `user_id` (smallest item id on equal ratings) and
/// returns it with a copy of the ratings that lacks exactly that one rating.
/// Users with fewer than two ratings have nothing to hold out.
pub fn hold_out_best_rated(ratings: &Ratings, user_id: &UserId) -> Option<(ItemId, Ratings)> {
    let user_ratings = ratings.get(user_id)?;
    if user_ratings.len() < 2 {
        return None;
    }
    let (held_out_item, _) = user_ratings.iter().max_by(|(item_a, rating_a), (item_b, rating_b)| {
        rating_a
            .total_cmp(rating_b)
            .then_with(|| item_b.cmp(item_a))
    })?;
    let held_out_item = *held_out_item;

    let mut remaining = ratings.clone();
    if let Some(remaining_user_ratings) = remaining.get_mut(user_id) {
        remaining_user_ratings.remove(&held_out_item);
    }
    Some((held_out_item, remaining))
}

/// Runs a leave-one-out evaluation over all users, in ascending user id order.
pub fn evaluate(
    ratings: &Ratings,
    how_many: usize,
    reporter: &mut EvaluationReporter,
    stopwatch: &mut Stopwatch,
    progress: &ProgressBar,
) -> Vec<EvaluationRecord> {
    let mut user_ids: Vec<UserId> = ratings.keys().cloned().collect();
    user_ids.sort_unstable();

    let mut records = Vec::with_capacity(user_ids.len());
    for user_id in user_ids.iter() {
        progress.inc(1);
        let (held_out_item, remaining) = match hold_out_best_rated(ratings, user_id) {
            Some(split) => split,
            None => continue,
        };

        stopwatch.start();
        let recommended_items = cf::recommend(&remaining, user_id, how_many);
        stopwatch.stop();

        let held_out = [held_out_item];
        reporter.add(&recommended_items, &held_out);
        records.push(EvaluationRecord {
            user_id: *user_id,
            held_out_item,
            hit_position: recommended_items
                .iter()
                .position(|item_id| *item_id == held_out_item),
        });
    }
    records
}
