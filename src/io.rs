use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};
use hashbrown::{HashMap, HashSet};
use log::info;
use serde_derive::Deserialize;

use crate::cf::{Rating, RatingTable};

pub type UserId = u32;
pub type ItemId = u64;

pub type Ratings = RatingTable<UserId, ItemId>;

#[derive(Debug, Deserialize)]
struct RatingRecord {
    user_id: UserId,
    item_id: ItemId,
    rating: Rating,
}

/// The three user dataset used when no ratings file is configured.
pub fn sample_ratings() -> Ratings {
    let mut ratings = Ratings::new();
    ratings.insert(1, [(101, 5.0), (102, 3.0), (104, 4.0)].into_iter().collect());
    ratings.insert(2, [(101, 4.0), (103, 4.0), (104, 5.0)].into_iter().collect());
    ratings.insert(3, [(102, 4.5), (103, 5.0), (104, 3.0)].into_iter().collect());
    ratings
}

/// Reads a tab separated file with a header row and the columns `user_id`, `item_id`
/// and `rating`. A repeated user and item combination keeps the last rating.
pub fn read_ratings<P: AsRef<Path>>(path: P) -> anyhow::Result<Ratings> {
    let path = path.as_ref();
    let start_time = Instant::now();
    info!("reading ratings from {}", path.display());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Unable to open ratings file {}", path.display()))?;

    let mut ratings = Ratings::new();
    for (index, result) in reader.deserialize::<RatingRecord>().enumerate() {
        // header is record 1
        let record_number = index + 2;
        let record = result.with_context(|| {
            format!("Unable to parse record {} of {}", record_number, path.display())
        })?;
        if !record.rating.is_finite() {
            bail!(
                "Rating {} in record {} of {} is not a finite number",
                record.rating,
                record_number,
                path.display()
            );
        }
        ratings
            .entry(record.user_id)
            .or_insert_with(HashMap::new)
            .insert(record.item_id, record.rating);
    }

    info!(
        "reading ratings from {}: {} micros",
        path.display(),
        start_time.elapsed().as_micros()
    );
    Ok(ratings)
}

pub struct RatingTableStats {
    pub descriptive_name: String,
    pub qty_ratings: usize,
    pub qty_unique_user_ids: usize,
    pub qty_unique_item_ids: usize,
    pub min_rating: Option<Rating>,
    pub max_rating: Option<Rating>,
}

impl RatingTableStats {
    pub fn describe(descriptive_name: &str, ratings: &Ratings) -> RatingTableStats {
        let mut item_ids: HashSet<ItemId> = HashSet::new();
        let mut qty_ratings = 0;
        let mut min_rating: Option<Rating> = None;
        let mut max_rating: Option<Rating> = None;

        for user_ratings in ratings.values() {
            for (item_id, rating) in user_ratings.iter() {
                qty_ratings += 1;
                item_ids.insert(*item_id);
                min_rating = Some(min_rating.map_or(*rating, |current| current.min(*rating)));
                max_rating = Some(max_rating.map_or(*rating, |current| current.max(*rating)));
            }
        }

        RatingTableStats {
            descriptive_name: descriptive_name.to_string(),
            qty_ratings,
            qty_unique_user_ids: ratings.len(),
            qty_unique_item_ids: item_ids.len(),
            min_rating,
            max_rating,
        }
    }

    pub fn log(&self) {
        info!("Loaded {}", self.descriptive_name);
        info!("\tRatings: {}", self.qty_ratings);
        info!("\tUsers: {}", self.qty_unique_user_ids);
        info!("\tItems: {}", self.qty_unique_item_ids);
        if let (Some(min_rating), Some(max_rating)) = (self.min_rating, self.max_rating) {
            info!("\tRating range: {} / {}", min_rating, max_rating);
        }
    }
}

/// Uses the ratings file when a path is given, the sample dataset otherwise.
pub fn load_ratings(ratings_path: Option<&str>) -> anyhow::Result<Ratings> {
    let (descriptive_name, ratings) = match ratings_path {
        Some(path) => (path.to_string(), read_ratings(path)?),
        None => ("sample ratings".to_string(), sample_ratings()),
    };
    RatingTableStats::describe(&descriptive_name, &ratings).log();
    Ok(ratings)
}
