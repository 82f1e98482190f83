use log::info;

use usercf::cf;
use usercf::cf::observer::LogObserver;
use usercf::config::AppConfig;
use usercf::io;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path)?;
    config.log.init_logger();

    let ratings = io::load_ratings(config.data.ratings_path.as_deref())?;

    let target_user = config.model.target_user;
    let num_items_to_recommend = config.model.num_items_to_recommend;
    if !ratings.contains_key(&target_user) {
        info!("User {} has no ratings, nothing to recommend", target_user);
    }

    info!("Similarity Scores:");
    let recommendations = cf::recommend_observed(
        &ratings,
        &target_user,
        num_items_to_recommend,
        &mut LogObserver,
    );

    println!(
        "Recommendations for User {}: {:?}",
        target_user, recommendations
    );
    Ok(())
}
