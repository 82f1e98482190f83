use csv::Writer;
use indicatif::ProgressBar;
use log::info;

use usercf::config::AppConfig;
use usercf::evaluation;
use usercf::io;
use usercf::metrics::evaluation_reporter::EvaluationReporter;
use usercf::stopwatch::Stopwatch;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path)?;
    config.log.init_logger();

    let ratings = io::load_ratings(config.data.ratings_path.as_deref())?;
    let num_items_to_recommend = config.evaluation.num_items_to_recommend;

    let mut reporter = EvaluationReporter::new(&ratings, num_items_to_recommend);
    let mut stopwatch = Stopwatch::new();

    let pb = ProgressBar::new(ratings.len() as u64);
    let records = evaluation::evaluate(
        &ratings,
        num_items_to_recommend,
        &mut reporter,
        &mut stopwatch,
        &pb,
    );
    pb.finish_and_clear();

    if config.evaluation.save_records {
        let out_path = &config.evaluation.out_path;
        let mut wtr = Writer::from_path(out_path)?;
        for record in records.iter() {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        info!("Wrote {} evaluation records to {}", records.len(), out_path);
    }

    println!("===============================================================");
    println!("===            START EVALUATING LEAVE-ONE-OUT              ====");
    println!("===============================================================");
    println!("{}", reporter.get_name());
    println!("{}", reporter.result());
    println!("Qty test evaluations: {}", stopwatch.get_n());
    println!("Prediction latency");
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(0.90));
    println!("p95 (microseconds): {}", stopwatch.get_percentile_in_micros(0.95));
    println!("p99.5 (microseconds): {}", stopwatch.get_percentile_in_micros(0.995));
    Ok(())
}
