use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sm2_srs::{
    FixedClock, Progress, ProgressStats, Quality, Scheduler, SessionBuilder, StatsConfig,
    Timestamp,
};

fn date(millis: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn init_logging() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()
}

fn schedule_new_card(scheduler: &Scheduler<&FixedClock>) {
    // Grade a card that was never seen
    let record = scheduler.review("日", None, Quality::Perfect.into());
    println!(
        "New card: interval {} day(s), due {}, status {}",
        record.interval(),
        date(record.next_review()),
        record.status()
    );
}

fn run_sessions(scheduler: &Scheduler<&FixedClock>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ["一", "二", "三", "四", "五", "六", "七", "八", "九", "十", "百", "千"];
    let builder = SessionBuilder::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut progress = Progress::new();

    for day in 0..5 {
        let now = scheduler.now();
        let session = builder.build(&catalog, &progress, now, &mut rng);
        println!("{}: session {:?}", date(now), session);

        for (i, item_id) in session.iter().enumerate() {
            // every third answer is wrong
            let quality = Quality::from_answer((i + day) % 3 != 0);
            scheduler.review_stored(&mut progress, item_id, quality.into());
            if let Some(record) = progress.get_mut(item_id) {
                record.record_session_outcome(quality.is_pass());
            }
        }
        scheduler.clock().advance_days(1);
    }

    let stats = ProgressStats::compute(
        &progress,
        catalog.len(),
        scheduler.now(),
        &StatsConfig::default(),
    );
    println!("{stats:#?}");

    let json = progress.to_json()?;
    let restored = Progress::from_json(&json)?;
    println!("Saved {} records ({} bytes)", restored.len(), json.len());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let clock = FixedClock::new(Utc::now().timestamp_millis());
    let scheduler = Scheduler::with_clock(&clock);

    println!("Scheduling a new card:");
    schedule_new_card(&scheduler);

    println!("\nRunning five daily sessions:");
    run_sessions(&scheduler)?;

    Ok(())
}
