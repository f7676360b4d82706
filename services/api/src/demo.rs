use crate::infra::{
    FixedPlateRecognizer, InMemoryImageFetcher, InMemoryStateRepository, LatestMetricsFeed,
    PixelEmbedder,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use wellcover::config::AppConfig;
use wellcover::error::AppError;
use wellcover::ledger::{JsonFileStateStore, MealItem, MealLogEntry, StateRepository};
use wellcover::scoring::{PolicyPricer, PremiumCurve};
use wellcover::signals::{EmbeddingFaceVerifier, FitnessMetrics, MetricsHealthProvider};
use wellcover::wellness::{CaptureCollaborators, MealCapture, WellnessService};

const SAVED_FACE_URL: &str = "mem://faces/enrolled.png";
const SELFIE_URL: &str = "mem://faces/selfie.png";
const STRANGER_URL: &str = "mem://faces/stranger.png";
const MEAL_URL: &str = "mem://meals/dinner.png";
const MAX_CURVE_POINTS: usize = 10_000;

#[derive(Args, Debug)]
pub(crate) struct CurveArgs {
    /// Lowest health score to print
    #[arg(long, default_value_t = 0.0)]
    pub(crate) from: f64,
    /// Highest health score to print
    #[arg(long, default_value_t = 100.0)]
    pub(crate) to: f64,
    /// Distance between printed scores
    #[arg(long, default_value_t = 10.0)]
    pub(crate) step: f64,
    /// Curve baseline (defaults to the configured baseline)
    #[arg(long)]
    pub(crate) baseline: Option<f64>,
    /// Curve width (defaults to the configured width)
    #[arg(long)]
    pub(crate) width: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuoteArgs {
    /// Directory holding the user and policy records (defaults to APP_STATE_DIR)
    #[arg(long)]
    pub(crate) state_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Day to log the demo meals on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_curve(args: CurveArgs) -> Result<(), AppError> {
    let configured = AppConfig::load()?.scoring.curve();
    let curve = PremiumCurve::new(
        args.baseline.unwrap_or(configured.baseline),
        args.width.unwrap_or(configured.width),
    );

    println!(
        "Premium adjustment curve (baseline {}, width {})",
        curve.baseline, curve.width
    );
    for (score, adjustment) in curve_points(&curve, args.from, args.to, args.step)? {
        println!("- score {:>6.1}: {:>+9.2}%", score, adjustment);
    }
    Ok(())
}

fn curve_points(
    curve: &PremiumCurve,
    from: f64,
    to: f64,
    step: f64,
) -> Result<Vec<(f64, f64)>, AppError> {
    if step <= 0.0 || from > to {
        return Ok(Vec::new());
    }

    let steps = ((to - from) / step).floor();
    if !steps.is_finite() || steps > MAX_CURVE_POINTS as f64 {
        return Err(AppError::Usage(format!(
            "--step {step} over {from}..{to} needs more than {MAX_CURVE_POINTS} steps"
        )));
    }

    Ok((0..=steps as usize)
        .map(|index| {
            let score = from + step * index as f64;
            (score, curve.adjustment(score))
        })
        .collect())
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let state_dir = match args.state_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.storage.state_dir,
    };

    let store = JsonFileStateStore::open(&state_dir)?;
    let policy = store.load_policy()?;
    let quote = PolicyPricer::quote(&policy);

    println!("Policy quote ({})", state_dir.display());
    println!(
        "Running health score: {:.2} after {} update(s)",
        policy.running_health_score, policy.update_count
    );
    println!("Premium adjustment: {:+.2}%", policy.premium_adjustment_pct);
    println!(
        "Premium: {:.2} (base {:.2})",
        quote.premium, policy.base_premium
    );
    println!(
        "Coverage: {:.2} (base {:.2})",
        quote.coverage, policy.base_coverage
    );
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let repository = Arc::new(InMemoryStateRepository::default());
    let feed = Arc::new(LatestMetricsFeed::default());
    feed.record(FitnessMetrics {
        steps: 8_200.0,
        heart_points: 18.0,
        calories_burned: 1_650.0,
        hours_slept: 7.0,
    });

    let service = WellnessService::new(
        repository.clone(),
        Arc::new(MetricsHealthProvider::new(feed)),
        PremiumCurve::default(),
    )
    .with_capture(demo_capture());

    println!("Wellness scoring demo ({today})");

    let breakfast = service.evaluate_meal(
        true,
        vec![
            named_item("oatmeal", 0.85, 300.0),
            named_item("banana", 0.8, 100.0),
        ],
        today,
    )?;
    render_meal("Breakfast (pre-recognized)", &breakfast);

    let dinner = service
        .evaluate_capture(&capture(SELFIE_URL), today)
        .await?;
    render_meal("Dinner (photo, enrolled face)", &dinner);

    let snack = service
        .evaluate_capture(&capture(STRANGER_URL), today)
        .await?;
    render_meal("Snack (photo, unrecognized face)", &snack);

    let board = service.scores(today).await?;
    println!("\nScores");
    println!("- activity: {}", board.activity_score);
    println!("- sleep: {}", board.sleep_score);
    println!("- diet: {}", board.diet_score);
    println!("- health: {}", board.health_score);

    let update = service.update_scores(today).await?;
    println!("\nScore update #{}", update.update_count);
    println!(
        "- running health score: {:.2} (sample {})",
        update.running_health_score, update.sample
    );
    println!("- premium adjustment: {:+.2}%", update.premium_adjustment_pct);

    let quote = service.policy_details()?;
    println!("\nPolicy");
    println!("- premium: {:.2}", quote.premium);
    println!("- coverage: {:.2}", quote.coverage);
    println!(
        "- meals on file: {}",
        repository.load_user()?.meal_log.len()
    );

    Ok(())
}

fn demo_capture() -> CaptureCollaborators {
    let images = InMemoryImageFetcher::default()
        .with_image(SAVED_FACE_URL, vec![120, 84, 60, 200])
        .with_image(SELFIE_URL, vec![118, 86, 61, 198])
        .with_image(STRANGER_URL, vec![10, 250, 240, 5])
        .with_image(MEAL_URL, vec![33, 66, 99]);

    CaptureCollaborators {
        images: Arc::new(images),
        faces: Arc::new(EmbeddingFaceVerifier::new(PixelEmbedder)),
        meals: Arc::new(FixedPlateRecognizer {
            items: vec![
                named_item("grilled salmon", 0.9, 450.0),
                named_item("rice", 0.55, 250.0),
                named_item("steamed greens", 0.95, 80.0),
            ],
        }),
    }
}

fn capture(test_face: &str) -> MealCapture {
    MealCapture {
        saved_face: SAVED_FACE_URL.to_string(),
        test_face: test_face.to_string(),
        meal: MEAL_URL.to_string(),
    }
}

fn named_item(name: &str, score: f64, calories: f64) -> MealItem {
    MealItem {
        score,
        calories,
        name: Some(name.to_string()),
    }
}

fn render_meal(label: &str, entry: &MealLogEntry) {
    println!(
        "- {label}: {:.0} kcal, weighted score {:.3}, {}",
        entry.meal_calories,
        entry.meal_score_weighted,
        if entry.verified {
            "verified"
        } else {
            "not verified"
        }
    );
}
