use anyhow::{Context, Result};
use catalog::JsonCatalog;
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{popularity_ranking, Recommendation};
use server::RecommendService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// CineRecs - Hybrid movie recommendation engine
#[derive(Parser)]
#[command(name = "cine-recs")]
#[command(about = "Movie recommendations from collaborative and content signals", long_about = None)]
struct Cli {
    /// Path to the JSON dataset directory (movies.json, users.json, progress.json)
    #[arg(short, long, default_value = "data/demo")]
    data_dir: PathBuf,

    /// Path of the model snapshot file
    #[arg(long, default_value = "saved_models/recommender.json")]
    snapshot: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model from the current dataset and persist a snapshot
    Train,

    /// Get personalized recommendations for a user
    Recommend {
        /// User ID to recommend for
        #[arg(long)]
        user_id: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Also include movies the user has already consumed
        #[arg(long)]
        include_consumed: bool,
    },

    /// Find movies similar to a given movie
    Similar {
        /// Movie ID to look up
        #[arg(long)]
        movie_id: String,

        /// Number of similar movies to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show the popularity ranking from metadata alone
    Popular {
        /// Number of movies to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Record a feedback event for the next retrain
    Feedback {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        movie_id: String,

        /// Feedback score
        #[arg(long)]
        score: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let catalog = Arc::new(
        JsonCatalog::open(&cli.data_dir)
            .with_context(|| format!("Failed to open dataset at {}", cli.data_dir.display()))?,
    );
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    let service = RecommendService::new(catalog.clone(), cli.snapshot.clone());

    match cli.command {
        Commands::Train => handle_train(&service).await?,
        Commands::Recommend {
            user_id,
            limit,
            include_consumed,
        } => {
            service.load_snapshot_or_cold_start();
            let results = service
                .recommend(&user_id, limit, !include_consumed)
                .await
                .context("Recommendation failed")?;
            print_results(&format!("Recommendations for {user_id}"), &results);
        }
        Commands::Similar { movie_id, limit } => {
            service.load_snapshot_or_cold_start();
            let results = service
                .similar(&movie_id, limit)
                .await
                .context("Similarity lookup failed")?;
            print_results(&format!("Movies similar to {movie_id}"), &results);
        }
        Commands::Popular { limit } => {
            use catalog::CatalogSource;
            let movies = catalog.movies()?;
            let results = popularity_ranking(&movies, limit);
            print_results("Most popular movies", &results);
        }
        Commands::Feedback {
            user_id,
            movie_id,
            score,
        } => {
            service.record_feedback(&user_id, &movie_id, score)?;
            println!("{} Feedback recorded", "✓".green());
        }
    }

    Ok(())
}

async fn handle_train(service: &RecommendService) -> Result<()> {
    println!("Training model...");
    let start = Instant::now();
    let metrics = service.train().await.context("Training failed")?;

    println!("{} Training complete in {:?}", "✓".green(), start.elapsed());
    println!("  RMSE:         {:.4}", metrics.reconstruction_error);
    println!("  Users:        {}", metrics.n_users);
    println!("  Movies:       {}", metrics.n_movies);
    println!("  Interactions: {}", metrics.n_interactions);
    println!("  Sparsity:     {:.2}%", metrics.sparsity * 100.0);
    Ok(())
}

fn print_results(heading: &str, results: &[Recommendation]) {
    println!("\n{}", heading.bold());
    if results.is_empty() {
        println!("  (no results)");
        return;
    }
    for (i, rec) in results.iter().enumerate() {
        println!(
            "{:>3}. {} - {:.4} ({})",
            i + 1,
            rec.movie_id.cyan(),
            rec.score,
            rec.reason.as_str().dimmed()
        );
    }
}
