use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trendscope_core::load_profile;
use trendscope_pipeline::{QueryVolume, RunOptions, TrendPipeline};

#[derive(Debug, Parser)]
#[command(name = "trendscope")]
#[command(about = "Trend intelligence pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline for a business profile.
    Run {
        /// Path to the business profile YAML file.
        #[arg(long)]
        profile: PathBuf,
        /// Deep fetch: more queries, every eligible call in parallel.
        #[arg(long)]
        deep: bool,
        /// Distinct sources required to mark a trend validated.
        #[arg(long, default_value_t = 2)]
        min_sources: usize,
        /// Relevance threshold, 0-100.
        #[arg(long, default_value_t = 35.0)]
        threshold: f64,
        /// Print the full result as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Print the cached result for a business, if any.
    Cache {
        #[arg(long)]
        business_id: String,
    },
    /// Drop the cached result for a business.
    Clear {
        #[arg(long)]
        business_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = trendscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let pipeline = TrendPipeline::from_config(&config)?;

    match cli.command {
        Commands::Run {
            profile,
            deep,
            min_sources,
            threshold,
            json,
        } => {
            let profile = load_profile(&profile)?;
            let options = RunOptions {
                volume: if deep {
                    QueryVolume::Deep
                } else {
                    QueryVolume::Standard
                },
                min_sources,
                relevance_threshold: threshold,
            };
            let result = pipeline.run(&profile, options).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }
        Commands::Cache { business_id } => match pipeline.load_cached(&business_id).await? {
            Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
            None => println!("no cached result for {business_id}"),
        },
        Commands::Clear { business_id } => {
            pipeline.clear_cached(&business_id).await?;
            println!("cleared cache for {business_id}");
        }
    }

    Ok(())
}

fn print_summary(result: &trendscope_core::PipelineResult) {
    println!(
        "{} — {} ({} confidence {:.0}%)",
        result.business_id,
        result.category.category,
        result.category.signals.join(", "),
        result.category.confidence * 100.0
    );
    println!(
        "raw {} / validated {} / relevant {} / content-ready {} — sources: {}",
        result.stats.raw_count,
        result.stats.validated_count,
        result.stats.relevant_count,
        result.stats.content_ready_count,
        result.sources_used.join(", ")
    );
    for trend in result.trends.iter().take(10) {
        let ready = if trend.is_content_ready { "READY" } else { "     " };
        println!(
            "  [{ready}] {:>5.1}  {}  ({})",
            trend.trend.eq_adjusted_score,
            trend.title(),
            trend.trend.lifecycle.stage_label
        );
        if let Some(best) = &trend.best_match {
            println!("          hook: {}", best.suggested_hook);
        }
    }
}
