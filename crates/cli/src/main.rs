use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::TagVocabulary;
use pipeline::{FeatureTransformer, TagToken};
use server::{inspect_history, Config, ServiceOrchestrator, StreamReport};
use sources::CodeforcesFetcher;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// cf-recs - Codeforces practice tag recommender
#[derive(Parser)]
#[command(name = "cf-recs")]
#[command(about = "Recommends rating-tagged problem topics for a Codeforces handle", long_about = None)]
struct Cli {
    /// Tag vocabulary file (JSON word index or `token id` lines)
    #[arg(long, env = "VOCAB_PATH", default_value = "tag_vocabulary.json")]
    vocab_path: PathBuf,

    /// Model artifact handed to the model service
    #[arg(long, env = "MODEL_PATH", default_value = "problem_recommender.h5")]
    model_path: PathBuf,

    /// gRPC address of the model service
    #[arg(long, env = "SCORER_ADDR", default_value = "http://127.0.0.1:50051")]
    scorer_addr: String,

    /// Root of the Codeforces API
    #[arg(long, env = "CODEFORCES_API_BASE", default_value = "https://codeforces.com/api")]
    api_base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get recommended tags for a handle
    Recommend {
        /// Codeforces handle
        #[arg(long)]
        handle: String,

        /// Show the tag and rating behind each recommended token
        #[arg(long)]
        explain: bool,
    },

    /// Show a handle's attempt profile and tag stream (no model needed)
    Stream {
        /// Codeforces handle
        #[arg(long)]
        handle: String,
    },

    /// Inspect the tag vocabulary
    Vocab {
        /// Token to look up; a number looks up the token for that id
        #[arg(long)]
        lookup: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            vocab_path: self.vocab_path.clone(),
            model_path: self.model_path.clone(),
            scorer_addr: self.scorer_addr.clone(),
            api_base: self.api_base.clone(),
            ..Config::from_env()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    debug!(?config, "Resolved configuration");

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { handle, explain } => handle_recommend(&config, &handle, explain).await?,
        Commands::Stream { handle } => handle_stream(&config, &handle).await?,
        Commands::Vocab { lookup } => handle_vocab(&config, lookup.as_deref())?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(config: &Config, handle: &str, explain: bool) -> Result<()> {
    let start = Instant::now();
    let orchestrator = ServiceOrchestrator::from_config(config)
        .await
        .context("Failed to initialize the recommendation pipeline")?;
    println!("{} Pipeline ready in {:?}", "✓".green(), start.elapsed());

    let start = Instant::now();
    let recommendations = orchestrator
        .handle_request(handle)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    print_recommendations(handle, &recommendations, explain);
    println!("{}", format!("Served in {:?}", start.elapsed()).dimmed());
    Ok(())
}

/// Handle the 'stream' command
async fn handle_stream(config: &Config, handle: &str) -> Result<()> {
    let fetcher = CodeforcesFetcher::new(config.fetcher_config())
        .context("Failed to build the Codeforces HTTP client")?;
    let StreamReport { profile, stream } =
        inspect_history(&fetcher, &FeatureTransformer::new(), handle)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;

    println!("{}", format!("Handle: {}", handle).bold().blue());
    println!("{}Distinct problems: {}", "• ".green(), profile.len());
    println!("{}Solved: {}", "• ".green(), profile.solved_count());

    println!("Attempts (newest first):");
    for attempt in profile.attempts.iter().take(20) {
        let verdict = if attempt.verdict {
            "AC".green()
        } else {
            "--".red()
        };
        println!(
            "  {} {} [{}] rating {} at user rating {} ({} tries)",
            verdict,
            attempt.problem_id,
            attempt.tags.join(", "),
            attempt.problem_rating,
            attempt.user_rating_at_attempt,
            attempt.attempt_count
        );
    }
    if profile.len() > 20 {
        println!("  ... {} more", profile.len() - 20);
    }

    println!("{}", format!("Tag stream ({} tokens):", stream.len()).bold());
    println!("  {}", stream.to_strings().join(" "));
    Ok(())
}

/// Handle the 'vocab' command
fn handle_vocab(config: &Config, lookup: Option<&str>) -> Result<()> {
    let vocab = TagVocabulary::load_from_file(&config.vocab_path)
        .with_context(|| format!("Failed to load {}", config.vocab_path.display()))?;

    println!("{}", format!("Vocabulary: {}", config.vocab_path.display()).bold().blue());
    println!("{}Tokens: {}", "• ".cyan(), vocab.token_count());
    println!("{}Model output width: {}", "• ".cyan(), vocab.len());

    let Some(query) = lookup else {
        return Ok(());
    };
    match query.parse::<u32>() {
        Ok(id) => match vocab.get_token(id) {
            Some(token) => println!("{} -> {}", id, token.green()),
            None => println!("{} -> {}", id, "no token".red()),
        },
        Err(_) => match vocab.get_id(query) {
            Some(id) => println!("{} -> {}", query, id.to_string().green()),
            None => println!("{} -> {}", query, "not in vocabulary".red()),
        },
    }
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(handle: &str, recommendations: &[String], explain: bool) {
    println!("{}", format!("Recommendations for {}:", handle).bold().blue());
    for (i, token) in recommendations.iter().enumerate() {
        let rank = (i + 1).to_string();
        match TagToken::parse(token).filter(|_| explain) {
            Some(parsed) => println!(
                "{}. {} (tag '{}' at rating {})",
                rank.green(),
                token,
                parsed.basename(),
                parsed.rating()
            ),
            None => println!("{}. {}", rank.green(), token),
        }
    }
}
