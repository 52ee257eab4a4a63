// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use user_search::llm::prompts::SAMPLE_QUERY;
use user_search::utils::logging::{
    format_heading, format_info, format_no_matches, format_skipped_batch, format_step,
    format_success, format_usage_summary, format_warning,
};
use user_search::{
    Batcher, ChatClient, Config, ConfiguredSource, ContextFormatter, FailurePolicy, SearchAnswer,
    SearchPipeline, UsageTracker, UserSource, Validator,
};

#[derive(Parser)]
#[command(name = "user_search")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Ungrounded LLM search over raw user records", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search users with a natural-language question (prompts when QUERY is omitted)
    Search {
        query: Option<String>,

        #[arg(long, env = "DIAL_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        #[arg(long, value_name = "NUM")]
        batch_size: Option<usize>,

        #[arg(long, value_name = "NUM")]
        max_concurrency: Option<usize>,

        #[arg(long, value_name = "POLICY")]
        on_batch_error: Option<FailurePolicy>,

        #[arg(long)]
        no_progress: bool,
    },

    /// Print the prompt context of one batch without calling the model
    Preview {
        #[arg(short, long, default_value_t = 0)]
        batch: usize,

        #[arg(long, value_name = "NUM")]
        batch_size: Option<usize>,
    },

    /// Check configuration, credentials and the user source
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    user_search::utils::logging::init_logger(cli.color, cli.verbose);

    info!("User search (no grounding)");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults with environment overrides",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Search {
            query,
            api_key,
            batch_size,
            max_concurrency,
            on_batch_error,
            no_progress,
        } => {
            let mut config = config;
            if api_key.is_some() {
                config.model.api_key = api_key;
            }
            if let Some(size) = batch_size {
                config.search.batch_size = size;
            }
            if let Some(limit) = max_concurrency {
                config.search.max_concurrency = limit;
            }
            if let Some(policy) = on_batch_error {
                config.search.on_batch_error = policy;
            }
            if no_progress {
                config.search.show_progress = false;
            }
            cmd_search(&config, query).await?;
        }
        Commands::Preview { batch, batch_size } => {
            cmd_preview(&config, batch, batch_size).await?;
        }
        Commands::Verify => {
            cmd_verify(&config).await?;
        }
    }

    Ok(())
}

async fn read_query() -> Result<String> {
    println!("Query samples:");
    println!(" - {}", SAMPLE_QUERY);
    print!("> ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read query from stdin")?;
    Ok(line)
}

async fn cmd_search(config: &Config, query: Option<String>) -> Result<()> {
    config.validate().context("Invalid search configuration")?;

    let raw_query = match query {
        Some(query) => query,
        None => read_query().await?,
    };
    let Some(query) = Validator::normalize_query(&raw_query) else {
        return Ok(());
    };

    let model = ChatClient::new(config.model.clone()).context("Failed to create model client")?;
    let source =
        ConfiguredSource::from_config(&config.users).context("Failed to create user source")?;
    info!("Model: {} | Users: {}", model.deployment(), source.describe());

    let pipeline = SearchPipeline::new(model, source, &config.search)?;
    let usage = UsageTracker::new();

    println!("\n{}", format_heading("Searching user database"));

    let Some(report) = pipeline
        .run(&query, &usage)
        .await
        .context("User search failed")?
    else {
        return Ok(());
    };

    for (batch, error) in report.failed_batches() {
        println!("{}", format_skipped_batch(batch, error));
    }

    match &report.answer {
        SearchAnswer::Answer(text) => {
            println!("\n{}\n", text);
        }
        SearchAnswer::NoMatches => {
            println!("\n{}", format_no_matches());
        }
    }

    println!("\n{}", format_usage_summary(&report.usage));
    info!(
        "Search complete in {:.2}s ({} users, {} batches, {} with matches)",
        report.elapsed.as_secs_f64(),
        report.users,
        report.batch_sizes.len(),
        report.matched_batches()
    );

    Ok(())
}

async fn cmd_preview(config: &Config, batch: usize, batch_size: Option<usize>) -> Result<()> {
    let batcher = Batcher::new(batch_size.unwrap_or(config.search.batch_size))?;
    let source =
        ConfiguredSource::from_config(&config.users).context("Failed to create user source")?;

    let users = source
        .get_all_users()
        .await
        .context("Failed to fetch users")?;
    let batches = batcher.split(&users);

    println!(
        "{}",
        format_info(&format!(
            "{} users in {} batches of up to {}",
            users.len(),
            batches.len(),
            batcher.batch_size()
        ))
    );

    if batches.is_empty() {
        println!("{}", ContextFormatter::format(&[]));
        return Ok(());
    }

    let selected = batches.get(batch).with_context(|| {
        format!("Batch {} out of range (0..{})", batch, batches.len())
    })?;

    println!("\n{}", format_heading(&format!("Batch {}", batch)));
    println!("{}", ContextFormatter::format(selected));

    Ok(())
}

async fn cmd_verify(config: &Config) -> Result<()> {
    let total = 3;

    println!("{}", format_step(1, total, "Configuration"));
    config.validate().context("Configuration is invalid")?;
    println!(
        "{}",
        format_success(&format!(
            "batch size {}, at most {} concurrent calls, on batch error: {}",
            config.search.batch_size, config.search.max_concurrency, config.search.on_batch_error
        ))
    );

    println!("{}", format_step(2, total, "Model credentials"));
    match ChatClient::new(config.model.clone()) {
        Ok(client) => println!(
            "{}",
            format_success(&format!("{} at {}", client.deployment(), client.completions_url()))
        ),
        Err(e) => println!("{}", format_warning(&e.to_string())),
    }

    println!("{}", format_step(3, total, "User source"));
    let source =
        ConfiguredSource::from_config(&config.users).context("Failed to create user source")?;
    let users = source
        .get_all_users()
        .await
        .with_context(|| format!("Failed to fetch users from {}", source.describe()))?;

    let batcher = Batcher::new(config.search.batch_size)?;
    println!(
        "{}",
        format_success(&format!(
            "{} users from {} ({} model calls per search plus synthesis)",
            users.len(),
            source.describe(),
            batcher.batch_count(users.len())
        ))
    );

    Ok(())
}
