use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use leiloeiros_scraper::apis::registry::RegistryExtractor;
use leiloeiros_scraper::app::extract_use_case::{ExtractOutcome, ExtractUseCase};
use leiloeiros_scraper::app::ports::{RankingOutputPort, RawInputPort};
use leiloeiros_scraper::app::rank_use_case::RankUseCase;
use leiloeiros_scraper::config::Config;
use leiloeiros_scraper::constants::DEFAULT_CONFIG_PATH;
use leiloeiros_scraper::infra::http_client::ReqwestHttp;
use leiloeiros_scraper::infra::ranking_output::{CsvRankingWriter, JsonRankingWriter};
use leiloeiros_scraper::infra::raw_input::{JsonRawInput, JsonRawSnapshot};
use leiloeiros_scraper::logging;
use leiloeiros_scraper::report::render_report;

#[derive(Parser)]
#[command(name = "leiloeiros_scraper")]
#[command(about = "Auctioneer registry scraper and digital-presence ranking")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the latest raw extraction and write the ranking (default)
    Rank {
        /// Raw JSON file to rank instead of the newest one in the raw directory
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Crawl the registry listing and save the raw records
    Extract {
        /// Maximum number of listing pages to visit
        #[arg(long)]
        max_pages: Option<u32>,
        /// Seconds to wait between page fetches
        #[arg(long, value_parser = parse_delay)]
        delay: Option<Duration>,
    },
    /// Extract, then rank the fresh extraction
    Run {
        #[arg(long)]
        max_pages: Option<u32>,
        #[arg(long, value_parser = parse_delay)]
        delay: Option<Duration>,
    },
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    raw.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| format!("expected a non-negative number of seconds, got {raw:?}"))
}

/// First Ctrl-C asks the crawler to stop; once the stop flag is already set
/// (a second Ctrl-C, or extraction has finished) the process exits.
fn should_exit_on_interrupt(stop: &AtomicBool) -> bool {
    stop.swap(true, Ordering::SeqCst)
}

fn rank(config: &Config, input: Option<PathBuf>) -> anyhow::Result<()> {
    let input = match input {
        Some(path) => JsonRawInput::new(path),
        None => JsonRawInput::latest_in(&config.paths.raw_dir)
            .context("no raw extraction to rank; run `extract` first or pass --input")?,
    };
    println!("🔨 Ranking {}...", input.describe());

    let outputs: Vec<Box<dyn RankingOutputPort>> = vec![
        Box::new(CsvRankingWriter::new(config.paths.csv_path())),
        Box::new(JsonRankingWriter::new(config.paths.json_path())),
    ];
    let use_case = RankUseCase::new(Box::new(input), outputs);
    let outcome = use_case.execute().context("ranking run failed")?;

    print!("{}", render_report(&outcome.run, config.report.top_n));
    println!("\n💾 Artifacts:");
    for artifact in &outcome.artifacts {
        println!("   {}", artifact.display());
    }
    Ok(())
}

async fn extract(
    config: &Config,
    max_pages: Option<u32>,
    delay: Option<Duration>,
) -> anyhow::Result<ExtractOutcome> {
    let http = ReqwestHttp::new(
        Duration::from_secs(config.extractor.timeout_seconds),
        &config.extractor.user_agent,
    )?;
    let extractor = RegistryExtractor::new(Arc::new(http), config.extractor.clone())?;

    // The ctrl_c listener replaces the default SIGINT handling for the rest of
    // the process, so it stays alive and exits on any later interrupt
    let stop = extractor.stop_handle();
    let listener_stop = stop.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if should_exit_on_interrupt(&listener_stop) {
                warn!("Interrupt received; exiting");
                std::process::exit(130);
            }
            warn!("Interrupt received; stopping after the current page");
        }
    });

    let use_case = ExtractUseCase::new(
        extractor,
        Box::new(JsonRawSnapshot::new(&config.paths.raw_dir)),
    );
    let max_pages = max_pages.unwrap_or(config.extractor.max_pages);
    let delay = delay.unwrap_or_else(|| config.extractor.delay());

    println!("📡 Extracting from {} (up to {} pages)...", config.extractor.base_url, max_pages);
    let outcome = use_case.execute(max_pages, delay).await;
    stop.store(true, Ordering::SeqCst);
    let outcome = outcome.context("saving the raw extraction failed")?;

    let extraction = &outcome.extraction;
    println!("\n📥 Extraction Results:");
    println!("   Records: {}", extraction.records.len());
    println!("   Pages visited: {}", extraction.pages_visited);
    println!("   Failed pages: {:?}", extraction.failed_pages);
    println!("   Stopped because: {:?}", extraction.stop_reason);
    if let Some(path) = &outcome.snapshot {
        println!("   Raw file: {}", path.display());
    }
    Ok(outcome)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("invalid configuration ({})", cli.config.display()))?;

    let result = match cli.command.unwrap_or(Commands::Rank { input: None }) {
        Commands::Rank { input } => rank(&config, input),
        Commands::Extract { max_pages, delay } => extract(&config, max_pages, delay).await.map(|_| ()),
        Commands::Run { max_pages, delay } => {
            let outcome = extract(&config, max_pages, delay).await?;
            if outcome.snapshot.is_none() {
                warn!("Extraction produced no records; ranking the latest stored raw file");
            }
            rank(&config, outcome.snapshot)
        }
    };

    match &result {
        Ok(()) => info!("Done"),
        Err(e) => error!("Run failed: {:#}", e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delay() {
        assert_eq!(parse_delay("2"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_delay("0.5"), Ok(Duration::from_millis(500)));
        assert!(parse_delay("-1").is_err());
        assert!(parse_delay("NaN").is_err());
        assert!(parse_delay("soon").is_err());
    }

    #[test]
    fn test_parse_delay_rejects_overflowing_values() {
        assert!(parse_delay("1e20").is_err());
        assert!(parse_delay("inf").is_err());
    }

    #[test]
    fn test_second_interrupt_exits() {
        let stop = AtomicBool::new(false);

        assert!(!should_exit_on_interrupt(&stop));
        assert!(stop.load(Ordering::SeqCst));
        assert!(should_exit_on_interrupt(&stop));
    }

    #[test]
    fn test_interrupt_after_extraction_exits() {
        let stop = AtomicBool::new(false);
        stop.store(true, Ordering::SeqCst);

        assert!(should_exit_on_interrupt(&stop));
    }
}
