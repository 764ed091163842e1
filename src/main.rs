//! Trawl main entry point
//!
//! This is the command-line interface for the Trawl download-link crawler.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use trawl::config::{load_config_with_hash, validate, Config};
use trawl::ui::{self, Selection};
use trawl::url::parse_seed;
use trawl::{
    sanitize_filename, CrawlBudget, Crawler, DownloadCandidate, Downloader, ProgressSink,
};
use tracing_subscriber::EnvFilter;

/// Exit code for unusable operator input
const EXIT_USAGE: u8 = 2;

/// Exit code after an interrupt outside a crawl or download
const EXIT_INTERRUPTED: u8 = 130;

/// Trawl: find and fetch downloadable files on a website
///
/// Trawl crawls the pages reachable from a seed URL within its domain,
/// lists the files it finds, and downloads the one you pick.
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(version)]
#[command(about = "Find and fetch downloadable files on a website", long_about = None)]
struct Cli {
    /// Seed URL (prompted for when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum link distance from the seed page
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<u32>,

    /// Probe ambiguous links over the network
    #[arg(long)]
    deep: bool,

    /// Only analyze the seed page, without following links
    #[arg(long, conflicts_with_all = ["depth", "max_pages"])]
    single_page: bool,

    /// Directory downloaded files are saved to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(ExitCode::SUCCESS);
    }

    let interrupts = Interrupts::default();
    interrupts.listen();

    run(cli, config, &interrupts).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trawl=info,warn"),
            1 => EnvFilter::new("trawl=debug,info"),
            2 => EnvFilter::new("trawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and validates
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if cli.single_page {
        config.crawler.max_depth = 1;
        config.crawler.max_pages = 1;
    }
    if cli.deep {
        config.crawler.deep_classify = true;
    }
    if let Some(dir) = &cli.output_dir {
        config.download.directory = dir.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn print_dry_run(config: &Config) {
    println!("=== Trawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Deep classification: {}", config.crawler.deep_classify);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    for (name, value) in &config.http.headers {
        println!("  Header: {}: {}", name, value);
    }

    println!("\nDownloads:");
    println!("  Directory: {}", config.download.directory.display());
    println!("  Chunk size: {} bytes", config.download.chunk_size);
    println!("  Timeout: {}s", config.download.timeout_secs);

    println!(
        "\nDownload Extensions ({}):",
        config.classifier.download_extensions.len()
    );
    println!("  {}", config.classifier.download_extensions.join(" "));

    println!("\n✓ Configuration is valid");
}

/// Routes Ctrl-C to the running crawl or download
///
/// Outside of those, an interrupt ends the process.
#[derive(Clone, Default)]
struct Interrupts {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl Interrupts {
    fn listen(&self) {
        let current = self.current.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                let token = current.lock().ok().and_then(|guard| guard.clone());
                match token {
                    Some(token) => token.cancel(),
                    None => {
                        println!("\n[*] Exiting program.");
                        std::process::exit(EXIT_INTERRUPTED.into());
                    }
                }
            }
        });
    }

    /// Starts an interruptible phase
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut guard) = self.current.lock() {
            *guard = Some(token.clone());
        }
        token
    }

    fn end(&self) {
        if let Ok(mut guard) = self.current.lock() {
            *guard = None;
        }
    }
}

/// Drives an indicatif bar from download progress
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::no_length()
        };
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn on_progress(&self, written: u64, total: Option<u64>) {
        if let Some(total) = total {
            if self.bar.length() != Some(total) {
                self.bar.set_length(total);
            }
        }
        self.bar.set_position(written);
    }
}

/// Main interactive loop: crawl a target, then offer its downloads
async fn run(cli: Cli, config: Config, interrupts: &Interrupts) -> anyhow::Result<ExitCode> {
    let mut crawler = Crawler::new(&config)?;
    let downloader = Downloader::new(&config.http, &config.download)?;
    let mut seed_arg = cli.url.clone();

    println!("\n{}", "=".repeat(70));
    println!("           TRAWL: DOWNLOAD DISCOVERY TOOL");
    println!("{}", "=".repeat(70));

    loop {
        let prompted = seed_arg.is_none();
        let seed_input = match seed_arg.take() {
            Some(url) => url,
            None => {
                let question = if cli.single_page {
                    "Enter the web page URL to analyze: "
                } else {
                    "Enter the starting URL for crawling: "
                };
                ui::prompt_seed(&mut io::stdin().lock(), &mut io::stdout(), question)?
            }
        };

        let seed = match parse_seed(&seed_input) {
            Ok(seed) => seed,
            Err(e) => {
                eprintln!("[-] {}. Exiting.", e);
                return Ok(ExitCode::from(EXIT_USAGE));
            }
        };

        let max_depth = if prompted && !cli.single_page && cli.depth.is_none() {
            ui::prompt_depth(
                &mut io::stdin().lock(),
                &mut io::stdout(),
                config.crawler.max_depth,
            )?
        } else {
            config.crawler.max_depth
        };
        let budget = CrawlBudget::new(max_depth, config.crawler.max_pages)?;

        if cli.single_page {
            println!("[*] Analyzing page: {}", seed);
        } else {
            println!("[*] Starting crawler at: {} (Max Depth: {})", seed, max_depth);
        }

        let token = interrupts.begin();
        let report = crawler.crawl(seed, budget, &token).await;
        interrupts.end();

        print!("{}", ui::format_crawl_summary(&report));
        for failure in &report.failures {
            tracing::debug!("Failed page {}: {}", failure.url, failure.error);
        }

        if report.results.is_empty() {
            println!("\n[-] No download files found.");
            return Ok(ExitCode::SUCCESS);
        }

        print!("{}", ui::format_compact(&report.results));

        loop {
            let selection =
                ui::prompt_selection(&mut io::stdin().lock(), &mut io::stdout(), &report.results)?;

            match selection {
                Selection::Quit => {
                    println!("[*] Exiting program.");
                    return Ok(ExitCode::SUCCESS);
                }
                Selection::Refresh => {
                    println!("--- REFRESH LIST ---");
                }
                Selection::NewTarget => break,
                Selection::Download(_) => {
                    let Some(candidate) = selection.candidate(&report.results) else {
                        continue;
                    };
                    if download(&downloader, candidate, &config, cli.quiet, interrupts).await {
                        return Ok(ExitCode::SUCCESS);
                    }
                }
            }
        }
    }
}

/// Downloads one candidate, reporting the outcome; returns true on success
async fn download(
    downloader: &Downloader,
    candidate: &DownloadCandidate,
    config: &Config,
    quiet: bool,
    interrupts: &Interrupts,
) -> bool {
    println!("\n[*] Starting download: '{}'", candidate.name);
    println!("[*] URL: {}", candidate.url);
    let _ = io::stdout().flush();

    let progress = BarProgress::new(quiet);
    let token = interrupts.begin();
    let result = downloader
        .download(
            &candidate.url,
            &candidate.name,
            &config.download.directory,
            &progress,
            &token,
        )
        .await;
    interrupts.end();
    progress.bar.finish_and_clear();

    match result {
        Ok(path) => {
            println!("\n[+] DOWNLOAD COMPLETED! File saved in: {}", path.display());
            true
        }
        Err(e) if e.is_cancelled() => {
            println!("\n[!] Download interrupted by user (CTRL+C).");
            println!(
                "[*] Partial file '{}.part' deleted.",
                sanitize_filename(&candidate.name)
            );
            false
        }
        Err(e) => {
            println!("\n[-] Error downloading {}: {}", candidate.name, e);
            false
        }
    }
}
