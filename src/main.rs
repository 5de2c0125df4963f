use clap::{CommandFactory, Parser};
use course_catalog_scraper::catalog::{self, HttpFetcher, JsonStore};
use course_catalog_scraper::config::{Config, DEFAULT_BASE_URL};
use course_catalog_scraper::{run_scraper, ConsoleReporter, Fetcher, Program};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Scrapes the course listing of every full-time program into JSON files.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Scrape a single program and print what was extracted
    #[arg(long, conflicts_with = "all")]
    test: bool,

    /// Scrape every program of processed/all_programs.json in batches
    #[arg(long)]
    all: bool,

    #[arg(long, env = "CATALOG_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory holding processed/, raw/ and the progress files
    #[arg(long, env = "CATALOG_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    #[arg(long, env = "CATALOG_BATCH_SIZE", default_value_t = 50)]
    batch_size: usize,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            data_dir: self.data_dir.clone(),
            batch_size: self.batch_size,
            ..Config::default()
        }
    }
}

async fn run_test(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new(config)?;
    let store = JsonStore::new(&config.data_dir);
    let program = Program::from_code(&config.test_program);

    info!("Test scrape of {}", program.code);
    let html = fetcher.fetch(&program.code).await?;

    match catalog::parse_course_page(&program, &html) {
        Some(courses) => {
            println!("{}", courses);
            let path = store.raw_insert(&courses).await?;
            info!("Saved {}", path.display());
        }
        None => warn!("No courses found for {}", program.code),
    }
    Ok(())
}

async fn run_all(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new(config)?;
    let store = JsonStore::new(&config.data_dir);
    let mut reporter = ConsoleReporter::new(config.max_reported_errors);

    run_scraper(&fetcher, &store, config, &mut reporter).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,hyper=warn,reqwest=info".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();
    let config = args.config();

    if args.test {
        run_test(&config).await
    } else if args.all {
        run_all(&config).await
    } else {
        Args::command().print_help()?;
        Ok(())
    }
}
