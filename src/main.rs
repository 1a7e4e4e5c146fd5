use clap::Parser;
use fairshelf_api::{AppState, RestApi};
use fairshelf_fit::{ExtractorConfig, FitDecoder, HttpChartExtractor};
use fairshelf_storage::{builtin_catalog, load_catalog, InMemorySavingsStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Finds cheaper functional equivalents across gendered product lines
#[derive(Parser, Debug)]
#[command(name = "fairshelf")]
#[command(about = "Shop by specs, not stereotypes", long_about = None)]
struct Args {
    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Catalog JSON file; the built-in seed catalog is used when omitted
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Vision chat-completion endpoint used to read size-chart images
    #[arg(long, default_value = fairshelf_fit::extract::DEFAULT_EXTRACTOR_URL)]
    extractor_url: String,

    /// Model name sent to the extractor endpoint
    #[arg(long, default_value = fairshelf_fit::extract::DEFAULT_EXTRACTOR_MODEL)]
    extractor_model: String,

    /// API key for the extractor; size-chart images are ignored without one
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    extractor_api_key: Option<String>,

    /// Seconds to wait for a size-chart extraction
    #[arg(long, default_value_t = 30)]
    extractor_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting FairShelf v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP API port: {}", args.http_port);

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => {
            info!("Using built-in seed catalog");
            builtin_catalog()?
        }
    };
    let catalog = Arc::new(catalog);

    let timeout = Duration::from_secs(args.extractor_timeout_secs);
    let mut decoder = FitDecoder::new(catalog.clone());
    match args.extractor_api_key {
        Some(api_key) if !api_key.is_empty() => {
            let extractor = HttpChartExtractor::new(ExtractorConfig {
                endpoint: args.extractor_url,
                model: args.extractor_model,
                api_key: Some(api_key),
                timeout,
                ..ExtractorConfig::default()
            })?;
            decoder = decoder.with_extractor(Arc::new(extractor), timeout);
            info!("Size-chart extractor enabled");
        }
        _ => warn!("No extractor API key set; size charts will come from the catalog only"),
    }

    let state = Arc::new(
        AppState::new(catalog, Arc::new(InMemorySavingsStore::new()))
            .with_decoder(decoder),
    );

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("FairShelf started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
