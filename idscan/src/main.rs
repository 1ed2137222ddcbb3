use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idscan::config::Config;
use idscan::db::{Database, KeyValueStore, LibSqlBackend};
use idscan::ocr::ImagePayload;
use idscan::parser::{DocumentParser, IdDocumentParser};
use idscan::{ScanMode, ScanRequest, Scanner};

#[derive(Parser)]
#[command(name = "idscan")]
#[command(about = "Scan Aadhaar cards and driving licenses into structured fields")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recognize an image and print the parsed fields as JSON
    Scan {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,
        /// auto, online, or offline (defaults to SCAN_MODE)
        #[arg(long)]
        mode: Option<ScanMode>,
        /// Vision API key for this scan (defaults to VISION_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Skip image dimension checks
        #[arg(long)]
        no_validate: bool,
    },
    /// Parse already-recognized text from a file or stdin
    Parse {
        /// Text file; reads stdin when omitted
        input: Option<PathBuf>,
    },
    /// Show this month's online OCR usage
    Usage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "idscan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    match args.command {
        Command::Parse { input } => {
            let text = match input {
                Some(path) => tokio::fs::read_to_string(&path).await?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let result = IdDocumentParser::new().parse(&text);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Usage => {
            let (scanner, _) = build_scanner(&config).await?;
            let quota = scanner.quota().await?;
            println!("{}", serde_json::to_string_pretty(&quota)?);
        }
        Command::Scan {
            image,
            mode,
            api_key,
            no_validate,
        } => {
            let payload = ImagePayload::from_path(&image).await?;
            if !no_validate {
                let (width, height) = payload.validate(&config.ocr)?;
                tracing::debug!(width, height, "Image accepted");
            }

            let mode = mode.unwrap_or(config.scanner.default_mode);
            let mut request = ScanRequest::new(payload).with_mode(mode);
            if let Some(key) = api_key {
                request = request.with_credential(key);
            }

            let (scanner, store) = build_scanner(&config).await?;
            tracing::info!(image = %image.display(), %mode, "Scanning document");
            let result = scanner.scan(request).await?;
            store.sync().await?;
            tracing::info!(document_type = %result.document_type, "Scan complete");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

async fn build_scanner(config: &Config) -> anyhow::Result<(Scanner, Arc<LibSqlBackend>)> {
    tracing::debug!("Opening usage database: {}", config.database.url);
    let db = Database::new(&config.database).await?;
    let store = Arc::new(LibSqlBackend::new(db));
    store.sync().await?;
    let scanner = Scanner::from_config(config, store.clone() as Arc<dyn KeyValueStore>)?;
    Ok((scanner, store))
}
