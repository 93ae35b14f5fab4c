//! PDF Forms Server - Entry point

use clap::Parser;
use pdf_forms_server::{run_server_with_config, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// HTTP service for rendering PDF forms and documents of record
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "PDF_FORMS_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Directories templates may be read from (comma separated)
    #[arg(long, env = "PDF_FORMS_TEMPLATE_DIRS", value_delimiter = ',')]
    template_dirs: Vec<PathBuf>,

    /// Base URL of the rendering engine
    #[arg(long, env = "PDF_FORMS_ENGINE_URL")]
    engine_url: Url,

    /// Timeout for one engine call, in seconds
    #[arg(long, env = "PDF_FORMS_ENGINE_TIMEOUT_SECS", default_value_t = 60)]
    engine_timeout_secs: u64,

    /// Maximum size of a rendered document, in bytes
    #[arg(long, env = "PDF_FORMS_MAX_ENGINE_RESPONSE_BYTES", default_value_t = 100 * 1024 * 1024)]
    max_engine_response_bytes: u64,

    /// Maximum size of a request body, in bytes
    #[arg(long, env = "PDF_FORMS_MAX_REQUEST_BYTES", default_value_t = 32 * 1024 * 1024)]
    max_request_bytes: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            bind_addr: args.bind,
            template_dirs: args.template_dirs,
            engine_url: Some(args.engine_url),
            engine_timeout: Duration::from_secs(args.engine_timeout_secs),
            max_engine_response_bytes: args.max_engine_response_bytes,
            max_request_bytes: args.max_request_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_forms_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    tracing::info!(engine_url = %args.engine_url, "Starting PDF Forms Server");

    run_server_with_config(args.into()).await?;
    Ok(())
}
