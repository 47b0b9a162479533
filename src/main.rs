//! ketogo-curator — binary entrypoint.
//! Logs go to stderr; stdout carries only command output (the rendered checklist, summaries).

use clap::Parser;
use ketogo_curator::cli::{run, Cli};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ketogo_curator=info,scout=info,publish=info,warn"));

    let json = std::env::var("KETOGO_LOG_JSON").ok().is_some_and(|v| v == "1");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    run(cli).await
}
