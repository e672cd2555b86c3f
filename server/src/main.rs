use anyhow::Result;
use clap::Parser;
use engine::corpus::load_corpus;
use engine::SearchEngine;
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of crawled page files
    #[arg(long, default_value = "./pages")]
    pages: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Seconds between corpus refreshes; 0 disables the refresh task
    #[arg(long, default_value_t = 600)]
    refresh_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let engine = Arc::new(SearchEngine::new());
    engine.rebuild(load_corpus(&args.pages)?);

    // The scraper drops refreshed pages on disk; this task just reloads
    // them and republishes. In-flight queries keep their old snapshot.
    if args.refresh_secs > 0 {
        let engine = engine.clone();
        let pages = args.pages.clone();
        let period = Duration::from_secs(args.refresh_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // the first tick fires immediately
            loop {
                interval.tick().await;
                match load_corpus(&pages) {
                    Ok(corpus) => engine.rebuild(corpus),
                    Err(err) => tracing::warn!(%err, "corpus refresh failed"),
                }
            }
        });
    }

    let app = build_app(engine, args.pages);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
