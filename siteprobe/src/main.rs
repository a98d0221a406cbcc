use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use siteprobe::cli::{Cli, Session};
use siteprobe::events::{ConsoleEventSink, FanoutEventSink, LoggingEventSink};
use siteprobe::observability::{init_tracing, DEFAULT_FILTER};
use siteprobe::pipeline::{Pipeline, TokioPacer};
use siteprobe::websearch::{DiffbotClient, SerperClient};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format, DEFAULT_FILTER)?;

    let config = cli.resolve_config().context("loading configuration")?;
    info!(
        layout = %config.export.layout,
        format = %config.export.format,
        max_requests = config.analysis.rate_limit.max_requests,
        "Starting siteprobe"
    );

    let search = SerperClient::new(config.search.clone()).context("creating search client")?;
    let analysis =
        DiffbotClient::new(config.analysis.clone()).context("creating analysis client")?;
    let sink = FanoutEventSink::new()
        .with(Arc::new(ConsoleEventSink::stdout()))
        .with(Arc::new(LoggingEventSink::debug()));

    let pipeline = Pipeline::new(
        config,
        Arc::new(search),
        Arc::new(analysis),
        Arc::new(sink),
        Arc::new(TokioPacer),
    );

    let stdin = std::io::stdin();
    let mut session = Session::new(pipeline, stdin.lock(), std::io::stdout())
        .with_defaults(cli.initial_request())
        .with_query(cli.query)
        .once(cli.once);

    let stats = session.run().await.context("terminal I/O failed")?;
    info!(completed = stats.completed, failed = stats.failed, "Session finished");

    if cli.once && stats.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
