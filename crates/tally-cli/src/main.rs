//! Tally CLI - Business operations analytics
//!
//! Usage:
//!   tally init                                   # Initialize database
//!   tally import --file records.csv              # Import service records
//!   tally serve --port 3000                      # Start web server
//!   tally report trend --source inquiries        # Bucketed counts for this month
//!   tally report insight --period year           # Forecast + growth band
//!   tally report kpis                            # Headline numbers

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, ReportType};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file } => commands::cmd_import(&cli.db, &file).map(|_| ()),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, static_dir.as_deref()).await,
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db)?;
            match report_type {
                ReportType::Trend {
                    source,
                    window,
                    json,
                } => commands::cmd_report_trend(&db, &source, &window, json),
                ReportType::Summary {
                    source,
                    window,
                    json,
                } => commands::cmd_report_summary(&db, &source, &window, json),
                ReportType::Forecast {
                    source,
                    window,
                    json,
                } => commands::cmd_report_forecast(&db, &source, &window, json),
                ReportType::Insight {
                    source,
                    window,
                    json,
                } => commands::cmd_report_insight(&db, &source, &window, json),
                ReportType::Kpis { json } => commands::cmd_report_kpis(&db, json),
                ReportType::Services {
                    period,
                    start,
                    end,
                    json,
                } => commands::cmd_report_services(
                    &db,
                    period.as_deref(),
                    start.as_deref(),
                    end.as_deref(),
                    json,
                ),
            }
        }
    }
}
