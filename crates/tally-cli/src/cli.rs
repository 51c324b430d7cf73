//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tally - Business operations analytics
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Inquiry, feedback and service analytics with trend forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import service records from CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable API key authentication (local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory of static dashboard files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Generate analytics reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },
}

/// Window selection shared by the report subcommands
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Time period: week, month, year, custom
    #[arg(long, default_value = "month")]
    pub period: String,

    /// Start date (YYYY-MM-DD), required for --period custom
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD), required for --period custom
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Bucketed counts over the window
    Trend {
        /// Source: inquiries, feedbacks, services
        #[arg(long, default_value = "inquiries")]
        source: String,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Total count over the window
    Summary {
        /// Source: inquiries, feedbacks, services
        #[arg(long, default_value = "inquiries")]
        source: String,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// One-step forecast of the trend
    Forecast {
        /// Source: inquiries, feedbacks, services
        #[arg(long, default_value = "inquiries")]
        source: String,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forecast with growth band and recommendation
    Insight {
        /// Source: inquiries, feedbacks, services
        #[arg(long, default_value = "inquiries")]
        source: String,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// All-time headline numbers
    Kpis {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Top services and category breakdown
    Services {
        /// Restrict to a window instead of all time
        #[arg(long)]
        period: Option<String>,

        /// Start date (YYYY-MM-DD), required for --period custom
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), required for --period custom
        #[arg(long)]
        end: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
