//! CLI command tests

use std::io::Write;

use clap::Parser;
use tally_core::db::Database;
use tally_core::models::{EventSource, NewInquiry};

use crate::cli::{Cli, Commands, ReportType, WindowArgs};
use crate::commands::{self, truncate};

const SAMPLE_CSV: &str = "\
client_name,email,contact,address,service,date,status
Ana Cruz,ana@example.com,09170000001,Manila,Columbarium Niche,2024-02-10,Completed
Ben Reyes,ben@example.com,09170000002,Quezon City,Cremation Services,2024-03-05,Completed
Cara Lim,cara@example.com,09170000003,Pasig,Columbarium Niche,2024-03-18,Pending
";

fn window(period: &str) -> WindowArgs {
    WindowArgs {
        period: period.to_string(),
        start: None,
        end: None,
    }
}

fn custom(start: &str, end: &str) -> WindowArgs {
    WindowArgs {
        period: "custom".to_string(),
        start: Some(start.to_string()),
        end: Some(end.to_string()),
    }
}

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    tally_core::import_records_csv(&db, SAMPLE_CSV.as_bytes()).unwrap();
    db.create_inquiry(&NewInquiry {
        name: "Dana Uy".to_string(),
        email: "dana@example.com".to_string(),
        subject: Some("Niche reservations".to_string()),
        message: "Do you offer niche reservations?".to_string(),
    })
    .unwrap();
    db
}

// ========== Core / Import Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tally.db");

    commands::cmd_init(&db_path).unwrap();
    assert!(db_path.exists());

    // Re-running init on an existing database is fine
    commands::cmd_init(&db_path).unwrap();
}

#[test]
fn test_cmd_import_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tally.db");
    let csv_path = dir.path().join("records.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

    let imported = commands::cmd_import(&db_path, &csv_path).unwrap();
    assert_eq!(imported, 3);

    let db = commands::open_db(&db_path).unwrap();
    assert_eq!(db.list_records(None).unwrap().len(), 3);
}

#[test]
fn test_cmd_import_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tally.db");
    let result = commands::cmd_import(&db_path, &dir.path().join("nope.csv"));
    assert!(result.is_err());
}

#[test]
fn test_cmd_import_bad_row_imports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tally.db");
    let csv_path = dir.path().join("records.csv");
    std::fs::write(
        &csv_path,
        "client_name,email,contact,address,service,date,status\n\
         Ana Cruz,ana@example.com,0917,Manila,Columbarium Niche,2024-02-10,Completed\n\
         Ben Reyes,ben@example.com,0917,Manila,Cremation Services,not-a-date,Completed\n",
    )
    .unwrap();

    assert!(commands::cmd_import(&db_path, &csv_path).is_err());

    let db = commands::open_db(&db_path).unwrap();
    assert!(db.list_records(None).unwrap().is_empty());
}

// ========== Report Tests ==========

#[test]
fn test_parse_source() {
    assert_eq!(
        commands::parse_source("inquiries").unwrap(),
        EventSource::Inquiries
    );
    assert_eq!(
        commands::parse_source("services").unwrap(),
        EventSource::Services
    );
    assert!(commands::parse_source("invoices").is_err());
}

#[test]
fn test_report_trend_and_summary() {
    let db = setup_test_db();
    for period in ["week", "month", "year"] {
        commands::cmd_report_trend(&db, "inquiries", &window(period), false).unwrap();
        commands::cmd_report_summary(&db, "feedbacks", &window(period), true).unwrap();
    }
}

#[test]
fn test_report_rejects_bad_window() {
    let db = setup_test_db();
    assert!(commands::cmd_report_trend(&db, "inquiries", &window("fortnight"), false).is_err());
    assert!(commands::cmd_report_trend(&db, "inquiries", &window("custom"), false).is_err());
    assert!(commands::cmd_report_summary(
        &db,
        "inquiries",
        &custom("2024-03-31", "2024-03-01"),
        false
    )
    .is_err());
}

#[test]
fn test_report_forecast_and_insight_custom_window() {
    let db = setup_test_db();
    let args = custom("2024-02-01", "2024-03-31");

    commands::cmd_report_forecast(&db, "services", &args, false).unwrap();
    commands::cmd_report_forecast(&db, "services", &args, true).unwrap();
    commands::cmd_report_insight(&db, "services", &args, false).unwrap();
    commands::cmd_report_insight(&db, "inquiries", &args, true).unwrap();
}

#[test]
fn test_report_kpis_and_services() {
    let db = setup_test_db();
    commands::cmd_report_kpis(&db, false).unwrap();
    commands::cmd_report_kpis(&db, true).unwrap();

    commands::cmd_report_services(&db, None, None, None, false).unwrap();
    commands::cmd_report_services(
        &db,
        Some("custom"),
        Some("2024-01-01"),
        Some("2024-12-31"),
        true,
    )
    .unwrap();
    assert!(commands::cmd_report_services(&db, Some("custom"), None, None, false).is_err());
}

#[test]
fn test_report_kpis_empty_database() {
    let db = Database::in_memory().unwrap();
    commands::cmd_report_kpis(&db, false).unwrap();
    commands::cmd_report_services(&db, None, None, None, false).unwrap();
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_cli_parses_report_window() {
    let cli = Cli::try_parse_from([
        "tally", "report", "insight", "--source", "services", "--period", "custom", "--start",
        "2024-01-01", "--end", "2024-06-30", "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Report {
            report_type:
                ReportType::Insight {
                    source,
                    window,
                    json,
                },
        } => {
            assert_eq!(source, "services");
            assert_eq!(window.period, "custom");
            assert_eq!(window.start.as_deref(), Some("2024-01-01"));
            assert_eq!(window.end.as_deref(), Some("2024-06-30"));
            assert!(json);
        }
        _ => panic!("expected report insight"),
    }
}

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["tally", "serve"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("tally.db"));
    match cli.command {
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            assert_eq!(port, 3000);
            assert_eq!(host, "127.0.0.1");
            assert!(!no_auth);
            assert!(static_dir.is_none());
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Columbarium Niche", 30), "Columbarium Niche");
    assert_eq!(truncate("Memorial Chapel Reservation", 10), "Memoria...");
}
