//! CSV import of service records
//!
//! Expected header: `client_name,email,contact,address,service,date,status`.
//! `status` may be missing or blank (pending).

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{NewServiceRecord, RecordStatus};

/// One raw CSV row before validation
#[derive(Debug, Deserialize)]
struct CsvRow {
    client_name: String,
    email: String,
    contact: String,
    address: String,
    service: String,
    date: String,
    #[serde(default)]
    status: Option<String>,
}

/// Parse service records from CSV.
///
/// Fails on the first malformed row, naming its line number, so a partial
/// file is never imported.
pub fn parse_records_csv<R: Read>(reader: R) -> Result<Vec<NewServiceRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();

    for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = i + 2;
        let row = result?;

        let date = parse_date(&row.date)
            .ok_or_else(|| Error::InvalidData(format!("line {}: invalid date '{}'", line, row.date)))?;
        let status: RecordStatus = row
            .status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e| Error::InvalidData(format!("line {}: {}", line, e)))?;

        let record = NewServiceRecord {
            client_name: row.client_name,
            email: row.email,
            contact: row.contact,
            address: row.address,
            service: row.service,
            date,
            status,
        };
        record
            .validate()
            .map_err(|e| Error::InvalidData(format!("line {}: {}", line, e)))?;

        records.push(record);
    }

    debug!("Parsed {} service records", records.len());
    Ok(records)
}

/// Parse a CSV file and store every row, returning how many were imported
pub fn import_records_csv<R: Read>(db: &Database, reader: R) -> Result<usize> {
    let records = parse_records_csv(reader)?;
    db.create_records(&records)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "client_name,email,contact,address,service,date,status";

    #[test]
    fn test_parse_records() {
        let csv = format!(
            "{}\n\
             Juan Dela Cruz,juan@example.com,0917 111 2222,Quezon City,Columbarium,2024-01-15,completed\n\
             \"Santos, Ana\",ana@example.com,0918 333 4444,Makati,Funeral Service,01/20/2024,\n",
            HEADER
        );

        let records = parse_records_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, RecordStatus::Completed);
        assert_eq!(records[1].client_name, "Santos, Ana");
        assert_eq!(records[1].status, RecordStatus::Pending);
        assert_eq!(
            records[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
    }

    #[test]
    fn test_missing_status_column() {
        let csv = "client_name,email,contact,address,service,date\n\
                   Lee,lee@example.com,0919,Pasig,Cremation Services,2024-03-01\n";
        let records = parse_records_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].status, RecordStatus::Pending);
    }

    #[test]
    fn test_bad_date_names_line() {
        let csv = format!(
            "{}\nLee,lee@example.com,0919,Pasig,Columbarium,2024-03-01,\nKim,kim@example.com,0920,Pasig,Columbarium,March 2,\n",
            HEADER
        );
        match parse_records_csv(csv.as_bytes()) {
            Err(Error::InvalidData(msg)) => assert!(msg.contains("line 3"), "{}", msg),
            other => panic!("expected invalid data, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_field_rejected() {
        let csv = format!("{}\nLee,,0919,Pasig,Columbarium,2024-03-01,\n", HEADER);
        assert!(matches!(
            parse_records_csv(csv.as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let csv = format!("{}\nLee,lee@example.com,0919,Pasig,Columbarium,2024-03-01,lost\n", HEADER);
        assert!(matches!(
            parse_records_csv(csv.as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_import_into_database() {
        let db = Database::in_memory().unwrap();
        let csv = format!(
            "{}\nLee,lee@example.com,0919,Pasig,Columbarium,2024-03-01,completed\n",
            HEADER
        );
        assert_eq!(import_records_csv(&db, csv.as_bytes()).unwrap(), 1);
        assert_eq!(db.list_records(None).unwrap().len(), 1);
    }
}
