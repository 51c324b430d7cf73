//! Service record operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewServiceRecord, RecordStatus, ServiceRecord};

const RECORD_COLUMNS: &str =
    "id, client_name, email, contact, address, service, date, status, created_at";

fn row_to_record(row: &Row) -> rusqlite::Result<ServiceRecord> {
    let date_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    Ok(ServiceRecord {
        id: row.get(0)?,
        client_name: row.get(1)?,
        email: row.get(2)?,
        contact: row.get(3)?,
        address: row.get(4)?,
        service: row.get(5)?,
        date: parse_date(6, &date_str)?,
        status: status_str.parse().unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Store a new service record
    pub fn create_record(&self, record: &NewServiceRecord) -> Result<i64> {
        record.validate().map_err(Error::InvalidData)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO records (client_name, email, contact, address, service, date, status)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                record.client_name.trim(),
                record.email.trim(),
                record.contact.trim(),
                record.address.trim(),
                record.service.trim(),
                record.date.to_string(),
                record.status.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, service = %record.service, "Service record created");
        Ok(id)
    }

    /// Get a service record by ID
    pub fn get_record(&self, id: i64) -> Result<Option<ServiceRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM records WHERE id = ?", RECORD_COLUMNS),
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// List service records, most recent service date first
    pub fn list_records(&self, status: Option<RecordStatus>) -> Result<Vec<ServiceRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM records
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY date DESC, id DESC",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![status.map(|s| s.as_str())], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Service records dated in `[from, to]`, oldest first
    pub fn list_records_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<RecordStatus>,
    ) -> Result<Vec<ServiceRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM records
             WHERE date BETWEEN ?1 AND ?2 AND (?3 IS NULL OR status = ?3)
             ORDER BY date, id",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(
                params![from.to_string(), to.to_string(), status.map(|s| s.as_str())],
                row_to_record,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Case-insensitive substring search over the text fields
    pub fn search_records(&self, query: &str) -> Result<Vec<ServiceRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_records(None);
        }

        let pattern = format!("%{}%", query.to_lowercase());
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM records
             WHERE lower(client_name) LIKE ?1
                OR lower(email) LIKE ?1
                OR lower(contact) LIKE ?1
                OR lower(address) LIKE ?1
                OR lower(service) LIKE ?1
                OR lower(status) LIKE ?1
             ORDER BY date DESC, id DESC",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map(params![pattern], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Replace every field of a service record
    pub fn update_record(&self, id: i64, record: &NewServiceRecord) -> Result<()> {
        record.validate().map_err(Error::InvalidData)?;

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE records SET client_name = ?, email = ?, contact = ?, address = ?,
                    service = ?, date = ?, status = ?
             WHERE id = ?",
            params![
                record.client_name.trim(),
                record.email.trim(),
                record.contact.trim(),
                record.address.trim(),
                record.service.trim(),
                record.date.to_string(),
                record.status.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Record {}", id)));
        }
        Ok(())
    }

    /// Delete a service record
    pub fn delete_record(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM records WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Record {}", id)));
        }
        Ok(())
    }

    /// Number of service records dated in `[from, to]`
    pub fn count_records_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        status: Option<RecordStatus>,
    ) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records
             WHERE date BETWEEN ?1 AND ?2 AND (?3 IS NULL OR status = ?3)",
            params![from.to_string(), to.to_string(), status.map(|s| s.as_str())],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Insert many records in one transaction, returning how many were stored
    pub fn create_records(&self, records: &[NewServiceRecord]) -> Result<usize> {
        for (i, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|e| Error::InvalidData(format!("row {}: {}", i + 1, e)))?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (client_name, email, contact, address, service, date, status)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.client_name.trim(),
                    record.email.trim(),
                    record.contact.trim(),
                    record.address.trim(),
                    record.service.trim(),
                    record.date.to_string(),
                    record.status.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        debug!(count = records.len(), "Service records imported");
        Ok(records.len())
    }
}
