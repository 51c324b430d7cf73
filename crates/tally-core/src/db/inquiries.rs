//! Inquiry operations

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Inquiry, InquiryStatus, NewInquiry};

const INQUIRY_COLUMNS: &str = "id, name, email, subject, message, status, created_at";

fn row_to_inquiry(row: &Row) -> rusqlite::Result<Inquiry> {
    let status_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(Inquiry {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        status: status_str.parse().unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Store a new inquiry, timestamped now
    pub fn create_inquiry(&self, inquiry: &NewInquiry) -> Result<i64> {
        self.create_inquiry_at(inquiry, Utc::now())
    }

    /// Store a new inquiry with an explicit creation time
    pub fn create_inquiry_at(&self, inquiry: &NewInquiry, created_at: DateTime<Utc>) -> Result<i64> {
        inquiry.validate().map_err(Error::InvalidData)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO inquiries (name, email, subject, message, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                inquiry.name.trim(),
                inquiry.email.trim(),
                inquiry.subject.as_deref().map(str::trim).filter(|s| !s.is_empty()),
                inquiry.message.trim(),
                InquiryStatus::Pending.as_str(),
                format_datetime(created_at),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, "Inquiry created");
        Ok(id)
    }

    /// Get an inquiry by ID
    pub fn get_inquiry(&self, id: i64) -> Result<Option<Inquiry>> {
        let conn = self.conn()?;
        let inquiry = conn
            .query_row(
                &format!("SELECT {} FROM inquiries WHERE id = ?", INQUIRY_COLUMNS),
                params![id],
                row_to_inquiry,
            )
            .optional()?;
        Ok(inquiry)
    }

    /// List inquiries, newest first, optionally filtered by status
    pub fn list_inquiries(&self, status: Option<InquiryStatus>) -> Result<Vec<Inquiry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM inquiries
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY created_at DESC, id DESC",
            INQUIRY_COLUMNS
        ))?;

        let inquiries = stmt
            .query_map(params![status.map(|s| s.as_str())], row_to_inquiry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(inquiries)
    }

    /// Inquiries created on any day in `[from, to]`, oldest first
    pub fn list_inquiries_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Inquiry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM inquiries
             WHERE date(created_at) BETWEEN ?1 AND ?2
             ORDER BY created_at",
            INQUIRY_COLUMNS
        ))?;

        let inquiries = stmt
            .query_map(params![from.to_string(), to.to_string()], row_to_inquiry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(inquiries)
    }

    /// Change an inquiry's handling status
    pub fn update_inquiry_status(&self, id: i64, status: InquiryStatus) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE inquiries SET status = ? WHERE id = ?",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Inquiry {}", id)));
        }
        Ok(())
    }

    /// Delete an inquiry
    pub fn delete_inquiry(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM inquiries WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Inquiry {}", id)));
        }
        Ok(())
    }

    /// Total number of inquiries
    pub fn count_inquiries(&self) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM inquiries", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Number of inquiries created on any day in `[from, to]`
    pub fn count_inquiries_between(&self, from: NaiveDate, to: NaiveDate) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM inquiries WHERE date(created_at) BETWEEN ?1 AND ?2",
            params![from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
