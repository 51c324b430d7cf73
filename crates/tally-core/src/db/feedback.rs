//! Client feedback operations

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Feedback, NewFeedback, Ratings};

const FEEDBACK_COLUMNS: &str = "id, name, email, message, overall_rating, service_rating, \
     satisfaction_rating, professionalism_rating, communication_rating, facility_rating, \
     user_id, created_at";

fn row_to_feedback(row: &Row) -> rusqlite::Result<Feedback> {
    let created_at_str: String = row.get(11)?;

    Ok(Feedback {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        message: row.get(3)?,
        ratings: Ratings {
            overall: row.get(4)?,
            service: row.get(5)?,
            satisfaction: row.get(6)?,
            professionalism: row.get(7)?,
            communication: row.get(8)?,
            facility: row.get(9)?,
        },
        user_id: row.get(10)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Store new feedback, timestamped now
    pub fn create_feedback(&self, feedback: &NewFeedback) -> Result<i64> {
        self.create_feedback_at(feedback, Utc::now())
    }

    /// Store new feedback with an explicit creation time.
    ///
    /// Ratings are clamped into 0..=5 before they are written.
    pub fn create_feedback_at(
        &self,
        feedback: &NewFeedback,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        feedback.validate().map_err(Error::InvalidData)?;
        let ratings = feedback.ratings.clamped();

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO feedbacks (
                name, email, message, overall_rating, service_rating,
                satisfaction_rating, professionalism_rating, communication_rating,
                facility_rating, user_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                feedback.name.as_deref().map(str::trim),
                feedback.email.as_deref().map(str::trim),
                feedback.message.trim(),
                ratings.overall,
                ratings.service,
                ratings.satisfaction,
                ratings.professionalism,
                ratings.communication,
                ratings.facility,
                feedback.user_id,
                format_datetime(created_at),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, overall = ratings.overall, "Feedback created");
        Ok(id)
    }

    /// Get a feedback entry by ID
    pub fn get_feedback(&self, id: i64) -> Result<Option<Feedback>> {
        let conn = self.conn()?;
        let feedback = conn
            .query_row(
                &format!("SELECT {} FROM feedbacks WHERE id = ?", FEEDBACK_COLUMNS),
                params![id],
                row_to_feedback,
            )
            .optional()?;
        Ok(feedback)
    }

    /// List all feedback, newest first
    pub fn list_feedback(&self) -> Result<Vec<Feedback>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM feedbacks ORDER BY created_at DESC, id DESC",
            FEEDBACK_COLUMNS
        ))?;

        let feedback = stmt
            .query_map([], row_to_feedback)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    /// Feedback created on any day in `[from, to]`, oldest first
    pub fn list_feedback_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Feedback>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM feedbacks
             WHERE date(created_at) BETWEEN ?1 AND ?2
             ORDER BY created_at",
            FEEDBACK_COLUMNS
        ))?;

        let feedback = stmt
            .query_map(params![from.to_string(), to.to_string()], row_to_feedback)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(feedback)
    }

    /// Replace the ratings on a feedback entry (clamped like on insert)
    pub fn update_feedback_ratings(&self, id: i64, ratings: Ratings) -> Result<()> {
        let ratings = ratings.clamped();
        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE feedbacks SET
                overall_rating = ?, service_rating = ?, satisfaction_rating = ?,
                professionalism_rating = ?, communication_rating = ?, facility_rating = ?
            WHERE id = ?
            "#,
            params![
                ratings.overall,
                ratings.service,
                ratings.satisfaction,
                ratings.professionalism,
                ratings.communication,
                ratings.facility,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Feedback {}", id)));
        }
        Ok(())
    }

    /// Delete a feedback entry
    pub fn delete_feedback(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM feedbacks WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Feedback {}", id)));
        }
        Ok(())
    }

    /// Total number of feedback entries
    pub fn count_feedback(&self) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM feedbacks", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Number of feedback entries created on any day in `[from, to]`
    pub fn count_feedback_between(&self, from: NaiveDate, to: NaiveDate) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM feedbacks WHERE date(created_at) BETWEEN ?1 AND ?2",
            params![from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
