//! Database tests

use super::*;
use crate::error::Error;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn inquiry(name: &str) -> NewInquiry {
        NewInquiry {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            subject: Some("Pricing".to_string()),
            message: "How much is a niche?".to_string(),
        }
    }

    fn record(client: &str, service: &str, date: &str, status: RecordStatus) -> NewServiceRecord {
        NewServiceRecord {
            client_name: client.to_string(),
            email: "client@example.com".to_string(),
            contact: "0917 000 0000".to_string(),
            address: "12 Mabini St".to_string(),
            service: service.to_string(),
            date: date.parse().unwrap(),
            status,
        }
    }

    fn guest_feedback(overall: f64) -> NewFeedback {
        NewFeedback {
            name: Some("Guest".to_string()),
            email: Some("guest@example.com".to_string()),
            message: "Very kind staff".to_string(),
            ratings: Ratings {
                overall,
                service: 4.0,
                satisfaction: 4.0,
                professionalism: 5.0,
                communication: 3.0,
                facility: 4.0,
            },
            user_id: None,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_inquiries(None).unwrap().is_empty());
        assert!(db.list_feedback().unwrap().is_empty());
        assert!(db.list_records(None).unwrap().is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('feedbacks') WHERE name LIKE '%_rating'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 6, "feedbacks table should have 6 rating columns");
    }

    #[test]
    fn test_inquiry_crud() {
        let db = Database::in_memory().unwrap();

        let id = db.create_inquiry(&inquiry("Maria")).unwrap();
        assert!(id > 0);

        let stored = db.get_inquiry(id).unwrap().unwrap();
        assert_eq!(stored.name, "Maria");
        assert_eq!(stored.status, InquiryStatus::Pending);

        db.update_inquiry_status(id, InquiryStatus::Responded).unwrap();
        let stored = db.get_inquiry(id).unwrap().unwrap();
        assert_eq!(stored.status, InquiryStatus::Responded);

        assert_eq!(db.list_inquiries(Some(InquiryStatus::Pending)).unwrap().len(), 0);
        assert_eq!(db.list_inquiries(Some(InquiryStatus::Responded)).unwrap().len(), 1);

        db.delete_inquiry(id).unwrap();
        assert!(db.get_inquiry(id).unwrap().is_none());
        assert!(matches!(db.delete_inquiry(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_get_missing_vs_failed_lookup() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_inquiry(42).unwrap().is_none());
        assert!(db.get_feedback(42).unwrap().is_none());
        assert!(db.get_record(42).unwrap().is_none());

        db.conn()
            .unwrap()
            .execute_batch("DROP TABLE inquiries; DROP TABLE feedbacks; DROP TABLE records;")
            .unwrap();

        // A broken query is an error, not an absent row
        assert!(matches!(db.get_inquiry(42), Err(Error::Database(_))));
        assert!(matches!(db.get_feedback(42), Err(Error::Database(_))));
        assert!(matches!(db.get_record(42), Err(Error::Database(_))));
    }

    #[test]
    fn test_inquiry_validation() {
        let db = Database::in_memory().unwrap();
        let mut bad = inquiry("Maria");
        bad.message = "   ".to_string();

        assert!(matches!(db.create_inquiry(&bad), Err(Error::InvalidData(_))));
        assert_eq!(db.count_inquiries().unwrap(), 0);
    }

    #[test]
    fn test_inquiries_between_is_inclusive_by_day() {
        let db = Database::in_memory().unwrap();
        let times = [
            Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 30, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        ];
        for at in times {
            db.create_inquiry_at(&inquiry("Jo"), at).unwrap();
        }

        let from = "2024-04-01".parse().unwrap();
        let to = "2024-04-30".parse().unwrap();
        let april = db.list_inquiries_between(from, to).unwrap();
        assert_eq!(april.len(), 2);
        assert!(april[0].created_at < april[1].created_at);
        assert_eq!(db.count_inquiries_between(from, to).unwrap(), 2);
        assert_eq!(db.count_inquiries().unwrap(), 4);
    }

    #[test]
    fn test_feedback_ratings_clamped_on_insert() {
        let db = Database::in_memory().unwrap();
        let mut feedback = guest_feedback(9.0);
        feedback.ratings.communication = -1.0;

        let id = db.create_feedback(&feedback).unwrap();
        let stored = db.get_feedback(id).unwrap().unwrap();
        assert_eq!(stored.ratings.overall, 5.0);
        assert_eq!(stored.ratings.communication, 0.0);
        assert_eq!(stored.ratings.professionalism, 5.0);
    }

    #[test]
    fn test_feedback_update_and_delete() {
        let db = Database::in_memory().unwrap();
        let id = db.create_feedback(&guest_feedback(3.0)).unwrap();

        let ratings = Ratings {
            overall: 4.5,
            ..Ratings::default()
        };
        db.update_feedback_ratings(id, ratings).unwrap();
        let stored = db.get_feedback(id).unwrap().unwrap();
        assert_eq!(stored.ratings.overall, 4.5);
        assert_eq!(stored.ratings.facility, 0.0);

        assert!(matches!(
            db.update_feedback_ratings(id + 100, ratings),
            Err(Error::NotFound(_))
        ));

        db.delete_feedback(id).unwrap();
        assert_eq!(db.count_feedback().unwrap(), 0);
    }

    #[test]
    fn test_member_feedback_without_name() {
        let db = Database::in_memory().unwrap();
        let feedback = NewFeedback {
            name: None,
            email: None,
            user_id: Some(7),
            ..guest_feedback(4.0)
        };
        let id = db.create_feedback(&feedback).unwrap();
        let stored = db.get_feedback(id).unwrap().unwrap();
        assert_eq!(stored.user_id, Some(7));
        assert!(stored.name.is_none());
    }

    #[test]
    fn test_record_crud() {
        let db = Database::in_memory().unwrap();
        let id = db
            .create_record(&record("Reyes", "Columbarium", "2024-02-10", RecordStatus::Pending))
            .unwrap();

        let stored = db.get_record(id).unwrap().unwrap();
        assert_eq!(stored.date.to_string(), "2024-02-10");
        assert_eq!(stored.category(), ServiceCategory::Columbarium);

        db.update_record(
            id,
            &record("Reyes", "Columbarium", "2024-02-11", RecordStatus::Completed),
        )
        .unwrap();
        let stored = db.get_record(id).unwrap().unwrap();
        assert_eq!(stored.status, RecordStatus::Completed);
        assert_eq!(stored.date.to_string(), "2024-02-11");

        db.delete_record(id).unwrap();
        assert!(matches!(db.delete_record(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_record_validation() {
        let db = Database::in_memory().unwrap();
        let bad = record("", "Columbarium", "2024-02-10", RecordStatus::Pending);
        assert!(matches!(db.create_record(&bad), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_records_between_with_status() {
        let db = Database::in_memory().unwrap();
        db.create_record(&record("A", "Columbarium", "2024-01-31", RecordStatus::Completed))
            .unwrap();
        db.create_record(&record("B", "Columbarium", "2024-02-01", RecordStatus::Completed))
            .unwrap();
        db.create_record(&record("C", "Columbarium", "2024-02-15", RecordStatus::Pending))
            .unwrap();
        db.create_record(&record("D", "Columbarium", "2024-02-29", RecordStatus::Completed))
            .unwrap();

        let from = "2024-02-01".parse().unwrap();
        let to = "2024-02-29".parse().unwrap();

        let all = db.list_records_between(from, to, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].client_name, "B");

        let completed = db
            .list_records_between(from, to, Some(RecordStatus::Completed))
            .unwrap();
        let names: Vec<_> = completed.iter().map(|r| r.client_name.as_str()).collect();
        assert_eq!(names, vec!["B", "D"]);

        assert_eq!(
            db.count_records_between(from, to, Some(RecordStatus::Completed))
                .unwrap(),
            2
        );
    }

    #[test]
    fn test_search_records() {
        let db = Database::in_memory().unwrap();
        db.create_record(&record("Dela Cruz", "Funeral Service", "2024-01-05", RecordStatus::Pending))
            .unwrap();
        db.create_record(&record("Santos", "Cremation Services", "2024-01-06", RecordStatus::Pending))
            .unwrap();

        let hits = db.search_records("cremation").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].client_name, "Santos");

        assert_eq!(db.search_records("DELA").unwrap().len(), 1);
        assert_eq!(db.search_records("  ").unwrap().len(), 2);
        assert!(db.search_records("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_bulk_insert_is_atomic() {
        let db = Database::in_memory().unwrap();
        let rows = vec![
            record("A", "Columbarium", "2024-01-01", RecordStatus::Completed),
            record("B", "", "2024-01-02", RecordStatus::Completed),
        ];

        assert!(matches!(db.create_records(&rows), Err(Error::InvalidData(_))));
        assert!(db.list_records(None).unwrap().is_empty());

        let stored = db.create_records(&rows[..1]).unwrap();
        assert_eq!(stored, 1);
    }
}
