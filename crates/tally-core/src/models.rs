//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Inquiries
// ============================================================================

/// An inquiry submitted through the public contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

/// Inquiry handling status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Responded,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Responded => "responded",
            Self::Closed => "closed",
        }
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "responded" | "replied" => Ok(Self::Responded),
            "closed" | "resolved" => Ok(Self::Closed),
            _ => Err(format!("Unknown inquiry status: {}", s)),
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// New inquiry for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

impl NewInquiry {
    /// Check required fields before insertion
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err("Name and email are required".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("Inquiry message is required".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// Highest rating a client can give in any category
pub const MAX_RATING: f64 = 5.0;

/// The six rating categories collected on the feedback form
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default)]
    pub overall: f64,
    #[serde(default)]
    pub service: f64,
    #[serde(default)]
    pub satisfaction: f64,
    #[serde(default)]
    pub professionalism: f64,
    #[serde(default)]
    pub communication: f64,
    #[serde(default)]
    pub facility: f64,
}

impl Ratings {
    /// Field names as used by the KPI summarizer
    pub const FIELDS: [&'static str; 6] = [
        "overall_rating",
        "service_rating",
        "satisfaction_rating",
        "professionalism_rating",
        "communication_rating",
        "facility_rating",
    ];

    /// Clamp every rating into 0..=5, mapping non-finite input to 0
    pub fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_finite() {
                v.clamp(0.0, MAX_RATING)
            } else {
                0.0
            }
        }

        Self {
            overall: clamp(self.overall),
            service: clamp(self.service),
            satisfaction: clamp(self.satisfaction),
            professionalism: clamp(self.professionalism),
            communication: clamp(self.communication),
            facility: clamp(self.facility),
        }
    }

    /// Look up a rating by its field name
    pub fn get(&self, field: &str) -> Option<f64> {
        match field {
            "overall_rating" | "overall" => Some(self.overall),
            "service_rating" | "service" => Some(self.service),
            "satisfaction_rating" | "satisfaction" => Some(self.satisfaction),
            "professionalism_rating" | "professionalism" => Some(self.professionalism),
            "communication_rating" | "communication" => Some(self.communication),
            "facility_rating" | "facility" => Some(self.facility),
            _ => None,
        }
    }
}

/// Client feedback with ratings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    pub ratings: Ratings,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// New feedback for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub message: String,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl NewFeedback {
    /// Check required fields: a message always, name and email for guests
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("Feedback message is required".to_string());
        }
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if self.user_id.is_none() && (blank(&self.name) || blank(&self.email)) {
            return Err("Name and email are required for guest feedback".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Service records
// ============================================================================

/// Lifecycle of a service record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "" => Ok(Self::Pending),
            "completed" | "complete" | "done" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown record status: {}", s)),
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad service grouping used by the dashboard breakdown chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    Columbarium,
    #[serde(rename = "Cremation Services")]
    CremationServices,
    #[serde(rename = "Funeral Service")]
    FuneralService,
    #[serde(rename = "Other Services")]
    OtherServices,
    Uncategorized,
}

impl ServiceCategory {
    /// Every category, in display order
    pub const ALL: [ServiceCategory; 5] = [
        Self::Columbarium,
        Self::CremationServices,
        Self::FuneralService,
        Self::OtherServices,
        Self::Uncategorized,
    ];

    /// Categorize a service by its name prefix
    pub fn from_service(service: &str) -> Self {
        let service = service.trim();
        Self::ALL
            .into_iter()
            .filter(|c| *c != Self::Uncategorized)
            .find(|c| service.starts_with(c.as_str()))
            .unwrap_or(Self::Uncategorized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Columbarium => "Columbarium",
            Self::CremationServices => "Cremation Services",
            Self::FuneralService => "Funeral Service",
            Self::OtherServices => "Other Services",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A service availed by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: i64,
    pub client_name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
    pub service: String,
    /// Date the service was scheduled or rendered
    pub date: NaiveDate,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

impl ServiceRecord {
    pub fn category(&self) -> ServiceCategory {
        ServiceCategory::from_service(&self.service)
    }
}

/// New service record for insertion or full update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewServiceRecord {
    pub client_name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
    pub service: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: RecordStatus,
}

impl NewServiceRecord {
    /// All text fields are required
    pub fn validate(&self) -> std::result::Result<(), String> {
        let fields = [
            &self.client_name,
            &self.email,
            &self.contact,
            &self.address,
            &self.service,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err("All fields are required".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Analytics sources
// ============================================================================

/// Which stream of business events an analytics request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Inquiries,
    Feedbacks,
    /// Completed service records
    Services,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inquiries => "inquiries",
            Self::Feedbacks => "feedbacks",
            Self::Services => "services",
        }
    }
}

impl std::str::FromStr for EventSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inquiries" | "inquiry" => Ok(Self::Inquiries),
            "feedbacks" | "feedback" => Ok(Self::Feedbacks),
            "services" | "service" | "records" => Ok(Self::Services),
            _ => Err(format!(
                "Unknown source: {}. Available: inquiries, feedbacks, services",
                s
            )),
        }
    }
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
