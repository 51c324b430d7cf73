//! Dashboard pipeline - fetches records for a window and runs them through
//! the analytics transforms

use chrono::{Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use super::forecast::{forecast, ForecastResult};
use super::insight::{
    classify_growth, classify_share, shares_from_counts, GrowthBand, Recommendation, ShareInsight,
};
use super::kpi::{average_field, top_n, GroupCount};
use super::trend::{aggregate, Series};
use super::record::EventRecord;
use super::window::{resolve, Granularity, Period, TimeWindow};
use crate::db::Database;
use crate::error::Result;
use crate::models::{EventSource, Ratings, RecordStatus, ServiceCategory, ServiceRecord};

/// How many services the top-services chart shows
pub const TOP_SERVICES_LIMIT: usize = 5;

/// Placeholder shown when no service has been completed yet
pub const NO_TOP_SERVICE: &str = "N/A";

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.2}", value))
}

/// Total count for a source in a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u64,
}

/// Forecast in the shape the dashboard charts consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub last_period: f64,
    pub forecast: f64,
    /// Growth rate percent, fixed to 2 decimals
    pub growth_rate: String,
}

impl From<ForecastResult> for ForecastReport {
    fn from(result: ForecastResult) -> Self {
        Self {
            last_period: result.last_value,
            forecast: result.predicted_next,
            growth_rate: format!("{:.2}", result.growth_rate_percent),
        }
    }
}

/// Forecast plus its growth band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthInsight {
    #[serde(flatten)]
    pub forecast: ForecastReport,
    pub band: GrowthBand,
    pub recommendation: Recommendation,
}

/// Average rating per feedback category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageRatings {
    #[serde(serialize_with = "two_decimals")]
    pub overall: f64,
    #[serde(serialize_with = "two_decimals")]
    pub service: f64,
    #[serde(serialize_with = "two_decimals")]
    pub satisfaction: f64,
    #[serde(serialize_with = "two_decimals")]
    pub professionalism: f64,
    #[serde(serialize_with = "two_decimals")]
    pub communication: f64,
    #[serde(serialize_with = "two_decimals")]
    pub facility: f64,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total_inquiries: u64,
    pub total_feedbacks: u64,
    pub total_services: u64,
    pub top_service: String,
    pub avg_ratings: AverageRatings,
}

/// One slice of the service category breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: ServiceCategory,
    pub total: u64,
    /// Percent of all completed services
    pub share: f64,
}

/// Completed services by category with the categorical insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBreakdown {
    pub categories: Vec<CategoryShare>,
    pub insight: ShareInsight,
    /// Category flagged as trailing, if any
    pub flagged_category: Option<ServiceCategory>,
}

/// Runs analytics against the database, anchored at a fixed "now"
pub struct Dashboard<'a> {
    db: &'a Database,
    now: NaiveDateTime,
}

impl<'a> Dashboard<'a> {
    pub fn new(db: &'a Database, now: NaiveDateTime) -> Self {
        Self { db, now }
    }

    /// Dashboard anchored at the current UTC time
    pub fn current(db: &'a Database) -> Self {
        Self::new(db, Utc::now().naive_utc())
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Resolve a period against this dashboard's "now"
    pub fn window(
        &self,
        period: Period,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<TimeWindow> {
        resolve(period, self.now, start, end)
    }

    /// Bucketed counts for a source over a window
    pub fn trend(&self, source: EventSource, window: &TimeWindow) -> Result<Series> {
        let series = match source {
            EventSource::Inquiries => {
                let records = self.db.list_inquiries_between(window.start, window.end)?;
                aggregate(&records, window)?
            }
            EventSource::Feedbacks => {
                let records = self.db.list_feedback_between(window.start, window.end)?;
                aggregate(&records, window)?
            }
            EventSource::Services => {
                let records = self.completed_services(Some(window))?;
                aggregate(&records, window)?
            }
        };

        debug!(
            source = source.as_str(),
            start = %window.start,
            end = %window.end,
            buckets = series.len(),
            total = series.total(),
            "Trend aggregated"
        );

        Ok(series)
    }

    /// Number of records of a source inside a window
    pub fn total(&self, source: EventSource, window: &TimeWindow) -> Result<Summary> {
        window.validate()?;
        let total = match source {
            EventSource::Inquiries => self.db.count_inquiries_between(window.start, window.end)?,
            EventSource::Feedbacks => self.db.count_feedback_between(window.start, window.end)?,
            EventSource::Services => self.db.count_records_between(
                window.start,
                window.end,
                Some(RecordStatus::Completed),
            )?,
        };
        Ok(Summary { total })
    }

    /// Next-period forecast over a source's trend
    pub fn forecast(&self, source: EventSource, window: &TimeWindow) -> Result<ForecastReport> {
        Ok(self.forecast_result(source, window)?.into())
    }

    /// Forecast with its growth band and recommendation
    pub fn growth_insight(
        &self,
        source: EventSource,
        window: &TimeWindow,
    ) -> Result<GrowthInsight> {
        let result = self.forecast_result(source, window)?;
        let band = classify_growth(result.growth_rate_percent);
        Ok(GrowthInsight {
            forecast: result.into(),
            band,
            recommendation: band.recommendation(),
        })
    }

    fn forecast_result(&self, source: EventSource, window: &TimeWindow) -> Result<ForecastResult> {
        let series = self.trend(source, window)?;
        forecast(&series.values())
    }

    /// All-time headline numbers
    pub fn kpis(&self) -> Result<DashboardKpis> {
        let total_inquiries = self.db.count_inquiries()?;
        let total_feedbacks = self.db.count_feedback()?;
        let services = self.completed_services(None)?;

        let top_service = top_n(&services, "service", 1)
            .into_iter()
            .next()
            .map(|g| g.name)
            .unwrap_or_else(|| NO_TOP_SERVICE.to_string());

        let feedback = self.db.list_feedback()?;
        let avg = |field: &str| average_field(&feedback, field).average;
        let [overall, service, satisfaction, professionalism, communication, facility] =
            Ratings::FIELDS;

        Ok(DashboardKpis {
            total_inquiries,
            total_feedbacks,
            total_services: services.len() as u64,
            top_service,
            avg_ratings: AverageRatings {
                overall: avg(overall),
                service: avg(service),
                satisfaction: avg(satisfaction),
                professionalism: avg(professionalism),
                communication: avg(communication),
                facility: avg(facility),
            },
        })
    }

    /// Most frequently completed services, optionally within a window
    pub fn top_services(&self, window: Option<&TimeWindow>, n: usize) -> Result<Vec<GroupCount>> {
        let services = self.completed_services(window)?;
        Ok(top_n(&services, "service", n))
    }

    /// Monthly completed services from the first completed service to now.
    ///
    /// `None` when nothing has been completed yet.
    pub fn service_history(&self) -> Result<Option<Series>> {
        let services = self.completed_services(None)?;
        let dates = services.iter().map(|r| r.occurred_at().date());
        let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) else {
            return Ok(None);
        };

        let start = first.with_day(1).unwrap_or(first);
        let end = last.max(self.now.date());
        let window = TimeWindow::new(start, end, Granularity::Month)?;
        Ok(Some(aggregate(&services, &window)?))
    }

    /// Completed services grouped by category, with the share insight
    pub fn service_breakdown(&self, window: Option<&TimeWindow>) -> Result<ServiceBreakdown> {
        let services = self.completed_services(window)?;

        let mut counts: Vec<(ServiceCategory, u64)> =
            ServiceCategory::ALL.iter().map(|c| (*c, 0)).collect();
        for record in &services {
            let category = record.category();
            if let Some(slot) = counts.iter_mut().find(|(c, _)| *c == category) {
                slot.1 += 1;
            }
        }
        // Uncategorized only matters when something actually landed there
        counts.retain(|(c, n)| *c != ServiceCategory::Uncategorized || *n > 0);
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let totals: Vec<u64> = counts.iter().map(|(_, n)| *n).collect();
        let shares = shares_from_counts(&totals);
        let insight = classify_share(&shares);

        let categories: Vec<CategoryShare> = counts
            .iter()
            .zip(&shares)
            .map(|((category, total), share)| CategoryShare {
                category: *category,
                total: *total,
                share: *share,
            })
            .collect();
        let flagged_category = insight.flagged.map(|i| categories[i].category);

        Ok(ServiceBreakdown {
            categories,
            insight,
            flagged_category,
        })
    }

    fn completed_services(&self, window: Option<&TimeWindow>) -> Result<Vec<ServiceRecord>> {
        match window {
            Some(w) => {
                w.validate()?;
                self.db
                    .list_records_between(w.start, w.end, Some(RecordStatus::Completed))
            }
            None => self.db.list_records(Some(RecordStatus::Completed)),
        }
    }
}
