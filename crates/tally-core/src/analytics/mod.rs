//! Analytics: aggregation, forecasting and insight bands
//!
//! A pipeline of pure transforms over already-fetched records:
//!
//! - **window** - resolves a period token into a dated window + granularity
//! - **trend** - buckets records into a gap-free chronological series
//! - **kpi** - counts, field averages and top-N groupings
//! - **forecast** - smoothing + least squares one-step projection
//! - **insight** - growth and share bands with canned recommendations
//!
//! `dashboard` wires these to the database for the HTTP and CLI surfaces.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::analytics::{aggregate, forecast, classify_growth, resolve, Period};
//!
//! let window = resolve(Period::Week, now, None, None)?;
//! let series = aggregate(&inquiries, &window)?;
//! let result = forecast(&series.values())?;
//! let band = classify_growth(result.growth_rate_percent);
//! ```

pub mod dashboard;
pub mod forecast;
pub mod insight;
pub mod kpi;
pub mod record;
pub mod trend;
pub mod window;

pub use dashboard::{
    AverageRatings, CategoryShare, Dashboard, DashboardKpis, ForecastReport, GrowthInsight,
    ServiceBreakdown, Summary,
};
pub use forecast::{forecast, linear_fit, smooth, ForecastResult, LinearFit};
pub use insight::{
    classify_growth, classify_share, shares_from_counts, GrowthBand, Recommendation, ShareBand,
    ShareInsight,
};
pub use kpi::{
    average_field, group_counts, summarize, top_n, FieldAverage, GroupCount, KpiResult, KpiSpec,
};
pub use record::{AttrValue, Event, EventRecord};
pub use trend::{aggregate, Bucket, Series};
pub use window::{resolve, Granularity, Period, TimeWindow};
