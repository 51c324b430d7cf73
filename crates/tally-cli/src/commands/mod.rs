//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database init and shared utilities (open_db)
//! - `import` - CSV import of service records
//! - `reports` - Trend, summary, forecast, insight, KPI and service reports
//! - `serve` - Web server command

pub mod core;
pub mod import;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
