//! Report command implementations

use anyhow::{anyhow, Result};
use serde::Serialize;
use tally_core::analytics::dashboard::TOP_SERVICES_LIMIT;
use tally_core::analytics::window::{Period, TimeWindow};
use tally_core::db::Database;
use tally_core::models::EventSource;
use tally_core::Dashboard;

use super::truncate;
use crate::cli::WindowArgs;

/// Parse a source name (inquiries, feedbacks, services)
pub fn parse_source(source: &str) -> Result<EventSource> {
    source.parse().map_err(|e: String| anyhow!(e))
}

/// Resolve the period/start/end flags against the dashboard's "now"
pub fn resolve_window(dashboard: &Dashboard<'_>, args: &WindowArgs) -> Result<TimeWindow> {
    let period: Period = args.period.parse()?;
    Ok(dashboard.window(period, args.start.as_deref(), args.end.as_deref())?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_header(title: &str, window: &TimeWindow) {
    println!();
    println!("{}", title);
    println!(
        "   Window: {} to {} ({})",
        window.start,
        window.end,
        window.granularity.as_str()
    );
    println!("   ─────────────────────────────────────────────");
}

pub fn cmd_report_trend(db: &Database, source: &str, args: &WindowArgs, json: bool) -> Result<()> {
    let source = parse_source(source)?;
    let dashboard = Dashboard::current(db);
    let window = resolve_window(&dashboard, args)?;
    let series = dashboard.trend(source, &window)?;

    if json {
        return print_json(&series.buckets);
    }

    print_header(&format!("📈 {} trend", source), &window);
    println!("   {:12} │ {:>7}", "Bucket", "Count");
    println!("   ─────────────┼────────");
    for bucket in &series.buckets {
        println!("   {:12} │ {:>7}", bucket.label, bucket.count);
    }
    println!("   ─────────────┼────────");
    println!("   {:12} │ {:>7}", "Total", series.total());

    Ok(())
}

pub fn cmd_report_summary(
    db: &Database,
    source: &str,
    args: &WindowArgs,
    json: bool,
) -> Result<()> {
    let source = parse_source(source)?;
    let dashboard = Dashboard::current(db);
    let window = resolve_window(&dashboard, args)?;
    let summary = dashboard.total(source, &window)?;

    if json {
        return print_json(&summary);
    }

    print_header(&format!("🧮 {} summary", source), &window);
    println!("   Total: {}", summary.total);

    Ok(())
}

pub fn cmd_report_forecast(
    db: &Database,
    source: &str,
    args: &WindowArgs,
    json: bool,
) -> Result<()> {
    let source = parse_source(source)?;
    let dashboard = Dashboard::current(db);
    let window = resolve_window(&dashboard, args)?;
    let report = dashboard.forecast(source, &window)?;

    if json {
        return print_json(&report);
    }

    print_header(&format!("🔮 {} forecast", source), &window);
    println!("   Last period:  {}", report.last_period);
    println!("   Next period:  {}", report.forecast);
    println!("   Growth rate:  {}%", report.growth_rate);

    Ok(())
}

pub fn cmd_report_insight(
    db: &Database,
    source: &str,
    args: &WindowArgs,
    json: bool,
) -> Result<()> {
    let source = parse_source(source)?;
    let dashboard = Dashboard::current(db);
    let window = resolve_window(&dashboard, args)?;
    let insight = dashboard.growth_insight(source, &window)?;

    if json {
        return print_json(&insight);
    }

    print_header(&format!("💡 {} insight", source), &window);
    println!("   Last period:    {}", insight.forecast.last_period);
    println!("   Next period:    {}", insight.forecast.forecast);
    println!("   Growth rate:    {}%", insight.forecast.growth_rate);
    println!("   Band:           {}", insight.band);
    println!("   Recommendation: {}", insight.recommendation);

    Ok(())
}

pub fn cmd_report_kpis(db: &Database, json: bool) -> Result<()> {
    let kpis = Dashboard::current(db).kpis()?;

    if json {
        return print_json(&kpis);
    }

    let r = &kpis.avg_ratings;
    println!();
    println!("📊 Dashboard KPIs");
    println!("   ─────────────────────────────────────────────");
    println!("   Inquiries:         {}", kpis.total_inquiries);
    println!("   Feedback entries:  {}", kpis.total_feedbacks);
    println!("   Completed services:{:>4}", kpis.total_services);
    println!("   Top service:       {}", kpis.top_service);
    println!();
    println!("   Average ratings");
    println!("     Overall          {:.2}", r.overall);
    println!("     Service          {:.2}", r.service);
    println!("     Satisfaction     {:.2}", r.satisfaction);
    println!("     Professionalism  {:.2}", r.professionalism);
    println!("     Communication    {:.2}", r.communication);
    println!("     Facility         {:.2}", r.facility);

    Ok(())
}

pub fn cmd_report_services(
    db: &Database,
    period: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    json: bool,
) -> Result<()> {
    let dashboard = Dashboard::current(db);
    let window = match period {
        Some(p) => {
            let args = WindowArgs {
                period: p.to_string(),
                start: start.map(str::to_string),
                end: end.map(str::to_string),
            };
            Some(resolve_window(&dashboard, &args)?)
        }
        None => None,
    };

    let top = dashboard.top_services(window.as_ref(), TOP_SERVICES_LIMIT)?;
    let breakdown = dashboard.service_breakdown(window.as_ref())?;

    if json {
        return print_json(&serde_json::json!({
            "topServices": top,
            "breakdown": breakdown,
        }));
    }

    println!();
    println!("⚱️  Completed services");
    match &window {
        Some(w) => println!("   Window: {} to {}", w.start, w.end),
        None => println!("   Window: all time"),
    }
    println!("   ─────────────────────────────────────────────");

    if top.is_empty() {
        println!("   No completed services found.");
        return Ok(());
    }

    println!("   {:30} │ {:>5}", "Service", "Count");
    println!("   ───────────────────────────────┼──────");
    for group in &top {
        println!("   {:30} │ {:>5}", truncate(&group.name, 30), group.total);
    }

    println!();
    println!("   {:22} │ {:>5} │ {:>6}", "Category", "Count", "%");
    println!("   ───────────────────────┼───────┼───────");
    for slice in &breakdown.categories {
        println!(
            "   {:22} │ {:>5} │ {:>5.1}%",
            slice.category.as_str(),
            slice.total,
            slice.share
        );
    }

    println!();
    println!("   Band:           {}", breakdown.insight.band);
    println!("   Recommendation: {}", breakdown.insight.recommendation);
    if let Some(category) = breakdown.flagged_category {
        println!("   Trailing:       {}", category);
    }

    Ok(())
}
