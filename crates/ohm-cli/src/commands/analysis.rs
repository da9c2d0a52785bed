//! Analysis command implementations (analyze, trends, forecast, suggest, dashboard)

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use ohm_core::{
    analyze_consumption, analyze_trends, build_dashboard, generate_suggestions, AnalysisReport,
    OutputFormat, SavingsPoint, Trends,
};

use super::core::{print_json, read_file, RunContext};

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn cmd_analyze(ctx: &RunContext, file: &Path) -> Result<()> {
    let readings = read_file(ctx, file)?;
    let report = analyze_consumption(&readings, ctx.today).context("Analysis failed")?;

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", render_report(&report));
            Ok(())
        }
    }
}

pub fn cmd_trends(ctx: &RunContext, file: &Path) -> Result<()> {
    let readings = read_file(ctx, file)?;
    let trends = analyze_trends(&readings).context("Trend analysis failed")?;

    match ctx.format {
        OutputFormat::Json => print_json(&trends),
        OutputFormat::Text => {
            print!("{}", render_trends(&trends));
            Ok(())
        }
    }
}

pub fn cmd_forecast(ctx: &RunContext, file: &Path) -> Result<()> {
    let readings = read_file(ctx, file)?;
    let report = analyze_consumption(&readings, ctx.today).context("Forecast failed")?;

    match ctx.format {
        OutputFormat::Json => print_json(&report.savings_predictions),
        OutputFormat::Text => {
            print!("{}", render_forecast(&report.savings_predictions));
            Ok(())
        }
    }
}

pub fn cmd_suggest(ctx: &RunContext, file: &Path) -> Result<()> {
    let readings = read_file(ctx, file)?;
    let trends = analyze_trends(&readings).context("Trend analysis failed")?;
    let suggestions = generate_suggestions(&trends, ctx.today);

    match ctx.format {
        OutputFormat::Json => print_json(&suggestions),
        OutputFormat::Text => {
            print!("{}", render_suggestions(&suggestions));
            Ok(())
        }
    }
}

pub fn cmd_dashboard(ctx: &RunContext, file: &Path) -> Result<()> {
    let readings = read_file(ctx, file)?;
    let dashboard = build_dashboard(&readings, ctx.today).context("Dashboard failed")?;

    match ctx.format {
        OutputFormat::Json => print_json(&dashboard),
        OutputFormat::Text => {
            println!("{}", dashboard.message);
            if let Some(data) = &dashboard.data {
                println!("   Readings: {}", data.len());
                if let (Some(first), Some(last)) = (data.first(), data.last()) {
                    println!("   Range: {} to {}", first.date, last.date);
                }
            }
            if let Some(report) = &dashboard.analysis {
                println!();
                print!("{}", render_report(report));
            }
            Ok(())
        }
    }
}

/// Text rendering of the full report
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = render_trends(&report.trends);
    out.push('\n');
    out.push_str(&render_suggestions(&report.suggestions));
    out.push('\n');
    out.push_str(&render_forecast(&report.savings_predictions));
    out
}

pub fn render_trends(trends: &Trends) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Consumption Trends");
    let _ = writeln!(out, "   Daily average: {:.2} kWh", trends.daily_average);
    let _ = writeln!(
        out,
        "   Peak usage:    {:.2} kWh on {}",
        trends.peak_usage,
        trends.peak_time.format("%Y-%m-%d")
    );
    let _ = writeln!(out, "   Trend:         {:+.4} kWh/day", trends.consumption_trend);
    let _ = writeln!(
        out,
        "   Weekday avg:   {}",
        format_optional(trends.weekday_average)
    );
    let _ = writeln!(
        out,
        "   Weekend avg:   {}",
        format_optional(trends.weekend_average)
    );

    out.push('\n');
    let _ = writeln!(out, "   {:<6} {:>10}", "DAY", "AVG kWh");
    let _ = writeln!(out, "   {}", "-".repeat(17));
    for (day, avg) in &trends.weekly_pattern {
        let name = DAY_NAMES.get(*day as usize).copied().unwrap_or("?");
        let _ = writeln!(out, "   {:<6} {:>10.2}", name, avg);
    }

    out.push('\n');
    let _ = writeln!(out, "   {:<10} {:>10}", "MONTH", "AVG kWh");
    let _ = writeln!(out, "   {}", "-".repeat(21));
    for (month_end, avg) in &trends.monthly_trend {
        let _ = writeln!(
            out,
            "   {:<10} {:>10}",
            month_end.format("%Y-%m"),
            format_optional(*avg)
        );
    }
    out
}

pub fn render_suggestions(suggestions: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "💡 Suggestions ({})", suggestions.len());
    for suggestion in suggestions {
        let _ = writeln!(out, "   - {}", suggestion);
    }
    out
}

pub fn render_forecast(points: &[SavingsPoint]) -> String {
    let mut out = String::new();
    let total: f64 = points.iter().map(|p| p.predicted_consumption).sum();
    let total_saving: f64 = points.iter().map(|p| p.savings_prediction).sum();

    let _ = writeln!(out, "🔮 Forecast ({} days)", points.len());
    let _ = writeln!(
        out,
        "   {:<12} {:>12} {:>12}",
        "DATE", "PREDICTED", "WITH SAVINGS"
    );
    let _ = writeln!(out, "   {}", "-".repeat(38));
    for point in points {
        let _ = writeln!(
            out,
            "   {:<12} {:>12.2} {:>12.2}",
            point.date.format("%Y-%m-%d"),
            point.predicted_consumption,
            point.savings_prediction
        );
    }
    let _ = writeln!(out, "   {}", "-".repeat(38));
    let _ = writeln!(out, "   {:<12} {:>12.2} {:>12.2}", "TOTAL", total, total_saving);
    out
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2} kWh", v),
        None => "n/a".to_string(),
    }
}
