//! Suggestion Generator
//!
//! Maps trend statistics to advisory strings. Every rule is evaluated
//! independently and, when its condition holds, appends one suggestion:
//!
//! 1. Peak hour (work hours or evening)
//! 2. Weekend usage well above weekday usage
//! 3. Rising consumption trend
//! 4. High or moderate daily average
//! 5. Seasonal tips for the current month (always present)
//!
//! The seasonal rule reads the calendar date passed in by the caller, so the
//! output is a pure function of its inputs.

use chrono::{Datelike, NaiveDate, Timelike};
use tracing::{debug, warn};

use crate::models::Trends;

/// Weekend average must exceed the weekday average by this factor
pub const WEEKEND_SKEW_RATIO: f64 = 1.3;

/// Daily average (kWh) above which usage counts as high
pub const HIGH_USAGE_THRESHOLD: f64 = 20.0;

/// Daily average (kWh) above which usage counts as moderate
pub const MODERATE_USAGE_THRESHOLD: f64 = 10.0;

/// Season used for the seasonal tips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Season for a calendar month (1-12), northern hemisphere
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            12 | 1 | 2 => Season::Winter,
            _ => Season::Fall,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

fn peak_hour_suggestion(trends: &Trends) -> Option<String> {
    let hour = trends.peak_time.hour();
    match hour {
        9..=17 => Some(format!(
            "Your peak electricity usage occurs during work hours ({}:00). Recommendations:\n\
             - Use timers to run high-power appliances during off-peak hours\n\
             - Make the most of natural light to cut lighting costs\n\
             - Switch off idle equipment during lunch breaks",
            hour
        )),
        18..=22 => Some(format!(
            "Your peak electricity usage occurs in the evening ({}:00). Recommendations:\n\
             - Run the washing machine and dryer outside peak hours\n\
             - Enable energy-saving modes on household appliances\n\
             - Avoid running several high-power appliances at once",
            hour
        )),
        _ => None,
    }
}

fn weekend_suggestion(trends: &Trends) -> Option<String> {
    let (Some(weekday), Some(weekend)) = (trends.weekday_average, trends.weekend_average) else {
        warn!("Weekday or weekend average undefined, skipping weekend rule");
        return None;
    };
    if weekend <= weekday * WEEKEND_SKEW_RATIO {
        return None;
    }

    // Zero weekday usage has no meaningful ratio
    let by = if weekday > 0.0 {
        format!(" (by {:.1}%)", (weekend / weekday - 1.0) * 100.0)
    } else {
        String::new()
    };
    Some(format!(
        "Weekend consumption is significantly higher than on weekdays{}. Recommendations:\n\
         - Avoid running several high-power appliances at once on weekends\n\
         - Plan household chores around peak hours\n\
         - Make the most of natural light and ventilation",
        by
    ))
}

fn trend_suggestion(trends: &Trends) -> Option<String> {
    if trends.consumption_trend > 0.0 {
        Some(
            "Your electricity consumption shows an increasing trend. Recommendations:\n\
             - Check for standby power draw\n\
             - Consider upgrading to energy-efficient appliances\n\
             - Use smart plugs to monitor usage"
                .to_string(),
        )
    } else {
        None
    }
}

fn level_suggestion(trends: &Trends) -> Option<String> {
    if trends.daily_average > HIGH_USAGE_THRESHOLD {
        Some(
            "Your daily average consumption is high. Consider these measures:\n\
             - Use inverter air conditioners that adapt to the temperature\n\
             - Monitor and cut standby power with smart plugs\n\
             - Consider installing a renewable energy system\n\
             - Service electrical appliances regularly"
                .to_string(),
        )
    } else if trends.daily_average > MODERATE_USAGE_THRESHOLD {
        Some(
            "Your electricity consumption is moderate. Further savings are possible by:\n\
             - Switching to LED lighting\n\
             - Keeping the AC at 26°C or above in summer\n\
             - Making the most of natural ventilation\n\
             - Turning off lights in unused rooms"
                .to_string(),
        )
    } else {
        None
    }
}

fn seasonal_suggestion(season: Season) -> String {
    match season {
        Season::Summer => "Summer energy-saving tips:\n\
             - Draw curtains to block direct sunlight\n\
             - Clean AC filters regularly\n\
             - Use the AC timer to avoid running it all night\n\
             - Keep the AC at 26°C or above",
        Season::Winter => "Winter energy-saving tips:\n\
             - Use heating equipment efficiently\n\
             - Check window and door seals for heat loss\n\
             - Manage heating with a smart thermostat\n\
             - Let in natural sunlight for warmth",
        Season::Spring => "Spring energy-saving tips:\n\
             - Make the most of natural ventilation\n\
             - Use dehumidifiers efficiently\n\
             - Ventilate at the right times of day",
        Season::Fall => "Fall energy-saving tips:\n\
             - Turn off the AC and ventilate naturally when possible\n\
             - Adjust appliance use to the weather\n\
             - Prepare insulation for the cold months",
    }
    .to_string()
}

/// Generate suggestions for `trends`, using `today` for the seasonal rule
pub fn generate_suggestions(trends: &Trends, today: NaiveDate) -> Vec<String> {
    let season = Season::from_month(today.month());

    let mut suggestions: Vec<String> = [
        peak_hour_suggestion(trends),
        weekend_suggestion(trends),
        trend_suggestion(trends),
        level_suggestion(trends),
    ]
    .into_iter()
    .flatten()
    .collect();
    suggestions.push(seasonal_suggestion(season));

    debug!(
        count = suggestions.len(),
        season = season.as_str(),
        "Generated suggestions"
    );
    suggestions
}
