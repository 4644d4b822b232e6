//! Terminal presentation
//!
//! The formatting contracts (`format_time`, `format_pace`) are pure
//! functions shared by every surface that prints a duration or a pace.
//! A pace that is undefined, non-finite, or non-positive always renders
//! as the `--:--` placeholder; NaN or infinity never reaches the screen.

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::i18n::Language;
use crate::models::{CompletionMark, RunState, RunSummary};
use crate::plan::{TrainingPlan, WeekPlan};
use std::collections::HashMap;

/// Rendered in place of a pace that is not defined
pub const PACE_PLACEHOLDER: &str = "--:--";

/// Render a duration as `H:MM:SS` when hours are present, else `M:SS`
pub fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Render a pace in min/km as `M:SS`, or the placeholder when undefined
pub fn format_pace(pace: Option<f64>) -> String {
    let Some(pace) = pace else {
        return PACE_PLACEHOLDER.to_string();
    };
    if !pace.is_finite() || pace <= 0.0 {
        return PACE_PLACEHOLDER.to_string();
    }

    let minutes = pace.floor();
    let seconds = ((pace - minutes) * 60.0).floor();
    format!("{}:{:02}", minutes as u64, seconds as u64)
}

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "")]
    week: String,
    #[tabled(rename = "km")]
    distance: String,
    #[tabled(rename = "")]
    sessions: String,
    #[tabled(rename = "")]
    phase: String,
}

/// The full plan as a week-per-row table
pub fn plan_table(
    plan: &TrainingPlan,
    lang: Language,
    marks: &HashMap<String, CompletionMark>,
) -> String {
    let labels = lang.labels();
    let rows: Vec<WeekRow> = plan
        .weeks
        .iter()
        .map(|week| {
            let done = week
                .sessions
                .iter()
                .filter(|s| marks.get(&s.id) == Some(&CompletionMark::Done))
                .count();
            WeekRow {
                week: format!("{} {}", labels.week, week.week),
                distance: week.distance_km.to_string(),
                sessions: format!("{}/{}", done, week.sessions.len()),
                phase: week.phase.description(lang).to_string(),
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "")]
    name: String,
    #[tabled(rename = "km")]
    distance: String,
    #[tabled(rename = "")]
    description: String,
    #[tabled(rename = "")]
    mark: String,
}

fn mark_symbol(mark: CompletionMark) -> String {
    match mark {
        CompletionMark::Done => "✓".green().to_string(),
        CompletionMark::Skipped => "✗".red().to_string(),
        CompletionMark::Pending => "·".dimmed().to_string(),
    }
}

/// One week's sessions with their completion marks
pub fn session_table(
    week: &WeekPlan,
    lang: Language,
    marks: &HashMap<String, CompletionMark>,
) -> String {
    let labels = lang.labels();
    let rows: Vec<SessionRow> = week
        .sessions
        .iter()
        .map(|session| SessionRow {
            id: session.id.clone(),
            name: format!("{} {}", labels.session, session.number),
            distance: session.distance_km.to_string(),
            description: session.kind.description(lang).to_string(),
            mark: mark_symbol(marks.get(&session.id).copied().unwrap_or_default()),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// One-line live view of the run in progress, for the replay display
pub fn live_line(state: &RunState, lang: Language) -> String {
    let labels = lang.labels();
    format!(
        "{} {}  |  {} {:.2} km  |  {} {} min/km  |  {} {} min/km  |  {} {:.1} km/h",
        labels.time,
        format_time(state.elapsed_seconds),
        labels.distance,
        state.distance_km,
        labels.avg_pace,
        format_pace(state.avg_pace_min_per_km),
        labels.current_pace,
        format_pace(state.current_pace_min_per_km),
        labels.current_speed,
        state.current_speed_kmh,
    )
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "")]
    label: String,
    #[tabled(rename = "")]
    value: String,
}

/// The frozen post-run summary
pub fn summary_table(summary: &RunSummary, lang: Language) -> String {
    let labels = lang.labels();
    let rows = vec![
        SummaryRow {
            label: labels.distance.to_string(),
            value: format!("{:.2} km", summary.distance_km),
        },
        SummaryRow {
            label: labels.time.to_string(),
            value: format_time(summary.duration_seconds),
        },
        SummaryRow {
            label: labels.avg_pace.to_string(),
            value: format!("{} min/km", format_pace(summary.avg_pace_min_per_km)),
        },
        SummaryRow {
            label: labels.max_speed.to_string(),
            value: format!("{:.1} km/h", summary.max_speed_kmh),
        },
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_minutes() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(125), "2:05");
        assert_eq!(format_time(3599), "59:59");
    }

    #[test]
    fn test_format_time_hours() {
        assert_eq!(format_time(3725), "1:02:05");
        assert_eq!(format_time(3600), "1:00:00");
    }

    #[test]
    fn test_format_pace_value() {
        assert_eq!(format_pace(Some(5.5)), "5:30");
        assert_eq!(format_pace(Some(4.25)), "4:15");
    }

    #[test]
    fn test_format_pace_placeholder_cases() {
        assert_eq!(format_pace(None), PACE_PLACEHOLDER);
        assert_eq!(format_pace(Some(f64::INFINITY)), PACE_PLACEHOLDER);
        assert_eq!(format_pace(Some(f64::NAN)), PACE_PLACEHOLDER);
        assert_eq!(format_pace(Some(-1.0)), PACE_PLACEHOLDER);
        assert_eq!(format_pace(Some(0.0)), PACE_PLACEHOLDER);
    }

    #[test]
    fn test_plan_table_contains_weeks() {
        use crate::plan::{PlanGenerator, PlanParams};
        use chrono::NaiveDate;

        let plan = PlanGenerator::generate(
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            &PlanParams::default(),
        )
        .unwrap();

        let table = plan_table(&plan, Language::En, &HashMap::new());
        assert!(table.contains("Week 1"));
        assert!(table.contains("6.5"));
        assert!(table.contains("0/4"));
    }

    #[test]
    fn test_live_line_uses_placeholder_before_distance() {
        use crate::models::RunState;
        let state = RunState::at_start(0);
        let line = live_line(&state, Language::En);
        assert!(line.contains(PACE_PLACEHOLDER));
        assert!(!line.contains("NaN"));
        assert!(!line.contains("inf"));
    }
}
