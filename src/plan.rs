//! Training plan generation
//!
//! Builds the week-by-week table counting down from today to the race
//! date: a linear distance ramp from the starting distance to the race
//! target, three sessions per week for the first two weeks and four
//! thereafter, with the final weeks flagged for tapering and race-week
//! load reduction. The plan is generated fresh on every invocation and is
//! never mutated afterwards; only the per-session completion marks change,
//! and those live in the preference store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, Result};
use crate::i18n::Language;

/// Ramp parameters for plan generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanParams {
    /// Weekly distance for the first training week (km)
    pub start_distance_km: Decimal,

    /// Weekly distance to reach by race week (km)
    pub target_distance_km: Decimal,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            start_distance_km: dec!(2),
            target_distance_km: dec!(6.5),
        }
    }
}

/// Session kinds, assigned by position within the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    Continuous,
    Intervals,
    Progressive,
    Long,
}

impl SessionKind {
    fn for_position(position: u32) -> Self {
        match position {
            1 => SessionKind::Continuous,
            2 => SessionKind::Intervals,
            3 => SessionKind::Progressive,
            _ => SessionKind::Long,
        }
    }

    /// Localized description of the session content
    pub fn description(&self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Es, SessionKind::Continuous) => "Carrera continua suave",
            (Language::Es, SessionKind::Intervals) => "Intervalos 1min rápido / 2min suave",
            (Language::Es, SessionKind::Progressive) => "Carrera a ritmo progresivo",
            (Language::Es, SessionKind::Long) => "Carrera larga y suave",
            (Language::En, SessionKind::Continuous) => "Easy continuous run",
            (Language::En, SessionKind::Intervals) => "Intervals 1min fast / 2min easy",
            (Language::En, SessionKind::Progressive) => "Progressive pace run",
            (Language::En, SessionKind::Long) => "Long easy run",
        }
    }
}

/// Training emphasis of a week within the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekPhase {
    /// Base building
    Building,
    /// Fine-tuning week before race week
    Tapering,
    /// Race week, reduced intensity
    Race,
}

impl WeekPhase {
    /// Localized description of the week's emphasis
    pub fn description(&self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Es, WeekPhase::Building) => "Construcción de base",
            (Language::Es, WeekPhase::Tapering) => "Semana de ajuste fino",
            (Language::Es, WeekPhase::Race) => "Semana de carrera - reducir intensidad",
            (Language::En, WeekPhase::Building) => "Base building",
            (Language::En, WeekPhase::Tapering) => "Tapering week",
            (Language::En, WeekPhase::Race) => "Race week - reduce intensity",
        }
    }
}

/// One planned session within a week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPlan {
    /// Stable identifier, the key for completion marks
    pub id: String,

    /// 1-based position within the week
    pub number: u32,

    /// Target distance for the session (km, one decimal)
    pub distance_km: Decimal,

    /// Session content
    pub kind: SessionKind,
}

/// One week of the plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    /// 1-based week number counting from today
    pub week: u32,

    /// Weekly target distance (km, one decimal)
    pub distance_km: Decimal,

    /// Training emphasis
    pub phase: WeekPhase,

    /// Planned sessions
    pub sessions: Vec<SessionPlan>,
}

/// Full countdown plan from today to the race date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub generated_on: NaiveDate,
    pub race_date: NaiveDate,
    pub days_until_race: i64,
    pub weeks: Vec<WeekPlan>,
}

impl TrainingPlan {
    pub fn weeks_until_race(&self) -> u32 {
        self.weeks.len() as u32
    }

    /// The active week. The plan counts down from today, so the first
    /// generated week is always the current one.
    pub fn current_week(&self) -> &WeekPlan {
        &self.weeks[0]
    }
}

/// Training plan generator
pub struct PlanGenerator;

impl PlanGenerator {
    /// Generate the countdown plan for `today` against a fixed race date
    pub fn generate(today: NaiveDate, race_date: NaiveDate, params: &PlanParams) -> Result<TrainingPlan> {
        let days_until_race = (race_date - today).num_days();
        let total_weeks = days_until_race / 7;

        if total_weeks < 1 {
            return Err(CalculationError::InvalidParameter {
                calculation: "training plan".to_string(),
                parameter: "race_date".to_string(),
                value: race_date.to_string(),
            }
            .into());
        }
        let total_weeks = total_weeks as u32;

        let increment = (params.target_distance_km - params.start_distance_km)
            / Decimal::from(total_weeks);

        let mut weeks = Vec::with_capacity(total_weeks as usize);
        for week in 1..=total_weeks {
            let mut distance = params.start_distance_km + increment * Decimal::from(week);
            if distance > params.target_distance_km {
                distance = params.target_distance_km;
            }
            let distance = distance.round_dp(1);

            let session_count = if week < 3 { 3 } else { 4 };
            let sessions = (1..=session_count)
                .map(|number| SessionPlan {
                    id: format!("week{}_session{}", week, number),
                    number,
                    distance_km: distance,
                    kind: SessionKind::for_position(number),
                })
                .collect();

            let phase = if week == total_weeks {
                WeekPhase::Race
            } else if week + 2 > total_weeks {
                WeekPhase::Tapering
            } else {
                WeekPhase::Building
            };

            weeks.push(WeekPlan {
                week,
                distance_km: distance,
                phase,
                sessions,
            });
        }

        Ok(TrainingPlan {
            generated_on: today,
            race_date,
            days_until_race,
            weeks,
        })
    }
}
