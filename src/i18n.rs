//! Display language support
//!
//! Two languages are supported, matching the persisted two-letter code in
//! the preference store. Label lookups are total functions so a missing
//! translation can never panic at render time.

use serde::{Deserialize, Serialize};

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
}

impl Default for Language {
    fn default() -> Self {
        Language::Es
    }
}

impl Language {
    /// Two-letter code as persisted in the preference store
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    /// Parse a persisted two-letter code; unknown codes are rejected so a
    /// corrupted store value falls back to the default upstream
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "es" => Some(Language::Es),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(&s.to_lowercase()).ok_or_else(|| format!("Unknown language: {}", s))
    }
}

/// Fixed UI labels
pub struct Labels {
    pub days_until_race: &'static str,
    pub week: &'static str,
    pub session: &'static str,
    pub target_distance: &'static str,
    pub sessions: &'static str,
    pub warmup: &'static str,
    pub exercise: &'static str,
    pub of: &'static str,
    pub time: &'static str,
    pub distance: &'static str,
    pub max_speed: &'static str,
    pub avg_pace: &'static str,
    pub current_pace: &'static str,
    pub current_speed: &'static str,
    pub training_completed: &'static str,
    pub route_map: &'static str,
}

impl Language {
    pub fn labels(&self) -> Labels {
        match self {
            Language::Es => Labels {
                days_until_race: "días hasta la carrera",
                week: "Semana",
                session: "Sesión",
                target_distance: "Distancia objetivo",
                sessions: "Sesiones",
                warmup: "Calentamiento",
                exercise: "Ejercicio",
                of: "de",
                time: "Tiempo",
                distance: "Distancia",
                max_speed: "Velocidad máx",
                avg_pace: "Ritmo promedio",
                current_pace: "Ritmo actual",
                current_speed: "Velocidad actual",
                training_completed: "Entrenamiento Completado",
                route_map: "Ruta del Entrenamiento",
            },
            Language::En => Labels {
                days_until_race: "days until race",
                week: "Week",
                session: "Session",
                target_distance: "Target distance",
                sessions: "Sessions",
                warmup: "Warm-up",
                exercise: "Exercise",
                of: "of",
                time: "Time",
                distance: "Distance",
                max_speed: "Max speed",
                avg_pace: "Average pace",
                current_pace: "Current pace",
                current_speed: "Current speed",
                training_completed: "Training Completed",
                route_map: "Training Route",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for lang in [Language::Es, Language::En] {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(Language::from_code("fr"), None);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_code() {
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    }
}
