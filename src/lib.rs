// Library interface for the raceday modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod display;
pub mod error;
pub mod geo;
pub mod i18n;
pub mod logging;
pub mod models;
pub mod plan;
pub mod route;
pub mod session;
pub mod source;
pub mod store;
pub mod tracker;
pub mod warmup;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{RaceDayError, Result};
pub use i18n::Language;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use plan::{PlanGenerator, PlanParams, TrainingPlan};
pub use session::{RunEvent, RunSession, SessionPhase};
pub use source::{PositionEvent, PositionSource, ReplaySource, SourceOptions};
pub use tracker::{RunTracker, SampleOutcome, TrackerConfig};
pub use warmup::WarmupSequencer;
