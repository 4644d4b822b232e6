//! Warm-up countdown sequencer
//!
//! A fixed list of named, timed exercises walked at one tick per second.
//! The sequencer auto-advances when an exercise's countdown reaches zero
//! and reports completion after the final exercise.

use serde::Serialize;

use crate::i18n::Language;

/// One warm-up exercise with its countdown duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarmupExercise {
    pub name: &'static str,
    pub duration_seconds: u32,
    pub description: &'static str,
}

const EXERCISES_ES: &[WarmupExercise] = &[
    WarmupExercise { name: "Rotación de tobillos", duration_seconds: 30, description: "30 segundos - círculos con ambos tobillos" },
    WarmupExercise { name: "Rotación de rodillas", duration_seconds: 30, description: "30 segundos - círculos suaves" },
    WarmupExercise { name: "Rotación de cadera", duration_seconds: 30, description: "30 segundos - círculos amplios" },
    WarmupExercise { name: "Círculos de brazos", duration_seconds: 30, description: "30 segundos - adelante y atrás" },
    WarmupExercise { name: "Estiramiento de cuádriceps", duration_seconds: 30, description: "30 segundos - mantener cada pierna" },
    WarmupExercise { name: "Estiramiento de gemelos", duration_seconds: 30, description: "30 segundos - ambas piernas" },
    WarmupExercise { name: "Caminar ligero", duration_seconds: 120, description: "2 minutos caminando a paso ligero" },
    WarmupExercise { name: "Elevación de rodillas", duration_seconds: 45, description: "45 segundos - marcha en el sitio" },
    WarmupExercise { name: "Talones al glúteo", duration_seconds: 45, description: "45 segundos - alternando piernas" },
    WarmupExercise { name: "Zancadas dinámicas", duration_seconds: 60, description: "1 minuto - 10 repeticiones" },
    WarmupExercise { name: "Trote suave", duration_seconds: 180, description: "3 minutos a ritmo muy suave" },
];

const EXERCISES_EN: &[WarmupExercise] = &[
    WarmupExercise { name: "Ankle rotations", duration_seconds: 30, description: "30 seconds - circles with both ankles" },
    WarmupExercise { name: "Knee rotations", duration_seconds: 30, description: "30 seconds - gentle circles" },
    WarmupExercise { name: "Hip rotations", duration_seconds: 30, description: "30 seconds - wide circles" },
    WarmupExercise { name: "Arm circles", duration_seconds: 30, description: "30 seconds - forward and back" },
    WarmupExercise { name: "Quad stretch", duration_seconds: 30, description: "30 seconds - hold each leg" },
    WarmupExercise { name: "Calf stretch", duration_seconds: 30, description: "30 seconds - both legs" },
    WarmupExercise { name: "Light walking", duration_seconds: 120, description: "2 minutes walking at brisk pace" },
    WarmupExercise { name: "Knee raises", duration_seconds: 45, description: "45 seconds - march in place" },
    WarmupExercise { name: "Heel to glute", duration_seconds: 45, description: "45 seconds - alternating legs" },
    WarmupExercise { name: "Dynamic lunges", duration_seconds: 60, description: "1 minute - 10 repetitions" },
    WarmupExercise { name: "Easy jog", duration_seconds: 180, description: "3 minutes at very easy pace" },
];

/// The warm-up routine for a display language
pub fn exercises(lang: Language) -> &'static [WarmupExercise] {
    match lang {
        Language::Es => EXERCISES_ES,
        Language::En => EXERCISES_EN,
    }
}

/// Result of one sequencer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupTick {
    /// Countdown decremented within the current exercise
    CountedDown,
    /// Current exercise finished, moved to the next one
    Advanced,
    /// The final exercise finished
    Finished,
    /// Paused or already finished, nothing changed
    Idle,
}

/// Countdown state machine over the exercise list
pub struct WarmupSequencer {
    exercises: &'static [WarmupExercise],
    index: usize,
    remaining_seconds: u32,
    paused: bool,
    finished: bool,
}

impl WarmupSequencer {
    pub fn new(lang: Language) -> Self {
        let exercises = exercises(lang);
        Self {
            exercises,
            index: 0,
            remaining_seconds: exercises[0].duration_seconds,
            paused: false,
            finished: false,
        }
    }

    /// The exercise currently counting down, `None` once finished
    pub fn current(&self) -> Option<&'static WarmupExercise> {
        if self.finished {
            None
        } else {
            Some(&self.exercises[self.index])
        }
    }

    /// 0-based index of the current exercise
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Fraction of the current exercise already elapsed, in [0, 1]
    pub fn progress(&self) -> f64 {
        match self.current() {
            Some(exercise) => {
                let done = exercise.duration_seconds - self.remaining_seconds;
                f64::from(done) / f64::from(exercise.duration_seconds)
            }
            None => 1.0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Total routine duration in seconds
    pub fn total_seconds(&self) -> u32 {
        self.exercises.iter().map(|e| e.duration_seconds).sum()
    }

    /// Advance the countdown by one second
    pub fn on_tick(&mut self) -> WarmupTick {
        if self.paused || self.finished {
            return WarmupTick::Idle;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds > 0 {
            return WarmupTick::CountedDown;
        }

        if self.index + 1 < self.exercises.len() {
            self.index += 1;
            self.remaining_seconds = self.exercises[self.index].duration_seconds;
            WarmupTick::Advanced
        } else {
            self.finished = true;
            WarmupTick::Finished
        }
    }
}
