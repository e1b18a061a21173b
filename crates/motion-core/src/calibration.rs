//! Timed baseline calibration.
//!
//! `Idle → Calibrating → Completed`, with `clear()` returning to `Idle`.
//! While calibrating, every angle sample is buffered; an external one-second
//! timer calls [`CalibrationSession::tick`] and the third tick closes the
//! window, producing the rounded mean as the baseline. The baseline only
//! exists inside `Completed`.

use serde::{Deserialize, Serialize};

use crate::constants::{CALIBRATION_COUNTDOWN, MAX_JOINT_ANGLE};
use crate::error::{MotionError, Result};
use crate::exercise::ExerciseDefinition;

/// Accept a baseline only if it is a reachable joint angle.
pub fn validate_baseline(angle: i32) -> Result<i32> {
    if (0..=MAX_JOINT_ANGLE).contains(&angle) {
        Ok(angle)
    } else {
        Err(MotionError::InvalidConfig(format!(
            "baseline angle must be in [0, {MAX_JOINT_ANGLE}], got {angle}"
        )))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CalibrationState {
    Idle,
    Calibrating { countdown: u8, samples: Vec<i32> },
    Completed { baseline_angle: i32 },
}

/// Discriminant of [`CalibrationState`] for events and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationPhase {
    Idle,
    Calibrating,
    Completed,
}

/// Observable calibration state, emitted on every transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSnapshot {
    pub exercise_id: String,
    pub state: CalibrationPhase,
    pub countdown: u8,
    pub baseline_angle: Option<i32>,
    pub current_angle: i32,
    pub sample_count: usize,
    pub loaded_from_store: bool,
}

#[derive(Clone, Debug)]
pub struct CalibrationSession {
    exercise: &'static ExerciseDefinition,
    state: CalibrationState,
    current_angle: i32,
    loaded_from_store: bool,
}

impl CalibrationSession {
    pub fn new(exercise: &'static ExerciseDefinition) -> Self {
        Self {
            exercise,
            state: CalibrationState::Idle,
            current_angle: 0,
            loaded_from_store: false,
        }
    }

    /// Session for a newly selected exercise: `Completed` when the caller
    /// holds a stored baseline for it, `Idle` otherwise. A stored baseline
    /// outside `0..=180` is rejected.
    pub fn resume(
        exercise: &'static ExerciseDefinition,
        stored_baseline: Option<i32>,
    ) -> Result<Self> {
        let mut session = Self::new(exercise);
        if let Some(angle) = stored_baseline {
            let baseline_angle = validate_baseline(angle)?;
            session.state = CalibrationState::Completed { baseline_angle };
            session.loaded_from_store = true;
        }
        Ok(session)
    }

    pub fn exercise(&self) -> &'static ExerciseDefinition {
        self.exercise
    }

    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    pub fn phase(&self) -> CalibrationPhase {
        match self.state {
            CalibrationState::Idle => CalibrationPhase::Idle,
            CalibrationState::Calibrating { .. } => CalibrationPhase::Calibrating,
            CalibrationState::Completed { .. } => CalibrationPhase::Completed,
        }
    }

    pub fn is_calibrating(&self) -> bool {
        matches!(self.state, CalibrationState::Calibrating { .. })
    }

    pub fn baseline(&self) -> Option<i32> {
        match self.state {
            CalibrationState::Completed { baseline_angle } => Some(baseline_angle),
            _ => None,
        }
    }

    /// Remaining ticks; the full countdown outside `Calibrating`.
    pub fn countdown(&self) -> u8 {
        match self.state {
            CalibrationState::Calibrating { countdown, .. } => countdown,
            CalibrationState::Idle => CALIBRATION_COUNTDOWN,
            CalibrationState::Completed { .. } => 0,
        }
    }

    pub fn current_angle(&self) -> i32 {
        self.current_angle
    }

    pub fn loaded_from_store(&self) -> bool {
        self.loaded_from_store
    }

    /// Begin (or restart) sampling. Any previous buffer or baseline is dropped.
    pub fn start(&mut self) {
        self.state = CalibrationState::Calibrating {
            countdown: CALIBRATION_COUNTDOWN,
            samples: Vec::new(),
        };
        self.current_angle = 0;
        self.loaded_from_store = false;
        tracing::debug!(exercise = self.exercise.id, "calibration started");
    }

    /// Buffer one angle sample. Ignored unless calibrating, so samples that
    /// race the final tick cannot leak into a finished session.
    pub fn add_sample(&mut self, angle: i32) -> bool {
        match &mut self.state {
            CalibrationState::Calibrating { samples, .. } => {
                samples.push(angle);
                self.current_angle = angle;
                true
            }
            _ => false,
        }
    }

    /// One countdown second. Returns the baseline when this tick completes
    /// the calibration.
    pub fn tick(&mut self) -> Option<i32> {
        let CalibrationState::Calibrating { countdown, samples } = &mut self.state else {
            return None;
        };
        *countdown = countdown.saturating_sub(1);
        if *countdown > 0 {
            return None;
        }

        let baseline_angle = if samples.is_empty() {
            tracing::info!(
                exercise = self.exercise.id,
                baseline = self.exercise.default_baseline_angle,
                "no calibration samples, using default baseline"
            );
            self.exercise.default_baseline_angle
        } else {
            let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64;
            let baseline = mean.round() as i32;
            tracing::info!(
                exercise = self.exercise.id,
                baseline,
                samples = samples.len(),
                "calibration completed"
            );
            baseline
        };
        self.state = CalibrationState::Completed { baseline_angle };
        Some(baseline_angle)
    }

    /// Complete immediately with the exercise's default baseline.
    pub fn skip(&mut self) -> i32 {
        let baseline_angle = self.exercise.default_baseline_angle;
        self.state = CalibrationState::Completed { baseline_angle };
        self.loaded_from_store = false;
        tracing::info!(
            exercise = self.exercise.id,
            baseline = baseline_angle,
            "calibration skipped, using default baseline"
        );
        baseline_angle
    }

    /// Forget the baseline and return to `Idle`. Invalidating any persisted
    /// copy is up to the caller.
    pub fn clear(&mut self) {
        self.state = CalibrationState::Idle;
        self.current_angle = 0;
        self.loaded_from_store = false;
    }

    pub fn snapshot(&self) -> CalibrationSnapshot {
        let sample_count = match &self.state {
            CalibrationState::Calibrating { samples, .. } => samples.len(),
            _ => 0,
        };
        CalibrationSnapshot {
            exercise_id: self.exercise.id.to_string(),
            state: self.phase(),
            countdown: self.countdown(),
            baseline_angle: self.baseline(),
            current_angle: self.current_angle,
            sample_count,
            loaded_from_store: self.loaded_from_store,
        }
    }
}
