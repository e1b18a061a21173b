use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::angle::{JointAngles, exercise_angle, joint_angles};
use crate::calibration::{CalibrationSession, CalibrationSnapshot};
use crate::config::{GateMode, SessionConfig};
use crate::counter::RepCounter;
use crate::error::Result;
use crate::exercise::ExerciseDefinition;
use crate::landmark::LandmarkFrame;
use crate::quality::{LightingSource, QualityFlags, QualityGate};
use crate::registry;
use crate::smoother::LandmarkSmoother;

/// Output of a session, in the order produced within a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Quality(QualityFlags),
    Angles(JointAngles),
    ExerciseAngle { angle: i32 },
    RepCount { count: u32 },
    Calibration(CalibrationSnapshot),
}

/// Everything one user needs for one exercise: smoother, quality gate,
/// calibration and counter, wired in the frame-processing order.
///
/// Sessions share nothing; run one per user. All methods are synchronous and
/// never block. Time only enters through the `now_ms` argument and the
/// external one-second calls to [`MotionSession::tick_calibration`].
#[derive(Clone, Debug)]
pub struct MotionSession {
    id: Uuid,
    config: SessionConfig,
    smoother: LandmarkSmoother,
    gate: QualityGate,
    calibration: CalibrationSession,
    counter: RepCounter,
}

impl MotionSession {
    /// Session for `exercise_id`, seeded with the caller's stored baseline.
    pub fn new(
        config: SessionConfig,
        exercise_id: &str,
        stored_baseline: Option<i32>,
    ) -> Result<Self> {
        config.validate()?;
        let exercise = registry::lookup(exercise_id)?;
        let session = Self {
            id: Uuid::new_v4(),
            smoother: LandmarkSmoother::new(config.smoothing_alpha),
            gate: QualityGate::new(config.lighting_check_interval),
            calibration: CalibrationSession::resume(exercise, stored_baseline)?,
            counter: RepCounter::new(config.min_rep_interval_ms, config.throttle_policy),
            config,
        };
        tracing::debug!(
            session = %session.id,
            exercise = exercise.id,
            baseline = ?stored_baseline,
            "session created"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn exercise(&self) -> &'static ExerciseDefinition {
        self.calibration.exercise()
    }

    pub fn calibration(&self) -> &CalibrationSession {
        &self.calibration
    }

    pub fn counter(&self) -> &RepCounter {
        &self.counter
    }

    pub fn count(&self) -> u32 {
        self.counter.count()
    }

    pub fn baseline(&self) -> Option<i32> {
        self.calibration.baseline()
    }

    /// Switch exercise. Calibration restarts from the stored baseline (if
    /// any); counter and smoother start fresh. The lighting verdict belongs
    /// to the scene and carries over.
    pub fn select_exercise(
        &mut self,
        exercise_id: &str,
        stored_baseline: Option<i32>,
    ) -> Result<Vec<SessionEvent>> {
        let exercise = registry::lookup(exercise_id)?;
        self.calibration = CalibrationSession::resume(exercise, stored_baseline)?;
        self.smoother.reset();
        tracing::debug!(session = %self.id, exercise = exercise.id, "exercise selected");
        Ok(vec![
            SessionEvent::Calibration(self.calibration.snapshot()),
            SessionEvent::RepCount {
                count: self.counter.restart(),
            },
        ])
    }

    /// Process one detection tick. `raw` is `None` when no body was detected.
    pub fn process_frame(
        &mut self,
        raw: Option<&LandmarkFrame>,
        now_ms: u64,
        lighting: Option<&mut dyn LightingSource>,
    ) -> Vec<SessionEvent> {
        let smoothed = self.smoother.smooth(raw);
        let quality = self.gate.assess(smoothed.as_ref(), lighting);
        let mut events = vec![SessionEvent::Quality(quality)];

        let Some(frame) = smoothed.filter(LandmarkFrame::is_complete) else {
            return events;
        };
        if let Some(angles) = joint_angles(&frame) {
            events.push(SessionEvent::Angles(angles));
        }
        let Some(angle) = exercise_angle(&frame, self.exercise()) else {
            return events;
        };
        events.push(SessionEvent::ExerciseAngle { angle });

        if self.config.quality_gate == GateMode::Enforce && !quality.overall {
            tracing::trace!(session = %self.id, "quality gate closed: {}", quality.message());
            return events;
        }

        if self.calibration.is_calibrating() {
            self.calibration.add_sample(angle);
        } else if let Some(baseline) = self.calibration.baseline() {
            let thresholds = self.exercise().thresholds(baseline);
            if let Some(count) = self.counter.update(angle, &thresholds, now_ms) {
                events.push(SessionEvent::RepCount { count });
            }
        }
        events
    }

    pub fn start_calibration(&mut self) -> Vec<SessionEvent> {
        self.calibration.start();
        self.baseline_changed()
    }

    /// One countdown second. Emits nothing outside calibration.
    pub fn tick_calibration(&mut self) -> Vec<SessionEvent> {
        if !self.calibration.is_calibrating() {
            return Vec::new();
        }
        match self.calibration.tick() {
            Some(_) => self.baseline_changed(),
            None => vec![SessionEvent::Calibration(self.calibration.snapshot())],
        }
    }

    pub fn skip_calibration(&mut self) -> Vec<SessionEvent> {
        self.calibration.skip();
        self.baseline_changed()
    }

    pub fn clear_calibration(&mut self) -> Vec<SessionEvent> {
        self.calibration.clear();
        self.baseline_changed()
    }

    /// Zero the counter. Always emits a count of 0. The throttle window of
    /// the last counted repetition still applies.
    pub fn reset_count(&mut self) -> SessionEvent {
        SessionEvent::RepCount {
            count: self.counter.reset_count(),
        }
    }

    /// Counts are relative to a baseline; a new baseline starts from zero.
    fn baseline_changed(&mut self) -> Vec<SessionEvent> {
        let mut events = vec![SessionEvent::Calibration(self.calibration.snapshot())];
        let had_progress = self.counter.count() > 0;
        let count = self.counter.restart();
        if had_progress {
            events.push(SessionEvent::RepCount { count });
        }
        events
    }
}
