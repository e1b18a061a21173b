//! Real-time exercise repetition engine.
//!
//! Consumes a stream of 33-point pose landmark frames and produces a
//! per-exercise calibrated baseline angle, a monotonic repetition count from
//! hysteresis thresholds around that baseline, and advisory quality flags.
//!
//! Zero I/O: frames, time and stored baselines are supplied by the caller.

pub mod angle;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod counter;
pub mod error;
pub mod exercise;
pub mod landmark;
pub mod quality;
pub mod registry;
pub mod session;
pub mod smoother;

pub use angle::{JointAngles, exercise_angle, joint_angle, joint_angles, triplet_angle};
pub use calibration::{
    CalibrationPhase, CalibrationSession, CalibrationSnapshot, CalibrationState, validate_baseline,
};
pub use config::{GateMode, SessionConfig};
pub use constants::{CALIBRATION_COUNTDOWN, MIN_REP_INTERVAL_MS, POSE_LANDMARK_COUNT, SMOOTHING_ALPHA};
pub use counter::{RepCounter, RepPhase, Thresholds, ThrottlePolicy};
pub use error::{MotionError, Result};
pub use exercise::{AngleTriplet, CountDirection, ExerciseDefinition, SidePolicy};
pub use landmark::{Landmark, LandmarkFrame};
pub use quality::{
    LightingReport, LightingSource, LightingVerdict, QualityFlags, QualityGate, VisibilityReport,
    VisibilityVerdict, assess_lighting, assess_visibility,
};
pub use session::{MotionSession, SessionEvent};
pub use smoother::LandmarkSmoother;
