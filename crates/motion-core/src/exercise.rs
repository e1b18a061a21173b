use serde::{Deserialize, Serialize};

/// Three landmark indices; the angle is measured at `vertex`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleTriplet {
    pub point1: usize,
    pub vertex: usize,
    pub point3: usize,
}

impl AngleTriplet {
    pub const fn new(point1: usize, vertex: usize, point3: usize) -> Self {
        Self {
            point1,
            vertex,
            point3,
        }
    }
}

/// Which angle to track when an exercise can be measured on either side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidePolicy {
    Left,
    Right,
    /// Larger of the two sides.
    BothMax,
    /// Smaller of the two sides.
    BothMin,
}

impl SidePolicy {
    /// Two-sided policy whose extremum moves toward the target first, so a
    /// side the detector loses cannot hide a repetition on the other one.
    pub const fn both_for(direction: CountDirection) -> Self {
        match direction {
            CountDirection::Increasing => SidePolicy::BothMax,
            CountDirection::Decreasing => SidePolicy::BothMin,
        }
    }
}

/// Direction the tracked angle moves from rest toward the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountDirection {
    Increasing,
    Decreasing,
}

/// Static per-exercise configuration. Never mutated at runtime.
///
/// `target_delta` and `reset_delta` are offsets from the calibrated baseline.
/// They share a sign and the target is the more extreme of the two, which
/// gives the counter its hysteresis band.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub instruction: &'static str,
    /// Posture hint shown before starting, if the exercise needs one.
    pub setup: Option<&'static str>,
    pub triplet_left: AngleTriplet,
    pub triplet_right: AngleTriplet,
    pub side_policy: SidePolicy,
    pub default_baseline_angle: i32,
    pub target_delta: i32,
    pub reset_delta: i32,
    pub count_direction: CountDirection,
}

impl ExerciseDefinition {
    /// Target and reset lines around `baseline`.
    pub fn thresholds(&self, baseline: i32) -> crate::counter::Thresholds {
        crate::counter::Thresholds::new(baseline, self)
    }
}
