//! Hysteresis repetition counter.
//!
//! A repetition is counted when the tracked angle reaches the target line
//! while the counter is `Idle`. The counter then stays `Active` until the
//! angle retreats past the reset line, which sits between the baseline and
//! the target. Noise around either line therefore cannot produce a second
//! count: a new repetition needs a full target → reset → target cycle.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_REP_INTERVAL_MS;
use crate::exercise::{CountDirection, ExerciseDefinition};

/// Target and reset lines derived from a baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub target: i32,
    pub reset: i32,
    pub direction: CountDirection,
}

impl Thresholds {
    pub fn new(baseline: i32, exercise: &ExerciseDefinition) -> Self {
        Self {
            target: baseline.saturating_add(exercise.target_delta),
            reset: baseline.saturating_add(exercise.reset_delta),
            direction: exercise.count_direction,
        }
    }

    pub fn target_reached(&self, angle: i32) -> bool {
        match self.direction {
            CountDirection::Increasing => angle >= self.target,
            CountDirection::Decreasing => angle <= self.target,
        }
    }

    pub fn should_reset(&self, angle: i32) -> bool {
        match self.direction {
            CountDirection::Increasing => angle < self.reset,
            CountDirection::Decreasing => angle > self.reset,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    /// Armed: the next target crossing may count.
    Idle,
    /// Target was reached; waiting for the angle to pass the reset line.
    Active,
}

/// What happens when the target is reached within the minimum interval of
/// the previous count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottlePolicy {
    /// Enter `Active` without counting. The crossing is consumed and the
    /// repetition is lost; this matches the behaviour users already know.
    #[default]
    ArmWithoutCount,
    /// Stay `Idle`, so a later frame that still reaches the target once the
    /// interval has passed is counted.
    StayIdle,
}

#[derive(Clone, Debug)]
pub struct RepCounter {
    count: u32,
    phase: RepPhase,
    last_count_ms: Option<u64>,
    min_interval_ms: u64,
    policy: ThrottlePolicy,
}

impl RepCounter {
    pub fn new(min_interval_ms: u64, policy: ThrottlePolicy) -> Self {
        Self {
            count: 0,
            phase: RepPhase::Idle,
            last_count_ms: None,
            min_interval_ms,
            policy,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    pub fn last_count_ms(&self) -> Option<u64> {
        self.last_count_ms
    }

    fn interval_elapsed(&self, now_ms: u64) -> bool {
        match self.last_count_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.min_interval_ms,
        }
    }

    /// Feed one angle sample taken at `now_ms` (caller's monotonic clock).
    /// Returns the new count when this sample completes a repetition.
    pub fn update(&mut self, angle: i32, thresholds: &Thresholds, now_ms: u64) -> Option<u32> {
        match self.phase {
            RepPhase::Idle if thresholds.target_reached(angle) => {
                if self.interval_elapsed(now_ms) {
                    self.count += 1;
                    self.last_count_ms = Some(now_ms);
                    self.phase = RepPhase::Active;
                    tracing::debug!(count = self.count, angle, "repetition counted");
                    return Some(self.count);
                }
                match self.policy {
                    ThrottlePolicy::ArmWithoutCount => {
                        tracing::debug!(angle, "target reached inside min interval, not counted");
                        self.phase = RepPhase::Active;
                    }
                    ThrottlePolicy::StayIdle => {}
                }
                None
            }
            RepPhase::Active if thresholds.should_reset(angle) => {
                self.phase = RepPhase::Idle;
                None
            }
            _ => None,
        }
    }

    /// Zero the count and re-arm. Always returns the new count, 0.
    ///
    /// The last count time is kept, so a repetition counted just before the
    /// reset still throttles the next crossing.
    pub fn reset_count(&mut self) -> u32 {
        self.count = 0;
        self.phase = RepPhase::Idle;
        0
    }

    /// Start over for a new baseline: zero the count and forget the last
    /// count time. Returns 0.
    pub fn restart(&mut self) -> u32 {
        self.last_count_ms = None;
        self.reset_count()
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(MIN_REP_INTERVAL_MS, ThrottlePolicy::default())
    }
}
