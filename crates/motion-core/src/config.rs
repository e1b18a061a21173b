use serde::{Deserialize, Serialize};

use crate::constants::{LIGHTING_CHECK_INTERVAL, MIN_REP_INTERVAL_MS, SMOOTHING_ALPHA};
use crate::error::{MotionError, Result};

pub use crate::counter::ThrottlePolicy;

/// Whether a failed quality verdict blocks calibration and counting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Report quality only; every complete frame is sampled and counted.
    #[default]
    Advisory,
    /// Skip calibration sampling and counting on ticks with poor quality.
    Enforce,
}

/// Session tunables. Every field defaults to the engine constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub smoothing_alpha: f64,
    pub min_rep_interval_ms: u64,
    pub throttle_policy: ThrottlePolicy,
    pub quality_gate: GateMode,
    pub lighting_check_interval: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: SMOOTHING_ALPHA,
            min_rep_interval_ms: MIN_REP_INTERVAL_MS,
            throttle_policy: ThrottlePolicy::default(),
            quality_gate: GateMode::default(),
            lighting_check_interval: LIGHTING_CHECK_INTERVAL,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.smoothing_alpha) {
            return Err(MotionError::InvalidConfig(format!(
                "smoothing_alpha must be in [0, 1), got {}",
                self.smoothing_alpha
            )));
        }
        if self.lighting_check_interval == 0 {
            return Err(MotionError::InvalidConfig(
                "lighting_check_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
