/// Landmarks per complete pose frame (MediaPipe Pose topology).
pub const POSE_LANDMARK_COUNT: usize = 33;

/// History weight of the exponential landmark smoother.
pub const SMOOTHING_ALPHA: f64 = 0.7;

/// Minimum landmark visibility considered "seen".
pub const MIN_VISIBILITY: f64 = 0.5;

/// Visible fraction of key joints below which the pose is not usable.
pub const VISIBLE_RATIO_FAIL: f64 = 0.5;

/// Visible fraction of key joints at or above which the pose is fully visible.
pub const VISIBLE_RATIO_GOOD: f64 = 0.75;

/// Mean luminance (0-255) below which lighting is too dark.
pub const MIN_BRIGHTNESS: f64 = 40.0;

/// Mean luminance (0-255) above which lighting is too bright.
pub const MAX_BRIGHTNESS: f64 = 220.0;

/// Frames between two lighting samples.
pub const LIGHTING_CHECK_INTERVAL: u32 = 30;

/// Calibration countdown length, in one-second ticks.
pub const CALIBRATION_COUNTDOWN: u8 = 3;

/// Minimum time between two counted repetitions.
pub const MIN_REP_INTERVAL_MS: u64 = 500;

/// Numerical epsilon for near-zero vector magnitudes
pub const EPSILON: f64 = 1e-10;

/// Largest joint angle in degrees. Baselines lie in `0..=MAX_JOINT_ANGLE`.
pub const MAX_JOINT_ANGLE: i32 = 180;

// MediaPipe Pose indices used by the engine.
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Joints checked by the visibility gate: shoulders, elbows, wrists, hips.
pub const KEY_JOINTS: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
];
