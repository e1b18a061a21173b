use serde::{Deserialize, Serialize};

use crate::constants::POSE_LANDMARK_COUNT;

/// One tracked body joint in normalized image coordinates.
///
/// `x` and `y` lie in [0, 1] with the origin at the top-left of the image;
/// `z` is relative depth. `visibility` is the detector's confidence in [0, 1]
/// and defaults to 0 when a producer omits it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    /// Fully visible landmark on the image plane.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }
}

/// Ordered landmarks of one detection tick.
///
/// Indices are positional (MediaPipe Pose). Only a frame of exactly
/// [`POSE_LANDMARK_COUNT`] entries is complete; anything else is treated as
/// "no detection" by angle extraction, calibration and counting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    landmarks: Vec<Landmark>,
}

impl LandmarkFrame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Complete frame with every landmark at the image center, fully visible.
    pub fn centered() -> Self {
        Self::new(vec![Landmark::at(0.5, 0.5); POSE_LANDMARK_COUNT])
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == POSE_LANDMARK_COUNT
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Replace the landmark at `index`. Returns false when out of range.
    pub fn set(&mut self, index: usize, landmark: Landmark) -> bool {
        match self.landmarks.get_mut(index) {
            Some(slot) => {
                *slot = landmark;
                true
            }
            None => false,
        }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }
}

impl From<Vec<Landmark>> for LandmarkFrame {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}
