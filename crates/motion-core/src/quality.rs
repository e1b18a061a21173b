//! Advisory signal-quality gate: scene lighting and key-joint visibility.
//!
//! Lighting is sampled every [`LIGHTING_CHECK_INTERVAL`] ticks from a
//! caller-supplied [`LightingSource`]; visibility is assessed on every tick.
//! The gate only reports. Whether a poor verdict blocks calibration and
//! counting is decided by the session's [`GateMode`](crate::config::GateMode).

use serde::{Deserialize, Serialize};

use crate::constants::{
    KEY_JOINTS, LIGHTING_CHECK_INTERVAL, MAX_BRIGHTNESS, MIN_BRIGHTNESS, MIN_VISIBILITY,
    VISIBLE_RATIO_FAIL, VISIBLE_RATIO_GOOD,
};
use crate::landmark::LandmarkFrame;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingVerdict {
    Good,
    TooDark,
    TooBright,
}

impl LightingVerdict {
    pub fn is_ok(self) -> bool {
        self == LightingVerdict::Good
    }

    pub fn message(self) -> &'static str {
        match self {
            LightingVerdict::Good => "lighting is good",
            LightingVerdict::TooDark => "lighting is too dark, move somewhere brighter",
            LightingVerdict::TooBright => "lighting is too bright, avoid backlight",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityVerdict {
    Good,
    /// Some key joints are hidden but the pose is still usable.
    Degraded,
    NotVisible,
}

impl VisibilityVerdict {
    pub fn is_ok(self) -> bool {
        self != VisibilityVerdict::NotVisible
    }

    pub fn message(self) -> &'static str {
        match self {
            VisibilityVerdict::Good => "pose is clearly visible",
            VisibilityVerdict::Degraded => "some joints are hidden",
            VisibilityVerdict::NotVisible => "upper body is not visible, adjust the camera",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingReport {
    pub verdict: LightingVerdict,
    /// Mean perceptual luminance, 0-255.
    pub brightness: f64,
}

/// Classify an RGBA pixel buffer by its mean perceptual luminance.
/// An empty buffer is treated as too dark.
pub fn assess_lighting(rgba: &[u8]) -> LightingReport {
    let mut total = 0.0;
    let mut pixels = 0usize;
    for px in rgba.chunks_exact(4) {
        total += 0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64;
        pixels += 1;
    }
    if pixels == 0 {
        return LightingReport {
            verdict: LightingVerdict::TooDark,
            brightness: 0.0,
        };
    }

    let brightness = total / pixels as f64;
    let verdict = if brightness < MIN_BRIGHTNESS {
        LightingVerdict::TooDark
    } else if brightness > MAX_BRIGHTNESS {
        LightingVerdict::TooBright
    } else {
        LightingVerdict::Good
    };
    LightingReport {
        verdict,
        brightness,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityReport {
    pub verdict: VisibilityVerdict,
    pub visible_count: usize,
}

/// Count key joints with visibility >= [`MIN_VISIBILITY`]. A gap or an
/// incomplete frame is not visible at all.
pub fn assess_visibility(frame: Option<&LandmarkFrame>) -> VisibilityReport {
    let Some(frame) = frame.filter(|f| f.is_complete()) else {
        return VisibilityReport {
            verdict: VisibilityVerdict::NotVisible,
            visible_count: 0,
        };
    };

    let visible_count = KEY_JOINTS
        .iter()
        .filter_map(|&idx| frame.get(idx))
        .filter(|lm| lm.visibility >= MIN_VISIBILITY)
        .count();
    let ratio = visible_count as f64 / KEY_JOINTS.len() as f64;

    let verdict = if ratio < VISIBLE_RATIO_FAIL {
        VisibilityVerdict::NotVisible
    } else if ratio < VISIBLE_RATIO_GOOD {
        VisibilityVerdict::Degraded
    } else {
        VisibilityVerdict::Good
    };
    VisibilityReport {
        verdict,
        visible_count,
    }
}

/// Supplier of a downscaled RGBA snapshot of the current video frame.
///
/// Implemented by whatever owns the camera. Returning `None` leaves the
/// previous lighting verdict in place.
pub trait LightingSource {
    fn sample_rgba(&mut self) -> Option<Vec<u8>>;
}

impl<F> LightingSource for F
where
    F: FnMut() -> Option<Vec<u8>>,
{
    fn sample_rgba(&mut self) -> Option<Vec<u8>> {
        self()
    }
}

/// Combined quality verdict for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityFlags {
    pub lighting: LightingVerdict,
    pub landmarks: VisibilityVerdict,
    pub lighting_ok: bool,
    pub landmarks_ok: bool,
    pub overall: bool,
}

impl QualityFlags {
    pub fn new(lighting: LightingVerdict, landmarks: VisibilityVerdict) -> Self {
        Self {
            lighting,
            landmarks,
            lighting_ok: lighting.is_ok(),
            landmarks_ok: landmarks.is_ok(),
            overall: lighting.is_ok() && landmarks.is_ok(),
        }
    }

    /// Feedback line for the worst problem, if any.
    pub fn message(&self) -> &'static str {
        if !self.lighting_ok {
            self.lighting.message()
        } else {
            self.landmarks.message()
        }
    }
}

/// Per-session quality state: tick counter and the last lighting verdict.
#[derive(Clone, Debug)]
pub struct QualityGate {
    interval: u32,
    ticks: u32,
    lighting: LightingVerdict,
    brightness: Option<f64>,
}

impl QualityGate {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ticks: 0,
            lighting: LightingVerdict::Good,
            brightness: None,
        }
    }

    /// Last measured mean luminance, if lighting was ever sampled.
    pub fn brightness(&self) -> Option<f64> {
        self.brightness
    }

    /// Assess one tick. Every tick counts toward the lighting interval,
    /// including detection gaps.
    pub fn assess(
        &mut self,
        frame: Option<&LandmarkFrame>,
        lighting: Option<&mut dyn LightingSource>,
    ) -> QualityFlags {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % self.interval == 0
            && let Some(source) = lighting
            && let Some(rgba) = source.sample_rgba()
        {
            let report = assess_lighting(&rgba);
            if report.verdict != self.lighting {
                tracing::debug!(
                    brightness = report.brightness,
                    "lighting changed to {:?}",
                    report.verdict
                );
            }
            self.lighting = report.verdict;
            self.brightness = Some(report.brightness);
        }

        let visibility = assess_visibility(frame);
        QualityFlags::new(self.lighting, visibility.verdict)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.interval);
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new(LIGHTING_CHECK_INTERVAL)
    }
}
