use crate::constants::SMOOTHING_ALPHA;
use crate::landmark::{Landmark, LandmarkFrame};

/// Exponential landmark filter with single-frame memory.
///
/// Each coordinate becomes `prev * alpha + new * (1 - alpha)`. Visibility is
/// taken from the new frame as-is. The first frame, and any frame whose length
/// differs from the remembered one, passes through unchanged.
#[derive(Clone, Debug)]
pub struct LandmarkSmoother {
    alpha: f64,
    previous: Option<LandmarkFrame>,
}

impl LandmarkSmoother {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            previous: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn previous(&self) -> Option<&LandmarkFrame> {
        self.previous.as_ref()
    }

    /// Smooth one raw frame. `None` is a detection gap: the remembered frame
    /// is kept and `None` is returned.
    pub fn smooth(&mut self, raw: Option<&LandmarkFrame>) -> Option<LandmarkFrame> {
        let raw = raw?;
        let smoothed = match &self.previous {
            Some(prev) if prev.len() == raw.len() => LandmarkFrame::new(
                prev.iter()
                    .zip(raw.iter())
                    .map(|(p, n)| self.blend(p, n))
                    .collect(),
            ),
            _ => raw.clone(),
        };
        self.previous = Some(smoothed.clone());
        Some(smoothed)
    }

    fn blend(&self, prev: &Landmark, new: &Landmark) -> Landmark {
        let a = self.alpha;
        Landmark {
            x: prev.x * a + new.x * (1.0 - a),
            y: prev.y * a + new.y * (1.0 - a),
            z: prev.z * a + new.z * (1.0 - a),
            visibility: new.visibility,
        }
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::new(SMOOTHING_ALPHA)
    }
}
