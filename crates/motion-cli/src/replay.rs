//! JSON Lines pose streams and the stream-time driver that feeds them through
//! a [`MotionSession`].

use std::path::Path;

use anyhow::{Context, Result};
use motion_core::{Landmark, LandmarkFrame, MotionSession, SessionEvent};
use serde::Deserialize;

/// Stream time between calibration countdown ticks.
pub const CALIBRATION_TICK_MS: u64 = 1000;

/// One input line: `null`, a bare landmark array, or a stamped object.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputLine {
    Bare(Option<Vec<Landmark>>),
    Stamped {
        #[serde(default)]
        t_ms: Option<u64>,
        #[serde(default)]
        landmarks: Option<Vec<Landmark>>,
    },
}

/// A detection tick with its stream timestamp. `frame` is `None` for a gap.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedFrame {
    pub t_ms: u64,
    pub frame: Option<LandmarkFrame>,
}

pub fn read_stream(path: &Path, fps: u32) -> Result<Vec<TimedFrame>> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_stream(&input, fps).with_context(|| format!("bad pose stream {}", path.display()))
}

/// Parse JSON Lines. Blank lines are skipped; a line without `t_ms` is
/// stamped `index * 1000 / fps`.
pub fn parse_stream(input: &str, fps: u32) -> Result<Vec<TimedFrame>> {
    anyhow::ensure!(fps > 0, "fps must be at least 1");
    let mut frames = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed: InputLine =
            serde_json::from_str(line).with_context(|| format!("line {}: malformed frame", idx + 1))?;
        let implied = idx as u64 * 1000 / u64::from(fps);
        let (t_ms, landmarks) = match parsed {
            InputLine::Bare(landmarks) => (implied, landmarks),
            InputLine::Stamped { t_ms, landmarks } => (t_ms.unwrap_or(implied), landmarks),
        };
        frames.push(TimedFrame {
            t_ms,
            frame: landmarks.map(LandmarkFrame::new),
        });
    }
    Ok(frames)
}

/// Feed `frames` through `session` in order, returning stamped events.
///
/// With `calibrate`, calibration starts at the first frame and the countdown
/// ticks once per [`CALIBRATION_TICK_MS`] of stream time, before the frame
/// that crosses each tick boundary is processed.
pub fn run(
    session: &mut MotionSession,
    frames: &[TimedFrame],
    calibrate: bool,
) -> Vec<(u64, SessionEvent)> {
    let mut out = Vec::new();
    let mut next_tick: Option<u64> = None;

    for (i, tf) in frames.iter().enumerate() {
        if i == 0 && calibrate {
            stamp(&mut out, tf.t_ms, session.start_calibration());
            next_tick = Some(tf.t_ms.saturating_add(CALIBRATION_TICK_MS));
        }
        while let Some(at) = next_tick {
            if tf.t_ms < at {
                break;
            }
            stamp(&mut out, at, session.tick_calibration());
            next_tick = session
                .calibration()
                .is_calibrating()
                .then_some(at.saturating_add(CALIBRATION_TICK_MS));
        }
        stamp(
            &mut out,
            tf.t_ms,
            session.process_frame(tf.frame.as_ref(), tf.t_ms, None),
        );
    }

    if session.calibration().is_calibrating() {
        tracing::warn!(
            countdown = session.calibration().countdown(),
            "stream ended before calibration completed"
        );
    }
    out
}

fn stamp(out: &mut Vec<(u64, SessionEvent)>, t_ms: u64, events: Vec<SessionEvent>) {
    out.extend(events.into_iter().map(|e| (t_ms, e)));
}
