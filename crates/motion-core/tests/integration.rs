//! Integration tests driving full sessions with synthetic landmark streams:
//! smoothing → quality → angles → calibration → counting.

use motion_core::constants::{
    LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, RIGHT_ANKLE, RIGHT_ELBOW,
    RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
};
use motion_core::{
    CalibrationPhase, GateMode, Landmark, LandmarkFrame, MotionSession, SessionConfig,
    SessionEvent, ThrottlePolicy,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const FPS: u64 = 30;
const FRAME_MS: u64 = 1000 / FPS;

/// Both arms raised `deg` degrees away from the torso.
fn arms(deg: f64) -> LandmarkFrame {
    let mut frame = LandmarkFrame::centered();
    let rad = deg.to_radians();
    for (shoulder, elbow, hip, x, side) in [
        (LEFT_SHOULDER, LEFT_ELBOW, LEFT_HIP, 0.6, 1.0),
        (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_HIP, 0.4, -1.0),
    ] {
        frame.set(shoulder, Landmark::at(x, 0.3));
        frame.set(hip, Landmark::at(x, 0.6));
        frame.set(
            elbow,
            Landmark::at(x + side * 0.15 * rad.sin(), 0.3 + 0.15 * rad.cos()),
        );
    }
    frame
}

/// Both knees bent to `deg` degrees (180 = straight leg).
fn knees(deg: f64) -> LandmarkFrame {
    let mut frame = LandmarkFrame::centered();
    let rad = deg.to_radians();
    for (hip, knee, ankle, x) in [
        (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, 0.55),
        (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 0.45),
    ] {
        frame.set(hip, Landmark::at(x, 0.4));
        frame.set(knee, Landmark::at(x, 0.6));
        frame.set(ankle, Landmark::at(x + 0.2 * rad.sin(), 0.6 - 0.2 * rad.cos()));
    }
    frame
}

/// Replays frames at 30 fps, ticking calibration once per simulated second.
struct Driver {
    session: MotionSession,
    frame_idx: u64,
    events: Vec<SessionEvent>,
}

impl Driver {
    fn new(session: MotionSession) -> Self {
        Self {
            session,
            frame_idx: 0,
            events: Vec::new(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.frame_idx * FRAME_MS
    }

    fn push(&mut self, frame: Option<&LandmarkFrame>) {
        let now = self.now_ms();
        let mut out = self.session.process_frame(frame, now, None);
        self.events.append(&mut out);
        self.frame_idx += 1;
        if self.frame_idx % FPS == 0 {
            let mut out = self.session.tick_calibration();
            self.events.append(&mut out);
        }
    }

    fn hold(&mut self, frame: &LandmarkFrame, frames: usize) {
        for _ in 0..frames {
            self.push(Some(frame));
        }
    }

    fn rep_counts(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::RepCount { count } => Some(*count),
                _ => None,
            })
            .collect()
    }
}

/// Test 1: calibrate at rest, then three full arm raises are counted.
#[test]
fn calibrate_then_count_arm_raises() {
    let session = MotionSession::new(SessionConfig::default(), "armRaise", None).unwrap();
    let mut d = Driver::new(session);
    d.events.extend(d.session.start_calibration());

    d.hold(&arms(34.0), 90);
    assert_eq!(d.session.calibration().phase(), CalibrationPhase::Completed);
    assert_eq!(d.session.baseline(), Some(34));

    for _ in 0..3 {
        d.hold(&arms(110.0), 20);
        d.hold(&arms(34.0), 20);
    }
    assert_eq!(d.session.count(), 3);
    assert_eq!(d.rep_counts(), vec![1, 2, 3]);

    let completed = d.events.iter().any(|e| {
        matches!(e, SessionEvent::Calibration(snap)
            if snap.state == CalibrationPhase::Completed && snap.baseline_angle == Some(34))
    });
    assert!(completed, "completion should be announced");
}

/// Test 2: no samples arrive during the countdown, so the default baseline is used.
#[test]
fn calibration_without_detection_falls_back_to_default() {
    let session = MotionSession::new(SessionConfig::default(), "squat", None).unwrap();
    let mut d = Driver::new(session);
    d.session.start_calibration();
    for _ in 0..90 {
        d.push(None);
    }
    assert_eq!(d.session.baseline(), Some(170));
}

/// Test 3: detection gaps never move the counter or the calibration state.
#[test]
fn gaps_are_no_ops() {
    let session = MotionSession::new(SessionConfig::default(), "squat", Some(170)).unwrap();
    let mut d = Driver::new(session);
    d.hold(&knees(170.0), 30);
    d.hold(&knees(80.0), 30);
    assert_eq!(d.session.count(), 1);

    let phase = d.session.counter().phase();
    for _ in 0..60 {
        d.push(None);
        d.push(Some(&LandmarkFrame::new(vec![Landmark::at(0.5, 0.5); 12])));
    }
    assert_eq!(d.session.count(), 1);
    assert_eq!(d.session.counter().phase(), phase);
    assert_eq!(d.session.baseline(), Some(170));
}

/// Test 4: jittery squats with both knees tracked still count exactly once each.
#[test]
fn jittered_squats_count_once_each() {
    let mut rng = SmallRng::seed_from_u64(42);
    let session = MotionSession::new(SessionConfig::default(), "squat", Some(170)).unwrap();
    let mut d = Driver::new(session);

    let mut jitter = |frame: LandmarkFrame| -> LandmarkFrame {
        let noisy: Vec<Landmark> = frame
            .iter()
            .map(|lm| {
                Landmark::new(
                    lm.x + rng.random_range(-0.003..0.003),
                    lm.y + rng.random_range(-0.003..0.003),
                    lm.z,
                    lm.visibility,
                )
            })
            .collect();
        LandmarkFrame::new(noisy)
    };

    for _ in 0..5 {
        for deg in (80..=170).rev().step_by(5) {
            let f = jitter(knees(deg as f64));
            d.push(Some(&f));
        }
        for _ in 0..10 {
            let f = jitter(knees(80.0));
            d.push(Some(&f));
        }
        for deg in (80..=170).step_by(5) {
            let f = jitter(knees(deg as f64));
            d.push(Some(&f));
        }
        for _ in 0..10 {
            let f = jitter(knees(170.0));
            d.push(Some(&f));
        }
    }
    assert_eq!(d.session.count(), 5);
}

/// Test 5: with the gate enforced, hidden joints block counting.
#[test]
fn enforced_gate_blocks_counting_on_hidden_joints() {
    let mut hidden = knees(80.0);
    for idx in [11, 12, 13, 14, 15, 16] {
        let mut lm = *hidden.get(idx).unwrap();
        lm.visibility = 0.1;
        hidden.set(idx, lm);
    }

    let config = SessionConfig {
        quality_gate: GateMode::Enforce,
        ..SessionConfig::default()
    };
    let session = MotionSession::new(config, "squat", Some(170)).unwrap();
    let mut d = Driver::new(session);
    d.hold(&knees(170.0), 30);
    d.hold(&hidden, 30);
    assert_eq!(d.session.count(), 0);
    // angles are still reported
    assert!(
        d.events
            .iter()
            .any(|e| matches!(e, SessionEvent::ExerciseAngle { angle } if *angle == 80))
    );

    let session = MotionSession::new(SessionConfig::default(), "squat", Some(170)).unwrap();
    let mut d = Driver::new(session);
    d.hold(&knees(170.0), 30);
    d.hold(&hidden, 30);
    assert_eq!(d.session.count(), 1, "advisory gate never blocks");
}

/// Test 6: the throttle policy decides whether a fast second crossing survives.
#[test]
fn throttle_policy_on_fast_reps() {
    let run = |policy: ThrottlePolicy| -> u32 {
        let config = SessionConfig {
            throttle_policy: policy,
            smoothing_alpha: 0.0,
            ..SessionConfig::default()
        };
        let mut s = MotionSession::new(config, "armRaise", Some(30)).unwrap();
        s.process_frame(Some(&arms(30.0)), 0, None);
        s.process_frame(Some(&arms(95.0)), 100, None);
        s.process_frame(Some(&arms(40.0)), 200, None);
        s.process_frame(Some(&arms(95.0)), 300, None);
        // still holding the top position after the interval
        s.process_frame(Some(&arms(95.0)), 900, None);
        s.count()
    };
    assert_eq!(run(ThrottlePolicy::ArmWithoutCount), 1);
    assert_eq!(run(ThrottlePolicy::StayIdle), 2);
}

/// Test 7: recalibrating or clearing restarts the count.
#[test]
fn baseline_change_resets_count() {
    let config = SessionConfig {
        smoothing_alpha: 0.0,
        ..SessionConfig::default()
    };
    let mut s = MotionSession::new(config, "armRaise", Some(30)).unwrap();
    s.process_frame(Some(&arms(95.0)), 0, None);
    assert_eq!(s.count(), 1);

    let events = s.clear_calibration();
    assert!(events.contains(&SessionEvent::RepCount { count: 0 }));
    assert_eq!(s.count(), 0);

    // no baseline: frames are ignored by the counter
    s.process_frame(Some(&arms(40.0)), 1000, None);
    s.process_frame(Some(&arms(95.0)), 2000, None);
    assert_eq!(s.count(), 0);

    s.skip_calibration();
    s.process_frame(Some(&arms(95.0)), 3000, None);
    assert_eq!(s.count(), 1);
    assert_eq!(s.reset_count(), SessionEvent::RepCount { count: 0 });
}

/// Test 8: events serialize to tagged JSON lines.
#[test]
fn events_serialize_as_tagged_json() {
    let mut s = MotionSession::new(SessionConfig::default(), "armRaise", None).unwrap();
    let events = s.process_frame(Some(&arms(30.0)), 0, None);
    let lines: Vec<String> = events
        .iter()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    assert!(lines[0].starts_with(r#"{"event":"quality""#));
    assert!(lines.iter().any(|l| l.contains(r#""event":"angles""#)));
    assert!(lines.iter().any(|l| l == r#"{"event":"exercise_angle","angle":30}"#));

    let back: SessionEvent = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(back, events[0]);
}
