use criterion::{Criterion, black_box, criterion_group, criterion_main};
use motion_core::constants::{LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE};
use motion_core::{Landmark, LandmarkFrame, MotionSession, SessionConfig, joint_angles};

fn squat_frame(deg: f64) -> LandmarkFrame {
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

fn bench_joint_angles(c: &mut Criterion) {
    let frame = squat_frame(120.0);
    c.bench_function("joint_angles", |b| b.iter(|| joint_angles(black_box(&frame))));
}

fn bench_session_frame(c: &mut Criterion) {
    // one full squat cycle, 60 frames
    let frames: Vec<LandmarkFrame> = (0..60)
        .map(|i| {
            let phase = i as f64 / 60.0 * std::f64::consts::TAU;
            squat_frame(125.0 + 45.0 * phase.cos())
        })
        .collect();

    c.bench_function("session_process_frame", |b| {
        let mut session =
            MotionSession::new(SessionConfig::default(), "squat", Some(170)).unwrap();
        let mut now = 0u64;
        let mut i = 0usize;
        b.iter(|| {
            now += 33;
            i = (i + 1) % frames.len();
            black_box(session.process_frame(Some(&frames[i]), now, None))
        })
    });
}

criterion_group!(benches, bench_joint_angles, bench_session_frame);
criterion_main!(benches);
