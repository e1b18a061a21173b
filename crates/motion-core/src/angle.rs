use serde::{Deserialize, Serialize};

use crate::constants::{
    EPSILON, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE,
    RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};
use crate::exercise::{AngleTriplet, ExerciseDefinition, SidePolicy};
use crate::landmark::{Landmark, LandmarkFrame};

/// Angle at `vertex` between the rays to `p1` and `p3`, in whole degrees.
///
/// Uses the image plane only (x, y). Returns 0 when either ray has zero
/// length, so coincident points never produce NaN.
pub fn joint_angle(p1: &Landmark, vertex: &Landmark, p3: &Landmark) -> i32 {
    let v1 = (p1.x - vertex.x, p1.y - vertex.y);
    let v2 = (p3.x - vertex.x, p3.y - vertex.y);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 < EPSILON || mag2 < EPSILON {
        return 0;
    }

    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees().round() as i32
}

/// Angle of a triplet within a complete frame.
pub fn triplet_angle(frame: &LandmarkFrame, triplet: AngleTriplet) -> Option<i32> {
    if !frame.is_complete() {
        return None;
    }
    let p1 = frame.get(triplet.point1)?;
    let vertex = frame.get(triplet.vertex)?;
    let p3 = frame.get(triplet.point3)?;
    Some(joint_angle(p1, vertex, p3))
}

/// The single angle an exercise is tracked by, combining both sides per the
/// definition's side policy. `None` for an incomplete frame.
pub fn exercise_angle(frame: &LandmarkFrame, exercise: &ExerciseDefinition) -> Option<i32> {
    let left = || triplet_angle(frame, exercise.triplet_left);
    let right = || triplet_angle(frame, exercise.triplet_right);
    match exercise.side_policy {
        SidePolicy::Left => left(),
        SidePolicy::Right => right(),
        SidePolicy::BothMax => Some(left()?.max(right()?)),
        SidePolicy::BothMin => Some(left()?.min(right()?)),
    }
}

/// Elbow, shoulder and knee angles on both sides, for display consumers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointAngles {
    pub left_elbow: i32,
    pub right_elbow: i32,
    pub left_shoulder: i32,
    pub right_shoulder: i32,
    pub left_knee: i32,
    pub right_knee: i32,
}

pub const LEFT_ELBOW_TRIPLET: AngleTriplet = AngleTriplet::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST);
pub const RIGHT_ELBOW_TRIPLET: AngleTriplet =
    AngleTriplet::new(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST);
pub const LEFT_SHOULDER_TRIPLET: AngleTriplet = AngleTriplet::new(LEFT_ELBOW, LEFT_SHOULDER, LEFT_HIP);
pub const RIGHT_SHOULDER_TRIPLET: AngleTriplet =
    AngleTriplet::new(RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_HIP);
pub const LEFT_KNEE_TRIPLET: AngleTriplet = AngleTriplet::new(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE);
pub const RIGHT_KNEE_TRIPLET: AngleTriplet = AngleTriplet::new(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE);

/// All display angles of a complete frame.
pub fn joint_angles(frame: &LandmarkFrame) -> Option<JointAngles> {
    Some(JointAngles {
        left_elbow: triplet_angle(frame, LEFT_ELBOW_TRIPLET)?,
        right_elbow: triplet_angle(frame, RIGHT_ELBOW_TRIPLET)?,
        left_shoulder: triplet_angle(frame, LEFT_SHOULDER_TRIPLET)?,
        right_shoulder: triplet_angle(frame, RIGHT_SHOULDER_TRIPLET)?,
        left_knee: triplet_angle(frame, LEFT_KNEE_TRIPLET)?,
        right_knee: triplet_angle(frame, RIGHT_KNEE_TRIPLET)?,
    })
}
