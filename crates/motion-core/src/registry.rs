//! Exercise definition table.
//!
//! Adding an exercise means adding an entry here; nothing downstream
//! branches on exercise identity.

use crate::angle::{
    LEFT_ELBOW_TRIPLET, LEFT_KNEE_TRIPLET, LEFT_SHOULDER_TRIPLET, RIGHT_ELBOW_TRIPLET,
    RIGHT_KNEE_TRIPLET, RIGHT_SHOULDER_TRIPLET,
};
use crate::error::{MotionError, Result};
use crate::exercise::{CountDirection, ExerciseDefinition, SidePolicy};

/// Exercise selected when the caller names none.
pub const DEFAULT_EXERCISE: &str = "armRaise";

static EXERCISES: [ExerciseDefinition; 5] = [
    ExerciseDefinition {
        id: "armRaise",
        name: "Arm Raise",
        instruction: "Slowly raise your arms out to the side",
        setup: None,
        triplet_left: LEFT_SHOULDER_TRIPLET,
        triplet_right: RIGHT_SHOULDER_TRIPLET,
        side_policy: SidePolicy::both_for(CountDirection::Increasing),
        default_baseline_angle: 30,
        target_delta: 60,
        reset_delta: 30,
        count_direction: CountDirection::Increasing,
    },
    ExerciseDefinition {
        id: "squat",
        name: "Squat",
        instruction: "Bend your knees to about 90 degrees",
        setup: Some("Stand side-on so the camera sees your profile"),
        triplet_left: LEFT_KNEE_TRIPLET,
        triplet_right: RIGHT_KNEE_TRIPLET,
        side_policy: SidePolicy::both_for(CountDirection::Decreasing),
        default_baseline_angle: 170,
        target_delta: -80,
        reset_delta: -30,
        count_direction: CountDirection::Decreasing,
    },
    ExerciseDefinition {
        id: "pushup",
        name: "Push-up",
        instruction: "Bend your elbows to about 90 degrees",
        setup: Some("Get into position side-on so the camera sees your profile"),
        triplet_left: LEFT_ELBOW_TRIPLET,
        triplet_right: RIGHT_ELBOW_TRIPLET,
        side_policy: SidePolicy::both_for(CountDirection::Decreasing),
        default_baseline_angle: 160,
        target_delta: -70,
        reset_delta: -20,
        count_direction: CountDirection::Decreasing,
    },
    ExerciseDefinition {
        id: "lunge",
        name: "Lunge",
        instruction: "Bend your front knee to about 90 degrees",
        setup: Some("Stand side-on so the camera sees your profile"),
        triplet_left: LEFT_KNEE_TRIPLET,
        triplet_right: RIGHT_KNEE_TRIPLET,
        // front leg
        side_policy: SidePolicy::Left,
        default_baseline_angle: 170,
        target_delta: -80,
        reset_delta: -30,
        count_direction: CountDirection::Decreasing,
    },
    ExerciseDefinition {
        id: "heelSlide",
        name: "Heel Slide",
        instruction: "Slowly slide your heel toward you",
        setup: Some(
            "Sit side-on with your leg visible to the camera.\nStart seated with the leg straight out on the floor.",
        ),
        triplet_left: LEFT_KNEE_TRIPLET,
        triplet_right: RIGHT_KNEE_TRIPLET,
        // rehabilitating leg
        side_policy: SidePolicy::Left,
        default_baseline_angle: 170,
        target_delta: -50,
        reset_delta: -20,
        count_direction: CountDirection::Decreasing,
    },
];

pub fn all() -> &'static [ExerciseDefinition] {
    &EXERCISES
}

pub fn get(id: &str) -> Option<&'static ExerciseDefinition> {
    EXERCISES.iter().find(|e| e.id == id)
}

pub fn lookup(id: &str) -> Result<&'static ExerciseDefinition> {
    get(id).ok_or_else(|| MotionError::UnknownExercise(id.to_string()))
}

pub fn default_exercise() -> &'static ExerciseDefinition {
    &EXERCISES[0]
}
