//! Static training reference data: per-goal loading parameters, starter
//! exercise lists and Heavy Duty recovery windows.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::models::{ExperienceLevel, TrainingGoal};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingParameters {
    pub goal: TrainingGoal,
    pub reps: RangeInclusive<u32>,
    pub rest_seconds: RangeInclusive<u32>,
    pub sets: RangeInclusive<u32>,
    pub focus: &'static str,
}

/// An isolation movement done to failure right before its compound partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreExhaustPair {
    pub muscle_group: &'static str,
    pub isolation: &'static str,
    pub compound: &'static str,
}

pub const HEAVY_DUTY_PAIRS: &[PreExhaustPair] = &[
    PreExhaustPair {
        muscle_group: "Chest",
        isolation: "Dumbbell Flyes",
        compound: "Dumbbell Press",
    },
    PreExhaustPair {
        muscle_group: "Back",
        isolation: "Dumbbell Pullovers",
        compound: "Dumbbell Rows",
    },
    PreExhaustPair {
        muscle_group: "Shoulders",
        isolation: "Lateral Raises",
        compound: "Dumbbell Shoulder Press",
    },
    PreExhaustPair {
        muscle_group: "Arms",
        isolation: "Dumbbell Curls",
        compound: "Tricep Extensions",
    },
];

impl TrainingGoal {
    #[must_use]
    pub fn parameters(self) -> TrainingParameters {
        let (reps, rest_seconds, sets, focus) = match self {
            Self::Strength => (1..=5, 180..=300, 3..=5, "Maximum load, perfect form"),
            Self::Hypertrophy => (6..=12, 60..=120, 1..=3, "Time under tension, failure"),
            Self::Power => (3..=6, 120..=240, 3..=6, "Explosive movement, speed"),
            Self::Endurance => (12..=20, 30..=60, 2..=4, "Metabolic stress, volume"),
        };
        TrainingParameters {
            goal: self,
            reps,
            rest_seconds,
            sets,
            focus,
        }
    }

    /// Starter exercise list for the goal.
    #[must_use]
    pub fn templates(self) -> &'static [&'static str] {
        match self {
            Self::Strength => &["Squat", "Deadlift", "Bench Press", "Overhead Press"],
            Self::Hypertrophy => &["Dumbbell Press", "Dumbbell Rows", "Squats", "Pull-ups"],
            Self::Power => &[
                "Power Clean",
                "Jump Squat",
                "Medicine Ball Throw",
                "Explosive Push-up",
            ],
            Self::Endurance => &[
                "Circuit Training",
                "High Rep Squats",
                "Burpees",
                "Mountain Climbers",
            ],
        }
    }
}

impl ExperienceLevel {
    /// Hours between Heavy Duty sessions hitting the same muscles.
    #[must_use]
    pub fn recovery_hours(self) -> u32 {
        match self {
            Self::Beginner => 72,
            Self::Intermediate => 96,
            Self::Advanced => 168,
        }
    }

    /// Sessions per week the recovery window allows.
    #[must_use]
    pub fn max_weekly_sessions(self) -> f64 {
        168.0 / f64::from(self.recovery_hours())
    }
}
