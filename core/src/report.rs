use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{
    ExperienceLevel, MacroTotals, MealType, NutritionEntry, TrainingGoal, TrainingMode,
    UserProfile, WorkoutEntry,
};
use crate::progress::{
    MacroRatio, RatioAdherence, calories_by_meal, daily_average, exercise_frequency,
    goal_distribution, top_foods_by_calories,
};
use crate::store::LogRecord;

const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    /// Distinct days with at least one logged exercise.
    pub total_workouts: usize,
    pub workouts_per_week: f64,
    pub total_volume: f64,
    pub unique_exercises: usize,
    pub average_duration_min: Option<f64>,
    pub goal_distribution: BTreeMap<TrainingGoal, usize>,
    pub top_exercises: Vec<(String, usize)>,
}

/// Heavy Duty frequency check against the recovery window for the user's level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryCheck {
    pub experience_level: ExperienceLevel,
    pub recommended_hours: u32,
    pub max_weekly_frequency: f64,
    pub actual_frequency: f64,
    pub compliant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub days_logged: usize,
    pub daily_average: MacroTotals,
    pub macro_ratio: Option<MacroRatio>,
    pub ratio_adherence: Option<RatioAdherence>,
    pub calories_by_meal: BTreeMap<MealType, f64>,
    pub top_foods: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub period_days: u32,
    pub mode: TrainingMode,
    pub training: Option<TrainingSummary>,
    pub recovery: Option<RecoveryCheck>,
    pub nutrition: Option<NutritionSummary>,
}

impl ProgressReport {
    /// Summarise the `period_days` days ending on `today` (inclusive).
    /// Sections with no entries in the window are `None`.
    #[allow(clippy::cast_precision_loss)]
    pub fn build<'a>(
        workouts: impl IntoIterator<Item = &'a WorkoutEntry>,
        nutrition: impl IntoIterator<Item = &'a NutritionEntry>,
        profile: &UserProfile,
        period_days: u32,
        today: NaiveDate,
    ) -> Self {
        let period_days = period_days.max(1);
        let from = today
            .checked_sub_days(Days::new(u64::from(period_days - 1)))
            .unwrap_or(today);
        let in_window = |d: NaiveDate| d >= from && d <= today;

        let workouts: Vec<&WorkoutEntry> =
            workouts.into_iter().filter(|e| in_window(e.date())).collect();
        let nutrition: Vec<&NutritionEntry> =
            nutrition.into_iter().filter(|e| in_window(e.date())).collect();

        let weeks = f64::from(period_days) / 7.0;
        let training = (!workouts.is_empty()).then(|| {
            let days: BTreeSet<NaiveDate> = workouts.iter().map(|e| e.date()).collect();
            let exercises: BTreeSet<String> =
                workouts.iter().map(|e| e.exercise.to_lowercase()).collect();
            let durations: Vec<u32> = workouts.iter().filter_map(|e| e.duration_min).collect();
            let average_duration_min = (!durations.is_empty()).then(|| {
                f64::from(durations.iter().sum::<u32>()) / durations.len() as f64
            });
            TrainingSummary {
                total_workouts: days.len(),
                workouts_per_week: days.len() as f64 / weeks,
                total_volume: workouts.iter().map(|e| e.volume()).sum(),
                unique_exercises: exercises.len(),
                average_duration_min,
                goal_distribution: goal_distribution(workouts.iter().copied()),
                top_exercises: exercise_frequency(workouts.iter().copied(), TOP_N),
            }
        });

        let recovery = match (&training, profile.training_mode) {
            (Some(t), TrainingMode::HeavyDuty) => {
                let level = profile.experience_level;
                let max_weekly_frequency = level.max_weekly_sessions();
                Some(RecoveryCheck {
                    experience_level: level,
                    recommended_hours: level.recovery_hours(),
                    max_weekly_frequency,
                    actual_frequency: t.workouts_per_week,
                    compliant: t.workouts_per_week <= max_weekly_frequency,
                })
            }
            _ => None,
        };

        let nutrition_summary = daily_average(nutrition.iter().copied()).map(|avg| {
            let days: BTreeSet<NaiveDate> = nutrition.iter().map(|e| e.date()).collect();
            let ratio = MacroRatio::of(&avg);
            NutritionSummary {
                days_logged: days.len(),
                daily_average: avg,
                macro_ratio: ratio,
                ratio_adherence: ratio.map(|r| r.adherence()),
                calories_by_meal: calories_by_meal(nutrition.iter().copied()),
                top_foods: top_foods_by_calories(nutrition.iter().copied(), TOP_N),
            }
        });

        Self {
            from,
            to: today,
            period_days,
            mode: profile.training_mode,
            training,
            recovery,
            nutrition: nutrition_summary,
        }
    }

    #[must_use]
    pub fn assessment(&self) -> &'static str {
        match (&self.training, &self.nutrition) {
            (None, None) => {
                "No data available for analysis. Start logging workouts and nutrition to see progress!"
            }
            (None, Some(_)) => {
                "Good nutrition tracking! Add workout logging for complete analysis."
            }
            (Some(_), None) => {
                "Great workout consistency! Add nutrition tracking to optimize results."
            }
            (Some(_), Some(_)) => {
                "Excellent data tracking! You're on the path to achieving your goals."
            }
        }
    }
}
