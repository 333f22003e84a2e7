use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::foods::FoodDatabase;
use crate::macros::{MacroCalculator, NutritionSettings};
use crate::models::{
    DailyTarget, MealType, NewNutritionEntry, NewWorkoutEntry, NutritionEntry, Phase,
    ProfileUpdate, UserProfile, WorkoutEntry,
};
use crate::progress::{
    DailyAdherence, NutritionBucket, ProgressQuery, WorkoutBucket, nutrition_progress,
    workout_progress,
};
use crate::report::ProgressReport;
use crate::storage::FileStorage;
use crate::store::Journal;

/// An entry removed by [`GymratService::delete_entry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeletedEntry {
    Nutrition(NutritionEntry),
    Workout(WorkoutEntry),
}

/// Single-user tracker state: the on-disk files plus everything loaded from them.
pub struct GymratService {
    storage: FileStorage,
    journal: Journal,
    foods: FoodDatabase,
    profile: UserProfile,
    calculator: MacroCalculator,
}

impl GymratService {
    /// Load everything under `dir`. Settings come from `settings.json`
    /// unless given explicitly.
    pub fn open(dir: impl Into<PathBuf>, settings: Option<NutritionSettings>) -> Result<Self> {
        let storage = FileStorage::open(dir)?;
        let settings = match settings {
            Some(s) => s,
            None => storage.load_settings()?,
        };
        let calculator = MacroCalculator::new(settings)?;
        let profile = storage.load_profile()?;
        let foods = storage.load_foods()?;
        let journal = storage.load_journal()?;
        tracing::debug!(root = %storage.root().display(), "Opened data directory");
        Ok(Self {
            storage,
            journal,
            foods,
            profile,
            calculator,
        })
    }

    #[must_use]
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    #[must_use]
    pub fn foods(&self) -> &FoodDatabase {
        &self.foods
    }

    #[must_use]
    pub fn settings(&self) -> &NutritionSettings {
        self.calculator.settings()
    }

    // --- Profile & targets ---

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Apply, validate and persist a profile edit. Nothing changes on error.
    pub fn update_profile(
        &mut self,
        update: &ProfileUpdate,
        now: NaiveDateTime,
    ) -> Result<&UserProfile> {
        let mut next = update.apply(&self.profile)?;
        next.last_updated = Some(now);
        self.storage.save_profile(&next)?;
        self.profile = next;
        Ok(&self.profile)
    }

    pub fn daily_target(&self) -> Result<DailyTarget> {
        self.calculator.daily_target(&self.profile)
    }

    pub fn daily_target_for_phase(&self, phase: Phase) -> Result<DailyTarget> {
        self.calculator.daily_target_for_phase(&self.profile, phase)
    }

    // --- Logging ---

    pub fn log_food(
        &mut self,
        food: &str,
        grams: f64,
        meal: MealType,
        at: NaiveDateTime,
    ) -> Result<&NutritionEntry> {
        let item = self.foods.lookup(food)?;
        let entry = NewNutritionEntry {
            timestamp: at,
            food: food.to_string(),
            quantity_g: grams,
            meal_type: meal,
        }
        .into_entry(item)?;
        self.storage.append_nutrition(&entry)?;
        Ok(self.journal.nutrition.record(entry))
    }

    pub fn log_workout(&mut self, new: NewWorkoutEntry) -> Result<&WorkoutEntry> {
        let entry = new.into_entry()?;
        self.storage.append_workout(&entry)?;
        Ok(self.journal.workouts.record(entry))
    }

    pub fn delete_nutrition(&mut self, id: &str) -> Result<NutritionEntry> {
        if self.journal.nutrition.get(id).is_none() {
            return Err(CoreError::EntryNotFound(id.to_string()));
        }
        let remaining: Vec<NutritionEntry> = self
            .journal
            .nutrition
            .query(|e| e.id != id)
            .cloned()
            .collect();
        self.storage.rewrite_nutrition(&remaining)?;
        self.journal
            .nutrition
            .remove(id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))
    }

    pub fn delete_workout(&mut self, id: &str) -> Result<WorkoutEntry> {
        if self.journal.workouts.get(id).is_none() {
            return Err(CoreError::EntryNotFound(id.to_string()));
        }
        let remaining: Vec<WorkoutEntry> = self
            .journal
            .workouts
            .query(|e| e.id != id)
            .cloned()
            .collect();
        self.storage.rewrite_workouts(&remaining)?;
        self.journal
            .workouts
            .remove(id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))
    }

    /// Delete by id from whichever log holds it.
    pub fn delete_entry(&mut self, id: &str) -> Result<DeletedEntry> {
        if self.journal.nutrition.get(id).is_some() {
            return self.delete_nutrition(id).map(DeletedEntry::Nutrition);
        }
        self.delete_workout(id).map(DeletedEntry::Workout)
    }

    // --- Queries ---

    pub fn nutrition_on(&self, date: NaiveDate) -> Vec<&NutritionEntry> {
        self.journal.nutrition_on(date).collect()
    }

    pub fn workouts_on(&self, date: NaiveDate) -> Vec<&WorkoutEntry> {
        self.journal.workouts_on(date).collect()
    }

    pub fn daily_adherence(&self, date: NaiveDate) -> Result<DailyAdherence> {
        let target = self.daily_target()?;
        Ok(DailyAdherence::compute(
            date,
            self.journal.nutrition_on(date),
            target,
        ))
    }

    pub fn workout_progress(&self, query: &ProgressQuery) -> Vec<WorkoutBucket> {
        workout_progress(&self.journal.workouts, query).collect()
    }

    /// Buckets carry a delta against the profile's current daily target.
    pub fn nutrition_progress(&self, query: &ProgressQuery) -> Result<Vec<NutritionBucket>> {
        let target = self.daily_target()?;
        Ok(nutrition_progress(&self.journal.nutrition, query, Some(target)).collect())
    }

    #[must_use]
    pub fn report(&self, period_days: u32, today: NaiveDate) -> ProgressReport {
        ProgressReport::build(
            &self.journal.workouts,
            &self.journal.nutrition,
            &self.profile,
            period_days,
            today,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrainingGoal, TrainingMode, WorkoutSet};
    use crate::progress::{AdherenceStatus, Granularity};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        date(day).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn squat(day: u32) -> NewWorkoutEntry {
        NewWorkoutEntry {
            timestamp: at(day, 18),
            exercise: "Squat".to_string(),
            sets: vec![
                WorkoutSet {
                    weight_kg: 100.0,
                    reps: 8,
                    rpe: Some(9),
                },
                WorkoutSet {
                    weight_kg: 100.0,
                    reps: 6,
                    rpe: Some(10),
                },
            ],
            mode: TrainingMode::HeavyDuty,
            goal: TrainingGoal::Hypertrophy,
            duration_min: Some(25),
        }
    }

    #[test]
    fn test_open_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let svc = GymratService::open(dir.path(), None).unwrap();
        assert_eq!(svc.profile(), &UserProfile::default());
        assert!(svc.journal().workouts.is_empty());
        assert!(!svc.foods().is_empty());
    }

    #[test]
    fn test_update_profile_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        let update = ProfileUpdate {
            weight_kg: Some(80.0),
            height_cm: Some(180.0),
            age: Some(30),
            phase: Some(Phase::Bulk),
            ..ProfileUpdate::default()
        };
        svc.update_profile(&update, at(15, 9)).unwrap();
        assert_eq!(svc.profile().last_updated, Some(at(15, 9)));

        let reopened = GymratService::open(dir.path(), None).unwrap();
        assert_eq!(reopened.profile().phase, Phase::Bulk);
        // 80 kg / 180 cm / 30 y male, moderate: 1780 * 1.55 * 1.15
        assert_eq!(reopened.daily_target().unwrap().calories, 3172);
    }

    #[test]
    fn test_update_profile_rejects_invalid_and_keeps_old() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        let update = ProfileUpdate {
            weight_kg: Some(-1.0),
            ..ProfileUpdate::default()
        };
        assert!(matches!(
            svc.update_profile(&update, at(15, 9)),
            Err(CoreError::InvalidProfile { .. })
        ));
        assert_eq!(svc.profile(), &UserProfile::default());
    }

    #[test]
    fn test_daily_target_for_phase() {
        let dir = tempfile::tempdir().unwrap();
        let svc = GymratService::open(dir.path(), None).unwrap();
        let maintenance = svc.daily_target().unwrap();
        let cut = svc.daily_target_for_phase(Phase::Cut).unwrap();
        assert_eq!(cut.phase, Phase::Cut);
        assert!(cut.calories < maintenance.calories);
    }

    #[test]
    fn test_log_food_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        let entry = svc
            .log_food("oats", 80.0, MealType::Breakfast, at(15, 8))
            .unwrap()
            .clone();
        assert_eq!(entry.food, "Oats");
        // 389 kcal/100g * 0.8
        assert!((entry.nutrients.calories - 311.2).abs() < 0.01);

        let reopened = GymratService::open(dir.path(), None).unwrap();
        assert_eq!(reopened.nutrition_on(date(15)), vec![&entry]);
        assert!(reopened.nutrition_on(date(16)).is_empty());
    }

    #[test]
    fn test_log_unknown_food() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        let result = svc.log_food("Moon Cheese", 50.0, MealType::Snack, at(15, 8));
        assert!(matches!(result, Err(CoreError::UnknownFood(_))));
        assert!(svc.journal().nutrition.is_empty());
    }

    #[test]
    fn test_log_workout_rejects_bad_rpe() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        let mut bad = squat(15);
        bad.sets[0].rpe = Some(12);
        assert!(svc.log_workout(bad).is_err());
        assert!(svc.journal().workouts.is_empty());
    }

    #[test]
    fn test_delete_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        let keep = svc.log_workout(squat(14)).unwrap().id.clone();
        let drop = svc.log_workout(squat(15)).unwrap().id.clone();
        let meal = svc
            .log_food("Banana", 120.0, MealType::Snack, at(15, 10))
            .unwrap()
            .id
            .clone();

        match svc.delete_entry(&drop).unwrap() {
            DeletedEntry::Workout(w) => assert_eq!(w.id, drop),
            other => panic!("expected workout, got {other:?}"),
        }
        assert!(matches!(
            svc.delete_entry(&meal).unwrap(),
            DeletedEntry::Nutrition(_)
        ));
        assert!(matches!(
            svc.delete_entry(&drop),
            Err(CoreError::EntryNotFound(_))
        ));

        let reopened = GymratService::open(dir.path(), None).unwrap();
        let ids: Vec<&str> = reopened
            .journal()
            .workouts
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, vec![keep.as_str()]);
        assert!(reopened.journal().nutrition.is_empty());
    }

    #[test]
    fn test_daily_adherence_and_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        svc.log_food("Chicken Breast", 200.0, MealType::Lunch, at(15, 12))
            .unwrap();
        svc.log_food("White Rice (cooked)", 300.0, MealType::Lunch, at(15, 12))
            .unwrap();
        svc.log_workout(squat(15)).unwrap();

        let day = svc.daily_adherence(date(15)).unwrap();
        // 330 + 390 kcal
        assert!((day.consumed.calories - 720.0).abs() < 0.01);
        assert_eq!(day.status, AdherenceStatus::JustStarted);

        let query = ProgressQuery::new(Granularity::Day);
        let workouts = svc.workout_progress(&query);
        assert_eq!(workouts.len(), 1);
        assert!((workouts[0].total_volume - 1400.0).abs() < f64::EPSILON);

        let nutrition = svc.nutrition_progress(&query).unwrap();
        assert_eq!(nutrition.len(), 1);
        let target = svc.daily_target().unwrap();
        let delta = nutrition[0].target_delta.unwrap();
        assert!((delta.calories - (720.0 - f64::from(target.calories))).abs() < 0.01);
    }

    #[test]
    fn test_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = GymratService::open(dir.path(), None).unwrap();
        svc.log_workout(squat(14)).unwrap();
        svc.log_workout(squat(15)).unwrap();
        let report = svc.report(7, date(15));
        assert_eq!(report.training.as_ref().unwrap().total_workouts, 2);
        assert!(report.recovery.is_some());
        assert!(report.nutrition.is_none());
    }

    #[test]
    fn test_explicit_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"protein_ceiling_g_per_kg": 1.0}"#,
        )
        .unwrap();
        let from_file = GymratService::open(dir.path(), None).unwrap();
        assert_eq!(from_file.settings().protein_ceiling_g_per_kg, Some(1.0));

        let explicit =
            GymratService::open(dir.path(), Some(NutritionSettings::default())).unwrap();
        assert_eq!(explicit.settings().protein_ceiling_g_per_kg, None);
    }
}
