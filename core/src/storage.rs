//! Flat-file persistence under a single data directory:
//!
//! ```text
//! <root>/workouts/workout_log.csv      one row per set
//! <root>/nutrition/nutrition_log.csv   one row per food entry
//! <root>/user_profile.json
//! <root>/food_database.json            optional, replaces the built-in table
//! <root>/settings.json                 optional calculator constants
//! ```

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::foods::FoodDatabase;
use crate::macros::NutritionSettings;
use crate::models::{
    MacroTotals, MealType, NutritionEntry, TrainingGoal, TrainingMode, UserProfile, WorkoutEntry,
    WorkoutSet,
};
use crate::store::Journal;

#[derive(Debug, Serialize, Deserialize)]
struct WorkoutRow {
    id: String,
    timestamp: NaiveDateTime,
    exercise: String,
    set: usize,
    reps: u32,
    weight_kg: f64,
    rpe: Option<u8>,
    mode: TrainingMode,
    goal: TrainingGoal,
    duration_min: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NutritionRow {
    id: String,
    timestamp: NaiveDateTime,
    food: String,
    quantity_g: f64,
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    meal_type: MealType,
}

fn workout_rows(entry: &WorkoutEntry) -> impl Iterator<Item = WorkoutRow> + '_ {
    entry.sets.iter().enumerate().map(|(i, set)| WorkoutRow {
        id: entry.id.clone(),
        timestamp: entry.timestamp,
        exercise: entry.exercise.clone(),
        set: i + 1,
        reps: set.reps,
        weight_kg: set.weight_kg,
        rpe: set.rpe,
        mode: entry.mode,
        goal: entry.goal,
        duration_min: entry.duration_min,
    })
}

impl From<&NutritionEntry> for NutritionRow {
    fn from(e: &NutritionEntry) -> Self {
        Self {
            id: e.id.clone(),
            timestamp: e.timestamp,
            food: e.food.clone(),
            quantity_g: e.quantity_g,
            calories: e.nutrients.calories,
            protein_g: e.nutrients.protein_g,
            carbs_g: e.nutrients.carbs_g,
            fat_g: e.nutrients.fat_g,
            meal_type: e.meal_type,
        }
    }
}

impl From<NutritionRow> for NutritionEntry {
    fn from(r: NutritionRow) -> Self {
        Self {
            id: r.id,
            timestamp: r.timestamp,
            food: r.food,
            quantity_g: r.quantity_g,
            meal_type: r.meal_type,
            nutrients: MacroTotals::new(r.calories, r.protein_g, r.carbs_g, r.fat_g),
        }
    }
}

/// Rewrites (on delete) serialize the in-memory log, so any row that failed
/// to load is gone from disk afterwards. The rewrite warns with the count.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory layout.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self { root: root.into() };
        for dir in ["workouts", "nutrition"] {
            fs::create_dir_all(storage.root.join(dir))?;
        }
        Ok(storage)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn workout_log_path(&self) -> PathBuf {
        self.root.join("workouts").join("workout_log.csv")
    }

    #[must_use]
    pub fn nutrition_log_path(&self) -> PathBuf {
        self.root.join("nutrition").join("nutrition_log.csv")
    }

    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        self.root.join("user_profile.json")
    }

    #[must_use]
    pub fn food_database_path(&self) -> PathBuf {
        self.root.join("food_database.json")
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    // --- JSON documents ---

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    /// The saved profile, or the default one on first run.
    pub fn load_profile(&self) -> Result<UserProfile> {
        let profile = Self::read_json::<UserProfile>(&self.profile_path())?.unwrap_or_default();
        profile.validate()?;
        Ok(profile)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        profile.validate()?;
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(self.profile_path(), json)?;
        tracing::debug!(path = %self.profile_path().display(), "Saved profile");
        Ok(())
    }

    pub fn load_settings(&self) -> Result<NutritionSettings> {
        let settings =
            Self::read_json::<NutritionSettings>(&self.settings_path())?.unwrap_or_default();
        settings.validate()?;
        Ok(settings)
    }

    /// The user's food file if present, otherwise the built-in table.
    pub fn load_foods(&self) -> Result<FoodDatabase> {
        let path = self.food_database_path();
        if path.exists() {
            FoodDatabase::from_json_reader(BufReader::new(File::open(&path)?))
        } else {
            Ok(FoodDatabase::default())
        }
    }

    // --- CSV logs ---

    /// Deserialize every well-formed row; malformed rows are logged and skipped.
    fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        Ok(Self::read_rows_counted(path)?.0)
    }

    /// Well-formed rows plus the number of malformed rows skipped.
    fn read_rows_counted<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize)> {
        if !path.exists() {
            return Ok((Vec::new(), 0));
        }
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut rows = Vec::new();
        let mut skipped = 0;
        for (line_num, result) in rdr.deserialize::<T>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        path = %path.display(),
                        line = line_num + 2,
                        error = %e,
                        "Skipping malformed row"
                    );
                }
            }
        }
        Ok((rows, skipped))
    }

    fn warn_dropped<T: DeserializeOwned>(path: &Path) -> Result<usize> {
        let (_, skipped) = Self::read_rows_counted::<T>(path)?;
        if skipped > 0 {
            tracing::warn!(
                path = %path.display(),
                rows = skipped,
                "Rewrite discards malformed rows"
            );
        }
        Ok(skipped)
    }

    fn append_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
        let is_new = !matches!(fs::metadata(path), Ok(m) if m.len() > 0);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Replace a log file wholesale via a sibling temp file.
    fn rewrite_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
        let tmp = path.with_extension("csv.tmp");
        {
            let mut wtr = csv::Writer::from_path(&tmp)?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Workout rows regrouped into entries by id, in first-seen order.
    pub fn load_workouts(&self) -> Result<Vec<WorkoutEntry>> {
        let path = self.workout_log_path();
        let rows: Vec<WorkoutRow> = Self::read_rows(&path)?;

        let mut entries: Vec<WorkoutEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in rows {
            let set = WorkoutSet {
                weight_kg: row.weight_kg,
                reps: row.reps,
                rpe: row.rpe,
            };
            if let Err(e) = set.validate() {
                tracing::warn!(id = %row.id, error = %e, "Skipping invalid set");
                continue;
            }
            if let Some(&i) = index.get(&row.id) {
                entries[i].sets.push(set);
            } else {
                index.insert(row.id.clone(), entries.len());
                entries.push(WorkoutEntry {
                    id: row.id,
                    timestamp: row.timestamp,
                    exercise: row.exercise,
                    sets: vec![set],
                    mode: row.mode,
                    goal: row.goal,
                    duration_min: row.duration_min,
                });
            }
        }

        tracing::info!(path = %path.display(), entries = entries.len(), "Loaded workout log");
        Ok(entries)
    }

    pub fn load_nutrition(&self) -> Result<Vec<NutritionEntry>> {
        let path = self.nutrition_log_path();
        let rows: Vec<NutritionRow> = Self::read_rows(&path)?;
        let entries: Vec<NutritionEntry> = rows.into_iter().map(NutritionEntry::from).collect();
        tracing::info!(path = %path.display(), entries = entries.len(), "Loaded nutrition log");
        Ok(entries)
    }

    pub fn load_journal(&self) -> Result<Journal> {
        Ok(Journal::new(self.load_workouts()?, self.load_nutrition()?))
    }

    pub fn append_workout(&self, entry: &WorkoutEntry) -> Result<()> {
        Self::append_rows(&self.workout_log_path(), workout_rows(entry))?;
        tracing::debug!(id = %entry.id, exercise = %entry.exercise, "Appended workout");
        Ok(())
    }

    pub fn append_nutrition(&self, entry: &NutritionEntry) -> Result<()> {
        Self::append_rows(&self.nutrition_log_path(), [NutritionRow::from(entry)])?;
        tracing::debug!(id = %entry.id, food = %entry.food, "Appended nutrition entry");
        Ok(())
    }

    pub fn rewrite_workouts(&self, entries: &[WorkoutEntry]) -> Result<()> {
        let path = self.workout_log_path();
        Self::warn_dropped::<WorkoutRow>(&path)?;
        Self::rewrite_rows(&path, entries.iter().flat_map(workout_rows))?;
        tracing::info!(entries = entries.len(), "Rewrote workout log");
        Ok(())
    }

    pub fn rewrite_nutrition(&self, entries: &[NutritionEntry]) -> Result<()> {
        let path = self.nutrition_log_path();
        Self::warn_dropped::<NutritionRow>(&path)?;
        Self::rewrite_rows(&path, entries.iter().map(NutritionRow::from))?;
        tracing::info!(entries = entries.len(), "Rewrote nutrition log");
        Ok(())
    }
}
