use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, Mul, Sub};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Case- and separator-insensitive match against a fixed set of labels, so
/// "very active", "Very-Active" and "VeryActive" all resolve the same way.
fn parse_label<T: Copy>(
    all: &[T],
    label: fn(T) -> &'static str,
    kind: &'static str,
    input: &str,
) -> Result<T> {
    let normalize = |s: &str| -> String {
        s.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    };
    let wanted = normalize(input);
    all.iter()
        .copied()
        .find(|v| normalize(label(*v)) == wanted)
        .ok_or_else(|| {
            let options: Vec<&str> = all.iter().map(|v| label(*v)).collect();
            CoreError::entry(
                kind,
                format!("'{input}' must be one of: {}", options.join(", ")),
            )
        })
}

macro_rules! display_and_parse {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self> {
                parse_label(&Self::ALL, Self::label, $kind, s)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

display_and_parse!(Sex, "sex");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [Self; 4] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::VeryActive,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary",
            Self::Light => "Light",
            Self::Moderate => "Moderate",
            Self::VeryActive => "Very Active",
        }
    }
}

display_and_parse!(ActivityLevel, "activity level");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

display_and_parse!(ExperienceLevel, "experience level");

/// Heavy Duty is Mentzer's brief, infrequent, to-failure style; everything
/// else is logged as General.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingMode {
    HeavyDuty,
    General,
}

impl TrainingMode {
    pub const ALL: [Self; 2] = [Self::HeavyDuty, Self::General];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HeavyDuty => "Heavy Duty",
            Self::General => "General",
        }
    }
}

display_and_parse!(TrainingMode, "training mode");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrainingGoal {
    Strength,
    Hypertrophy,
    Power,
    Endurance,
}

impl TrainingGoal {
    pub const ALL: [Self; 4] = [
        Self::Strength,
        Self::Hypertrophy,
        Self::Power,
        Self::Endurance,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Hypertrophy => "Hypertrophy",
            Self::Power => "Power",
            Self::Endurance => "Endurance",
        }
    }
}

display_and_parse!(TrainingGoal, "training goal");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Maintenance,
    Bulk,
    Cut,
}

impl Phase {
    pub const ALL: [Self; 3] = [Self::Maintenance, Self::Bulk, Self::Cut];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Maintenance => "Maintenance",
            Self::Bulk => "Bulk",
            Self::Cut => "Cut",
        }
    }
}

display_and_parse!(Phase, "phase");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FoodCategory {
    Protein,
    Carbohydrate,
    Fat,
    Vegetable,
    Fruit,
    Dairy,
}

impl FoodCategory {
    pub const ALL: [Self; 6] = [
        Self::Protein,
        Self::Carbohydrate,
        Self::Fat,
        Self::Vegetable,
        Self::Fruit,
        Self::Dairy,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Protein => "Protein",
            Self::Carbohydrate => "Carbohydrate",
            Self::Fat => "Fat",
            Self::Vegetable => "Vegetable",
            Self::Fruit => "Fruit",
            Self::Dairy => "Dairy",
        }
    }
}

display_and_parse!(FoodCategory, "food category");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    PreWorkout,
    PostWorkout,
}

impl MealType {
    pub const ALL: [Self; 6] = [
        Self::Breakfast,
        Self::Lunch,
        Self::Dinner,
        Self::Snack,
        Self::PreWorkout,
        Self::PostWorkout,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
            Self::PreWorkout => "Pre-Workout",
            Self::PostWorkout => "Post-Workout",
        }
    }
}

display_and_parse!(MealType, "meal type");

// --- Profile ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub experience_level: ExperienceLevel,
    pub training_mode: TrainingMode,
    pub goal: TrainingGoal,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDateTime>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 25,
            weight_kg: 70.0,
            height_cm: 170.0,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
            experience_level: ExperienceLevel::Beginner,
            training_mode: TrainingMode::HeavyDuty,
            goal: TrainingGoal::Hypertrophy,
            phase: Phase::Maintenance,
            last_updated: None,
        }
    }
}

impl UserProfile {
    /// Reject profiles the calorie formula cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(CoreError::profile("weight_kg", "must be greater than 0"));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(CoreError::profile("height_cm", "must be greater than 0"));
        }
        if self.age == 0 {
            return Err(CoreError::profile("age", "must be greater than 0"));
        }
        Ok(())
    }
}

/// Partial profile edit; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub sex: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
    pub experience_level: Option<ExperienceLevel>,
    pub training_mode: Option<TrainingMode>,
    pub goal: Option<TrainingGoal>,
    pub phase: Option<Phase>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.sex.is_none()
            && self.activity_level.is_none()
            && self.experience_level.is_none()
            && self.training_mode.is_none()
            && self.goal.is_none()
            && self.phase.is_none()
    }

    /// Apply onto a copy of `profile` and validate the result.
    pub fn apply(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut next = profile.clone();
        if let Some(v) = self.age {
            next.age = v;
        }
        if let Some(v) = self.weight_kg {
            next.weight_kg = v;
        }
        if let Some(v) = self.height_cm {
            next.height_cm = v;
        }
        if let Some(v) = self.sex {
            next.sex = v;
        }
        if let Some(v) = self.activity_level {
            next.activity_level = v;
        }
        if let Some(v) = self.experience_level {
            next.experience_level = v;
        }
        if let Some(v) = self.training_mode {
            next.training_mode = v;
        }
        if let Some(v) = self.goal {
            next.goal = v;
        }
        if let Some(v) = self.phase {
            next.phase = v;
        }
        next.validate()?;
        Ok(next)
    }
}

// --- Nutrition ---

/// Calories and macro grams, either per food portion or summed over a log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MacroTotals {
    #[must_use]
    pub fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    /// Energy implied by the macro grams alone (4/4/9 kcal per gram).
    #[must_use]
    pub fn macro_kcal(&self) -> f64 {
        self.protein_g * KCAL_PER_G_PROTEIN
            + self.carbs_g * KCAL_PER_G_CARBS
            + self.fat_g * KCAL_PER_G_FAT
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for MacroTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.protein_g += rhs.protein_g;
        self.carbs_g += rhs.carbs_g;
        self.fat_g += rhs.fat_g;
    }
}

impl Sub for MacroTotals {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            calories: self.calories - rhs.calories,
            protein_g: self.protein_g - rhs.protein_g,
            carbs_g: self.carbs_g - rhs.carbs_g,
            fat_g: self.fat_g - rhs.fat_g,
        }
    }
}

impl Mul<f64> for MacroTotals {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
        }
    }
}

impl Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, m| {
            acc += m;
            acc
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub category: FoodCategory,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
}

impl FoodItem {
    #[must_use]
    pub fn nutrients_for(&self, grams: f64) -> MacroTotals {
        let factor = grams / 100.0;
        MacroTotals {
            calories: self.calories_per_100g * factor,
            protein_g: self.protein_per_100g * factor,
            carbs_g: self.carbs_per_100g * factor,
            fat_g: self.fat_per_100g * factor,
        }
    }
}

/// Validate food reference data: name must not be empty, values must not be negative.
pub fn validate_food_item(food: &FoodItem) -> Result<()> {
    if food.name.trim().is_empty() {
        return Err(CoreError::entry("food name", "must not be empty"));
    }
    let values = [
        ("calories_per_100g", food.calories_per_100g),
        ("protein_per_100g", food.protein_per_100g),
        ("carbs_per_100g", food.carbs_per_100g),
        ("fat_per_100g", food.fat_per_100g),
    ];
    for (field, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::entry(field, "must not be negative"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub food: String,
    pub quantity_g: f64,
    pub meal_type: MealType,
    /// Snapshot taken when the entry was logged.
    pub nutrients: MacroTotals,
}

#[derive(Debug, Clone)]
pub struct NewNutritionEntry {
    pub timestamp: NaiveDateTime,
    pub food: String,
    pub quantity_g: f64,
    pub meal_type: MealType,
}

impl NewNutritionEntry {
    pub fn validate(&self) -> Result<()> {
        if self.food.trim().is_empty() {
            return Err(CoreError::entry("food", "must not be empty"));
        }
        validate_quantity(self.quantity_g)
    }

    /// Resolve against the food table and assign a fresh id.
    pub fn into_entry(self, food: &FoodItem) -> Result<NutritionEntry> {
        self.validate()?;
        Ok(NutritionEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: self.timestamp,
            nutrients: food.nutrients_for(self.quantity_g),
            food: food.name.clone(),
            quantity_g: self.quantity_g,
            meal_type: self.meal_type,
        })
    }
}

pub fn validate_quantity(quantity_g: f64) -> Result<()> {
    if !quantity_g.is_finite() || quantity_g <= 0.0 {
        return Err(CoreError::entry("quantity", "must be greater than 0"));
    }
    Ok(())
}

// --- Training ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight_kg: f64,
    pub reps: u32,
    #[serde(default)]
    pub rpe: Option<u8>,
}

impl WorkoutSet {
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight_kg * f64::from(self.reps)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.weight_kg.is_finite() || self.weight_kg < 0.0 {
            return Err(CoreError::entry("weight", "must not be negative"));
        }
        if self.reps == 0 {
            return Err(CoreError::entry("reps", "must be greater than 0"));
        }
        validate_rpe(self.rpe)
    }
}

pub fn validate_rpe(rpe: Option<u8>) -> Result<()> {
    match rpe {
        Some(v) if !(1..=10).contains(&v) => Err(CoreError::entry(
            "rpe",
            format!("must be between 1 and 10 (got {v})"),
        )),
        _ => Ok(()),
    }
}

/// One exercise performed in a session: its sets plus the context it was trained in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub exercise: String,
    pub sets: Vec<WorkoutSet>,
    pub mode: TrainingMode,
    pub goal: TrainingGoal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
}

impl WorkoutEntry {
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }

    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.sets.iter().map(|s| s.reps).sum()
    }

    /// Mean over the sets that recorded an RPE.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_rpe(&self) -> Option<f64> {
        let rated: Vec<u8> = self.sets.iter().filter_map(|s| s.rpe).collect();
        if rated.is_empty() {
            return None;
        }
        let sum: u32 = rated.iter().map(|&r| u32::from(r)).sum();
        Some(f64::from(sum) / rated.len() as f64)
    }
}

#[derive(Debug, Clone)]
pub struct NewWorkoutEntry {
    pub timestamp: NaiveDateTime,
    pub exercise: String,
    pub sets: Vec<WorkoutSet>,
    pub mode: TrainingMode,
    pub goal: TrainingGoal,
    pub duration_min: Option<u32>,
}

impl NewWorkoutEntry {
    pub fn validate(&self) -> Result<()> {
        if self.exercise.trim().is_empty() {
            return Err(CoreError::entry("exercise", "must not be empty"));
        }
        if self.sets.is_empty() {
            return Err(CoreError::entry("sets", "at least one set is required"));
        }
        for set in &self.sets {
            set.validate()?;
        }
        Ok(())
    }

    pub fn into_entry(self) -> Result<WorkoutEntry> {
        self.validate()?;
        Ok(WorkoutEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: self.timestamp,
            exercise: self.exercise.trim().to_string(),
            sets: self.sets,
            mode: self.mode,
            goal: self.goal,
            duration_min: self.duration_min,
        })
    }
}

// --- Targets ---

/// Derived daily intake target; never persisted, recomputed from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTarget {
    pub phase: Phase,
    pub calories: u32,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl DailyTarget {
    #[must_use]
    pub fn protein_kcal(&self) -> f64 {
        self.protein_g * KCAL_PER_G_PROTEIN
    }

    #[must_use]
    pub fn carbs_kcal(&self) -> f64 {
        self.carbs_g * KCAL_PER_G_CARBS
    }

    #[must_use]
    pub fn fat_kcal(&self) -> f64 {
        self.fat_g * KCAL_PER_G_FAT
    }

    #[must_use]
    pub fn total_macro_kcal(&self) -> f64 {
        self.protein_kcal() + self.carbs_kcal() + self.fat_kcal()
    }

    #[must_use]
    pub fn as_totals(&self) -> MacroTotals {
        MacroTotals {
            calories: f64::from(self.calories),
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
        }
    }
}
