//! Bucketed summaries over the workout and nutrition logs.
//!
//! Every function here is a pure pass over borrowed entries: the same input
//! always yields the same output, and no matching entries means an empty
//! result rather than an error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::macros::{CARB_RATIO, FAT_RATIO, PROTEIN_RATIO};
use crate::models::{
    DailyTarget, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN, MacroTotals, MealType,
    NutritionEntry, TrainingGoal, WorkoutEntry,
};
use crate::store::LogRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Granularity {
    #[default]
    Day,
    /// ISO weeks, starting Monday.
    Week,
}

impl Granularity {
    /// First day of the bucket containing `date`.
    #[must_use]
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
        }
    }

    fn next_bucket(self, bucket: NaiveDate) -> Option<NaiveDate> {
        let step = match self {
            Self::Day => 1,
            Self::Week => 7,
        };
        bucket.checked_add_days(Days::new(step))
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Week => "week",
        })
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            other => Err(CoreError::entry(
                "granularity",
                format!("'{other}' must be one of: day, week"),
            )),
        }
    }
}

/// What to aggregate and how. `filter` names an exercise for workout
/// queries, or a meal type (falling back to a food name) for nutrition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressQuery {
    pub granularity: Granularity,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub filter: Option<String>,
    /// Report every bucket in range, zero-filled, instead of only non-empty ones.
    pub dense: bool,
}

impl ProgressQuery {
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn dense(mut self) -> Self {
        self.dense = true;
        self
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Insert an empty accumulator for every missing bucket of a dense query.
    fn fill_gaps<A: Default>(&self, groups: &mut BTreeMap<NaiveDate, A>) {
        if !self.dense {
            return;
        }
        let g = self.granularity;
        let first = self
            .from
            .map(|d| g.bucket_start(d))
            .or_else(|| groups.keys().next().copied());
        let last = self
            .to
            .map(|d| g.bucket_start(d))
            .or_else(|| groups.keys().next_back().copied());
        let (Some(mut cursor), Some(last)) = (first, last) else {
            return;
        };
        while cursor <= last {
            groups.entry(cursor).or_default();
            match g.next_bucket(cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

// --- Workouts ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutBucket {
    pub bucket: NaiveDate,
    /// Distinct calendar days with training.
    pub sessions: usize,
    /// Distinct exercise names.
    pub exercises: usize,
    pub sets: usize,
    pub total_reps: u64,
    pub total_volume: f64,
    pub average_rpe: Option<f64>,
    pub rpe_distribution: BTreeMap<u8, usize>,
}

#[derive(Default)]
struct WorkoutAcc {
    days: BTreeSet<NaiveDate>,
    exercises: BTreeSet<String>,
    sets: usize,
    total_reps: u64,
    total_volume: f64,
    rpe_sum: u64,
    rpe_distribution: BTreeMap<u8, usize>,
}

impl WorkoutAcc {
    fn add(&mut self, entry: &WorkoutEntry) {
        self.days.insert(entry.date());
        self.exercises.insert(entry.exercise.to_lowercase());
        for set in &entry.sets {
            self.sets += 1;
            self.total_reps += u64::from(set.reps);
            self.total_volume += set.volume();
            if let Some(rpe) = set.rpe {
                self.rpe_sum += u64::from(rpe);
                *self.rpe_distribution.entry(rpe).or_default() += 1;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self, bucket: NaiveDate) -> WorkoutBucket {
        let rated: usize = self.rpe_distribution.values().sum();
        WorkoutBucket {
            bucket,
            sessions: self.days.len(),
            exercises: self.exercises.len(),
            sets: self.sets,
            total_reps: self.total_reps,
            total_volume: self.total_volume,
            average_rpe: (rated > 0).then(|| self.rpe_sum as f64 / rated as f64),
            rpe_distribution: self.rpe_distribution,
        }
    }
}

/// Workout volume and intensity per time bucket, oldest bucket first.
pub fn workout_progress<'a, I>(
    entries: I,
    query: &ProgressQuery,
) -> impl Iterator<Item = WorkoutBucket>
where
    I: IntoIterator<Item = &'a WorkoutEntry>,
{
    let mut groups: BTreeMap<NaiveDate, WorkoutAcc> = BTreeMap::new();
    for entry in entries {
        if !query.in_range(entry.date()) {
            continue;
        }
        if let Some(f) = &query.filter {
            if !same_name(&entry.exercise, f) {
                continue;
            }
        }
        groups
            .entry(query.granularity.bucket_start(entry.date()))
            .or_default()
            .add(entry);
    }
    query.fill_gaps(&mut groups);
    groups.into_iter().map(|(bucket, acc)| acc.finish(bucket))
}

/// Exercises ranked by number of sets logged, most first; ties by name.
pub fn exercise_frequency<'a>(
    entries: impl IntoIterator<Item = &'a WorkoutEntry>,
    top: usize,
) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.exercise.clone()).or_default() += entry.sets.len();
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top);
    ranked
}

/// Sets logged per training goal.
pub fn goal_distribution<'a>(
    entries: impl IntoIterator<Item = &'a WorkoutEntry>,
) -> BTreeMap<TrainingGoal, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.goal).or_default() += entry.sets.len();
    }
    counts
}

// --- Nutrition ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionBucket {
    pub bucket: NaiveDate,
    pub days_logged: usize,
    pub entries: usize,
    pub totals: MacroTotals,
    /// Totals divided by days logged; zero for an empty bucket.
    pub daily_average: MacroTotals,
    /// `totals - target * days_logged`, when a target was supplied.
    pub target_delta: Option<MacroTotals>,
}

#[derive(Default)]
struct NutritionAcc {
    days: BTreeSet<NaiveDate>,
    entries: usize,
    totals: MacroTotals,
}

impl NutritionAcc {
    #[allow(clippy::cast_precision_loss)]
    fn finish(self, bucket: NaiveDate, target: Option<&DailyTarget>) -> NutritionBucket {
        let days = self.days.len() as f64;
        let daily_average = if self.days.is_empty() {
            MacroTotals::default()
        } else {
            self.totals * (1.0 / days)
        };
        NutritionBucket {
            bucket,
            days_logged: self.days.len(),
            entries: self.entries,
            totals: self.totals,
            daily_average,
            target_delta: target.map(|t| self.totals - t.as_totals() * days),
        }
    }
}

enum NutritionFilter {
    Meal(MealType),
    Food(String),
}

impl NutritionFilter {
    fn parse(raw: &str) -> Self {
        raw.parse::<MealType>()
            .map_or_else(|_| Self::Food(raw.to_string()), Self::Meal)
    }

    fn matches(&self, entry: &NutritionEntry) -> bool {
        match self {
            Self::Meal(meal) => entry.meal_type == *meal,
            Self::Food(name) => same_name(&entry.food, name),
        }
    }
}

/// Intake per time bucket, oldest bucket first, optionally compared with a daily target.
pub fn nutrition_progress<'a, I>(
    entries: I,
    query: &ProgressQuery,
    target: Option<DailyTarget>,
) -> impl Iterator<Item = NutritionBucket>
where
    I: IntoIterator<Item = &'a NutritionEntry>,
{
    let filter = query.filter.as_deref().map(NutritionFilter::parse);
    let mut groups: BTreeMap<NaiveDate, NutritionAcc> = BTreeMap::new();
    for entry in entries {
        if !query.in_range(entry.date()) {
            continue;
        }
        if filter.as_ref().is_some_and(|f| !f.matches(entry)) {
            continue;
        }
        let acc = groups
            .entry(query.granularity.bucket_start(entry.date()))
            .or_default();
        acc.days.insert(entry.date());
        acc.entries += 1;
        acc.totals += entry.nutrients;
    }
    query.fill_gaps(&mut groups);
    groups
        .into_iter()
        .map(move |(bucket, acc)| acc.finish(bucket, target.as_ref()))
}

pub fn calories_by_meal<'a>(
    entries: impl IntoIterator<Item = &'a NutritionEntry>,
) -> BTreeMap<MealType, f64> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.meal_type).or_default() += entry.nutrients.calories;
    }
    totals
}

/// Foods ranked by total calories contributed, most first.
pub fn top_foods_by_calories<'a>(
    entries: impl IntoIterator<Item = &'a NutritionEntry>,
    top: usize,
) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.food.clone()).or_default() += entry.nutrients.calories;
    }
    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top);
    ranked
}

/// Mean intake per logged day over the whole slice.
#[allow(clippy::cast_precision_loss)]
pub fn daily_average<'a>(
    entries: impl IntoIterator<Item = &'a NutritionEntry>,
) -> Option<MacroTotals> {
    let mut days = BTreeSet::new();
    let mut totals = MacroTotals::default();
    for entry in entries {
        days.insert(entry.date());
        totals += entry.nutrients;
    }
    (!days.is_empty()).then(|| totals * (1.0 / days.len() as f64))
}

// --- Macro ratio ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatioAdherence {
    Excellent,
    Good,
    NeedsWork,
}

impl RatioAdherence {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent adherence",
            Self::Good => "Good adherence",
            Self::NeedsWork => "Work on hitting ratios",
        }
    }
}

/// Share of macro energy from each macro, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroRatio {
    pub carbs_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
}

impl MacroRatio {
    /// `None` when the totals carry no macro energy at all.
    #[must_use]
    pub fn of(totals: &MacroTotals) -> Option<Self> {
        let kcal = totals.macro_kcal();
        if kcal <= 0.0 {
            return None;
        }
        Some(Self {
            carbs_pct: totals.carbs_g * KCAL_PER_G_CARBS / kcal * 100.0,
            protein_pct: totals.protein_g * KCAL_PER_G_PROTEIN / kcal * 100.0,
            fat_pct: totals.fat_g * KCAL_PER_G_FAT / kcal * 100.0,
        })
    }

    /// Graded on the largest deviation from the 60/25/15 split.
    #[must_use]
    pub fn adherence(&self) -> RatioAdherence {
        let worst = [
            (self.carbs_pct - CARB_RATIO * 100.0).abs(),
            (self.protein_pct - PROTEIN_RATIO * 100.0).abs(),
            (self.fat_pct - FAT_RATIO * 100.0).abs(),
        ]
        .into_iter()
        .fold(0.0, f64::max);
        if worst < 5.0 {
            RatioAdherence::Excellent
        } else if worst < 10.0 {
            RatioAdherence::Good
        } else {
            RatioAdherence::NeedsWork
        }
    }
}

// --- Daily adherence ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdherenceStatus {
    Excellent,
    Good,
    KeepGoing,
    JustStarted,
}

impl AdherenceStatus {
    #[must_use]
    pub fn from_percent(overall: f64) -> Self {
        if overall >= 90.0 {
            Self::Excellent
        } else if overall >= 70.0 {
            Self::Good
        } else if overall >= 50.0 {
            Self::KeepGoing
        } else {
            Self::JustStarted
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent adherence",
            Self::Good => "Good progress",
            Self::KeepGoing => "Keep adding foods",
            Self::JustStarted => "Just getting started",
        }
    }
}

/// One day's intake measured against its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAdherence {
    pub date: NaiveDate,
    pub consumed: MacroTotals,
    pub target: DailyTarget,
    pub calories_pct: f64,
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
    /// Mean of the four percentages.
    pub overall_pct: f64,
    pub status: AdherenceStatus,
}

fn percent_of(consumed: f64, target: f64) -> f64 {
    if target > 0.0 {
        consumed / target * 100.0
    } else {
        0.0
    }
}

impl DailyAdherence {
    /// Entries dated on other days are ignored.
    pub fn compute<'a>(
        date: NaiveDate,
        entries: impl IntoIterator<Item = &'a NutritionEntry>,
        target: DailyTarget,
    ) -> Self {
        let consumed: MacroTotals = entries
            .into_iter()
            .filter(|e| e.date() == date)
            .map(|e| e.nutrients)
            .sum();
        let calories_pct = percent_of(consumed.calories, f64::from(target.calories));
        let protein_pct = percent_of(consumed.protein_g, target.protein_g);
        let carbs_pct = percent_of(consumed.carbs_g, target.carbs_g);
        let fat_pct = percent_of(consumed.fat_g, target.fat_g);
        let overall_pct = (calories_pct + protein_pct + carbs_pct + fat_pct) / 4.0;
        Self {
            date,
            consumed,
            target,
            calories_pct,
            protein_pct,
            carbs_pct,
            fat_pct,
            overall_pct,
            status: AdherenceStatus::from_percent(overall_pct),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> MacroTotals {
        self.target.as_totals() - self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::models::{Phase, TrainingMode, WorkoutSet};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        date(day).and_hms_opt(hour, 0, 0).unwrap()
    }

    fn set(weight_kg: f64, reps: u32, rpe: Option<u8>) -> WorkoutSet {
        WorkoutSet {
            weight_kg,
            reps,
            rpe,
        }
    }

    fn lift(day: u32, exercise: &str, sets: Vec<WorkoutSet>) -> WorkoutEntry {
        WorkoutEntry {
            id: format!("{exercise}-{day}"),
            timestamp: at(day, 18),
            exercise: exercise.to_string(),
            sets,
            mode: TrainingMode::HeavyDuty,
            goal: TrainingGoal::Hypertrophy,
            duration_min: Some(30),
        }
    }

    fn food(day: u32, name: &str, meal: MealType, n: MacroTotals) -> NutritionEntry {
        NutritionEntry {
            id: format!("{name}-{day}"),
            timestamp: at(day, 12),
            food: name.to_string(),
            quantity_g: 100.0,
            meal_type: meal,
            nutrients: n,
        }
    }

    fn target() -> DailyTarget {
        DailyTarget {
            phase: Phase::Maintenance,
            calories: 2400,
            protein_g: 150.0,
            carbs_g: 360.0,
            fat_g: 40.0,
        }
    }

    fn sample_workouts() -> Vec<WorkoutEntry> {
        vec![
            // 2024-06-10 is a Monday
            lift(10, "Squat", vec![set(100.0, 5, Some(8)), set(100.0, 5, Some(9))]),
            lift(10, "Bench Press", vec![set(80.0, 8, Some(9))]),
            lift(12, "Squat", vec![set(105.0, 5, None)]),
            lift(17, "Deadlift", vec![set(140.0, 3, Some(10))]),
        ]
    }

    #[test]
    fn test_bucket_start_week_truncates_to_monday() {
        // Sunday 2024-06-16 -> Monday 2024-06-10
        assert_eq!(Granularity::Week.bucket_start(date(16)), date(10));
        assert_eq!(Granularity::Week.bucket_start(date(10)), date(10));
        assert_eq!(Granularity::Week.bucket_start(date(17)), date(17));
        assert_eq!(Granularity::Day.bucket_start(date(16)), date(16));
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("Week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("daily".parse::<Granularity>().unwrap(), Granularity::Day);
        assert!("month".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_workout_progress_by_day() {
        let entries = sample_workouts();
        let buckets: Vec<WorkoutBucket> =
            workout_progress(&entries, &ProgressQuery::new(Granularity::Day)).collect();
        assert_eq!(buckets.len(), 3);

        let first = &buckets[0];
        assert_eq!(first.bucket, date(10));
        assert_eq!(first.sessions, 1);
        assert_eq!(first.exercises, 2);
        assert_eq!(first.sets, 3);
        assert_eq!(first.total_reps, 18);
        // 500 + 500 + 640
        assert!((first.total_volume - 1640.0).abs() < f64::EPSILON);
        // (8 + 9 + 9) / 3
        assert!((first.average_rpe.unwrap() - 26.0 / 3.0).abs() < 1e-9);
        assert_eq!(first.rpe_distribution.get(&9), Some(&2));

        assert_eq!(buckets[1].average_rpe, None);
    }

    #[test]
    fn test_workout_progress_by_week() {
        let entries = sample_workouts();
        let buckets: Vec<WorkoutBucket> =
            workout_progress(&entries, &ProgressQuery::new(Granularity::Week)).collect();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].bucket, date(10));
        assert_eq!(buckets[0].sessions, 2);
        assert_eq!(buckets[0].sets, 4);
        assert_eq!(buckets[1].bucket, date(17));
    }

    #[test]
    fn test_workout_progress_filter_is_case_insensitive() {
        let entries = sample_workouts();
        let query = ProgressQuery::new(Granularity::Day).filter("squat");
        let buckets: Vec<WorkoutBucket> = workout_progress(&entries, &query).collect();
        assert_eq!(buckets.len(), 2);
        assert!(buckets.iter().all(|b| b.exercises == 1));
    }

    #[test]
    fn test_progress_is_idempotent() {
        let entries = sample_workouts();
        let query = ProgressQuery::new(Granularity::Week).dense();
        let a: Vec<WorkoutBucket> = workout_progress(&entries, &query).collect();
        let b: Vec<WorkoutBucket> = workout_progress(&entries, &query).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_range_is_empty_not_error() {
        let entries = sample_workouts();
        let query = ProgressQuery::new(Granularity::Day).between(date(1), date(5));
        assert_eq!(workout_progress(&entries, &query).count(), 0);

        let none: Vec<NutritionEntry> = Vec::new();
        let query = ProgressQuery::new(Granularity::Day).dense();
        assert_eq!(nutrition_progress(&none, &query, Some(target())).count(), 0);
    }

    #[test]
    fn test_sparse_omits_gaps_dense_zero_fills() {
        let entries = sample_workouts();
        let sparse: Vec<NaiveDate> =
            workout_progress(&entries, &ProgressQuery::new(Granularity::Day))
                .map(|b| b.bucket)
                .collect();
        assert_eq!(sparse, vec![date(10), date(12), date(17)]);

        let dense: Vec<WorkoutBucket> =
            workout_progress(&entries, &ProgressQuery::new(Granularity::Day).dense()).collect();
        assert_eq!(dense.len(), 8);
        let gap = &dense[1];
        assert_eq!(gap.bucket, date(11));
        assert_eq!(gap.sets, 0);
        assert!(gap.total_volume.abs() < f64::EPSILON);
        assert_eq!(gap.average_rpe, None);
    }

    #[test]
    fn test_dense_with_explicit_range_and_no_data() {
        let none: Vec<WorkoutEntry> = Vec::new();
        let query = ProgressQuery::new(Granularity::Week)
            .between(date(3), date(20))
            .dense();
        let buckets: Vec<NaiveDate> = workout_progress(&none, &query).map(|b| b.bucket).collect();
        assert_eq!(buckets, vec![date(3), date(10), date(17)]);
    }

    #[test]
    fn test_nutrition_progress_with_target_delta() {
        let entries = vec![
            food(10, "Oats", MealType::Breakfast, MacroTotals::new(1200.0, 75.0, 180.0, 20.0)),
            food(10, "Rice", MealType::Dinner, MacroTotals::new(1200.0, 75.0, 180.0, 20.0)),
            food(11, "Oats", MealType::Breakfast, MacroTotals::new(1000.0, 50.0, 150.0, 20.0)),
        ];
        let buckets: Vec<NutritionBucket> = nutrition_progress(
            &entries,
            &ProgressQuery::new(Granularity::Week),
            Some(target()),
        )
        .collect();
        assert_eq!(buckets.len(), 1);
        let week = &buckets[0];
        assert_eq!(week.days_logged, 2);
        assert_eq!(week.entries, 3);
        assert!((week.totals.calories - 3400.0).abs() < 1e-9);
        assert!((week.daily_average.calories - 1700.0).abs() < 1e-9);
        // 3400 - 2400 * 2
        let delta = week.target_delta.unwrap();
        assert!((delta.calories + 1400.0).abs() < 1e-9);
        assert!((delta.protein_g + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_nutrition_filter_by_meal_or_food() {
        let entries = vec![
            food(10, "Oats", MealType::Breakfast, MacroTotals::new(300.0, 10.0, 50.0, 5.0)),
            food(10, "Rice", MealType::Dinner, MacroTotals::new(400.0, 8.0, 80.0, 1.0)),
        ];
        let by_meal = ProgressQuery::new(Granularity::Day).filter("dinner");
        let b: Vec<NutritionBucket> = nutrition_progress(&entries, &by_meal, None).collect();
        assert!((b[0].totals.calories - 400.0).abs() < f64::EPSILON);
        assert_eq!(b[0].target_delta, None);

        let by_food = ProgressQuery::new(Granularity::Day).filter("OATS");
        let b: Vec<NutritionBucket> = nutrition_progress(&entries, &by_food, None).collect();
        assert_eq!(b[0].entries, 1);
        assert!((b[0].totals.calories - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exercise_frequency_and_goal_distribution() {
        let entries = sample_workouts();
        let freq = exercise_frequency(&entries, 2);
        assert_eq!(
            freq,
            vec![("Squat".to_string(), 3), ("Bench Press".to_string(), 1)]
        );
        let goals = goal_distribution(&entries);
        assert_eq!(goals.get(&TrainingGoal::Hypertrophy), Some(&5));
        assert!(exercise_frequency(std::iter::empty(), 10).is_empty());
    }

    #[test]
    fn test_meal_and_food_rankings() {
        let entries = vec![
            food(10, "Oats", MealType::Breakfast, MacroTotals::new(300.0, 10.0, 50.0, 5.0)),
            food(11, "Oats", MealType::Breakfast, MacroTotals::new(300.0, 10.0, 50.0, 5.0)),
            food(11, "Rice", MealType::Dinner, MacroTotals::new(400.0, 8.0, 80.0, 1.0)),
        ];
        let meals = calories_by_meal(&entries);
        assert!((meals[&MealType::Breakfast] - 600.0).abs() < f64::EPSILON);
        let top = top_foods_by_calories(&entries, 1);
        assert_eq!(top[0].0, "Oats");

        let avg = daily_average(&entries).unwrap();
        assert!((avg.calories - 500.0).abs() < f64::EPSILON);
        assert_eq!(daily_average(std::iter::empty()), None);
    }

    #[test]
    fn test_macro_ratio_adherence() {
        let exact = MacroRatio::of(&target().as_totals()).unwrap();
        assert!((exact.carbs_pct - 60.0).abs() < 1e-9);
        assert_eq!(exact.adherence(), RatioAdherence::Excellent);

        // 30/40/30 by kcal
        let off = MacroRatio::of(&MacroTotals::new(1000.0, 100.0, 75.0, 33.333)).unwrap();
        assert_eq!(off.adherence(), RatioAdherence::NeedsWork);

        // carbs 52%, protein 30%, fat 18%
        let close = MacroRatio::of(&MacroTotals::new(0.0, 75.0, 130.0, 20.0)).unwrap();
        assert_eq!(close.adherence(), RatioAdherence::Good);

        assert_eq!(MacroRatio::of(&MacroTotals::default()), None);
    }

    #[test]
    fn test_daily_adherence() {
        let entries = vec![
            food(10, "Oats", MealType::Breakfast, MacroTotals::new(1200.0, 75.0, 180.0, 20.0)),
            food(11, "Rice", MealType::Dinner, MacroTotals::new(900.0, 10.0, 10.0, 10.0)),
        ];
        let day = DailyAdherence::compute(date(10), &entries, target());
        assert!((day.calories_pct - 50.0).abs() < 1e-9);
        assert!((day.overall_pct - 50.0).abs() < 1e-9);
        assert_eq!(day.status, AdherenceStatus::KeepGoing);
        assert!((day.remaining().calories - 1200.0).abs() < 1e-9);

        let empty = DailyAdherence::compute(date(20), &entries, target());
        assert_eq!(empty.status, AdherenceStatus::JustStarted);
        assert!(empty.consumed.is_zero());
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(AdherenceStatus::from_percent(95.0), AdherenceStatus::Excellent);
        assert_eq!(AdherenceStatus::from_percent(90.0), AdherenceStatus::Excellent);
        assert_eq!(AdherenceStatus::from_percent(70.0), AdherenceStatus::Good);
        assert_eq!(AdherenceStatus::from_percent(49.9), AdherenceStatus::JustStarted);
    }
}
