use anyhow::Result;
use chrono::Local;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use gymrat_core::progress::{Granularity, ProgressQuery};
use gymrat_core::service::GymratService;

use super::helpers::{no_neg_zero, window_start};

fn build_query(by: &str, days: u32, filter: Option<String>, dense: bool) -> Result<ProgressQuery> {
    let today = Local::now().date_naive();
    let from = window_start(today, days)?;
    let mut query = ProgressQuery::new(by.parse::<Granularity>()?).between(from, today);
    query.filter = filter;
    query.dense = dense;
    Ok(query)
}

pub(crate) fn cmd_progress_workouts(
    svc: &GymratService,
    by: &str,
    days: u32,
    filter: Option<String>,
    dense: bool,
    json: bool,
) -> Result<()> {
    #[derive(Tabled)]
    struct WorkoutRow {
        #[tabled(rename = "Bucket")]
        bucket: String,
        #[tabled(rename = "Sessions")]
        sessions: usize,
        #[tabled(rename = "Exercises")]
        exercises: usize,
        #[tabled(rename = "Sets")]
        sets: usize,
        #[tabled(rename = "Reps")]
        reps: u64,
        #[tabled(rename = "Volume (kg)")]
        volume: String,
        #[tabled(rename = "Avg RPE")]
        rpe: String,
    }

    let query = build_query(by, days, filter, dense)?;
    let buckets = svc.workout_progress(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
        return Ok(());
    }

    if buckets.iter().all(|b| b.sets == 0) {
        eprintln!("No workouts in the last {days} days");
        process::exit(2);
    }

    let rows: Vec<WorkoutRow> = buckets
        .iter()
        .map(|b| WorkoutRow {
            bucket: b.bucket.format("%Y-%m-%d").to_string(),
            sessions: b.sessions,
            exercises: b.exercises,
            sets: b.sets,
            reps: b.total_reps,
            volume: format!("{:.0}", no_neg_zero(b.total_volume)),
            rpe: b.average_rpe.map_or("-".into(), |r| format!("{r:.1}")),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_progress_nutrition(
    svc: &GymratService,
    by: &str,
    days: u32,
    filter: Option<String>,
    dense: bool,
    json: bool,
) -> Result<()> {
    #[derive(Tabled)]
    struct NutritionRow {
        #[tabled(rename = "Bucket")]
        bucket: String,
        #[tabled(rename = "Days")]
        days: usize,
        #[tabled(rename = "Calories/day")]
        calories: String,
        #[tabled(rename = "Protein/day")]
        protein: String,
        #[tabled(rename = "Carbs/day")]
        carbs: String,
        #[tabled(rename = "Fat/day")]
        fat: String,
        #[tabled(rename = "vs Target")]
        delta: String,
    }

    let query = build_query(by, days, filter, dense)?;
    let buckets = svc.nutrition_progress(&query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
        return Ok(());
    }

    if buckets.iter().all(|b| b.entries == 0) {
        eprintln!("No nutrition entries in the last {days} days");
        process::exit(2);
    }

    let rows: Vec<NutritionRow> = buckets
        .iter()
        .map(|b| {
            let avg = &b.daily_average;
            let cal = no_neg_zero(avg.calories);
            let p = no_neg_zero(avg.protein_g);
            let c = no_neg_zero(avg.carbs_g);
            let f = no_neg_zero(avg.fat_g);
            NutritionRow {
                bucket: b.bucket.format("%Y-%m-%d").to_string(),
                days: b.days_logged,
                calories: format!("{cal:.0}"),
                protein: format!("{p:.0}g"),
                carbs: format!("{c:.0}g"),
                fat: format!("{f:.0}g"),
                delta: b
                    .target_delta
                    .map_or("-".into(), |d| format!("{:+.0} kcal", no_neg_zero(d.calories))),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query() {
        let q = build_query("week", 28, Some("Squat".to_string()), true).unwrap();
        assert_eq!(q.granularity, Granularity::Week);
        let (from, to) = (q.from.unwrap(), q.to.unwrap());
        assert_eq!((to - from).num_days(), 27);
        assert_eq!(q.filter.as_deref(), Some("Squat"));
        assert!(q.dense);
    }

    #[test]
    fn test_build_query_rejects_window_past_earliest_date() {
        assert!(build_query("day", 200_000_000, None, false).is_err());
        assert!(build_query("week", u32::MAX, None, true).is_err());
    }

    #[test]
    fn test_days_option_is_bounded() {
        use crate::Cli;
        use clap::Parser;

        let parse = |days: &str| {
            Cli::try_parse_from(["gymrat", "progress", "workouts", "--days", days, "--dense"])
        };
        assert!(parse("3650").is_ok());
        assert!(parse("50000000").is_err());
        assert!(parse("0").is_err());
    }

    #[test]
    fn test_build_query_bad_granularity() {
        assert!(build_query("fortnight", 7, None, false).is_err());
    }
}
