use anyhow::Result;
use std::process;

use gymrat_core::CoreError;
use gymrat_core::models::{MealType, NewWorkoutEntry, TrainingGoal, TrainingMode, WorkoutSet};
use gymrat_core::service::{DeletedEntry, GymratService};

use super::helpers::{format_macros, json_error, parse_grams, parse_set, parse_timestamp};

pub(crate) fn cmd_eat(
    svc: &mut GymratService,
    food: &str,
    grams: &str,
    meal: &str,
    date: Option<String>,
    time: Option<&str>,
    json: bool,
) -> Result<()> {
    let meal_type: MealType = meal.parse()?;
    let quantity_g = parse_grams(grams)?;
    let at = parse_timestamp(date, time)?;

    let entry = match svc.log_food(food, quantity_g, meal_type, at) {
        Ok(entry) => entry,
        Err(CoreError::UnknownFood(name)) => {
            let msg = format!("Unknown food '{name}'");
            if json {
                println!("{}", json_error(&msg));
            } else {
                eprintln!("{msg}. Try `gymrat food list`.");
            }
            process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        let name = &entry.food;
        let meal_type = entry.meal_type;
        let qty = entry.quantity_g;
        let id = &entry.id;
        println!(
            "Logged: {name} {qty:.0}g for {meal_type} — {}",
            format_macros(&entry.nutrients)
        );
        println!("  id: {id}");
    }

    Ok(())
}

pub(crate) struct WorkoutArgs {
    pub exercise: String,
    pub sets: Vec<String>,
    pub mode: Option<String>,
    pub goal: Option<String>,
    pub duration: Option<u32>,
    pub date: Option<String>,
    pub time: Option<String>,
}

pub(crate) fn cmd_workout(svc: &mut GymratService, args: &WorkoutArgs, json: bool) -> Result<()> {
    let sets: Vec<WorkoutSet> = args
        .sets
        .iter()
        .map(|s| parse_set(s))
        .collect::<Result<_>>()?;
    let profile = svc.profile();
    let mode = match &args.mode {
        Some(m) => m.parse::<TrainingMode>()?,
        None => profile.training_mode,
    };
    let goal = match &args.goal {
        Some(g) => g.parse::<TrainingGoal>()?,
        None => profile.goal,
    };

    let entry = svc.log_workout(NewWorkoutEntry {
        timestamp: parse_timestamp(args.date.clone(), args.time.as_deref())?,
        exercise: args.exercise.clone(),
        sets,
        mode,
        goal,
        duration_min: args.duration,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
        return Ok(());
    }

    let name = &entry.exercise;
    let n = entry.sets.len();
    let reps = entry.total_reps();
    let volume = entry.volume();
    print!("Logged: {name} — {n} sets, {reps} reps, {volume:.0} kg volume");
    if let Some(rpe) = entry.average_rpe() {
        print!(", avg RPE {rpe:.1}");
    }
    println!();
    println!("  id: {}", entry.id);

    if mode == TrainingMode::HeavyDuty && entry.sets.len() > 2 {
        eprintln!("Note: Heavy Duty calls for 1-2 all-out work sets per exercise.");
    }
    Ok(())
}

pub(crate) fn cmd_delete(svc: &mut GymratService, id: &str, json: bool) -> Result<()> {
    match svc.delete_entry(id) {
        Ok(deleted) => {
            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                match deleted {
                    DeletedEntry::Nutrition(e) => {
                        println!("Deleted nutrition entry {id} ({} {:.0}g)", e.food, e.quantity_g);
                    }
                    DeletedEntry::Workout(e) => {
                        println!("Deleted workout entry {id} ({})", e.exercise);
                    }
                }
            }
            Ok(())
        }
        Err(CoreError::EntryNotFound(_)) => {
            if json {
                println!("{}", json_error(&format!("Entry {id} not found")));
            } else {
                eprintln!("Entry {id} not found");
            }
            process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}
