use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::process;

use gymrat_core::models::{MealType, NutritionEntry, TrainingMode, WorkoutEntry};
use gymrat_core::progress::DailyAdherence;
use gymrat_core::report::ProgressReport;
use gymrat_core::service::GymratService;

use super::helpers::{format_macros, parse_date};

#[derive(Serialize)]
struct DayView<'a> {
    date: String,
    entries: Vec<&'a NutritionEntry>,
    workouts: Vec<&'a WorkoutEntry>,
    adherence: DailyAdherence,
}

pub(crate) fn cmd_today(svc: &GymratService, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let view = DayView {
        date: date.format("%Y-%m-%d").to_string(),
        entries: svc.nutrition_on(date),
        workouts: svc.workouts_on(date),
        adherence: svc.daily_adherence(date)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.entries.is_empty() && view.workouts.is_empty() {
        let date = &view.date;
        eprintln!("No entries for {date}");
        process::exit(2);
    }

    let date = &view.date;
    println!("=== {date} ===\n");

    for meal in MealType::ALL {
        let entries: Vec<&&NutritionEntry> =
            view.entries.iter().filter(|e| e.meal_type == meal).collect();
        if entries.is_empty() {
            continue;
        }
        let sub_cal: f64 = entries.iter().map(|e| e.nutrients.calories).sum();
        let meal_label = meal.label().to_uppercase();
        println!("  {meal_label} ({sub_cal:.0} kcal)");
        for e in entries {
            let time = e.timestamp.format("%H:%M");
            let name = &e.food;
            let qty = e.quantity_g;
            println!("    {time} {name} — {qty:.0}g — {}", format_macros(&e.nutrients));
            println!("          id: {}", e.id);
        }
        println!();
    }

    if !view.workouts.is_empty() {
        println!("  TRAINING");
        for w in &view.workouts {
            let name = &w.exercise;
            let n = w.sets.len();
            let volume = w.volume();
            println!("    {name} — {n} sets, {volume:.0} kg volume");
            println!("          id: {}", w.id);
        }
        println!();
    }

    let a = &view.adherence;
    let t = &a.target;
    println!("  TOTAL:     {}", format_macros(&a.consumed));
    println!("  TARGET:    {}", format_macros(&t.as_totals()));
    println!("  REMAINING: {}", format_macros(&a.remaining()));
    println!(
        "  PROGRESS:  {:.0}% kcal | P:{:.0}% C:{:.0}% F:{:.0}%",
        a.calories_pct, a.protein_pct, a.carbs_pct, a.fat_pct
    );
    println!("\n  STATUS: {}", a.status.label());

    Ok(())
}

pub(crate) fn cmd_report(svc: &GymratService, days: u32, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let report = svc.report(days, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &ProgressReport) {
    println!(
        "PROGRESS SUMMARY: last {} days ({} to {})",
        report.period_days, report.from, report.to
    );
    println!("Mode: {}\n", report.mode);

    println!("TRAINING");
    match &report.training {
        Some(t) => {
            println!("  Workouts:          {}", t.total_workouts);
            println!("  Frequency:         {:.1} per week", t.workouts_per_week);
            println!("  Total volume:      {:.0} kg", t.total_volume);
            println!("  Exercise variety:  {}", t.unique_exercises);
            if let Some(d) = t.average_duration_min {
                println!("  Average duration:  {d:.0} min");
            }
            let goals: Vec<String> = t
                .goal_distribution
                .iter()
                .map(|(goal, sets)| format!("{goal} ({sets})"))
                .collect();
            println!("  Goals (sets):      {}", goals.join(", "));
            let top: Vec<String> = t
                .top_exercises
                .iter()
                .map(|(name, sets)| format!("{name} ({sets})"))
                .collect();
            println!("  Top exercises:     {}", top.join(", "));
        }
        None => println!("  No workout data for this period."),
    }

    if let Some(r) = &report.recovery {
        println!("\nHEAVY DUTY RECOVERY");
        println!("  Experience:        {}", r.experience_level);
        println!("  Recommended rest:  {}+ hours", r.recommended_hours);
        println!("  Max frequency:     {:.1} per week", r.max_weekly_frequency);
        println!("  Your frequency:    {:.1} per week", r.actual_frequency);
        if r.compliant {
            println!("  Recovery compliance looks good.");
        } else {
            println!("  Consider longer rest periods.");
        }
    }

    println!("\nNUTRITION");
    match &report.nutrition {
        Some(n) => {
            let avg = &n.daily_average;
            println!("  Days logged:       {}", n.days_logged);
            println!("  Daily average:     {}", format_macros(avg));
            if let Some(ratio) = &n.macro_ratio {
                let target_note = if report.mode == TrainingMode::HeavyDuty {
                    " (target 60/25/15)"
                } else {
                    ""
                };
                println!(
                    "  Macro ratio:       C {:.1}% / P {:.1}% / F {:.1}%{target_note}",
                    ratio.carbs_pct, ratio.protein_pct, ratio.fat_pct
                );
            }
            if let Some(adherence) = n.ratio_adherence {
                println!("  Ratio adherence:   {}", adherence.label());
            }
            let top: Vec<String> = n
                .top_foods
                .iter()
                .map(|(name, kcal)| format!("{name} ({kcal:.0} kcal)"))
                .collect();
            println!("  Top foods:         {}", top.join(", "));
        }
        None => println!("  No nutrition data for this period."),
    }

    println!("\n{}", report.assessment());
}
