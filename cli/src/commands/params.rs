use anyhow::Result;
use serde::Serialize;

use gymrat_core::models::TrainingGoal;
use gymrat_core::training::{HEAVY_DUTY_PAIRS, PreExhaustPair, TrainingParameters};

#[derive(Serialize)]
struct GoalView {
    #[serde(flatten)]
    parameters: TrainingParameters,
    templates: &'static [&'static str],
}

#[derive(Serialize)]
struct ParamsView {
    goals: Vec<GoalView>,
    heavy_duty_pairs: &'static [PreExhaustPair],
}

fn params_view(goal: Option<&str>) -> Result<ParamsView> {
    let goals: Vec<TrainingGoal> = match goal {
        Some(g) => vec![g.parse()?],
        None => TrainingGoal::ALL.to_vec(),
    };
    Ok(ParamsView {
        goals: goals
            .into_iter()
            .map(|g| GoalView {
                parameters: g.parameters(),
                templates: g.templates(),
            })
            .collect(),
        heavy_duty_pairs: HEAVY_DUTY_PAIRS,
    })
}

pub(crate) fn cmd_params(goal: Option<&str>, json: bool) -> Result<()> {
    let view = params_view(goal)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    for g in &view.goals {
        let p = &g.parameters;
        println!("{}", p.goal.label().to_uppercase());
        println!("  Reps:   {}-{}", p.reps.start(), p.reps.end());
        println!("  Sets:   {}-{}", p.sets.start(), p.sets.end());
        println!("  Rest:   {}-{} s", p.rest_seconds.start(), p.rest_seconds.end());
        println!("  Focus:  {}", p.focus);
        println!("  Try:    {}", g.templates.join(", "));
        println!();
    }

    println!("HEAVY DUTY PRE-EXHAUST");
    for pair in view.heavy_duty_pairs {
        println!(
            "  {:<10} {} -> {}",
            pair.muscle_group, pair.isolation, pair.compound
        );
    }
    Ok(())
}
