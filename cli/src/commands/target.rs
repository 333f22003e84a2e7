use anyhow::Result;

use gymrat_core::models::{DailyTarget, Phase};
use gymrat_core::service::GymratService;

fn percent(part_kcal: f64, target: &DailyTarget) -> f64 {
    if target.calories == 0 {
        0.0
    } else {
        part_kcal / f64::from(target.calories) * 100.0
    }
}

pub(crate) fn cmd_target(svc: &GymratService, phase: Option<&str>, json: bool) -> Result<()> {
    let target = match phase {
        Some(p) => svc.daily_target_for_phase(p.parse::<Phase>()?)?,
        None => svc.daily_target()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&target)?);
        return Ok(());
    }

    let phase = target.phase;
    let cal = target.calories;
    let pp = percent(target.protein_kcal(), &target);
    let cp = percent(target.carbs_kcal(), &target);
    let fp = percent(target.fat_kcal(), &target);
    let (pg, cg, fg) = (target.protein_g, target.carbs_g, target.fat_g);
    println!("{phase}: {cal} kcal/day");
    println!(
        "  Protein: {pp:.0}% ({pg:.1}g)  Carbs: {cp:.0}% ({cg:.1}g)  Fat: {fp:.0}% ({fg:.1}g)"
    );

    let profile = svc.profile();
    println!(
        "  Based on {:.1} kg, {:.0} cm, {} y, {}, {} activity",
        profile.weight_kg, profile.height_cm, profile.age, profile.sex, profile.activity_level
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        let target = DailyTarget {
            phase: Phase::Maintenance,
            calories: 2400,
            protein_g: 150.0,
            carbs_g: 360.0,
            fat_g: 40.0,
        };
        assert!((percent(target.carbs_kcal(), &target) - 60.0).abs() < 1e-9);
        let zero = DailyTarget {
            calories: 0,
            ..target
        };
        assert!(percent(100.0, &zero).abs() < f64::EPSILON);
    }
}
