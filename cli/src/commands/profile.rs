use anyhow::{Result, bail};
use chrono::Local;

use gymrat_core::models::{ProfileUpdate, UserProfile};
use gymrat_core::service::GymratService;

#[derive(clap::Args)]
pub(crate) struct ProfileArgs {
    /// Body weight in kg
    #[arg(long)]
    weight: Option<f64>,
    /// Height in cm
    #[arg(long)]
    height: Option<f64>,
    /// Age in years
    #[arg(long)]
    age: Option<u32>,
    /// Sex: male or female
    #[arg(long)]
    sex: Option<String>,
    /// Activity: sedentary, light, moderate, very-active
    #[arg(long)]
    activity: Option<String>,
    /// Experience: beginner, intermediate, advanced
    #[arg(long)]
    experience: Option<String>,
    /// Training mode: heavy-duty or general
    #[arg(long)]
    mode: Option<String>,
    /// Training goal: strength, hypertrophy, power, endurance
    #[arg(long)]
    goal: Option<String>,
    /// Phase: maintenance, bulk, cut
    #[arg(long)]
    phase: Option<String>,
}

impl ProfileArgs {
    fn to_update(&self) -> Result<ProfileUpdate> {
        Ok(ProfileUpdate {
            age: self.age,
            weight_kg: self.weight,
            height_cm: self.height,
            sex: self.sex.as_deref().map(str::parse).transpose()?,
            activity_level: self.activity.as_deref().map(str::parse).transpose()?,
            experience_level: self.experience.as_deref().map(str::parse).transpose()?,
            training_mode: self.mode.as_deref().map(str::parse).transpose()?,
            goal: self.goal.as_deref().map(str::parse).transpose()?,
            phase: self.phase.as_deref().map(str::parse).transpose()?,
        })
    }
}

fn print_profile(profile: &UserProfile) {
    println!("Age:         {}", profile.age);
    println!("Weight:      {:.1} kg", profile.weight_kg);
    println!("Height:      {:.1} cm", profile.height_cm);
    println!("Sex:         {}", profile.sex);
    println!("Activity:    {}", profile.activity_level);
    println!("Experience:  {}", profile.experience_level);
    println!("Mode:        {}", profile.training_mode);
    println!("Goal:        {}", profile.goal);
    println!("Phase:       {}", profile.phase);
    if let Some(updated) = profile.last_updated {
        println!("Updated:     {}", updated.format("%Y-%m-%d %H:%M"));
    }
}

pub(crate) fn cmd_profile_show(svc: &GymratService, json: bool) -> Result<()> {
    let profile = svc.profile();
    if json {
        println!("{}", serde_json::to_string_pretty(profile)?);
    } else {
        print_profile(profile);
    }
    Ok(())
}

pub(crate) fn cmd_profile_set(
    svc: &mut GymratService,
    args: &ProfileArgs,
    json: bool,
) -> Result<()> {
    let update = args.to_update()?;
    if update.is_empty() {
        bail!(
            "Nothing to update. Provide at least one of --weight, --height, --age, --sex, \
             --activity, --experience, --mode, --goal, --phase"
        );
    }

    let profile = svc.update_profile(&update, Local::now().naive_local())?;
    tracing::debug!(phase = %profile.phase, "Profile updated");

    if json {
        println!("{}", serde_json::to_string_pretty(profile)?);
    } else {
        println!("Profile updated\n");
        print_profile(profile);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymrat_core::models::{ActivityLevel, Phase, TrainingMode};

    fn args() -> ProfileArgs {
        ProfileArgs {
            weight: None,
            height: None,
            age: None,
            sex: None,
            activity: None,
            experience: None,
            mode: None,
            goal: None,
            phase: None,
        }
    }

    #[test]
    fn test_to_update_parses_labels() {
        let a = ProfileArgs {
            weight: Some(82.0),
            activity: Some("very-active".to_string()),
            mode: Some("general".to_string()),
            phase: Some("CUT".to_string()),
            ..args()
        };
        let update = a.to_update().unwrap();
        assert_eq!(update.activity_level, Some(ActivityLevel::VeryActive));
        assert_eq!(update.training_mode, Some(TrainingMode::General));
        assert_eq!(update.phase, Some(Phase::Cut));
        assert!(update.sex.is_none());
    }

    #[test]
    fn test_to_update_rejects_unknown_label() {
        let a = ProfileArgs {
            phase: Some("shred".to_string()),
            ..args()
        };
        assert!(a.to_update().is_err());
        assert!(args().to_update().unwrap().is_empty());
    }
}
