//! Daily calorie and macro targets.
//!
//! Maintenance calories come from the Mifflin–St Jeor BMR scaled by an
//! activity multiplier; a phase multiplier then moves that up (bulk) or down
//! (cut). The resulting total is split 60/25/15 carbohydrate/protein/fat by
//! calorie contribution and converted to grams at 4/4/9 kcal per gram.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::models::{
    ActivityLevel, DailyTarget, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN, Phase, Sex,
    UserProfile,
};

pub const CARB_RATIO: f64 = 0.60;
pub const PROTEIN_RATIO: f64 = 0.25;
pub const FAT_RATIO: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseMultipliers {
    pub maintenance: f64,
    pub bulk: f64,
    pub cut: f64,
}

impl Default for PhaseMultipliers {
    fn default() -> Self {
        Self {
            maintenance: 1.0,
            bulk: 1.15,
            cut: 0.85,
        }
    }
}

impl PhaseMultipliers {
    #[must_use]
    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Maintenance => self.maintenance,
            Phase::Bulk => self.bulk,
            Phase::Cut => self.cut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityMultipliers {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub very_active: f64,
}

impl Default for ActivityMultipliers {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            light: 1.375,
            moderate: 1.55,
            very_active: 1.725,
        }
    }
}

impl ActivityMultipliers {
    #[must_use]
    pub fn get(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::VeryActive => self.very_active,
        }
    }
}

/// Product constants for the calculator. Every field has a default, so a
/// settings file only needs to name what it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionSettings {
    pub phase_multipliers: PhaseMultipliers,
    pub activity_multipliers: ActivityMultipliers,
    /// Cap protein at this many grams per kg of body weight, moving the
    /// surplus calories to carbohydrate. Unset keeps the plain 60/25/15 split.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_ceiling_g_per_kg: Option<f64>,
}

impl NutritionSettings {
    pub fn validate(&self) -> Result<()> {
        let p = &self.phase_multipliers;
        let a = &self.activity_multipliers;
        let named = [
            ("phase_multipliers.maintenance", p.maintenance),
            ("phase_multipliers.bulk", p.bulk),
            ("phase_multipliers.cut", p.cut),
            ("activity_multipliers.sedentary", a.sedentary),
            ("activity_multipliers.light", a.light),
            ("activity_multipliers.moderate", a.moderate),
            ("activity_multipliers.very_active", a.very_active),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidSettings(format!(
                    "{name} must be greater than 0 (got {value})"
                )));
            }
        }
        match self.protein_ceiling_g_per_kg {
            Some(c) if !c.is_finite() || c <= 0.0 => Err(CoreError::InvalidSettings(format!(
                "protein_ceiling_g_per_kg must be greater than 0 (got {c})"
            ))),
            _ => Ok(()),
        }
    }
}

/// Mifflin–St Jeor basal metabolic rate in kcal/day.
#[must_use]
pub fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Split a calorie total 60/25/15 by energy and convert to grams.
#[must_use]
pub fn split_calories(calories: u32, phase: Phase) -> DailyTarget {
    let total = f64::from(calories);
    DailyTarget {
        phase,
        calories,
        protein_g: round1(total * PROTEIN_RATIO / KCAL_PER_G_PROTEIN),
        carbs_g: round1(total * CARB_RATIO / KCAL_PER_G_CARBS),
        fat_g: round1(total * FAT_RATIO / KCAL_PER_G_FAT),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MacroCalculator {
    settings: NutritionSettings,
}

impl MacroCalculator {
    pub fn new(settings: NutritionSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    #[must_use]
    pub fn settings(&self) -> &NutritionSettings {
        &self.settings
    }

    /// BMR scaled by activity level.
    pub fn maintenance_calories(&self, profile: &UserProfile) -> Result<f64> {
        profile.validate()?;
        let tdee = basal_metabolic_rate(profile)
            * self
                .settings
                .activity_multipliers
                .get(profile.activity_level);
        if tdee < 1.0 {
            return Err(CoreError::profile(
                "profile",
                "yields a non-positive calorie estimate",
            ));
        }
        Ok(tdee)
    }

    /// Apply the phase multiplier, truncating to whole kcal.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn target_calories(&self, maintenance: f64, phase: Phase) -> u32 {
        let adjusted = maintenance * self.settings.phase_multipliers.get(phase);
        adjusted.max(0.0).floor() as u32
    }

    pub fn daily_target(&self, profile: &UserProfile) -> Result<DailyTarget> {
        self.daily_target_for_phase(profile, profile.phase)
    }

    pub fn daily_target_for_phase(
        &self,
        profile: &UserProfile,
        phase: Phase,
    ) -> Result<DailyTarget> {
        let maintenance = self.maintenance_calories(profile)?;
        let calories = self.target_calories(maintenance, phase);
        if calories == 0 {
            return Err(CoreError::profile(
                "profile",
                "yields a non-positive calorie target",
            ));
        }
        let target = self.split(calories, phase, profile.weight_kg);
        tracing::debug!(
            phase = %phase,
            maintenance,
            calories = target.calories,
            "Computed daily target"
        );
        Ok(target)
    }

    /// [`split_calories`] plus the optional protein ceiling.
    #[must_use]
    pub fn split(&self, calories: u32, phase: Phase, weight_kg: f64) -> DailyTarget {
        let Some(per_kg) = self.settings.protein_ceiling_g_per_kg else {
            return split_calories(calories, phase);
        };

        let total = f64::from(calories);
        let protein_uncapped = total * PROTEIN_RATIO / KCAL_PER_G_PROTEIN;
        let mut carbs = total * CARB_RATIO / KCAL_PER_G_CARBS;
        let cap = per_kg * weight_kg;
        let protein = if protein_uncapped > cap {
            carbs += (protein_uncapped - cap) * KCAL_PER_G_PROTEIN / KCAL_PER_G_CARBS;
            cap
        } else {
            protein_uncapped
        };

        DailyTarget {
            phase,
            calories,
            protein_g: round1(protein),
            carbs_g: round1(carbs),
            fat_g: round1(total * FAT_RATIO / KCAL_PER_G_FAT),
        }
    }
}
