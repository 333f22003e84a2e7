mod food;
mod helpers;
mod log;
mod params;
mod profile;
mod progress;
mod summary;
mod target;

pub(crate) use food::{cmd_food_list, cmd_food_show};
pub(crate) use log::{WorkoutArgs, cmd_delete, cmd_eat, cmd_workout};
pub(crate) use params::cmd_params;
pub(crate) use profile::{ProfileArgs, cmd_profile_set, cmd_profile_show};
pub(crate) use progress::{cmd_progress_nutrition, cmd_progress_workouts};
pub(crate) use summary::{cmd_report, cmd_today};
pub(crate) use target::cmd_target;
