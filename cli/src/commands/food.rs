use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use gymrat_core::CoreError;
use gymrat_core::models::{FoodCategory, FoodItem};
use gymrat_core::service::GymratService;

use super::helpers::{format_macros, json_error, parse_grams, truncate};

fn print_food_table(foods: &[&FoodItem]) {
    #[derive(Tabled)]
    struct FoodRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Cal/100g")]
        calories: String,
        #[tabled(rename = "P/100g")]
        protein: String,
        #[tabled(rename = "C/100g")]
        carbs: String,
        #[tabled(rename = "F/100g")]
        fat: String,
    }

    let rows: Vec<FoodRow> = foods
        .iter()
        .map(|f| FoodRow {
            name: truncate(&f.name, 35),
            category: f.category.to_string(),
            calories: format!("{:.0}", f.calories_per_100g),
            protein: format!("{:.1}", f.protein_per_100g),
            carbs: format!("{:.1}", f.carbs_per_100g),
            fat: format!("{:.1}", f.fat_per_100g),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_food_list(svc: &GymratService, category: Option<&str>, json: bool) -> Result<()> {
    let foods: Vec<&FoodItem> = match category {
        Some(c) => svc.foods().by_category(c.parse::<FoodCategory>()?).collect(),
        None => svc.foods().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&foods)?);
        return Ok(());
    }

    if foods.is_empty() {
        eprintln!("No foods found");
        process::exit(2);
    }

    print_food_table(&foods);
    Ok(())
}

pub(crate) fn cmd_food_show(
    svc: &GymratService,
    name: &str,
    grams: Option<&str>,
    json: bool,
) -> Result<()> {
    let grams = grams.map(parse_grams).transpose()?.unwrap_or(100.0);

    let food = match svc.foods().lookup(name) {
        Ok(food) => food,
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
    let nutrients = food.nutrients_for(grams);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "food": food,
                "grams": grams,
                "nutrients": nutrients,
            }))?
        );
        return Ok(());
    }

    println!("{} ({})", food.name, food.category);
    println!("  {grams:.0}g: {}", format_macros(&nutrients));
    Ok(())
}
