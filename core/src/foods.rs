use std::collections::BTreeMap;
use std::io::Read;

use crate::error::{CoreError, Result};
use crate::models::{FoodCategory, FoodItem, MacroTotals, validate_food_item};

/// Built-in reference values per 100 g, used when no food file is present.
/// `(name, category, kcal, protein, carbs, fat)`
const DEFAULT_FOODS: &[(&str, FoodCategory, f64, f64, f64, f64)] = &[
    ("Chicken Breast", FoodCategory::Protein, 165.0, 31.0, 0.0, 3.6),
    ("Lean Ground Beef", FoodCategory::Protein, 250.0, 26.0, 0.0, 15.0),
    ("Salmon", FoodCategory::Protein, 208.0, 20.0, 0.0, 13.0),
    ("Tuna (canned in water)", FoodCategory::Protein, 116.0, 26.0, 0.0, 0.8),
    ("Whole Eggs", FoodCategory::Protein, 155.0, 13.0, 1.1, 11.0),
    ("Turkey Breast", FoodCategory::Protein, 135.0, 30.0, 0.0, 1.0),
    ("White Rice (cooked)", FoodCategory::Carbohydrate, 130.0, 2.7, 28.0, 0.3),
    ("Brown Rice (cooked)", FoodCategory::Carbohydrate, 112.0, 2.6, 23.5, 0.9),
    ("Oats", FoodCategory::Carbohydrate, 389.0, 16.9, 66.3, 6.9),
    ("Sweet Potato", FoodCategory::Carbohydrate, 86.0, 1.6, 20.0, 0.1),
    ("Whole Wheat Bread", FoodCategory::Carbohydrate, 247.0, 13.0, 41.0, 3.4),
    ("Pasta (cooked)", FoodCategory::Carbohydrate, 131.0, 5.0, 25.0, 1.1),
    ("Olive Oil", FoodCategory::Fat, 884.0, 0.0, 0.0, 100.0),
    ("Almonds", FoodCategory::Fat, 579.0, 21.0, 22.0, 50.0),
    ("Peanut Butter", FoodCategory::Fat, 588.0, 25.0, 20.0, 50.0),
    ("Avocado", FoodCategory::Fat, 160.0, 2.0, 8.5, 14.7),
    ("Broccoli", FoodCategory::Vegetable, 34.0, 2.8, 7.0, 0.4),
    ("Spinach", FoodCategory::Vegetable, 23.0, 2.9, 3.6, 0.4),
    ("Carrots", FoodCategory::Vegetable, 41.0, 0.9, 9.6, 0.2),
    ("Banana", FoodCategory::Fruit, 89.0, 1.1, 22.8, 0.3),
    ("Apple", FoodCategory::Fruit, 52.0, 0.3, 13.8, 0.2),
    ("Blueberries", FoodCategory::Fruit, 57.0, 0.7, 14.5, 0.3),
    ("Greek Yogurt", FoodCategory::Dairy, 130.0, 17.0, 9.5, 5.0),
    ("Whole Milk", FoodCategory::Dairy, 61.0, 3.2, 4.8, 3.3),
    ("Cottage Cheese", FoodCategory::Dairy, 98.0, 11.0, 3.4, 4.3),
];

/// Immutable name → nutrition lookup table, keyed case-insensitively.
#[derive(Debug, Clone)]
pub struct FoodDatabase {
    foods: BTreeMap<String, FoodItem>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Default for FoodDatabase {
    fn default() -> Self {
        let foods = DEFAULT_FOODS
            .iter()
            .map(|&(name, category, kcal, protein, carbs, fat)| FoodItem {
                name: name.to_string(),
                category,
                calories_per_100g: kcal,
                protein_per_100g: protein,
                carbs_per_100g: carbs,
                fat_per_100g: fat,
            })
            .map(|f| (key(&f.name), f))
            .collect();
        Self { foods }
    }
}

impl FoodDatabase {
    /// Build a table from explicit items. Names must be unique ignoring case.
    pub fn from_items(items: Vec<FoodItem>) -> Result<Self> {
        let mut foods = BTreeMap::new();
        for item in items {
            validate_food_item(&item)?;
            let k = key(&item.name);
            if foods.contains_key(&k) {
                return Err(CoreError::entry(
                    "food name",
                    format!("duplicate entry '{}'", item.name),
                ));
            }
            foods.insert(k, item);
        }
        Ok(Self { foods })
    }

    /// Load a JSON array of food items.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let items: Vec<FoodItem> = serde_json::from_reader(reader)?;
        let db = Self::from_items(items)?;
        tracing::info!(foods = db.len(), "Loaded food table");
        Ok(db)
    }

    pub fn lookup(&self, name: &str) -> Result<&FoodItem> {
        self.foods
            .get(&key(name))
            .ok_or_else(|| CoreError::UnknownFood(name.trim().to_string()))
    }

    pub fn nutrients_for(&self, name: &str, grams: f64) -> Result<MacroTotals> {
        crate::models::validate_quantity(grams)?;
        Ok(self.lookup(name)?.nutrients_for(grams))
    }

    /// Foods sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &FoodItem> {
        self.foods.values()
    }

    pub fn by_category(&self, category: FoodCategory) -> impl Iterator<Item = &FoodItem> {
        self.iter().filter(move |f| f.category == category)
    }

    /// Categories that have at least one food, in declaration order.
    #[must_use]
    pub fn categories(&self) -> Vec<FoodCategory> {
        FoodCategory::ALL
            .into_iter()
            .filter(|c| self.by_category(*c).next().is_some())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
