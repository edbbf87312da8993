//! Meal Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dietary type of a meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum MealType {
    Vegetarian,
    NonVegetarian,
}

impl MealType {
    /// Accepted wire values, in declaration order
    pub const VALUES: [&'static str; 2] = ["vegetarian", "non-vegetarian"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::NonVegetarian => "non-vegetarian",
        }
    }
}

impl FromStr for MealType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vegetarian" => Ok(Self::Vegetarian),
            "non-vegetarian" => Ok(Self::NonVegetarian),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meal entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Meal {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub meal_type: MealType,
    pub category_id: i64,
    /// Relative path of the stored image
    pub image: Option<String>,
    /// Inactive meals are hidden from non-admin callers
    pub status: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create meal payload (validated), including its first size/cost variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCreate {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub category_id: i64,
    pub image: Option<String>,
    pub status: bool,
    pub size: i64,
    pub cost: f64,
    pub number_of_pieces: Option<i64>,
}

/// Update meal payload (only `Some` fields are applied)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub meal_type: Option<MealType>,
    pub category_id: Option<i64>,
    pub image: Option<String>,
    pub status: Option<bool>,
}

impl MealPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.meal_type.is_none()
            && self.category_id.is_none()
            && self.image.is_none()
            && self.status.is_none()
    }
}

/// List/detail projection of a meal
///
/// `cost`, `size` and `number_of_pieces` come from the cheapest variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MealSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub meal_type: MealType,
    pub status: bool,
    pub category_name: Option<String>,
    pub category_id: i64,
    pub cost: Option<f64>,
    pub size: Option<i64>,
    pub number_of_pieces: Option<i64>,
}

/// Projection returned by the multi-field meal filter
///
/// `cost` is taken from the first variant matching the numeric filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FilteredMeal {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cost: Option<f64>,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub meal_type: MealType,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub status: bool,
    pub image: Option<String>,
}

/// Criteria of the multi-field meal filter; `None` fields are ignored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealFilter {
    pub name: Option<String>,
    pub cost: Option<f64>,
    pub size: Option<i64>,
    pub number_of_pieces: Option<i64>,
    pub category_id: Option<i64>,
    pub status: Option<bool>,
    pub meal_type: Option<MealType>,
}
