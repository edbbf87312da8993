//! Meal Size/Cost Model

use serde::{Deserialize, Serialize};

/// Priced variant of a meal, unique per (meal_id, size)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MealSizeCost {
    pub id: i64,
    pub meal_id: i64,
    /// Size code, 1..=4
    pub size: i64,
    pub cost: f64,
    pub number_of_pieces: Option<i64>,
}

/// Sparse projection: optional keys are omitted instead of serialized as null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSizeCostView {
    pub id: i64,
    pub meal_id: i64,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_pieces: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl From<MealSizeCost> for MealSizeCostView {
    fn from(row: MealSizeCost) -> Self {
        Self {
            id: row.id,
            meal_id: row.meal_id,
            cost: row.cost,
            number_of_pieces: row.number_of_pieces,
            size: Some(row.size),
        }
    }
}
