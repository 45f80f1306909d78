//! Ingredient model

use super::{mean_rating, EntityClass, Indexed};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A pantry ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    /// Stock on hand (not used by the indexes)
    #[serde(default)]
    pub quantity: u32,

    #[serde(default)]
    pub ratings: Vec<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<NaiveDate>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            ratings: Vec::new(),
            created_on: None,
        }
    }

    pub fn with_ratings(mut self, ratings: Vec<u8>) -> Self {
        self.ratings = ratings;
        self
    }

    pub fn with_created_on(mut self, date: NaiveDate) -> Self {
        self.created_on = Some(date);
        self
    }

    pub fn average_rating(&self) -> f64 {
        mean_rating(&self.ratings)
    }
}

impl Indexed for Ingredient {
    const CLASS: EntityClass = EntityClass::Ingredient;

    fn name(&self) -> &str {
        &self.name
    }

    fn average_rating(&self) -> f64 {
        Ingredient::average_rating(self)
    }

    fn created_on(&self) -> Option<NaiveDate> {
        self.created_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_rating() {
        let basil = Ingredient::new("Basil", 3).with_ratings(vec![5, 4]);
        assert!((basil.average_rating() - 4.5).abs() < f64::EPSILON);
        assert_eq!(basil.quantity, 3);
    }
}
