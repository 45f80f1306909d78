//! Recipe model

use super::{mean_rating, EntityClass, Indexed};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A catalogue recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,

    /// Names of the ingredients used by this recipe
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Individual user ratings (1-5)
    #[serde(default)]
    pub ratings: Vec<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<NaiveDate>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: Vec::new(),
            ratings: Vec::new(),
            created_on: None,
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
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

impl Indexed for Recipe {
    const CLASS: EntityClass = EntityClass::Recipe;

    fn name(&self) -> &str {
        &self.name
    }

    fn average_rating(&self) -> f64 {
        Recipe::average_rating(self)
    }

    fn created_on(&self) -> Option<NaiveDate> {
        self.created_on
    }
}
