//! Entity classes and the read-only view consumed by the index layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of catalogue entity an index belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityClass {
    Recipe,
    Ingredient,
}

impl EntityClass {
    pub const ALL: [EntityClass; 2] = [EntityClass::Recipe, EntityClass::Ingredient];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityClass::Recipe => "recipe",
            EntityClass::Ingredient => "ingredient",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recipe" | "recipes" => Ok(EntityClass::Recipe),
            "ingredient" | "ingredients" => Ok(EntityClass::Ingredient),
            other => Err(format!(
                "unknown entity class '{}' (expected 'recipe' or 'ingredient')",
                other
            )),
        }
    }
}

/// Read-only view of a catalogue entity, as seen by the indexes
///
/// Implementors expose a unique name, an average rating where `0.0` means
/// "unrated", and an optional creation date. Entities without a creation
/// date are bucketed under the day the index was built.
pub trait Indexed: Send + Sync + 'static {
    const CLASS: EntityClass;

    fn name(&self) -> &str;

    fn average_rating(&self) -> f64;

    fn created_on(&self) -> Option<NaiveDate> {
        None
    }
}

/// Normalize a name for index keys: trimmed and lowercased
///
/// # Examples
///
/// ```
/// use cookbook_core::models::normalize_name;
///
/// assert_eq!(normalize_name("  Spaghetti Carbonara "), "spaghetti carbonara");
/// assert_eq!(normalize_name("   "), "");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_class_parse() {
        assert_eq!("recipe".parse::<EntityClass>().unwrap(), EntityClass::Recipe);
        assert_eq!(
            " Ingredients ".parse::<EntityClass>().unwrap(),
            EntityClass::Ingredient
        );
        assert!("tool".parse::<EntityClass>().is_err());
    }

    #[test]
    fn test_entity_class_display_roundtrip() {
        for class in EntityClass::ALL {
            assert_eq!(class.to_string().parse::<EntityClass>().unwrap(), class);
        }
    }
}
