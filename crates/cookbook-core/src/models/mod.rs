//! Data models for cookbook

pub mod entity;
pub mod ingredient;
pub mod recipe;

pub use entity::{normalize_name, EntityClass, Indexed};
pub use ingredient::Ingredient;
pub use recipe::Recipe;

/// Arithmetic mean of a rating list, `0.0` when unrated
pub(crate) fn mean_rating(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|&r| r as u32).sum();
    sum as f64 / ratings.len() as f64
}
