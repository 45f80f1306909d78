//! JSON catalogue file loader
//!
//! ```json
//! {
//!   "recipes": [{ "name": "Pasta", "ingredients": ["Flour"], "ratings": [4] }],
//!   "ingredients": [{ "name": "Flour", "quantity": 2 }]
//! }
//! ```

use crate::error::IndexError;
use crate::models::{Ingredient, Recipe};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Contents of a catalogue file; both lists are optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogueFile {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl CatalogueFile {
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty() && self.ingredients.is_empty()
    }
}

/// Read and parse a catalogue file
pub fn load_catalogue_file(path: &Path) -> Result<CatalogueFile, IndexError> {
    if !path.exists() {
        return Err(IndexError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| IndexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let file: CatalogueFile =
        serde_json::from_str(&content).map_err(|source| IndexError::JsonParse {
            path: path.to_path_buf(),
            message: source.to_string(),
            source,
        })?;

    debug!(
        path = %path.display(),
        recipes = file.recipes.len(),
        ingredients = file.ingredients.len(),
        "Catalogue file parsed"
    );
    Ok(file)
}
