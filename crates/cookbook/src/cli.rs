//! Output formatting for query results
//!
//! Table output via comfy-table, or pretty JSON with `--json`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use cookbook_core::{Catalogue, EntityClass, IndexStats, Indexed};
use serde::Serialize;
use std::sync::Arc;

/// One entity in a result listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRow {
    pub class: EntityClass,
    pub name: String,
    pub rating: f64,
    pub created_on: Option<NaiveDate>,
    /// False when the index still lists an entity the store no longer has
    pub current: bool,
}

impl EntityRow {
    pub fn from_entity<T: Indexed>(entity: &T, current: bool) -> Self {
        Self {
            class: T::CLASS,
            name: entity.name().to_string(),
            rating: entity.average_rating(),
            created_on: entity.created_on(),
            current,
        }
    }
}

/// Build rows, flagging index hits that are no longer in the store
pub fn rows<T: Indexed>(catalogue: &Catalogue, entities: &[Arc<T>]) -> Vec<EntityRow> {
    entities
        .iter()
        .map(|e| {
            let current = catalogue.is_current(T::CLASS, e.name());
            EntityRow::from_entity(&**e, current)
        })
        .collect()
}

fn header(table: &mut Table, columns: &[&str]) {
    table.set_header(
        columns
            .iter()
            .map(|c| Cell::new(c).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

fn format_rating(rating: f64) -> String {
    if rating > 0.0 {
        format!("{:.1}", rating)
    } else {
        "-".to_string()
    }
}

pub fn render_rows(rows: &[EntityRow]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    header(&mut table, &["Class", "Name", "Rating", "Created", ""]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.class),
            Cell::new(&row.name),
            Cell::new(format_rating(row.rating)),
            Cell::new(
                row.created_on
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            if row.current {
                Cell::new("")
            } else {
                Cell::new("stale").fg(Color::Yellow)
            },
        ]);
    }
    table
}

pub fn print_rows(rows: &[EntityRow], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(rows).context("Failed to serialize results")?;
        println!("{}", out);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No matches");
    } else {
        println!("{}", render_rows(rows));
    }
    Ok(())
}

pub fn print_suggestions(
    class: EntityClass,
    prefix: &str,
    suggestions: &[String],
    json: bool,
) -> Result<()> {
    if json {
        let out =
            serde_json::to_string_pretty(suggestions).context("Failed to serialize suggestions")?;
        println!("{}", out);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No {} names start with '{}'", class, prefix);
    }
    for suggestion in suggestions {
        println!("{}", suggestion);
    }
    Ok(())
}

pub fn render_stats(stats: &IndexStats) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    header(
        &mut table,
        &[
            "Class", "Trie nodes", "Words", "Names", "Dates", "Rated", "Cache", "Hit rate",
        ],
    );

    for class in EntityClass::ALL {
        let s = stats.class(class);
        table.add_row(vec![
            Cell::new(class),
            Cell::new(s.trie_nodes),
            Cell::new(s.trie_words),
            Cell::new(s.names),
            Cell::new(format!("{} in {} days", s.dated_entries, s.date_buckets)),
            Cell::new(format!("{} in {} buckets", s.rated_entries, s.rating_buckets)),
            Cell::new(format!("{}/{}", s.cache.len, s.cache.capacity)),
            Cell::new(format!("{:.1}%", s.cache.hit_rate * 100.0)),
        ]);
    }
    table
}

pub fn print_stats(stats: &IndexStats, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(stats).context("Failed to serialize stats")?;
        println!("{}", out);
    } else {
        println!("{}", render_stats(stats));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cookbook_core::{Ingredient, Recipe};

    #[test]
    fn test_rows_flag_stale_entries() {
        let catalogue = Catalogue::with_defaults();
        catalogue.add_recipe(Recipe::new("Pasta").with_ratings(vec![4]));
        catalogue.add_recipe(Recipe::new("Pizza").with_ratings(vec![5]));
        catalogue.remove_recipe("Pizza");

        let top = catalogue.index().top_rated::<Recipe>(2);
        let rows = rows(&catalogue, &top);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Pizza");
        assert!(!rows[0].current);
        assert!(rows[1].current);
    }

    #[test]
    fn test_render_rows_contains_names() {
        let row = EntityRow::from_entity(&Ingredient::new("Basil", 2), true);
        let rendered = render_rows(&[row]).to_string();

        assert!(rendered.contains("Basil"));
        assert!(rendered.contains("ingredient"));
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(0.0), "-");
        assert_eq!(format_rating(4.25), "4.2");
    }

    #[test]
    fn test_render_stats_lists_both_classes() {
        let catalogue = Catalogue::with_defaults();
        let rendered = render_stats(&catalogue.index().stats()).to_string();

        assert!(rendered.contains("recipe"));
        assert!(rendered.contains("ingredient"));
    }
}
