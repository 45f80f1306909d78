//! cookbook - query the catalogue indexes from the command line

mod cli;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cookbook_core::{load_catalogue_file, Catalogue, EntityClass, IndexConfig, Ingredient, Recipe};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cookbook",
    version,
    about = "Query the cookbook catalogue indexes",
    long_about = "Loads a JSON catalogue into the in-memory store, builds the name trie,\n\
                  hot-lookup caches and ordered indexes, then runs one query.\n\
                  \n\
                  Examples:\n\
                    cookbook complete recipe pa           # Autocomplete recipe names\n\
                    cookbook top -n 5                     # Five best-rated recipes\n\
                    cookbook rating 3 4 --class ingredient\n\
                    cookbook dates 2024-01-01 2024-01-31\n\
                    cookbook prefix sp                    # Names starting with 'sp'\n\
                    cookbook stats --json\n\
                  \n\
                  Environment Variables:\n\
                    COOKBOOK_CATALOGUE                    # Catalogue JSON file\n\
                    COOKBOOK_CONFIG                       # Index config TOML file\n\
                    RUST_LOG                              # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Catalogue JSON file to load
    #[arg(long, env = "COOKBOOK_CATALOGUE", default_value = "catalogue.json")]
    catalogue: PathBuf,

    /// Index configuration (TOML)
    #[arg(long, env = "COOKBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Autocomplete names by prefix, most frequent first
    Complete {
        /// Entity class: recipe | ingredient
        class: EntityClass,
        prefix: String,
        /// Max suggestions (default: configured completion limit)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Best-rated entities
    Top {
        #[arg(long, short = 'n', default_value = "10")]
        count: usize,
        #[arg(long, default_value = "recipe")]
        class: EntityClass,
    },
    /// Entities with an average rating in [MIN, MAX]
    Rating {
        min: f64,
        max: f64,
        #[arg(long, default_value = "recipe")]
        class: EntityClass,
    },
    /// Entities dated in [START, END] (YYYY-MM-DD)
    Dates {
        start: NaiveDate,
        end: NaiveDate,
        #[arg(long, default_value = "recipe")]
        class: EntityClass,
    },
    /// Entities whose name starts with PREFIX, in name order
    Prefix {
        prefix: String,
        #[arg(long, default_value = "recipe")]
        class: EntityClass,
    },
    /// Look up one entity (cache first, then the store)
    Get { class: EntityClass, name: String },
    /// Print index statistics
    Stats,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => IndexConfig::load(path)
            .with_context(|| format!("Failed to load index config {}", path.display()))?,
        None => IndexConfig::default(),
    };

    let catalogue = Catalogue::new(config).context("Failed to initialize catalogue")?;
    let file = load_catalogue_file(&cli.catalogue)
        .with_context(|| format!("Failed to load catalogue {}", cli.catalogue.display()))?;
    let report = catalogue.import(file);
    if report.has_warnings() {
        warn!(
            path = %cli.catalogue.display(),
            imported = report.total_imported(),
            skipped = report.warnings.len(),
            "Catalogue loaded with skipped entries"
        );
    } else {
        debug!(
            path = %cli.catalogue.display(),
            imported = report.total_imported(),
            "Catalogue loaded"
        );
    }

    let json = cli.json;
    let index = catalogue.index();
    match cli.command {
        Command::Complete {
            class,
            prefix,
            limit,
        } => {
            let suggestions = match limit {
                Some(n) => index.complete(class, &prefix, n),
                None => index.suggest(class, &prefix),
            };
            cli::print_suggestions(class, &prefix, &suggestions, json)?;
        }
        Command::Top { count, class } => {
            let rows = match class {
                EntityClass::Recipe => cli::rows(&catalogue, &index.top_rated::<Recipe>(count)),
                EntityClass::Ingredient => {
                    cli::rows(&catalogue, &index.top_rated::<Ingredient>(count))
                }
            };
            cli::print_rows(&rows, json)?;
        }
        Command::Rating { min, max, class } => {
            let rows = match class {
                EntityClass::Recipe => {
                    cli::rows(&catalogue, &index.by_rating_range::<Recipe>(min, max))
                }
                EntityClass::Ingredient => {
                    cli::rows(&catalogue, &index.by_rating_range::<Ingredient>(min, max))
                }
            };
            cli::print_rows(&rows, json)?;
        }
        Command::Dates { start, end, class } => {
            let rows = match class {
                EntityClass::Recipe => {
                    cli::rows(&catalogue, &index.by_date_range::<Recipe>(start, end))
                }
                EntityClass::Ingredient => {
                    cli::rows(&catalogue, &index.by_date_range::<Ingredient>(start, end))
                }
            };
            cli::print_rows(&rows, json)?;
        }
        Command::Prefix { prefix, class } => {
            let rows = match class {
                EntityClass::Recipe => {
                    cli::rows(&catalogue, &index.by_name_prefix::<Recipe>(&prefix))
                }
                EntityClass::Ingredient => {
                    cli::rows(&catalogue, &index.by_name_prefix::<Ingredient>(&prefix))
                }
            };
            cli::print_rows(&rows, json)?;
        }
        Command::Get { class, name } => {
            let row = match class {
                EntityClass::Recipe => catalogue
                    .recipe(&name)
                    .map(|r| cli::EntityRow::from_entity(&*r, true)),
                EntityClass::Ingredient => catalogue
                    .ingredient(&name)
                    .map(|i| cli::EntityRow::from_entity(&*i, true)),
            };
            let row = row.with_context(|| format!("No {} named '{}'", class, name))?;
            cli::print_rows(&[row], json)?;
        }
        Command::Stats => {
            cli::print_stats(&index.stats(), json)?;
        }
    }

    Ok(())
}
