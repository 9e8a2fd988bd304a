//! Terminal front end for the mealmap session controller.
//!
//! Each subcommand drives one slice of the dashboard flow: nutrition score,
//! supplier lookup, or recipe origins. `analyze` runs the whole flow in one
//! session so the caches behave exactly as they would behind a page.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mealmap_core::{GeoCoordinate, IngredientRecord, MealType};
use mealmap_remote::{GeocodeClient, RecipeApiClient};
use mealmap_session::{view, SessionController};

#[derive(Debug, Parser)]
#[command(name = "mealmap")]
#[command(about = "Recipe nutrition scores and ingredient supplier lookup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the nutrition breakdown for a recipe and meal type.
    Score {
        #[arg(long)]
        recipe: String,
        /// One of: breakfast, lunch, dinner.
        #[arg(long)]
        meal: String,
    },
    /// Geocode an address and list predicted ingredient suppliers.
    Suppliers {
        #[arg(long)]
        recipe: String,
        #[arg(long)]
        address: String,
    },
    /// List a recipe's ingredients grouped by geographic origin.
    Origins {
        #[arg(long)]
        recipe: String,
        /// Optional address; when given, distances to located suppliers are
        /// computed.
        #[arg(long)]
        address: Option<String>,
    },
    /// Run the full flow: score, geocode, suppliers, and origins.
    Analyze {
        #[arg(long)]
        recipe: String,
        #[arg(long)]
        meal: String,
        #[arg(long)]
        address: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = mealmap_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api = RecipeApiClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let geocoder = GeocodeClient::new(
        &config.geocoder_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let mut session = SessionController::new(api, geocoder);

    let cli = Cli::parse();
    match cli.command {
        Commands::Score { recipe, meal } => {
            let meal = parse_meal(&meal)?;
            session.submit_recipe(&recipe)?;
            session.select_meal_type(meal).await?;
            print_score(&session);
        }
        Commands::Suppliers { recipe, address } => {
            session.submit_recipe(&recipe)?;
            let user = session.submit_address(&address).await?;
            session.fetch_ingredients().await?;
            print_suppliers(&session, user);
        }
        Commands::Origins { recipe, address } => {
            session.submit_recipe(&recipe)?;
            let user = match address {
                Some(address) => Some(session.submit_address(&address).await?),
                None => None,
            };
            session.fetch_origins().await?;
            print_origins(session.origins(), user);
        }
        Commands::Analyze {
            recipe,
            meal,
            address,
        } => {
            let meal = parse_meal(&meal)?;
            session.submit_recipe(&recipe)?;
            session.select_meal_type(meal).await?;
            print_score(&session);

            let user = session.submit_address(&address).await?;
            session.fetch_ingredients().await?;
            print_suppliers(&session, user);

            session.fetch_origins().await?;
            print_origins(session.origins(), Some(user));
        }
    }

    Ok(())
}

fn parse_meal(raw: &str) -> anyhow::Result<MealType> {
    raw.parse::<MealType>()
        .map_err(anyhow::Error::msg)
        .context("invalid --meal value")
}

fn print_score(session: &SessionController) {
    let Some(score) = session.nutri_score() else {
        println!("No nutrition score available for this recipe.");
        return;
    };
    if score.is_empty() {
        println!("No nutrition score available for this recipe.");
        return;
    }

    println!("Nutrition breakdown (1.00 is the ideal target):");
    for row in view::nutrition_rows(score) {
        let verdict = if row.within_target {
            "within target"
        } else {
            "over target"
        };
        println!("  {:<14} {}  ({verdict})", row.label, row.formatted);
    }
}

fn print_suppliers(session: &SessionController, user: GeoCoordinate) {
    let records = session.ingredients();
    if session.ingredients_stale() {
        println!("(supplier data is stale; re-run to refresh)");
    }
    if records.is_empty() {
        println!("No supplier matches found.");
        return;
    }

    println!("Map points (you first, then suppliers):");
    for point in view::map_points(user, records) {
        println!("  {:.5}, {:.5}", point.latitude, point.longitude);
    }

    let (located, unlocated) = view::partition_by_location(records);
    if !located.is_empty() {
        println!("Suppliers with a location:");
        for record in located {
            match record.distance_km {
                Some(km) => println!("  {} ({km:.1} km away)", record.matched_product),
                None => println!("  {} (distance unknown)", record.matched_product),
            }
        }
    }
    if !unlocated.is_empty() {
        println!("Suppliers without a location:");
        for record in unlocated {
            println!("  {}", record.matched_product);
        }
    }

    print_origin_groups(records, Some(user));
}

fn print_origins(records: &[IngredientRecord], user: Option<GeoCoordinate>) {
    if records.is_empty() {
        println!("No ingredients returned for this recipe.");
        return;
    }
    print_origin_groups(records, user);
}

fn print_origin_groups(records: &[IngredientRecord], user: Option<GeoCoordinate>) {
    println!("Ingredients by origin:");
    for group in view::group_by_origin(records) {
        println!("  {}:", group.bucket.label());
        for record in group.members {
            // The origin endpoint does not compute distances; fill them in
            // locally when both coordinates are known.
            let distance = record.distance_km.or_else(|| {
                match (user, record.coordinate) {
                    (Some(user), Some(supplier)) => Some(view::distance_km(user, supplier)),
                    _ => None,
                }
            });
            match distance {
                Some(km) => println!("    {} ({km:.1} km)", record.matched_product),
                None => println!("    {}", record.matched_product),
            }
        }
    }
}
