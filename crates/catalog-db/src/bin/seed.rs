//! # Seed Data Generator
//!
//! Populates the database with a development catalog.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p catalog-db --bin seed
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Catalog
//! Creates a small, realistic catalog tree:
//! - Categories (Beverages, Snacks, Bakery, Home)
//! - A few products per category
//! - Size/variant items per product with prices in cents
//!
//! Existing data is left untouched: seeding is skipped when the database
//! already contains categories.

use std::env;

use catalog_core::{Category, Item, Money, Product};
use catalog_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// Catalog tree used for development data: category -> products.
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Beverages",
        "Coffee, tea, and soft drinks",
        &["Single-Origin Coffee", "Loose-Leaf Tea", "Sparkling Water", "Orange Juice"],
    ),
    (
        "Snacks",
        "Sweet and savoury snacks",
        &["Sea Salt Crisps", "Dark Chocolate", "Trail Mix"],
    ),
    (
        "Bakery",
        "Baked fresh daily",
        &["Sourdough Loaf", "Butter Croissant", "Cinnamon Roll"],
    ),
    (
        "Home",
        "Household goods",
        &["Pet Supplies", "Scented Candle", "Dish Soap"],
    ),
];

/// Size variants generated per product, with a price add-on in cents.
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Regular", 150), ("Large", 300)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./catalog_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Catalog Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.categories().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} categories", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate the catalog tree
    println!();
    println!("Generating catalog...");

    let mut products = 0;
    let mut items = 0;
    let start = std::time::Instant::now();

    for (category_idx, (category_name, category_description, product_names)) in
        CATALOG.iter().enumerate()
    {
        let category = db
            .categories()
            .insert(&Category::new(
                *category_name,
                Some((*category_description).to_string()),
            ))
            .await?;

        for (product_idx, product_name) in product_names.iter().enumerate() {
            let product = db
                .products()
                .insert(&Product::new(*product_name, None, Some(category.clone())))
                .await?;
            products += 1;

            for (size_idx, (size_name, price_addon)) in SIZES.iter().enumerate() {
                let item = generate_item(
                    &product,
                    product_name,
                    size_name,
                    *price_addon,
                    category_idx * 100 + product_idx * 10 + size_idx,
                );

                if let Err(e) = db.items().insert(&item).await {
                    eprintln!("Failed to insert {}: {}", item.name, e);
                    continue;
                }
                items += 1;
            }
        }

        println!("  Seeded {} ({} products)", category_name, product_names.len());
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} categories, {} products, {} items in {:?}",
        CATALOG.len(),
        products,
        items,
        elapsed
    );

    // Verify search
    println!();
    println!("Verifying keyword search...");
    let search_results = db.items().search("coffee").await?;
    println!("  Search 'coffee': {} results", search_results.len());

    let search_results = db.items().search("").await?;
    println!("  Empty keyword: {} results (all items)", search_results.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single item variant with deterministic data.
fn generate_item(
    product: &Product,
    product_name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> Item {
    // Base price $1.99 - $9.99 derived from the seed, plus the size add-on
    let base_cents = 199 + ((seed * 17) % 800) as i64;
    let unit_cost = Money::from_cents(base_cents + price_addon);

    let name = format!("{} {}", product_name, size);
    let description = format!("{} - {} size", product_name, size.to_lowercase());

    let mut item = Item::new(name, Some(description), unit_cost, Some(product.clone()));
    item.image_path = Some(format!(
        "items/{}-{}.jpg",
        product_name.to_lowercase().replace(' ', "-"),
        size.to_lowercase()
    ));
    item
}
