//! # Seed Data Generator
//!
//! Populates a database with a demo store, users, and catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default path
//! cargo run -p brioche-db --bin seed
//!
//! # Custom database path and product count
//! cargo run -p brioche-db --bin seed -- --db ./data/brioche.db --count 500
//! ```

use std::collections::HashMap;
use std::env;

use brioche_core::Role;
use brioche_db::repository::product::NewProduct;
use brioche_db::{Database, DbConfig};

/// Catalog categories (sku prefix, display name) with representative
/// product names.
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "COF",
        "Coffee",
        &[
            "Espresso",
            "Double Espresso",
            "Americano",
            "Cappuccino",
            "Flat White",
            "Latte",
            "Mocha",
            "Cold Brew",
        ],
    ),
    (
        "TEA",
        "Tea",
        &[
            "Earl Grey",
            "English Breakfast",
            "Green Tea",
            "Chamomile",
            "Chai Latte",
            "Matcha Latte",
        ],
    ),
    (
        "BAK",
        "Bakery",
        &[
            "Butter Croissant",
            "Pain au Chocolat",
            "Brioche Bun",
            "Cinnamon Roll",
            "Sourdough Slice",
            "Banana Bread",
            "Blueberry Muffin",
        ],
    ),
    (
        "RET",
        "Retail",
        &[
            "House Blend 250g",
            "Single Origin 250g",
            "Decaf Blend 250g",
            "Ceramic Mug",
            "Travel Tumbler",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let db_path = arg_value(&args, "--db").unwrap_or_else(|| "./brioche.db".to_string());
    let count: usize = arg_value(&args, "--count")
        .and_then(|v| v.parse().ok())
        .unwrap_or(200);

    println!("Seeding {} products into {}", count, db_path);

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let store = db
        .stores()
        .create_store("Brioche Demo Cafe", "USD", "America/New_York", -300)
        .await?;
    db.stores().set_invite_code(&store.id, Some("DEMO-2026")).await?;

    db.stores().create_user(&store.id, "Demo Admin", Role::Admin).await?;
    db.stores()
        .create_user(&store.id, "Demo Cashier", Role::Cashier)
        .await?;

    let products = db.products();

    let mut category_ids: HashMap<&str, String> = HashMap::new();
    for (prefix, category_name, _) in CATALOG {
        let category = products.create_category(&store.id, category_name).await?;
        category_ids.insert(*prefix, category.id);
    }

    let mut created = 0usize;
    'outer: for round in 0usize.. {
        for (prefix, _, names) in CATALOG {
            for (i, name) in names.iter().enumerate() {
                if created >= count {
                    break 'outer;
                }

                let index = round * names.len() + i;
                // Deterministic pseudo-variation; good enough for demo data.
                let price = 250 + ((index * 37) % 20) as i64 * 50;
                let stock = ((index * 13) % 60) as i64;
                let alert = 5;

                let input = NewProduct {
                    category_id: category_ids.get(prefix).cloned(),
                    name: if round == 0 {
                        name.to_string()
                    } else {
                        format!("{} #{}", name, round + 1)
                    },
                    sku: format!("{}-{:04}", prefix, index),
                    barcode: None,
                    cost_price_cents: Some(price * 2 / 5),
                    selling_price_cents: price,
                    unit: "pcs".to_string(),
                    stock,
                    min_stock_alert: alert,
                };

                products.create(&store.id, input).await?;
                created += 1;
            }
        }
    }

    println!("Done. store_id = {}", store.id);
    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
