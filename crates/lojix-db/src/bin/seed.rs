//! # Seed Data Generator
//!
//! Populates the database with test catalog and ledger data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p lojix-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p lojix-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p lojix-db --bin seed -- --db ./data/lojix.db
//! ```
//!
//! ## Generated Data
//! - Products across grocery categories with internal codes and barcodes
//! - A month of ledger entries (supplier payables, sale receivables)

use chrono::{Duration, Utc};
use std::env;
use uuid::Uuid;

use lojix_core::{EntryDirection, EntryStatus, LedgerEntry, Product};
use lojix_db::{Database, DbConfig};

/// Product categories for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEB",
        &[
            "Refrigerante Cola 2L",
            "Refrigerante Guarana 2L",
            "Agua Mineral 500ml",
            "Suco de Laranja 1L",
            "Suco de Uva 1L",
            "Cerveja Pilsen 350ml",
            "Cafe Torrado 500g",
            "Cha Mate 250g",
        ],
    ),
    (
        "MER",
        &[
            "Arroz Branco 5kg",
            "Feijao Carioca 1kg",
            "Acucar Refinado 1kg",
            "Sal Refinado 1kg",
            "Oleo de Soja 900ml",
            "Farinha de Trigo 1kg",
            "Macarrao Espaguete 500g",
            "Molho de Tomate 340g",
        ],
    ),
    (
        "LIM",
        &[
            "Detergente Neutro 500ml",
            "Sabao em Po 1kg",
            "Agua Sanitaria 1L",
            "Desinfetante 2L",
            "Esponja Multiuso",
            "Papel Toalha",
            "Amaciante 2L",
            "Alcool 70 1L",
        ],
    ),
    (
        "HIG",
        &[
            "Sabonete 90g",
            "Shampoo 350ml",
            "Creme Dental 90g",
            "Papel Higienico 4un",
            "Desodorante Aerosol",
            "Fio Dental 50m",
            "Escova de Dente",
            "Condicionador 350ml",
        ],
    ),
];

const SUPPLIERS: &[&str] = &[
    "Distribuidora Central",
    "Atacadao Sul",
    "Fornecedor Nacional SA",
    "Comercial Norte Ltda",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./lojix_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Lojix Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./lojix_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Lojix Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category_code, names)) in CATEGORIES.iter().enumerate() {
        for variant in 0..((count / (CATEGORIES.len() * names.len())) + 1) {
            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 10_000 + variant * 100 + name_idx;
                let product = generate_product(category_code, name, seed);

                if let Err(e) = db.catalog().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    println!();
    println!("Generating ledger entries...");

    let mut entries = 0;
    for day in 0..30 {
        let entry = generate_entry(day);
        if let Err(e) = db.ledger().insert(&entry).await {
            eprintln!("Failed to insert ledger entry: {}", e);
            continue;
        }
        entries += 1;
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} products and {} ledger entries in {:?}",
        generated, entries, elapsed
    );

    let low = db.catalog().list_low_stock(5, 10).await?;
    println!("  Low-stock products: {}", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(category: &str, name: &str, seed: usize) -> Product {
    let now = Utc::now();

    let internal_code = format!("{}-{:05}", category, seed);

    // EAN-13 shaped barcode (checksum not valid, fine for dev data)
    let barcode = Some(format!("789{:010}", seed));

    // Price R$1.99 - R$49.99
    let price_cents = 199 + ((seed * 37) % 4800) as i64;

    // Cost 55-75% of price; every 7th product has no recorded cost
    let cost_cents = if seed % 7 == 0 {
        None
    } else {
        let pct = 55 + (seed % 20) as i64;
        Some(price_cents * pct / 100)
    };

    // Stock 0-40; roughly a tenth land below the restock threshold
    let stock = (seed % 41) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        internal_code: Some(internal_code),
        barcode,
        fiscal_code: Some(format!("{:08}", 10000000 + seed)),
        price_cents,
        cost_cents,
        stock,
        supplier: Some(SUPPLIERS[seed % SUPPLIERS.len()].to_string()),
        unit: Some("UN".to_string()),
        created_at: now,
        updated_at: now,
    }
}

/// Generates one ledger entry per simulated day.
fn generate_entry(day: i64) -> LedgerEntry {
    let now = Utc::now();
    let entry_date = (now - Duration::days(30 - day)).date_naive();

    let (direction, description, amount_cents, term) = if day % 3 == 0 {
        (
            EntryDirection::Outflow,
            format!("NF {:06} - {}", 1000 + day, SUPPLIERS[(day as usize) % SUPPLIERS.len()]),
            15_000 + day * 700,
            28,
        )
    } else {
        (
            EntryDirection::Inflow,
            format!("Pedido dia {}", day),
            8_000 + day * 450,
            14,
        )
    };

    let status = if day % 4 == 0 {
        EntryStatus::Pending
    } else {
        EntryStatus::Paid
    };

    LedgerEntry {
        id: Uuid::new_v4().to_string(),
        description,
        amount_cents,
        direction,
        status,
        category: None,
        entry_date,
        due_date: entry_date + Duration::days(term),
        created_at: now,
    }
}
