//! # Seed Data Generator
//!
//! Populates the database with demo products, purchases and invoices for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 60 products (default) into the configured database
//! cargo run -p tally-store --bin seed
//!
//! # Generate custom amount
//! cargo run -p tally-store --bin seed -- --count 200
//!
//! # Specify database path and create 10 invoices
//! cargo run -p tally-store --bin seed -- --db ./data/tally.db --invoices 10
//! ```
//!
//! ## Generated Products
//! Creates product data across categories:
//! - Stationery (pens, paper, notebooks)
//! - Office (staplers, folders, desk items)
//! - Electronics (cables, mice, keyboards)
//! - Furniture (chairs, desks, shelves)
//! - Pantry (coffee, tea, snacks)
//!
//! Each product has:
//! - Unique SKU: `{CATEGORY}-{NAME}-{INDEX}`
//! - Price: $1.99 - $9.99 plus a size addon
//! - Tax rate: 0%, 5%, 8.25%, 18%

use std::env;
use std::path::PathBuf;

use chrono::{Days, Utc};
use tally_core::{Money, NewProduct, NewPurchase, Product};
use tally_store::logging::init_tracing;
use tally_store::{AppConfig, Database, InvoiceSession};

/// Product categories for demo data
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "STA",
        "Stationery",
        &["Ballpoint Pen", "Gel Pen", "Pencil", "Notebook", "Sticky Notes", "Printer Paper"],
    ),
    (
        "OFF",
        "Office",
        &["Stapler", "Folder", "Desk Organizer", "Whiteboard Marker", "Binder Clips"],
    ),
    (
        "ELE",
        "Electronics",
        &["USB Cable", "Wireless Mouse", "Keyboard", "Power Strip", "Headset"],
    ),
    (
        "FUR",
        "Furniture",
        &["Office Chair", "Standing Desk", "Bookshelf", "Filing Cabinet"],
    ),
    (
        "PAN",
        "Pantry",
        &["Ground Coffee", "Green Tea", "Biscuits", "Bottled Water", "Sugar Sachets"],
    ),
];

/// Size variants for products
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Standard", 150), ("Large", 400)];

/// Tax rates in basis points
const TAX_RATES: &[u32] = &[0, 500, 825, 1800];

const CLIENTS: &[(&str, &str)] = &[
    ("Acme Traders", "14 Market Road\nSpringfield"),
    ("Globex Ltd", "200 Harbour View\nShelbyville"),
    ("Initech", "4120 Freidrich Lane\nAustin"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut invoices: usize = 0;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--invoices" | "-i" => {
                if i + 1 < args.len() {
                    invoices = args[i + 1].parse().unwrap_or(invoices);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>      Number of products to generate (default: 60)");
                println!("  -i, --invoices <N>   Number of demo invoices to create (default: 0)");
                println!("  -d, --db <PATH>      Database file path (default: from config)");
                println!("      --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = AppConfig::load_or_default(config_path);
    if let Some(path) = db_path {
        config.database.path = Some(path);
    }
    init_tracing(&config.logging.filter);

    println!("Tally Seed Data Generator");
    println!("=========================");
    println!("Database: {}", config.database_path().display());
    println!("Products: {}", count);
    println!("Invoices: {}", invoices);
    println!();

    if let Some(parent) = config.database_path().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::open(config.db_config()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    let products = if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping product seed to avoid duplicates.");
        db.products().list().await?
    } else {
        seed_products(&db, count).await?
    };

    if existing == 0 {
        seed_purchases(&db, &products).await?;
    }

    if invoices > 0 && !products.is_empty() {
        seed_invoices(&db, &config, &products, invoices).await?;
    }

    // Verify search
    println!();
    println!("Verifying search...");
    let results = db.products().search("pen").await?;
    println!("  Search 'pen': {} results", results.len());
    let results = db.products().search("pantry").await?;
    println!("  Search 'pantry': {} results", results.len());

    let summary = db.reports().dashboard().await?;
    println!();
    println!("Dashboard");
    println!("  Invoices:  {}", summary.invoice_count);
    println!("  Sales:     {}", summary.total_sales);
    println!("  Purchases: {}", summary.total_purchases);
    println!("  Profit:    {}", summary.net_profit);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

async fn seed_products(db: &Database, count: usize) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut created = Vec::new();

    'outer: for (category_idx, (code, category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, (size, price_addon)) in SIZES.iter().enumerate() {
                if created.len() >= count {
                    break 'outer;
                }

                let product = generate_product(
                    code,
                    category,
                    name,
                    size,
                    *price_addon,
                    category_idx * 100 + name_idx * 10 + size_idx,
                );

                match db.products().create(&product).await {
                    Ok(product) => created.push(product),
                    Err(e) => eprintln!("Failed to insert {}: {}", product.sku, e),
                }
            }
        }
    }

    println!("✓ Generated {} products in {:?}", created.len(), start.elapsed());
    Ok(created)
}

/// One restock per category, a month back, at 60% of list price.
async fn seed_purchases(db: &Database, products: &[Product]) -> Result<(), Box<dyn std::error::Error>> {
    let month_ago = Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(30))
        .unwrap_or_else(|| Utc::now().date_naive());

    let mut recorded = 0;
    for (_, category, _) in CATEGORIES {
        let Some(product) = products.iter().find(|p| p.category == *category) else {
            continue;
        };

        let cost = Money::from_cents(product.price_cents * 60 / 100);
        let purchase = NewPurchase::new(product, 20, cost, month_ago, "Wholesale Supplies Co")?;
        db.purchases().record(purchase).await?;
        recorded += 1;
    }

    println!("✓ Recorded {} purchases", recorded);
    Ok(())
}

async fn seed_invoices(
    db: &Database,
    config: &AppConfig,
    products: &[Product],
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("Creating invoices...");

    let today = Utc::now().date_naive();
    let mut session =
        InvoiceSession::start(db.clone(), today, config.invoice.default_tax_mode).await;

    for n in 0..count {
        let (client, address) = CLIENTS[n % CLIENTS.len()];
        let draft = session.draft_mut();
        draft.client_name = client.to_string();
        draft.client_address = address.to_string();

        for offset in 0..=(n % 3) {
            let product = &products[(n * 7 + offset * 11) % products.len()];
            if let Some(line) = session.add_product(product) {
                session
                    .draft_mut()
                    .items
                    .set_quantity(line, &(1 + (n + offset) % 4).to_string());
            }
        }

        match session.submit_with_notice().await {
            (Ok(saved), notice) => println!("  {} ({})", notice.message, saved.id),
            (Err(_), notice) => {
                eprintln!("  {}: {}", notice.title, notice.message);
                break;
            }
        }
    }

    Ok(())
}

/// Generates a single product with demo data.
fn generate_product(
    code: &str,
    category: &str,
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> NewProduct {
    let short: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();

    // Base $1.99-$9.99 + size addon
    let base_price = 199 + ((seed * 17) % 800) as i64;

    NewProduct {
        name: format!("{} {}", name, size),
        category: category.to_string(),
        sku: format!("{}-{}-{:03}", code, short, seed),
        price_cents: base_price + price_addon,
        tax_rate_bps: TAX_RATES[seed % TAX_RATES.len()],
    }
}
