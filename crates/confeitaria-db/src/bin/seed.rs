//! # Seed Data Generator
//!
//! Creates a demo account with clients, products and a few orders for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./confeitaria.db
//! cargo run -p confeitaria-db --bin seed
//!
//! # Specify database path
//! cargo run -p confeitaria-db --bin seed -- --db ./data/confeitaria.db
//!
//! # Custom demo login
//! cargo run -p confeitaria-db --bin seed -- --email demo@confeitaria.dev --password docinho
//! ```
//!
//! ## Generated Data
//! - One user on the default plan
//! - Clients spread over the three satisfaction statuses
//! - Bakery products with prices and stock
//! - Sample orders placed through the order workflow, so stock is
//!   decremented exactly as in production

use std::env;

use confeitaria_core::{ClientStatus, ItemRequest, NewClient, NewFeedback, NewProduct, OrderStatus};
use confeitaria_db::password::hash_password;
use confeitaria_db::{Database, DbConfig, OrderWorkflow};

/// (name, email, status)
const CLIENTS: &[(&str, &str, ClientStatus)] = &[
    ("Maria Souza", "maria.souza@example.com", ClientStatus::Satisfied),
    ("João Lima", "joao.lima@example.com", ClientStatus::Satisfied),
    ("Ana Pereira", "ana.pereira@example.com", ClientStatus::NeedsImprovement),
    ("Carlos Silva", "carlos.silva@example.com", ClientStatus::Unsatisfied),
    ("Beatriz Costa", "beatriz.costa@example.com", ClientStatus::NeedsImprovement),
];

/// (name, price_cents, stock)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Bolo de Cenoura", 4500, 12),
    ("Bolo de Chocolate", 5200, 10),
    ("Brigadeiro (unidade)", 250, 200),
    ("Beijinho (unidade)", 250, 150),
    ("Torta de Limão", 6800, 6),
    ("Pão de Mel", 600, 80),
    ("Quindim", 450, 40),
    ("Cento de Docinhos", 22000, 4),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./confeitaria.db");
    let mut email = String::from("demo@confeitaria.dev");
    let mut password = String::from("docinho123");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--email" | "-e" => {
                if i + 1 < args.len() {
                    email = args[i + 1].clone();
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Confeitaria Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: ./confeitaria.db)");
                println!("  -e, --email <EMAIL>     Demo login email (default: demo@confeitaria.dev)");
                println!("  -p, --password <PASS>   Demo login password (default: docinho123)");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Confeitaria Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Account:  {}", email);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if let Some(existing) = db.users().get_by_email(&email).await? {
        let products = db.products().count(existing.id).await?;
        println!("⚠ Account {} already exists with {} products", email, products);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let user = db
        .users()
        .create("Confeitaria Demo", &email, &hash_password(&password)?)
        .await?;
    println!("✓ Created user #{}", user.id);

    let mut client_ids = Vec::with_capacity(CLIENTS.len());
    for (name, client_email, status) in CLIENTS {
        let client = db
            .clients()
            .insert(
                user.id,
                &NewClient {
                    name: name.to_string(),
                    email: client_email.to_string(),
                    status: *status,
                },
            )
            .await?;
        client_ids.push(client.id);
    }
    println!("✓ Created {} clients", client_ids.len());

    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, price_cents, stock) in PRODUCTS {
        let product = db
            .products()
            .insert(
                user.id,
                &NewProduct {
                    name: name.to_string(),
                    price_cents: *price_cents,
                    stock: *stock,
                },
            )
            .await?;
        product_ids.push(product.id);
    }
    println!("✓ Created {} products", product_ids.len());

    let workflow = OrderWorkflow::new(db.clone());

    workflow
        .create_single_item_order(user.id, client_ids[0], product_ids[0], 1, Some(OrderStatus::Delivered))
        .await?;
    workflow
        .create_multi_item_order(
            user.id,
            client_ids[1],
            &[
                ItemRequest { product_id: product_ids[2], quantity: 50 },
                ItemRequest { product_id: product_ids[3], quantity: 50 },
            ],
            Some(OrderStatus::Confirmed),
        )
        .await?;
    workflow
        .create_single_item_order(user.id, client_ids[2], product_ids[4], 1, None)
        .await?;
    println!("✓ Placed {} sample orders", db.orders().count(user.id).await?);

    for (client_id, rating, comment) in [
        (client_ids[0], 5, "Bolo perfeito, entrega no horário."),
        (client_ids[3], 2, "Chegou atrasado."),
    ] {
        db.feedbacks()
            .insert(
                user.id,
                &NewFeedback {
                    client_id,
                    rating,
                    comment: comment.to_string(),
                    photo: None,
                },
            )
            .await?;
    }
    println!("✓ Recorded 2 feedbacks");

    println!();
    println!("✓ Seed complete! Log in as {} / {}", email, password);

    db.close().await;
    Ok(())
}
