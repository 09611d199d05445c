//! Database seeding tool
//!
//! Run with: cargo run --bin seed

use art_market::repository::postgres::{PgProductCatalog, PgUserRepository};
use art_market::{db, seed, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "art_market=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    println!("Connecting to database...");
    let pool = db::connect(&config).await?;

    let catalog = PgProductCatalog::new(pool.clone());
    let users = PgUserRepository::new(pool.clone());
    let report = seed::run(&catalog, &users).await?;

    println!("Upserted {} sample products", report.products_upserted);
    if report.admin_created {
        println!("Admin user created: {}", seed::ADMIN_EMAIL);
    } else {
        println!("Admin user already present");
    }
    println!("Database seeded successfully!");

    pool.close().await;
    Ok(())
}
