//! Seed the database with demo accounts and products.
//!
//! Intended for development environments. Seeding is idempotent in the
//! weak sense: re-running against a database that already has the demo
//! accounts fails on the email uniqueness constraint rather than
//! duplicating data.

use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::info;

use mercado_core::{Email, Role};
use mercado_server::db::users::UserRepository;
use mercado_server::db::{ProductRepository, create_pool};
use mercado_server::models::NewProduct;
use mercado_server::services::auth::hash_password;

/// Demo password shared by the seeded accounts.
const DEMO_PASSWORD: &str = "password1";

/// Seed demo users and products.
///
/// # Errors
///
/// Returns an error if environment variables are missing or any database
/// operation fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("MERCADO_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "MERCADO_DATABASE_URL not set")?;

    let pool = create_pool(&database_url).await?;
    let users = UserRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let password_hash = hash_password(DEMO_PASSWORD)?;

    let seller = users
        .create(
            &Email::parse("seller@mercado.dev")?,
            &password_hash,
            Role::Seller,
        )
        .await?;
    info!(id = %seller.id, "Created demo seller");

    let buyer = users
        .create(
            &Email::parse("buyer@mercado.dev")?,
            &password_hash,
            Role::Buyer,
        )
        .await?;
    info!(id = %buyer.id, "Created demo buyer");

    let demo_products = [
        ("Mate gourd", "Hand-carved calabash gourd", 24.90, 12),
        ("Bombilla", "Stainless steel filtered straw", 9.50, 40),
        ("Yerba blend 1kg", "Traditional unsmoked blend", 15.00, 25),
        ("Thermos 1L", "Double-walled, pour-control lid", 32.00, 8),
    ];

    for (name, description, price, quantity) in demo_products {
        let product = products
            .create(
                seller.id,
                &NewProduct {
                    name: name.to_string(),
                    description: description.to_string(),
                    price: Decimal::try_from(price)?.round_dp(2),
                    quantity,
                    image_url: format!(
                        "https://img.mercado.dev/{}.jpg",
                        name.to_lowercase().replace(' ', "-")
                    ),
                },
            )
            .await?;
        info!(id = %product.id, name, "Created demo product");
    }

    info!("Seed complete");
    Ok(())
}
