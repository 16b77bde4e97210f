use rust_decimal::Decimal;

use marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    models::{Sex, User, UserRole},
    services::auth_service::hash_password,
    store::{NewProduct, NewUser, Page, SeaOrmStore, Store},
    visibility::ProductScope,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let store = SeaOrmStore::new(orm);

    let seller = ensure_user(&store, "seller", "seller123", UserRole::Seller).await?;
    let buyer = ensure_user(&store, "buyer", "buyer123", UserRole::Buyer).await?;
    seed_products(&store, &seller).await?;

    println!(
        "Seed completed. Seller: {}, Buyer: {}",
        seller.uuid, buyer.uuid
    );
    Ok(())
}

async fn ensure_user(
    store: &SeaOrmStore,
    username: &str,
    password: &str,
    role: UserRole,
) -> anyhow::Result<User> {
    if let Some(existing) = store.find_user_by_username(username).await? {
        println!("User {username} already exists ({})", existing.uuid);
        return Ok(existing);
    }

    let user = store
        .insert_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: hash_password(password)?,
            sex: Sex::default(),
            role,
        })
        .await?;

    println!("Ensured user {username} (role={role:?})");
    Ok(user)
}

async fn seed_products(store: &SeaOrmStore, seller: &User) -> anyhow::Result<()> {
    let (_, existing) = store
        .list_products(ProductScope::OwnedBy(seller.id), Page::all())
        .await?;
    if existing > 0 {
        println!("Seller already has {existing} products, skipping");
        return Ok(());
    }

    let products = vec![
        ("Axum Hoodie", "Warm hoodie for Rustaceans", Decimal::new(5500, 2), 50, true),
        ("Ferris Mug", "Coffee tastes better with Ferris", Decimal::new(1200, 2), 100, true),
        ("Rust Sticker Pack", "Decorate your laptop", Decimal::new(500, 2), 200, true),
        ("E-book: Async Rust", "Learn async Rust patterns", Decimal::new(2500, 2), 75, false),
    ];

    for (name, desc, price, stock, is_active) in products {
        let product = store
            .insert_product(NewProduct {
                name: name.to_string(),
                description: desc.to_string(),
                price,
                stock,
                is_active,
                seller_id: seller.id,
            })
            .await?;
        println!("Seeded product {name} ({})", product.uuid);
    }

    Ok(())
}
