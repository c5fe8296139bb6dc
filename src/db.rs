use anyhow::{Context, Result};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;

/// Represents a product stored in the catalog
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub count: i64,
    pub price: f64,
}

/// A fully collected product that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub count: i64,
    pub price: f64,
}

/// Open a connection pool, creating the database file when it does not exist
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL: {database_url}"))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    Ok(pool)
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &SqlitePool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            description TEXT,
            count INTEGER,
            price REAL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create products table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Insert a new product and return its ID
pub async fn insert_product(pool: &SqlitePool, product: &NewProduct) -> Result<i64> {
    info!("Inserting product: {}", product.name);

    let result = sqlx::query(
        "INSERT INTO products (name, description, count, price) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.count)
    .bind(product.price)
    .execute(pool)
    .await
    .context("Failed to insert product")?;

    let product_id = result.last_insert_rowid();
    info!("Product created with ID: {}", product_id);

    Ok(product_id)
}

/// List every product in insertion order
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, count, price FROM products ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list products")?;

    info!("Loaded {} products", products.len());
    Ok(products)
}

/// Count stored products
pub async fn count_products(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await
        .context("Failed to count products")?;

    Ok(count)
}
