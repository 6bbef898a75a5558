//! Database module for SQLite persistence using SeaORM

pub mod entities;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;

/// Initialize database connection and create tables
pub async fn init_database(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
    tracing::info!("Connecting to database: {}", db_url);

    let db = Database::connect(&db_url).await?;

    create_tables(&db).await?;

    Ok(db)
}

/// Create all tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS chefs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            bio TEXT NOT NULL DEFAULT '' CHECK (length(bio) <= 1000)
        )
        "#.to_string(),
    )).await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS dishes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            dish_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            cuisine TEXT NOT NULL,
            preparation_time INTEGER NOT NULL CHECK (preparation_time >= 0),
            rating INTEGER CHECK (rating BETWEEN 1 AND 5),
            chef_id INTEGER,
            FOREIGN KEY (chef_id) REFERENCES chefs(id) ON DELETE CASCADE
        )
        "#.to_string(),
    )).await?;

    // Owner and rating lookups back the filtered listings
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_dishes_chef ON dishes(chef_id)"#.to_string(),
    )).await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_dishes_rating ON dishes(rating)"#.to_string(),
    )).await?;

    tracing::info!("Database tables initialized");
    Ok(())
}
