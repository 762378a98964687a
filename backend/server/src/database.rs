//! # SQLite
//!
//! Two database files back the site:
//! - `lego_db.db`: the LEGO inventory, loaded by an external process (see the `seeder` crate).
//!   The server only ever reads from it.
//! - `finance.db`: the transaction ledger, written by the finance endpoint.
//!
//! ## Connections
//!
//! Each file gets its own pool. Handlers check out a [`PoolConnection`](sqlx::pool::PoolConnection)
//! per request, and it goes back to the pool when dropped, so every exit path releases it.
//!
//! ## Schema
//!
//! ```text
//! Box(id)
//! Position(id)
//! Container(id, box_id, position_id)        unique (box_id, position_id)
//! Piece(part_number, name, category)
//! ContainerPiece(container_id, part_number)
//! transactions(id, user, category, amount, date, description, rate, title)
//! ```
//!
//! `ContainerPiece` carries no foreign keys. Dangling rows are tolerated by the query layer.
use std::{path::Path, time::Duration};

use sqlx::{
    SqliteConnection, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

const LEGO_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS Box (
        id TEXT PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS Position (
        id TEXT PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS Container (
        id TEXT PRIMARY KEY,
        box_id TEXT REFERENCES Box(id),
        position_id TEXT REFERENCES Position(id)
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_container_location
        ON Container(box_id, position_id);

    CREATE TABLE IF NOT EXISTS Piece (
        part_number TEXT PRIMARY KEY,
        name TEXT,
        category TEXT
    );

    CREATE TABLE IF NOT EXISTS ContainerPiece (
        container_id TEXT NOT NULL,
        part_number TEXT NOT NULL,
        PRIMARY KEY (container_id, part_number)
    );

    CREATE INDEX IF NOT EXISTS idx_container_piece_part
        ON ContainerPiece(part_number);
"#;

const FINANCE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user TEXT NOT NULL,
        category TEXT NOT NULL,
        amount REAL NOT NULL,
        date DATETIME NOT NULL,
        description TEXT,
        rate TEXT,
        title TEXT NOT NULL
    );
"#;

pub async fn connect(path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("Connected to {path}");

    Ok(pool)
}

pub async fn initialize_lego_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(LEGO_SCHEMA).execute(&mut *conn).await?;

    info!("LEGO tables are ready");
    Ok(())
}

pub async fn initialize_finance_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(FINANCE_SCHEMA).execute(&mut *conn).await?;

    info!("Transactions table is ready");
    Ok(())
}
