//! # Seeder
//!
//! Loads an inventory fixture into the LEGO database. Stands in for the real
//! catalog import when working locally.
//!
//! ## Fixture
//! ```json
//! {
//!     "boxes": ["B1"],
//!     "positions": ["A1", "A2"],
//!     "pieces": [{ "part_number": "3001", "name": "Brick 2 x 4", "category": "Bricks" }],
//!     "containers": [{ "id": 1, "box": "b1", "position": "A1", "pieces": ["3001"] }]
//! }
//! ```
//!
//! Rows that already exist are left alone, so a fixture can be loaded twice.
use std::fs;

use anyhow::{Context, Result};
use site::{
    database::{connect, initialize_lego_schema},
    lego::{container_id_from_number, normalize_box_id, normalize_container_id},
};
use sqlx::SqliteConnection;
use tracing::info;

pub mod models;

use models::{ContainerKey, Inventory};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Loaded {
    pub boxes: u64,
    pub positions: u64,
    pub pieces: u64,
    pub containers: u64,
    pub links: u64,
}

pub async fn seed(db_path: &str, fixture_path: &str) -> Result<Loaded> {
    let raw = fs::read_to_string(fixture_path)
        .with_context(|| format!("Failed to read fixture {fixture_path}"))?;
    let inventory: Inventory =
        serde_json::from_str(&raw).with_context(|| format!("Malformed fixture {fixture_path}"))?;

    info!(
        "Fixture has {} boxes, {} positions, {} pieces, {} containers",
        inventory.boxes.len(),
        inventory.positions.len(),
        inventory.pieces.len(),
        inventory.containers.len()
    );

    let pool = connect(db_path).await?;
    let mut conn = pool.acquire().await?;

    initialize_lego_schema(&mut conn).await?;
    let loaded = load_inventory(&mut conn, &inventory).await?;

    info!("Loaded {loaded:?}");
    Ok(loaded)
}

pub async fn load_inventory(conn: &mut SqliteConnection, inventory: &Inventory) -> Result<Loaded> {
    let mut loaded = Loaded::default();

    for box_id in &inventory.boxes {
        loaded.boxes += sqlx::query("INSERT OR IGNORE INTO Box(id) VALUES (?)")
            .bind(normalize_box_id(box_id))
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }

    for position in &inventory.positions {
        loaded.positions += sqlx::query("INSERT OR IGNORE INTO Position(id) VALUES (?)")
            .bind(position)
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }

    for piece in &inventory.pieces {
        loaded.pieces +=
            sqlx::query("INSERT OR IGNORE INTO Piece(part_number, name, category) VALUES (?, ?, ?)")
                .bind(&piece.part_number)
                .bind(&piece.name)
                .bind(&piece.category)
                .execute(&mut *conn)
                .await?
                .rows_affected();
    }

    for container in &inventory.containers {
        let id = match &container.id {
            ContainerKey::Number(n) => container_id_from_number(*n),
            ContainerKey::Text(text) => normalize_container_id(text)
                .with_context(|| format!("Bad container in fixture: {text}"))?,
        };
        let box_id = container.box_id.as_deref().map(normalize_box_id);

        loaded.containers += sqlx::query(
            "INSERT OR IGNORE INTO Container(id, box_id, position_id) VALUES (?, ?, ?)",
        )
        .bind(&id)
        .bind(box_id)
        .bind(&container.position)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to place container {id}"))?
        .rows_affected();

        for part_number in &container.pieces {
            loaded.links += sqlx::query(
                "INSERT OR IGNORE INTO ContainerPiece(container_id, part_number) VALUES (?, ?)",
            )
            .bind(&id)
            .bind(part_number)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        }
    }

    Ok(loaded)
}
