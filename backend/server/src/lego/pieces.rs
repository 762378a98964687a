use serde::Serialize;
use sqlx::{FromRow, SqliteConnection};

use super::ids::normalize_container_id;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Piece {
    pub part_number: String,
    pub name: Option<String>,
    pub category: Option<String>,
}

pub async fn get_piece(
    conn: &mut SqliteConnection,
    part_number: &str,
) -> Result<Option<Piece>, AppError> {
    let piece = sqlx::query_as::<_, Piece>(
        "SELECT part_number, name, category FROM Piece WHERE part_number = ?",
    )
    .bind(part_number)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(piece)
}

/// Container ids associated with a part, in storage order.
pub async fn containers_holding(
    conn: &mut SqliteConnection,
    part_number: &str,
) -> Result<Vec<String>, AppError> {
    let ids = sqlx::query_scalar::<_, String>(
        "SELECT container_id FROM ContainerPiece WHERE part_number = ?",
    )
    .bind(part_number)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ids)
}

/// Associations without a catalog row are left out by the inner join.
pub async fn pieces_in_container(
    conn: &mut SqliteConnection,
    container_id: &str,
) -> Result<Vec<Piece>, AppError> {
    let container_id = normalize_container_id(container_id)?;

    let pieces = sqlx::query_as::<_, Piece>(
        r#"
        SELECT p.part_number, p.name, p.category
        FROM ContainerPiece cp
        JOIN Piece p ON cp.part_number = p.part_number
        WHERE cp.container_id = ?
        "#,
    )
    .bind(container_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(pieces)
}

pub async fn list_categories(conn: &mut SqliteConnection) -> Result<Vec<String>, AppError> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM Piece WHERE category IS NOT NULL ORDER BY category",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(categories)
}
