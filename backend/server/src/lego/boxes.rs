use serde::Serialize;
use sqlx::{FromRow, SqliteConnection};

use super::ids::normalize_box_id;
use crate::error::AppError;

/// One row per container, or per (container, piece) pair when a container
/// holds several. Empty containers carry null piece fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct BoxSlot {
    pub container_id: String,
    pub position: Option<String>,
    pub part_number: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
}

pub async fn contents_of_box(
    conn: &mut SqliteConnection,
    box_id: &str,
) -> Result<Vec<BoxSlot>, AppError> {
    let box_id = normalize_box_id(box_id);

    let slots = sqlx::query_as::<_, BoxSlot>(
        r#"
        SELECT c.id AS container_id,
               c.position_id AS position,
               p.part_number,
               p.name,
               p.category
        FROM Container c
        LEFT JOIN ContainerPiece cp ON cp.container_id = c.id
        LEFT JOIN Piece p ON p.part_number = cp.part_number
        WHERE c.box_id = ?
        ORDER BY c.position_id, p.part_number
        "#,
    )
    .bind(box_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(slots)
}

pub async fn list_boxes(conn: &mut SqliteConnection) -> Result<Vec<String>, AppError> {
    let boxes = sqlx::query_scalar::<_, String>("SELECT id FROM Box ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(boxes)
}

pub async fn list_positions(conn: &mut SqliteConnection) -> Result<Vec<String>, AppError> {
    let positions = sqlx::query_scalar::<_, String>("SELECT id FROM Position ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(positions)
}
