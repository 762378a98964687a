use serde::Serialize;
use sqlx::SqliteConnection;

use super::{
    ids::normalize_container_id,
    pieces::{Piece, pieces_in_container},
};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    #[serde(rename = "box")]
    pub box_id: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerDetail {
    pub id: String,
    pub location: Location,
    pub pieces: Vec<Piece>,
}

/// Exact match only.
pub async fn locate_by_position(
    conn: &mut SqliteConnection,
    box_id: &str,
    position_id: &str,
) -> Result<Option<String>, AppError> {
    let id = sqlx::query_scalar::<_, String>(
        "SELECT id FROM Container WHERE box_id = ? AND position_id = ?",
    )
    .bind(box_id)
    .bind(position_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}

pub async fn location_of(
    conn: &mut SqliteConnection,
    container_id: &str,
) -> Result<Option<Location>, AppError> {
    let container_id = normalize_container_id(container_id)?;

    stored_location(conn, &container_id).await
}

/// Lookup by the id exactly as stored, without normalizing it first.
pub(super) async fn stored_location(
    conn: &mut SqliteConnection,
    container_id: &str,
) -> Result<Option<Location>, AppError> {
    let row = sqlx::query_as::<_, (Option<String>, Option<String>)>(
        "SELECT box_id, position_id FROM Container WHERE id = ?",
    )
    .bind(container_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(box_id, position)| Location { box_id, position }))
}

/// `None` for a well-formed id with no row. A malformed id is an error.
pub async fn locate_container(
    conn: &mut SqliteConnection,
    container_id: &str,
) -> Result<Option<ContainerDetail>, AppError> {
    let id = normalize_container_id(container_id)?;

    let Some(location) = location_of(conn, &id).await? else {
        return Ok(None);
    };

    let pieces = pieces_in_container(conn, &id).await?;

    Ok(Some(ContainerDetail {
        id,
        location,
        pieces,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::{exec, seeded};

    #[tokio::test]
    async fn test_locate_by_position() {
        let mut conn = seeded().await;

        assert_eq!(
            locate_by_position(&mut conn, "B1", "A1").await.unwrap().as_deref(),
            Some("c001")
        );
        assert!(locate_by_position(&mut conn, "B1", "A2").await.unwrap().is_none());
        assert!(locate_by_position(&mut conn, "B", "A1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_locate_container() {
        let mut conn = seeded().await;

        let detail = locate_container(&mut conn, "1").await.unwrap().unwrap();
        assert_eq!(detail.id, "c001");
        assert_eq!(
            detail.location,
            Location {
                box_id: Some("B1".to_string()),
                position: Some("A1".to_string()),
            }
        );
        assert_eq!(detail.pieces.len(), 1);
        assert_eq!(detail.pieces[0].part_number, "3001");

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["location"]["box"], "B1");
        assert_eq!(json["location"]["position"], "A1");
    }

    #[tokio::test]
    async fn test_empty_container() {
        let mut conn = seeded().await;
        exec(
            &mut conn,
            "INSERT INTO Position(id) VALUES ('A2');
             INSERT INTO Container(id, box_id, position_id) VALUES ('c002', 'B1', 'A2');",
        )
        .await;

        let detail = locate_container(&mut conn, "c002").await.unwrap().unwrap();
        assert!(detail.pieces.is_empty());
    }

    #[tokio::test]
    async fn test_missing_is_not_an_error() {
        let mut conn = seeded().await;

        assert!(locate_container(&mut conn, "c999").await.unwrap().is_none());
        assert!(location_of(&mut conn, "999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_is_an_error() {
        let mut conn = seeded().await;

        assert!(matches!(
            locate_container(&mut conn, "abc").await,
            Err(AppError::InvalidIdentifier(_))
        ));
    }
}
