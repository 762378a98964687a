//! Piece search.
//!
//! A query names its mode up front: an exact part number, or a substring of the
//! name or category. Substring matching uses `LIKE`, so it inherits SQLite's
//! collation (ASCII case-insensitive).
//!
//! Every hit lists the containers holding the part and where they sit.
use serde::Serialize;
use sqlx::SqliteConnection;

use super::{
    containers::{location_of, stored_location},
    ids::render_location,
    pieces::{containers_holding, get_piece},
};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PieceQuery {
    PartNumber(String),
    Name(String),
    Category(String),
}

impl PieceQuery {
    pub fn parse(mode: &str, term: &str) -> Result<Self, AppError> {
        let term = term.to_string();

        match mode {
            "part_number" => Ok(Self::PartNumber(term)),
            "name" => Ok(Self::Name(term)),
            "category" => Ok(Self::Category(term)),
            _ => Err(AppError::InvalidSearchMode(mode.to_string())),
        }
    }

    pub fn term(&self) -> &str {
        match self {
            Self::PartNumber(term) | Self::Name(term) | Self::Category(term) => term,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.term().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerHit {
    pub container_id: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceHit {
    pub part_number: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub containers: Vec<ContainerHit>,
}

pub async fn search_pieces(
    conn: &mut SqliteConnection,
    query: &PieceQuery,
) -> Result<Vec<PieceHit>, AppError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = match query {
        PieceQuery::PartNumber(part_number) => vec![part_number.clone()],
        PieceQuery::Name(pattern) => {
            matching_parts(
                conn,
                "SELECT part_number FROM Piece WHERE name LIKE ?",
                pattern,
            )
            .await?
        }
        PieceQuery::Category(pattern) => {
            matching_parts(
                conn,
                "SELECT part_number FROM Piece WHERE category LIKE ?",
                pattern,
            )
            .await?
        }
    };

    let mut hits = Vec::with_capacity(candidates.len());

    for part_number in candidates {
        // parts referenced without a catalog row are skipped
        let Some(piece) = get_piece(conn, &part_number).await? else {
            continue;
        };

        let mut containers = Vec::new();
        for container_id in containers_holding(conn, &part_number).await? {
            // link rows may hold bare numbers; ids that do not normalize are looked up as stored
            let location = match location_of(conn, &container_id).await {
                Err(AppError::InvalidIdentifier(_)) => stored_location(conn, &container_id).await?,
                other => other?,
            }
            .and_then(|location| {
                render_location(location.box_id.as_deref(), location.position.as_deref())
            });

            containers.push(ContainerHit {
                container_id,
                location,
            });
        }

        hits.push(PieceHit {
            part_number: piece.part_number,
            name: piece.name,
            category: piece.category,
            containers,
        });
    }

    Ok(hits)
}

async fn matching_parts(
    conn: &mut SqliteConnection,
    sql: &'static str,
    pattern: &str,
) -> Result<Vec<String>, AppError> {
    let parts = sqlx::query_scalar::<_, String>(sql)
        .bind(format!("%{pattern}%"))
        .fetch_all(&mut *conn)
        .await?;

    Ok(parts)
}
