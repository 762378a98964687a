use std::{io::ErrorKind, path::Path as FsPath, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{OriginalUri, Path, Query, State as AxumState},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    error::AppError,
    finance::{NewTransaction, insert_transaction},
    lego::{
        BoxSlot, ContainerDetail, PieceHit, PieceQuery, contents_of_box, list_boxes,
        list_categories, list_positions, locate_container, search_pieces,
    },
    state::State,
    utils::{check_password, is_json, www_redirect},
};

type AppState = AxumState<Arc<State>>;

pub async fn home_handler(
    AxumState(state): AppState,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    match www_redirect(&headers, &state.config.canonical_host, path_and_query) {
        Some(target) => match HeaderValue::from_str(&target) {
            Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response(),
            Err(_) => StatusCode::BAD_REQUEST.into_response(),
        },
        None => (StatusCode::OK, "Welcome to korysanchez.me").into_response(),
    }
}

pub async fn finance_handler(
    AxumState(state): AppState,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    check_password(&headers, state.config.finance_password.as_deref())?;

    if !is_json(&headers) {
        return Err(AppError::MalformedPayload);
    }

    let payload: Value = serde_json::from_slice(&body).map_err(|_| AppError::MalformedPayload)?;
    let transaction = NewTransaction::from_payload(&payload)?;

    let mut conn = state.finance_pool.acquire().await?;
    let id = insert_transaction(&mut conn, &transaction).await?;

    info!("Recorded transaction {id} for {}", transaction.user);

    Ok(Json(json!({ "message": "Transaction recorded successfully" })))
}

pub async fn resume_handler(AxumState(state): AppState) -> Result<Response, AppError> {
    let path = FsPath::new(&state.config.resume_path);

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Resume not found at {}", path.display());
            return Err(AppError::NotFound("Resume file"));
        }
        Err(e) => return Err(AppError::InternalError(Box::new(e))),
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume.pdf");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub async fn boxes_handler(AxumState(state): AppState) -> Result<Json<Vec<String>>, AppError> {
    let mut conn = state.lego_pool.acquire().await?;

    Ok(Json(list_boxes(&mut conn).await?))
}

pub async fn box_handler(
    AxumState(state): AppState,
    Path(box_id): Path<String>,
) -> Result<Json<Vec<BoxSlot>>, AppError> {
    let mut conn = state.lego_pool.acquire().await?;

    Ok(Json(contents_of_box(&mut conn, &box_id).await?))
}

pub async fn container_handler(
    AxumState(state): AppState,
    Path(container_id): Path<String>,
) -> Result<Json<ContainerDetail>, AppError> {
    let mut conn = state.lego_pool.acquire().await?;

    locate_container(&mut conn, &container_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Container"))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(rename = "type", default = "default_search_type")]
    pub search_type: String,
    #[serde(default)]
    pub term: String,
}

fn default_search_type() -> String {
    "part_number".to_string()
}

pub async fn search_handler(
    AxumState(state): AppState,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PieceHit>>, AppError> {
    if params.term.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let query = PieceQuery::parse(&params.search_type, &params.term)?;
    let mut conn = state.lego_pool.acquire().await?;

    Ok(Json(search_pieces(&mut conn, &query).await?))
}

pub async fn positions_handler(AxumState(state): AppState) -> Result<Json<Vec<String>>, AppError> {
    let mut conn = state.lego_pool.acquire().await?;

    Ok(Json(list_positions(&mut conn).await?))
}

pub async fn categories_handler(
    AxumState(state): AppState,
) -> Result<Json<Vec<String>>, AppError> {
    let mut conn = state.lego_pool.acquire().await?;

    Ok(Json(list_categories(&mut conn).await?))
}
