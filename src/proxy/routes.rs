use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::upstream::Upstream;
use crate::error::ProxyError;

#[derive(Debug, Deserialize)]
pub struct PhotosQuery {
    sol: Option<String>,
}

pub async fn manifest_handler(
    State(upstream): State<Arc<Upstream>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ProxyError> {
    Ok(Json(upstream.manifest(&name).await?))
}

pub async fn photos_handler(
    State(upstream): State<Arc<Upstream>>,
    Path(name): Path<String>,
    Query(query): Query<PhotosQuery>,
) -> Result<Json<Vec<Value>>, ProxyError> {
    Ok(Json(upstream.photos(&name, query.sol.as_deref()).await?))
}

pub async fn apod_handler(
    State(upstream): State<Arc<Upstream>>,
) -> Result<Json<Value>, ProxyError> {
    Ok(Json(upstream.apod().await?))
}
