//! HTTP request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument};

use super::state::AppState;
use crate::cache::CacheError;
use crate::config::lookup;
use crate::coord::{Dimension, TileId, DEFAULT_LOD};
use crate::render::{RenderOutcome, RenderRequest};

/// Browser cache lifetime for freshly rendered tiles, in seconds.
pub const RENDERED_TILE_MAX_AGE_SECS: u64 = 500;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const INDEX_JS: &str = include_str!("../../assets/index.js");

/// Query string of `GET /tile`.
///
/// Fields are kept as raw strings so a missing value and a malformed one can
/// be told apart.
#[derive(Debug, Default)]
pub struct TileQuery {
    pub x: Option<String>,
    pub y: Option<String>,
    pub world: Option<String>,
}

impl TileQuery {
    /// Collect the parameters from decoded query pairs.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "x" => &mut query.x,
                "y" => &mut query.y,
                "world" => &mut query.world,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Validate presence and shape of the parameters.
    ///
    /// Does not check whether the world exists.
    pub fn parse(&self) -> Result<(&str, TileId), TileError> {
        let (Some(x), Some(y), Some(world)) = (&self.x, &self.y, &self.world) else {
            return Err(TileError::MissingParameters);
        };

        let x = x.trim().parse::<i64>().map_err(|_| TileError::InvalidId)?;
        let y = y.trim().parse::<i64>().map_err(|_| TileError::InvalidId)?;

        Ok((world.as_str(), TileId::new(x, y)))
    }
}

/// Failures of `GET /tile`.
#[derive(Debug, Error)]
pub enum TileError {
    #[error("Missing parameters.")]
    MissingParameters,

    #[error("Invalid id.")]
    InvalidId,

    #[error("Invalid world.")]
    InvalidWorld,

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Failed to read tile {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl TileError {
    pub fn status(&self) -> StatusCode {
        match self {
            TileError::MissingParameters | TileError::InvalidId | TileError::InvalidWorld => {
                StatusCode::BAD_REQUEST
            }
            TileError::Cache(_) | TileError::Read { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Tile request failed");
            // Server-side failures are not described to the client.
            return (status, "Internal Server Error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}

/// `GET /` - the map viewer page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /index.js` - the map viewer script.
pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        INDEX_JS,
    )
}

/// `GET /tile?x=&y=&world=` - a tile image, rendered on first request.
#[instrument(skip(state))]
pub async fn tile(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, TileError> {
    let query = TileQuery::from_pairs(pairs);
    let (world, id) = query.parse()?;
    let renderer = state.registry.get(world).ok_or(TileError::InvalidWorld)?;

    let path = state.store.tile_path(world, id);
    state.store.ensure_world_dir(world).await?;

    if state.store.contains(world, id).await {
        debug!(world, tile = %id, "Serving stored tile");
        let bytes = read_tile(path).await?;
        return Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response());
    }

    let request = RenderRequest::new(path, id, DEFAULT_LOD, Dimension::Overworld);
    // A failed render is not reported to the client; reading the file decides.
    if let RenderOutcome::Failure(reason) = renderer.render(&request).await {
        debug!(world, tile = %id, reason = %reason, "Render did not succeed");
    }

    let bytes = read_tile(request.output).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", RENDERED_TILE_MAX_AGE_SECS),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `GET /config/<path>` - a value from the configuration tree, `null` if absent.
pub async fn config_value(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Json<Value> {
    Json(lookup(&state.config, &key))
}

/// `GET /config/` - the whole configuration tree.
pub async fn config_root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(lookup(&state.config, ""))
}

/// `GET /worlds` - registered world names.
pub async fn worlds(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.registry.names())
}

async fn read_tile(path: PathBuf) -> Result<Vec<u8>, TileError> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(source) => Err(TileError::Read { path, source }),
    }
}
