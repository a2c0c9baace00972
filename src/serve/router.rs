use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::chunks::{ChunkReader, Key};

/// Reader shared by every in-flight request.
pub type SharedReader = Arc<dyn ChunkReader>;

/// Build the router answering `GET /{key}` from `reader`.
pub fn router(reader: SharedReader) -> Router {
    Router::new()
        .route("/:key", get(fetch_chunk))
        .layer(TraceLayer::new_for_http())
        .with_state(reader)
}

async fn fetch_chunk(State(reader): State<SharedReader>, Path(key): Path<String>) -> Response {
    let key: Key = match key.parse() {
        Ok(key) => key,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    // Readers do blocking disk and network I/O.
    let fetched = tokio::task::spawn_blocking(move || {
        let mut buf = Vec::new();
        reader.copy(&mut buf, &key).map(|()| buf)
    })
    .await;

    match fetched {
        Ok(Ok(data)) => {
            info!(%key, size = data.len(), "fetched");
            (
                [(header::CONTENT_TYPE, "application/octet-stream")],
                data,
            )
                .into_response()
        }
        Ok(Err(e)) if e.is_not_found() => {
            debug!(%key, "not found");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
        Ok(Err(e)) => {
            warn!(%key, error = %e, "fetch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
        Err(e) => {
            warn!(%key, error = %e, "fetch task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
