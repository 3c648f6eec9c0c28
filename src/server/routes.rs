//! Route table and handlers.
//!
//! Handlers are thin: they pull parameters out of the request, run the
//! catalog call on the blocking pool, and wrap the result as JSON.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::catalog::Catalog;
use crate::common::{Error, ItemId, Result};
use crate::query::{ListQuery, PageResult};
use crate::server::ApiError;
use crate::stats::StatsSnapshot;
use crate::storage::{Item, NewItem};

/// Build the application router.
///
/// Catalog routes live under `base_path` (empty for the root). `/health`
/// is always at the root.
pub fn router(catalog: Arc<Catalog>, base_path: &str) -> Router {
    let api = Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item))
        .route("/stats", get(get_stats))
        .with_state(catalog);

    let app = Router::new().route("/health", get(health));

    if base_path.is_empty() {
        app.merge(api)
    } else {
        app.nest(base_path, api)
    }
}

/// Run a catalog call off the async workers.
///
/// The task runs to completion even if the client goes away, so a stats
/// computation it started still lands in the cache.
async fn blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("worker task failed: {e}")))?;
    Ok(outcome?)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn list_items(
    State(catalog): State<Arc<Catalog>>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> std::result::Result<Json<PageResult>, ApiError> {
    let Query(query) = query.map_err(|r| ApiError::new(r.status(), r.body_text()))?;
    tracing::debug!(q = ?query.q, limit = ?query.limit, page = ?query.page, "List items");

    let page = blocking(move || catalog.list(&query)).await?;
    Ok(Json(page))
}

async fn get_item(
    State(catalog): State<Arc<Catalog>>,
    Path(raw_id): Path<String>,
) -> std::result::Result<Json<Item>, ApiError> {
    let id = ItemId::parse(&raw_id).ok_or_else(ApiError::not_found)?;
    tracing::debug!(id = id.0, "Get item");

    let item = blocking(move || catalog.get(id)).await?;
    Ok(Json(item))
}

async fn create_item(
    State(catalog): State<Arc<Catalog>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<Item>), ApiError> {
    let Json(body) = payload.map_err(|r| ApiError::new(r.status(), r.body_text()))?;
    let new_item = new_item_from(body)?;

    let item = blocking(move || catalog.append(new_item)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// The body must be a JSON object. Its fields are not validated: a known
/// field with the wrong type is stored as sent.
fn new_item_from(body: Value) -> Result<NewItem> {
    if !body.is_object() {
        return Err(Error::InvalidRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(body).map_err(|e| Error::InvalidRequest(e.to_string()))
}

async fn get_stats(
    State(catalog): State<Arc<Catalog>>,
) -> std::result::Result<Json<StatsSnapshot>, ApiError> {
    let stats = blocking(move || catalog.stats()).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CacheState, StatsCache};
    use crate::storage::{ItemSource, StoreVersion};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::mpsc;
    use std::thread;
    use std::time::SystemTime;

    #[test]
    fn test_new_item_from_object() {
        let item = new_item_from(json!({
            "name": "Lamp",
            "category": "Lighting",
            "price": 25,
            "color": "red"
        }))
        .unwrap();

        assert_eq!(item.name, "Lamp");
        assert_eq!(item.price, 25.0);
        assert_eq!(item.extra["color"], "red");
    }

    #[test]
    fn test_new_item_from_partial_object() {
        let item = new_item_from(json!({ "name": "Lamp" })).unwrap();
        assert_eq!(item.category, "");
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn test_new_item_from_non_object() {
        for body in [json!([]), json!("lamp"), json!(42), json!(null)] {
            let err = new_item_from(body).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)));
        }
    }

    #[test]
    fn test_new_item_from_mistyped_fields() {
        for body in [
            json!({ "name": "Lamp", "price": "cheap" }),
            json!({ "name": "Lamp", "price": null }),
            json!({ "name": 7, "price": 12.5 }),
        ] {
            let item = new_item_from(body.clone()).unwrap();
            let stored = serde_json::to_value(item.into_item(ItemId::new(1))).unwrap();
            for (key, value) in body.as_object().unwrap() {
                assert_eq!(&stored[key], value, "{key}");
            }
        }
    }

    /// Source whose reads block until the test releases them.
    struct GatedSource {
        entered: Mutex<mpsc::SyncSender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl ItemSource for GatedSource {
        fn version(&self) -> Result<StoreVersion> {
            Ok(StoreVersion::new(SystemTime::UNIX_EPOCH))
        }

        fn read_all(&self) -> Result<Vec<Item>> {
            let _ = self.entered.lock().send(());
            let _ = self.release.lock().recv();
            Ok(vec![NewItem::new("Lamp", "Lighting", 30.0).into_item(ItemId::new(1))])
        }
    }

    #[test]
    fn test_abandoned_stats_request_still_fills_cache() {
        let (entered_tx, entered_rx) = mpsc::sync_channel(1);
        let (release_tx, release_rx) = mpsc::channel();
        let cache = Arc::new(StatsCache::new(GatedSource {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        }));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let leader = Arc::clone(&cache);
            let request = tokio::spawn(blocking(move || leader.get()));

            // Wait off the runtime thread so the request task gets polled
            tokio::task::spawn_blocking(move || entered_rx.recv())
                .await
                .unwrap()
                .unwrap();

            request.abort();
            assert!(request.await.unwrap_err().is_cancelled());
        });

        assert_eq!(cache.state(), CacheState::Computing);
        release_tx.send(()).unwrap();

        while cache.state() == CacheState::Computing {
            thread::yield_now();
        }
        assert!(matches!(cache.state(), CacheState::Valid(_)));

        let stats = cache.get().unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.average_price, 30.0);

        let metrics = cache.metrics();
        assert_eq!(metrics.computations, 1);
        assert_eq!(metrics.hits, 1);
    }
}
