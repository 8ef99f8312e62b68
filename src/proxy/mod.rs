//! The rover proxy server.
//!
//! Three read-only endpoints forward to the upstream photo API with the
//! server's API key attached; every other path is served from the static
//! asset directory.
//!
//! | Path | Upstream | Response |
//! |---|---|---|
//! | `/rover-manifest/{name}` | manifests/{name} | the `photo_manifest` object |
//! | `/rover-photos/{name}?sol=` | rovers/{name}/photos | last 9 of `photos` |
//! | `/apod` | planetary/apod | `{ "image": ... }` |
//!
//! Requests are independent; the only shared state is the immutable
//! [`Upstream`] client.

mod routes;
mod upstream;

pub use upstream::Upstream;

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{cors::{Any, CorsLayer}, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::ProxyConfig;
use routes::{apod_handler, manifest_handler, photos_handler};

/// Build the proxy's router around an upstream client.
pub fn router(upstream: Arc<Upstream>, public_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/apod", get(apod_handler))
        .route("/rover-manifest/{name}", get(manifest_handler))
        .route("/rover-photos/{name}", get(photos_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(upstream)
}

/// Run the proxy until Ctrl+C or SIGTERM.
pub async fn serve(config: ProxyConfig) -> Result<()> {
    info!(?config, "Starting proxy...");
    let upstream = Arc::new(Upstream::new(&config.api_base, config.api_key.as_str())?);
    let app = router(upstream, &config.public_dir);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!("Proxy listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        extract::{Path as UrlPath, Query},
        http::StatusCode,
        response::IntoResponse,
        Json,
    };
    use serde_json::{json, Value};

    use super::upstream::PHOTO_WINDOW;
    use crate::app::App;
    use crate::sequencer::Sequencer;
    use crate::source::ProxySource;
    use crate::store::Store;

    const KEY: &str = "test-key";

    type Params = Query<HashMap<String, String>>;

    fn authorised(params: &HashMap<String, String>) -> bool {
        params.get("api_key").map(String::as_str) == Some(KEY)
    }

    /// Photo counts per rover in the fake upstream.
    fn photo_count(rover: &str) -> u64 {
        match rover {
            "Curiosity" => 25,
            "Spirit" => 4,
            _ => 9,
        }
    }

    async fn fake_manifest(UrlPath(rover): UrlPath<String>, Query(params): Params) -> impl IntoResponse {
        if !authorised(&params) {
            return (StatusCode::FORBIDDEN, Json(json!({ "error": "bad key" })));
        }
        if rover == "Broken" {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
        }
        if rover == "Shapeless" {
            return (StatusCode::OK, Json(json!({ "errors": "no manifest" })));
        }
        (
            StatusCode::OK,
            Json(json!({
                "photo_manifest": {
                    "name": rover,
                    "status": "active",
                    "max_sol": 100 + photo_count(&rover),
                    "photos": [{ "sol": 0, "total_photos": 3 }],
                }
            })),
        )
    }

    async fn fake_photos(UrlPath(rover): UrlPath<String>, Query(params): Params) -> impl IntoResponse {
        if !authorised(&params) {
            return (StatusCode::FORBIDDEN, Json(json!({})));
        }
        let sol = params.get("sol").cloned().unwrap_or_default();
        let photos: Vec<Value> = (1..=photo_count(&rover))
            .map(|id| {
                json!({
                    "id": id,
                    "sol": sol,
                    "camera": { "name": "NAVCAM", "full_name": "Navigation Camera" },
                    "img_src": format!("http://img/{rover}/{id}.jpg"),
                    "earth_date": "2024-01-01",
                })
            })
            .collect();
        (StatusCode::OK, Json(json!({ "photos": photos })))
    }

    async fn fake_apod(Query(params): Params) -> impl IntoResponse {
        if !authorised(&params) {
            return (StatusCode::FORBIDDEN, Json(json!({})));
        }
        (StatusCode::OK, Json(json!({ "title": "Pillars of Creation" })))
    }

    async fn spawn(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn public_dir() -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "rover-dashboard-public-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>Mars Rover Dashboard</h1>").unwrap();
        dir
    }

    /// Fake upstream plus a proxy in front of it; returns the proxy address.
    async fn start_proxy(key: &str) -> SocketAddr {
        let fake = Router::new()
            .route("/mars-photos/api/v1/manifests/{rover}", get(fake_manifest))
            .route("/mars-photos/api/v1/rovers/{rover}/photos", get(fake_photos))
            .route("/planetary/apod", get(fake_apod));
        let upstream_addr = spawn(fake).await;

        let upstream = Upstream::new(&format!("http://{upstream_addr}"), key).unwrap();
        spawn(router(Arc::new(upstream), &public_dir())).await
    }

    async fn get_json(url: String) -> (StatusCode, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    // -- /rover-manifest -----------------------------------------------------

    #[tokio::test]
    async fn manifest_returns_photo_manifest_verbatim() {
        let proxy = start_proxy(KEY).await;
        let (status, body) = get_json(format!("http://{proxy}/rover-manifest/Curiosity")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Curiosity");
        assert_eq!(body["max_sol"], 125);
        assert!(body.get("photos").is_some());
        assert!(body.get("photo_manifest").is_none());
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let proxy = start_proxy(KEY).await;
        let response = reqwest::get(format!("http://{proxy}/rover-manifest/Broken"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.text().await.unwrap(),
            "upstream returned 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn unexpected_shape_is_bad_gateway() {
        let proxy = start_proxy(KEY).await;
        let (status, _) = get_json(format!("http://{proxy}/rover-manifest/Shapeless")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn wrong_key_surfaces_as_bad_gateway_without_leaking_key() {
        let proxy = start_proxy("wrong-key").await;
        let response = reqwest::get(format!("http://{proxy}/rover-manifest/Curiosity"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(!response.text().await.unwrap().contains("wrong-key"));
    }

    // -- /rover-photos -------------------------------------------------------

    #[tokio::test]
    async fn photos_are_capped_to_last_nine() {
        let proxy = start_proxy(KEY).await;
        let (status, body) = get_json(format!("http://{proxy}/rover-photos/Curiosity?sol=125")).await;

        assert_eq!(status, StatusCode::OK);
        let photos = body.as_array().unwrap();
        assert_eq!(photos.len(), PHOTO_WINDOW);
        let ids: Vec<u64> = photos.iter().map(|p| p["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, (17..=25).collect::<Vec<u64>>());
        assert_eq!(photos[0]["sol"], "125");
    }

    #[tokio::test]
    async fn short_photo_lists_pass_through() {
        let proxy = start_proxy(KEY).await;
        let (_, body) = get_json(format!("http://{proxy}/rover-photos/Spirit?sol=1")).await;
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    // -- /apod and static ----------------------------------------------------

    #[tokio::test]
    async fn apod_wraps_upstream_body() {
        let proxy = start_proxy(KEY).await;
        let (status, body) = get_json(format!("http://{proxy}/apod")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "image": { "title": "Pillars of Creation" } }));
    }

    #[tokio::test]
    async fn other_paths_serve_static_assets() {
        let proxy = start_proxy(KEY).await;
        let response = reqwest::get(format!("http://{proxy}/index.html")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.text().await.unwrap().contains("Mars Rover Dashboard"));

        let missing = reqwest::get(format!("http://{proxy}/nope.js")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    // -- dashboard against the proxy ----------------------------------------

    #[tokio::test]
    async fn dashboard_loads_through_proxy() {
        let proxy = start_proxy(KEY).await;
        let seq = Sequencer::new(ProxySource::new(format!("http://{proxy}")));
        let mut app = App::new(Store::default());

        let report = seq.load_all(&mut app).await;
        assert_eq!(report.manifests, 3);
        assert_eq!(report.photo_batches, 3);
        assert_eq!(report.failures, 0);

        let manifest = app.store.manifest("Curiosity").unwrap();
        assert!(!manifest.value.contains_key("photos"));
        assert_eq!(manifest.value.max_sol(), Some(125));
        assert_eq!(app.store.photos("Curiosity").unwrap().value.len(), 9);
        assert_eq!(app.store.photos("Spirit").unwrap().value.len(), 4);

        app.mount();
        app.update(crate::store::StoreUpdate::SelectRover("Spirit".into()), true);
        assert_eq!(app.page.img_grid.len(), 4);
        assert_eq!(app.page.img_grid[0].name, "1-Navigation Camera-2024-01-01");
        assert!(app
            .page
            .app
            .to_string()
            .contains("<tr><td>max_sol</td><td>104</td></tr>"));
    }
}
