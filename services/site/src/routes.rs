use crate::infra::AppState;
use crate::pages::{Page, Site};
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use gt_portal::error::AppError;
use serde_json::json;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Page and asset routes; the URL to template mapping is one-to-one.
pub(crate) fn site_router(site: Arc<Site>) -> Router {
    Router::new()
        .route(Page::Home.path(), get(index_route))
        .route(Page::About.path(), get(sobre_route))
        .route(Page::Members.path(), get(membros_route))
        .route(Page::Contact.path(), get(contato_route))
        .route("/static/*path", get(static_asset))
        .with_state(site)
}

pub(crate) fn with_service_routes(site: Arc<Site>) -> Router {
    site_router(site)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn index_route(State(site): State<Arc<Site>>) -> Result<Html<String>, AppError> {
    site.render(Page::Home).map(Html)
}

pub(crate) async fn sobre_route(State(site): State<Arc<Site>>) -> Result<Html<String>, AppError> {
    site.render(Page::About).map(Html)
}

pub(crate) async fn membros_route(
    State(site): State<Arc<Site>>,
) -> Result<Html<String>, AppError> {
    site.render(Page::Members).map(Html)
}

pub(crate) async fn contato_route(
    State(site): State<Arc<Site>>,
) -> Result<Html<String>, AppError> {
    site.render(Page::Contact).map(Html)
}

/// Maps a requested asset path onto the static root, refusing anything that
/// could leave it.
pub(crate) fn resolve_asset(root: &Path, requested: &str) -> Option<PathBuf> {
    let relative = Path::new(requested);
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (resolved != root).then_some(resolved)
}

pub(crate) async fn static_asset(
    State(site): State<Arc<Site>>,
    UrlPath(requested): UrlPath<String>,
) -> Response {
    let Some(path) = resolve_asset(site.static_root(), &requested) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return StatusCode::NOT_FOUND.into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "static asset unreadable");
            return AppError::Io(err).into_response();
        }
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.essence_str().to_string())],
                bytes,
            )
                .into_response()
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "static asset unreadable");
            AppError::Io(err).into_response()
        }
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use gt_portal::config::SiteConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::fs;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site_fixture() -> (TempDir, Arc<Site>) {
        let tmp = TempDir::new().expect("create temp dir");
        let gallery = tmp.path().join("images").join("cidades");
        fs::create_dir_all(&gallery).expect("create gallery");
        fs::write(gallery.join("joao-pessoa.jpg"), b"jpeg").expect("write image");
        fs::create_dir_all(tmp.path().join("css")).expect("create css dir");
        fs::write(tmp.path().join("css").join("style.css"), b"body {}").expect("write css");

        let config = SiteConfig::new(tmp.path(), "images/cidades", "images/paraiba")
            .expect("site config");
        let site = Site::new(&config).expect("templates load");
        (tmp, Arc::new(site))
    }

    async fn get_response(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds")
    }

    #[tokio::test]
    async fn every_page_route_renders_html() {
        let (_tmp, site) = site_fixture();
        for page in Page::ALL {
            let response = get_response(site_router(site.clone()), page.path()).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", page.path());
            let content_type = response.headers()[header::CONTENT_TYPE]
                .to_str()
                .expect("ascii header")
                .to_string();
            assert!(content_type.starts_with("text/html"));

            let body = to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body");
            let html = String::from_utf8(body.to_vec()).expect("utf8");
            assert!(html.contains("/static/images/cidades/joao-pessoa.jpg"));
        }
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let (_tmp, site) = site_fixture();
        let response = get_response(site_router(site), "/eventos").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_assets_are_served_with_guessed_type() {
        let (_tmp, site) = site_fixture();
        let response =
            get_response(site_router(site.clone()), "/static/images/cidades/joao-pessoa.jpg").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");

        let response = get_response(site_router(site.clone()), "/static/css/style.css").await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

        let response = get_response(site_router(site.clone()), "/static/css/missing.css").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get_response(site_router(site), "/static/images").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn asset_paths_cannot_escape_the_static_root() {
        let root = Path::new("static");
        assert_eq!(
            resolve_asset(root, "images/./cidades/a.jpg"),
            Some(root.join("images").join("cidades").join("a.jpg"))
        );
        assert_eq!(resolve_asset(root, "../Cargo.toml"), None);
        assert_eq!(resolve_asset(root, "images/../../secret"), None);
        assert_eq!(resolve_asset(root, "/etc/passwd"), None);
        assert_eq!(resolve_asset(root, ""), None);
    }

    fn service_router(site: Arc<Site>, ready: bool) -> (Router, AppState) {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_service_routes(site).layer(Extension(state.clone()));
        (router, state)
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (_tmp, site) = site_fixture();
        let (router, state) = service_router(site, false);

        let response = get_response(router.clone(), "/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(payload["status"], "initializing");

        state.readiness.store(true, Ordering::Relaxed);
        let response = get_response(router, "/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn service_routes_expose_health_and_metrics() {
        let (_tmp, site) = site_fixture();
        let (router, _state) = service_router(site, true);

        let response = get_response(router.clone(), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_response(router.clone(), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );

        let response = get_response(router, Page::Contact.path()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
