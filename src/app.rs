use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::gateway::StoreGateway;
use crate::render;
use crate::store::{MemoryStore, SnapshotStore};
use crate::viewer::{LoadOutcome, Role, Viewer};

/// Shared server state: the snapshot store and the single viewer session.
pub struct AppState {
    store: Arc<dyn SnapshotStore>,
    viewer: Mutex<Viewer>,
}

impl AppState {
    pub fn new(store: Arc<dyn SnapshotStore>, page_size: usize) -> Self {
        AppState {
            store,
            viewer: Mutex::new(Viewer::new(page_size)),
        }
    }

    fn viewer(&self) -> MutexGuard<'_, Viewer> {
        self.viewer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn gateway(&self) -> StoreGateway {
        StoreGateway::new(self.store.clone())
    }
}

#[derive(Deserialize)]
struct FilterQuery {
    column: String,
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
struct PageQuery {
    page: usize,
}

#[derive(Deserialize)]
struct PageSizeQuery {
    size: usize,
}

#[derive(Deserialize)]
struct RoleQuery {
    role: Role,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
}

/// Build the router over an already constructed state.
///
/// `/api/snapshot` is the persistence endpoint; every other route drives the
/// browser page.
pub fn router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(serve_viewer))
        .route(
            "/api/snapshot",
            get(get_snapshot).put(put_snapshot).post(put_snapshot),
        )
        .route("/upload", post(upload_file))
        .route("/filter", get(set_filter))
        .route("/page", get(set_page))
        .route("/page-size", get(set_page_size))
        .route("/role", get(set_role))
        .route("/save", post(save_snapshot))
        .route("/load", post(load_snapshot))
        .route("/export.csv", get(export_csv))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(store, config.initial_page_size()));
    let app = router(state, config.body_limit_bytes());

    let listener = TcpListener::bind(config.addr).await?;
    log::info!("Listening on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn get_snapshot(State(state): State<Arc<AppState>>) -> Response {
    match state.store.load() {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (StatusCode::NOT_FOUND, "No data found").into_response(),
    }
}

async fn put_snapshot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Json<StatusResponse> {
    let rows = ["dataset", "csvData"]
        .iter()
        .find_map(|name| payload.get(*name).and_then(Value::as_array))
        .map_or(0, Vec::len);
    log::info!("Storing snapshot payload with {} rows", rows);
    state.store.save(payload);
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

async fn serve_viewer(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut viewer = state.viewer();
    let notice = viewer.take_notice();
    Html(render::render_page(&viewer.view(), notice.as_ref()))
}

async fn upload_file(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Redirect {
    let mut file_name = None;
    let mut file_data = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        file_name = field.file_name().map(str::to_string);
        match field.bytes().await {
            Ok(bytes) => file_data = Some(bytes),
            Err(e) => log::error!("Failed to read upload: {}", e),
        }
    }

    match file_data {
        Some(bytes) => {
            // Failures are logged by the viewer and leave its state unchanged
            let _ = state.viewer().upload(file_name.as_deref(), &bytes);
        }
        None => log::warn!("Upload request carried no file field"),
    }

    Redirect::to("/")
}

async fn set_filter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Redirect {
    if let Err(e) = state.viewer().set_filter(&params.column, &params.value) {
        log::warn!("Ignoring filter change: {}", e);
    }
    Redirect::to("/")
}

async fn set_page(State(state): State<Arc<AppState>>, Query(params): Query<PageQuery>) -> Redirect {
    state.viewer().set_page(params.page);
    Redirect::to("/")
}

async fn set_page_size(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageSizeQuery>,
) -> Redirect {
    if let Err(e) = state.viewer().set_page_size(params.size) {
        log::warn!("Ignoring page size change: {}", e);
    }
    Redirect::to("/")
}

async fn set_role(State(state): State<Arc<AppState>>, Query(params): Query<RoleQuery>) -> Redirect {
    state.viewer().set_role(params.role);
    Redirect::to("/")
}

async fn save_snapshot(State(state): State<Arc<AppState>>) -> Redirect {
    let gateway = state.gateway();
    let _ = state.viewer().save(&gateway);
    Redirect::to("/")
}

async fn load_snapshot(State(state): State<Arc<AppState>>) -> Redirect {
    let gateway = state.gateway();
    if let Ok(LoadOutcome::Loaded { rows }) = state.viewer().load(&gateway) {
        log::debug!("Viewer now shows {} loaded rows", rows);
    }
    Redirect::to("/")
}

async fn export_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let csv = state.viewer().export_csv();
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"export.csv\"",
            ),
        ],
        csv,
    )
}
