use crate::config::{Config, SelectionMode};
use crate::dataset::{Dataset, DatasetProvider, ElementRecord};
use crate::detail::{render_detail, DetailPage, NOT_FOUND_MESSAGE};
use crate::error::{DatasetError, ServeError};
use crate::pages::{detail_page, fetch_failed_page, storage_detail_page, table_page, FETCH_FAILED_MESSAGE};
use crate::selection::Selection;
use crate::shells::ShellState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-server state handed to every handler. Holds no dataset: each page
/// load fetches its own.
#[derive(Clone)]
pub struct AppState {
    provider: DatasetProvider,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            provider: DatasetProvider::new(config.dataset.clone()),
            config: Arc::new(config),
        }
    }

    fn selection(&self) -> Selection {
        Selection::new(self.config.selection)
    }

    async fn load(&self) -> Result<Dataset, DatasetError> {
        self.provider.load().await.map_err(|err| {
            log::error!("dataset load failed source={} error={err}", self.provider.source());
            err
        })
    }
}

#[derive(Deserialize)]
struct DetailQuery {
    element: Option<String>,
}

#[derive(Serialize)]
struct ApiError {
    error: String,
}

#[derive(Serialize)]
struct ElementResponse<'a> {
    key: &'a str,
    record: &'a ElementRecord,
    html: String,
}

fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiError { error: message.into() })).into_response()
}

fn fetch_failed_api() -> Response {
    api_error(StatusCode::BAD_GATEWAY, FETCH_FAILED_MESSAGE)
}

fn render_failed(err: serde_json::Error) -> Response {
    log::error!("render failed: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, "render failed").into_response()
}

async fn table(State(state): State<AppState>) -> Response {
    let dataset = match state.load().await {
        Ok(dataset) => dataset,
        Err(_) => return (StatusCode::BAD_GATEWAY, Html(fetch_failed_page())).into_response(),
    };
    log::debug!("table view mode={} records={}", state.config.table.as_str(), dataset.len());
    Html(table_page(&dataset, state.config.table, &state.selection())).into_response()
}

fn detail_response(dataset: &Dataset, identity: Option<&str>, state: &AppState) -> Response {
    let page = DetailPage::resolve(dataset, identity, state.config.bohr, &mut rand::thread_rng());
    let status = match page {
        DetailPage::Found(_) => StatusCode::OK,
        DetailPage::NotFound => StatusCode::NOT_FOUND,
    };
    match detail_page(&page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => render_failed(err),
    }
}

async fn element(State(state): State<AppState>, Query(q): Query<DetailQuery>) -> Response {
    let dataset = match state.load().await {
        Ok(dataset) => dataset,
        Err(_) => return (StatusCode::BAD_GATEWAY, Html(fetch_failed_page())).into_response(),
    };
    if state.config.selection == SelectionMode::Storage {
        return Html(storage_detail_page()).into_response();
    }
    let identity = state.selection().identity_from_query(q.element.as_deref());
    log::debug!("detail view element={identity:?}");
    detail_response(&dataset, identity, &state)
}

async fn api_elements(State(state): State<AppState>) -> Response {
    match state.load().await {
        Ok(dataset) => Json(dataset.ordered()).into_response(),
        Err(_) => fetch_failed_api(),
    }
}

fn element_json(dataset: &Dataset, key: &str, state: &AppState) -> Response {
    let Some((key, record)) = dataset.resolve(key) else {
        return api_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
    };
    let view = render_detail(key, record, state.config.bohr, &mut rand::thread_rng());
    match view.to_html() {
        Ok(html) => Json(ElementResponse { key, record, html }).into_response(),
        Err(err) => render_failed(err),
    }
}

async fn api_element(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.load().await {
        Ok(dataset) => element_json(&dataset, &key, &state),
        Err(_) => fetch_failed_api(),
    }
}

fn shells_json(dataset: &Dataset, key: &str) -> Response {
    match dataset.resolve(key) {
        Some((_, record)) => Json(ShellState::new(record.number, &mut rand::thread_rng())).into_response(),
        None => api_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
    }
}

async fn api_shells(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.load().await {
        Ok(dataset) => shells_json(&dataset, &key),
        Err(_) => fetch_failed_api(),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(table))
        .route("/element", get(element))
        .route("/api/elements", get(api_elements))
        .route("/api/elements/:key", get(api_element))
        .route("/api/elements/:key/shells", get(api_shells))
        .with_state(state)
}

pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> Result<(), ServeError> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("serving on http://{addr}");
    }
    axum::serve(listener, router(state))
        .await
        .map_err(ServeError::Serve)
}
