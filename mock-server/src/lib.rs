//! In-memory stand-in for the slice of the Notion API the widget uses.
//!
//! Serves `POST /v1/pages`, `POST /v1/data_sources/{id}/query` and
//! `PATCH /v1/pages/{id}`. Requests must carry a bearer token and a
//! `Notion-Version` header, as the real service demands. Archived pages stay
//! in the table but are left out of query results.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    pub data_source_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page {
    pub object: String,
    pub id: Uuid,
    pub parent: Parent,
    pub archived: bool,
    pub properties: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct CreatePage {
    pub parent: Parent,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct UpdatePage {
    pub properties: Option<Map<String, Value>>,
    pub archived: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub object: String,
    pub results: Vec<Page>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

pub type Db = Arc<RwLock<Vec<Page>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    token: Option<String>,
}

type ErrorResponse = (StatusCode, Json<Value>);

/// Router accepting any non-empty bearer token.
pub fn app() -> Router {
    router(None)
}

/// Router accepting only `token`.
pub fn app_with_token(token: &str) -> Router {
    router(Some(token.to_string()))
}

fn router(token: Option<String>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Vec::new())),
        token,
    };
    Router::new()
        .route("/v1/pages", post(create_page))
        .route("/v1/pages/{id}", patch(update_page))
        .route("/v1/data_sources/{id}/query", post(query_data_source))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn notion_error(status: StatusCode, code: &str, message: &str) -> ErrorResponse {
    (
        status,
        Json(json!({
            "object": "error",
            "status": status.as_u16(),
            "code": code,
            "message": message,
        })),
    )
}

fn check_headers(state: &AppState, headers: &HeaderMap) -> Result<(), ErrorResponse> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty());
    let authorized = match (token, state.token.as_deref()) {
        (Some(given), Some(expected)) => given == expected,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if !authorized {
        return Err(notion_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "API token is invalid.",
        ));
    }
    if !headers.contains_key("notion-version") {
        return Err(notion_error(
            StatusCode::BAD_REQUEST,
            "missing_version",
            "Notion-Version header failed validation.",
        ));
    }
    Ok(())
}

/// Fill in `plain_text` on title segments the way the service echoes them.
fn normalize_properties(properties: Map<String, Value>) -> Map<String, Value> {
    properties
        .into_iter()
        .map(|(name, mut value)| {
            if let Some(segments) = value.get_mut("title").and_then(Value::as_array_mut) {
                for segment in segments {
                    let content = segment
                        .pointer("/text/content")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    if let (Some(content), Some(object)) = (content, segment.as_object_mut()) {
                        object.insert("type".to_string(), json!("text"));
                        object
                            .entry("plain_text")
                            .or_insert_with(|| Value::String(content));
                    }
                }
            }
            (name, value)
        })
        .collect()
}

async fn create_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreatePage>,
) -> Result<Json<Page>, ErrorResponse> {
    check_headers(&state, &headers)?;
    let page = Page {
        object: "page".to_string(),
        id: Uuid::new_v4(),
        parent: input.parent,
        archived: false,
        properties: normalize_properties(input.properties),
    };
    state.db.write().await.push(page.clone());
    Ok(Json(page))
}

async fn query_data_source(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<QueryResponse>, ErrorResponse> {
    check_headers(&state, &headers)?;
    let pages = state.db.read().await;
    let results = pages
        .iter()
        .filter(|page| page.parent.data_source_id == id && !page.archived)
        .cloned()
        .collect();
    Ok(Json(QueryResponse {
        object: "list".to_string(),
        results,
        has_more: false,
        next_cursor: None,
    }))
}

async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<UpdatePage>,
) -> Result<Json<Page>, ErrorResponse> {
    check_headers(&state, &headers)?;
    let mut pages = state.db.write().await;
    let page = pages.iter_mut().find(|page| page.id == id).ok_or_else(|| {
        notion_error(
            StatusCode::NOT_FOUND,
            "object_not_found",
            "Could not find page with that ID.",
        )
    })?;
    if let Some(properties) = input.properties {
        page.properties.extend(normalize_properties(properties));
    }
    if let Some(archived) = input.archived {
        page.archived = archived;
    }
    Ok(Json(page.clone()))
}
