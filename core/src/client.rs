//! Stateless HTTP request builder and response parser for the Notion API.
//!
//! # Design
//! `NotionClient` holds the base URL plus the two configured values and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. A `Transport` executes the round trip in
//! between, keeping this module free of I/O.
//!
//! Only the first page of a query is ever read; a truncated result set is
//! logged and otherwise ignored.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::settings::Settings;
use crate::types::{ItemFields, Page, QueryResults};

/// Production endpoint of the Notion REST API.
pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";

/// API version pinned on every request.
pub const NOTION_VERSION: &str = "2025-09-03";

/// Synchronous, stateless client for the Notion pages and data source API.
#[derive(Clone)]
pub struct NotionClient {
    base_url: String,
    api_key: String,
    data_source_id: String,
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .field("data_source_id", &self.data_source_id)
            .finish_non_exhaustive()
    }
}

impl NotionClient {
    pub fn new(base_url: &str, settings: &Settings) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            data_source_id: settings.data_source_id.clone(),
        }
    }

    pub fn build_create_item(&self, fields: &ItemFields) -> Result<HttpRequest, ApiError> {
        let body = json!({
            "parent": { "data_source_id": self.data_source_id },
            "properties": fields.to_properties(),
        });
        self.request(HttpMethod::Post, "/pages".to_string(), &body)
    }

    pub fn build_list_items(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!(
                "{}/data_sources/{}/query",
                self.base_url, self.data_source_id
            ),
            headers: self.headers(),
            body: Some("{}".to_string()),
        }
    }

    pub fn build_update_item(&self, id: &str, fields: &ItemFields) -> Result<HttpRequest, ApiError> {
        let body = json!({ "properties": fields.to_properties() });
        self.request(HttpMethod::Patch, format!("/pages/{id}"), &body)
    }

    pub fn build_archive_item(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Patch, format!("/pages/{id}"), &json!({ "archived": true }))
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Page, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<Page>, ApiError> {
        let results: QueryResults = parse_json(response)?;
        if results.has_more {
            log::warn!(
                "data source {} has more than {} records; only the first page is shown",
                self.data_source_id,
                results.results.len()
            );
        }
        Ok(results.results)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<Page, ApiError> {
        parse_json(response)
    }

    pub fn parse_archive_item(&self, response: HttpResponse) -> Result<Page, ApiError> {
        parse_json(response)
    }

    fn request(
        &self,
        method: HttpMethod,
        endpoint: String,
        body: &serde_json::Value,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}{endpoint}", self.base_url),
            headers: self.headers(),
            body: Some(body),
        })
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("authorization".to_string(), format!("Bearer {}", self.api_key)),
            ("notion-version".to_string(), NOTION_VERSION.to_string()),
            ("content-type".to_string(), "application/json".to_string()),
        ]
    }
}

/// Map non-2xx statuses to `ApiError::Http`, otherwise decode the body.
fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            body: response.body,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
