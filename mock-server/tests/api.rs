use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_token, Page, QueryResponse};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn notion_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, "Bearer secret_abc")
        .header("Notion-Version", "2025-09-03")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

const CREATE_BUY_MILK: &str = r#"{
    "parent": { "data_source_id": "db1" },
    "properties": {
        "标题": { "title": [{ "text": { "content": "Buy milk" } }] },
        "选择": { "select": { "name": "待办" } },
        "状态": { "select": { "name": "进行中" } }
    }
}"#;

// --- headers ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/data_sources/db1/query")
                .header("Notion-Version", "2025-09-03")
                .body("{}".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn wrong_token_returns_401_when_token_is_fixed() {
    let resp = app_with_token("other")
        .oneshot(notion_request("POST", "/v1/data_sources/db1/query", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_version_returns_400() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/data_sources/db1/query")
                .header(http::header::AUTHORIZATION, "Bearer secret_abc")
                .body("{}".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_bytes(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("missing_version"));
}

// --- query ---

#[tokio::test]
async fn query_empty_data_source() {
    let resp = app()
        .oneshot(notion_request("POST", "/v1/data_sources/db1/query", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: QueryResponse = body_json(resp).await;
    assert_eq!(list.object, "list");
    assert!(list.results.is_empty());
    assert!(!list.has_more);
}

// --- create ---

#[tokio::test]
async fn create_page_echoes_plain_text() {
    let resp = app()
        .oneshot(notion_request("POST", "/v1/pages", CREATE_BUY_MILK))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page = body_json(resp).await;
    assert_eq!(page.object, "page");
    assert_eq!(page.parent.data_source_id, "db1");
    assert!(!page.archived);
    assert_eq!(page.properties["标题"]["title"][0]["plain_text"], "Buy milk");
}

#[tokio::test]
async fn create_page_without_parent_is_rejected() {
    let resp = app()
        .oneshot(notion_request("POST", "/v1/pages", r#"{"properties":{}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- update ---

#[tokio::test]
async fn update_unknown_page_returns_404() {
    let resp = app()
        .oneshot(notion_request(
            "PATCH",
            "/v1/pages/00000000-0000-0000-0000-000000000000",
            r#"{"archived":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["code"], "object_not_found");
}

// --- full lifecycle ---

#[tokio::test]
async fn page_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(notion_request("POST", "/v1/pages", CREATE_BUY_MILK))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Page = body_json(resp).await;
    let id = created.id;

    // a page in another data source never shows up in db1
    let other = CREATE_BUY_MILK.replace("db1", "db2");
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(notion_request("POST", "/v1/pages", &other))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // query
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(notion_request("POST", "/v1/data_sources/db1/query", "{}"))
        .await
        .unwrap();
    let list: QueryResponse = body_json(resp).await;
    assert_eq!(list.results.len(), 1);
    assert_eq!(list.results[0].id, id);

    // update merges only the given property
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(notion_request(
            "PATCH",
            &format!("/v1/pages/{id}"),
            r#"{"properties":{"状态":{"select":{"name":"已完成"}}}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Page = body_json(resp).await;
    assert_eq!(updated.properties["状态"]["select"]["name"], "已完成");
    assert_eq!(updated.properties["选择"]["select"]["name"], "待办");
    assert_eq!(updated.properties["标题"]["title"][0]["plain_text"], "Buy milk");

    // archive
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(notion_request(
            "PATCH",
            &format!("/v1/pages/{id}"),
            r#"{"archived":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let archived: Page = body_json(resp).await;
    assert!(archived.archived);

    // query after archive: excluded
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(notion_request("POST", "/v1/data_sources/db1/query", "{}"))
        .await
        .unwrap();
    let list: QueryResponse = body_json(resp).await;
    assert!(list.results.is_empty());

    // the archived page still exists and can be patched
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(notion_request(
            "PATCH",
            &format!("/v1/pages/{id}"),
            r#"{"archived":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
