use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_backend::{app, app_with, Backend};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_returns_all_posts_in_results() {
    let resp = app().oneshot(get("/api/posts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total"], 3);
    let ids: Vec<&Value> = body["results"].as_array().unwrap().iter().map(|p| &p["id"]).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[tokio::test]
async fn list_paginates_with_offset_and_limit() {
    let resp = app()
        .oneshot(get("/api/posts?query=&limit=1&offset=1"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["id"], 2);
}

#[tokio::test]
async fn list_filters_by_tag_and_safety() {
    let resp = app()
        .oneshot(get("/api/posts?query=cat+rating%3Asafe"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["id"], 1);
}

#[tokio::test]
async fn list_rejects_unknown_safety() {
    let resp = app()
        .oneshot(get("/api/posts?query=rating%3As"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "SearchError");
}

#[tokio::test]
async fn list_projects_requested_fields() {
    let resp = app()
        .oneshot(get("/api/posts?fields=id%2Cuser"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let first = body["results"][0].as_object().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first["user"]["name"], "alice");
}

// --- get ---

#[tokio::test]
async fn get_post_by_id() {
    let resp = app().oneshot(get("/api/posts/3")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["checksum"], "ffeeddccbbaa");
}

#[tokio::test]
async fn get_post_not_found() {
    let resp = app().oneshot(get("/api/posts/99")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "PostNotFoundError");
}

// --- auth ---

#[tokio::test]
async fn required_auth_rejects_anonymous() {
    let app = app_with(Backend::default().require_auth("Token YWxpY2U6c2VjcmV0"));
    let resp = app.oneshot(get("/api/posts")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn required_auth_accepts_matching_token() {
    let app = app_with(Backend::default().require_auth("Token YWxpY2U6c2VjcmV0"));
    let req = Request::builder()
        .uri("/api/posts/1")
        .header("authorization", "Token YWxpY2U6c2VjcmV0")
        .body(String::new())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
