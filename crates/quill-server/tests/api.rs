//! End-to-end tests against the router, no socket involved.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use quill_server::QuillServer;
use quill_storage::{Storage, UploadStore};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "quill-test-boundary";

async fn test_router() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(&dir.path().join("test.sqlite")).await.unwrap();
    let uploads = UploadStore::new(dir.path().join("uploads"), "http://localhost:3003", "/uploads")
        .await
        .unwrap();

    let router = QuillServer::new(storage, uploads)
        .with_static_prefix("/uploads")
        .router();
    (router, dir)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a multipart body from text fields and an optional (name, filename, bytes) file
fn multipart_request(
    method: &str,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, req).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn list_posts_empty() {
    let (router, _dir) = test_router().await;

    let (status, body) = send_json(&router, empty_request("GET", "/posts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_post_requires_title_and_content() {
    let (router, _dir) = test_router().await;

    let (status, body) = send_json(
        &router,
        json_request("POST", "/posts", json!({ "content": "body only" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");

    let (status, _) = send_json(
        &router,
        json_request("POST", "/posts", json!({ "title": "t", "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send_json(&router, empty_request("GET", "/posts")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_then_get_post() {
    let (router, _dir) = test_router().await;

    let (status, created) = send_json(
        &router,
        json_request(
            "POST",
            "/posts",
            json!({
                "title": "Hello",
                "content": "World",
                "category": "news",
                "externalLinks": "https://a.example,https://b.example"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["image"].is_null());

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send_json(&router, empty_request("GET", &format!("/posts/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["externalLinks"], "https://a.example,https://b.example");
}

#[tokio::test]
async fn get_unknown_post_is_404() {
    let (router, _dir) = test_router().await;

    let (status, body) = send_json(&router, empty_request("GET", "/posts/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");
}

#[tokio::test]
async fn non_numeric_id_is_rejected() {
    let (router, _dir) = test_router().await;

    for (method, uri) in [
        ("GET", "/posts/abc"),
        ("DELETE", "/posts/abc"),
        ("GET", "/posts/99999999999999999999"),
    ] {
        let (status, body) = send_json(&router, empty_request(method, uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert!(
            body["error"].as_str().unwrap().starts_with("Invalid post id"),
            "{method} {uri}: {body}"
        );
    }
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (router, _dir) = test_router().await;

    let (_, created) = send_json(
        &router,
        json_request(
            "POST",
            "/posts",
            json!({ "title": "Old", "content": "Body", "keyword": "rust" }),
        ),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send_json(
        &router,
        multipart_request("PUT", &format!("/posts/{id}"), &[("title", "New")], None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["content"], "Body");
    assert_eq!(updated["keyword"], "rust");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (_, fetched) = send_json(&router, empty_request("GET", &format!("/posts/{id}"))).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_rejects_blank_title() {
    let (router, _dir) = test_router().await;

    let (_, created) = send_json(
        &router,
        json_request("POST", "/posts", json!({ "title": "t", "content": "c" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send_json(
        &router,
        json_request("PUT", &format!("/posts/{id}"), json!({ "title": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_unknown_post_is_404() {
    let (router, _dir) = test_router().await;

    let (status, _) = send_json(
        &router,
        json_request("PUT", "/posts/12", json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_twice() {
    let (router, _dir) = test_router().await;

    let (_, created) = send_json(
        &router,
        json_request("POST", "/posts", json!({ "title": "t", "content": "c" })),
    )
    .await;
    let uri = format!("/posts/{}", created["id"]);

    let (status, body) = send_json(&router, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Post deleted" }));

    let (status, _) = send_json(&router, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&router, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn uploaded_image_is_served_back() {
    let (router, dir) = test_router().await;
    let image: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

    let (status, created) = send_json(
        &router,
        multipart_request(
            "POST",
            "/posts",
            &[("title", "With image"), ("content", "Body")],
            Some(("image", "photo.png", image)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let url = created["image"].as_str().unwrap().to_string();
    assert!(url.starts_with("http://localhost:3003/uploads/"));
    assert!(url.ends_with(".png"));

    let path = url.trim_start_matches("http://localhost:3003");
    let (status, bytes) = send(&router, empty_request("GET", path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, image);

    let stored = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn update_without_file_keeps_image_and_with_file_replaces_it() {
    let (router, _dir) = test_router().await;

    let (_, created) = send_json(
        &router,
        multipart_request(
            "POST",
            "/posts",
            &[("title", "t"), ("content", "c")],
            Some(("image", "a.jpg", &b"first"[..])),
        ),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    let first_url = created["image"].clone();

    let (_, kept) = send_json(
        &router,
        multipart_request("PUT", &format!("/posts/{id}"), &[("category", "x")], None),
    )
    .await;
    assert_eq!(kept["image"], first_url);

    let (_, replaced) = send_json(
        &router,
        multipart_request(
            "PUT",
            &format!("/posts/{id}"),
            &[],
            Some(("image", "b.jpg", &b"second"[..])),
        ),
    )
    .await;
    assert_ne!(replaced["image"], first_url);
    assert!(replaced["image"].as_str().unwrap().ends_with(".jpg"));
    assert_eq!(replaced["category"], "x");
}

#[tokio::test]
async fn invalid_create_writes_no_file() {
    let (router, dir) = test_router().await;

    let (status, _) = send_json(
        &router,
        multipart_request(
            "POST",
            "/posts",
            &[("content", "missing title")],
            Some(("image", "a.png", &b"bytes"[..])),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn update_unknown_post_removes_upload() {
    let (router, dir) = test_router().await;

    let (status, _) = send_json(
        &router,
        multipart_request("PUT", "/posts/77", &[], Some(("image", "a.png", &b"bytes"[..]))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let stored = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn form_submission_json() {
    let (router, _dir) = test_router().await;

    let (status, body) = send_json(
        &router,
        json_request(
            "POST",
            "/form",
            json!({
                "fullName": "Ada Lovelace",
                "phone": "555-0100",
                "position": "Engineer",
                "email": "ada@example.com"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fullName"], "Ada Lovelace");
    assert_eq!(body["position"], "Engineer");
    assert!(body["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn form_submission_urlencoded_without_validation() {
    let (router, _dir) = test_router().await;

    let req = Request::builder()
        .method("POST")
        .uri("/form")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("fullName=Grace+Hopper"))
        .unwrap();

    let (status, body) = send_json(&router, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["fullName"], "Grace Hopper");
    assert!(body["email"].is_null());
}

#[tokio::test]
async fn health() {
    let (router, _dir) = test_router().await;

    let (status, body) = send_json(&router, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
