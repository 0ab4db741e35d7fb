//! HTTP API tests driven through the router in-process

mod common;

use std::collections::HashSet;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};

use service::Config;

use common::{empty_request, multipart_request, send, test_app, upload};

#[tokio::test]
async fn test_upload_and_download() {
    let app = test_app().await;

    let id = upload(&app, "a.txt", b"ab").await;

    let response = send(
        &app,
        empty_request(Method::GET, &format!("/api/v1/retrieve/id?id={id}")),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_ref(), b"ab");
    assert_eq!(
        response.headers[CONTENT_DISPOSITION],
        "attachment; filename=\"a.txt\""
    );
    assert_eq!(response.headers[CONTENT_TYPE], "text/plain");
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let app = test_app().await;

    let response = send(
        &app,
        multipart_request(Method::POST, "/api/v1/add/file", "other", &[("x", &b"x"[..])]),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_limit_rejected() {
    let config = Config {
        max_upload_size: 1024,
        ..Default::default()
    };
    let app = common::test_app_with(config).await;

    let big = vec![7u8; 4096];
    let response = send(
        &app,
        multipart_request(Method::POST, "/api/v1/add/file", "file", &[("big.bin", &big[..])]),
    )
    .await;
    assert!(response.status.is_client_error());

    let names = send(&app, empty_request(Method::GET, "/api/v1/retrieve/all")).await;
    assert_eq!(names.json::<Vec<String>>(), Vec::<String>::new());
}

#[tokio::test]
async fn test_batch_upload_and_prefix_lookup() {
    let app = test_app().await;

    let response = send(
        &app,
        multipart_request(
            Method::POST,
            "/api/v1/add/files",
            "files",
            &[("p1.txt", &b"c1"[..]), ("p2.txt", &b"c2"[..]), ("other.txt", &b"c3"[..])],
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["ids"].as_array().unwrap().len(), 3);

    let response = send(
        &app,
        empty_request(Method::GET, "/api/v1/retrieve/prefix?prefix=p"),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let names: HashSet<String> = response.json::<Vec<String>>().into_iter().collect();
    assert_eq!(
        names,
        HashSet::from(["p1.txt".to_string(), "p2.txt".to_string()])
    );

    let response = send(&app, empty_request(Method::GET, "/api/v1/retrieve/all")).await;
    assert_eq!(response.json::<Vec<String>>().len(), 3);
}

#[tokio::test]
async fn test_batch_upload_requires_files() {
    let app = test_app().await;

    let response = send(
        &app,
        multipart_request(Method::POST, "/api/v1/add/files", "files", &[]),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_retrieve_missing_and_invalid_ids() {
    let app = test_app().await;

    let response = send(&app, empty_request(Method::GET, "/api/v1/retrieve/id?id=41")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, empty_request(Method::GET, "/api/v1/retrieve/id?id=abc")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, empty_request(Method::GET, "/api/v1/retrieve/id")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rename() {
    let app = test_app().await;
    let id = upload(&app, "draft.md", b"# hi").await;

    let response = send(
        &app,
        empty_request(
            Method::PUT,
            &format!("/api/v1/file/rename?id={id}&name=final%20notes.md"),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(
        &app,
        empty_request(Method::GET, &format!("/api/v1/retrieve/id?id={id}")),
    )
    .await;
    assert_eq!(
        response.headers[CONTENT_DISPOSITION],
        "attachment; filename=\"final notes.md\""
    );
    assert_eq!(response.body.as_ref(), b"# hi");

    let response = send(
        &app,
        empty_request(Method::PUT, "/api/v1/file/rename?id=9999&name=x"),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replace() {
    let app = test_app().await;
    let id = upload(&app, "v1.bin", b"first").await;

    let response = send(
        &app,
        multipart_request(
            Method::POST,
            &format!("/api/v1/file/replace?id={id}"),
            "file",
            &[("v2.bin", &b"second"[..])],
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(
        &app,
        empty_request(Method::GET, &format!("/api/v1/retrieve/id?id={id}")),
    )
    .await;
    assert_eq!(response.body.as_ref(), b"second");
    assert_eq!(
        response.headers[CONTENT_DISPOSITION],
        "attachment; filename=\"v2.bin\""
    );

    let response = send(
        &app,
        multipart_request(
            Method::POST,
            "/api/v1/file/replace?id=9999",
            "file",
            &[("ghost.bin", &b"boo"[..])],
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, empty_request(Method::GET, "/api/v1/retrieve/all")).await;
    assert_eq!(response.json::<Vec<String>>(), vec!["v2.bin"]);
}

#[tokio::test]
async fn test_remove_file_is_idempotent() {
    let app = test_app().await;
    let id = upload(&app, "tmp", b"t").await;

    for _ in 0..2 {
        let response = send(
            &app,
            empty_request(Method::DELETE, &format!("/api/v1/remove/file?id={id}")),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = send(
        &app,
        empty_request(Method::GET, &format!("/api/v1/retrieve/id?id={id}")),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_files() {
    let app = test_app().await;
    let a = upload(&app, "a", b"a").await;
    let b = upload(&app, "b", b"b").await;
    let c = upload(&app, "c", b"c").await;

    let response = send(
        &app,
        empty_request(
            Method::DELETE,
            &format!("/api/v1/remove/files?ids={a}&ids={c}&ids=12345"),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&app, empty_request(Method::GET, "/api/v1/retrieve/all")).await;
    assert_eq!(response.json::<Vec<String>>(), vec!["b"]);

    let response = send(
        &app,
        empty_request(Method::DELETE, &format!("/api/v1/remove/files?ids={b}")),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = send(&app, empty_request(Method::DELETE, "/api/v1/remove/files")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_endpoints() {
    let app = test_app().await;

    for path in ["/_status/livez", "/_status/readyz", "/_status/version"] {
        let response = send(&app, empty_request(Method::GET, path)).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
    }

    let response = send(&app, empty_request(Method::GET, "/api/v2/anything")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
